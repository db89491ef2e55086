//! Temporary artifact tracking and interruption cleanup
//!
//! Every job registers its temporary paths here before creating them. The
//! per-job guard removes them on every normal exit path; the interrupt
//! handler sweeps whatever is still registered when the process is told to
//! stop, so a Ctrl+C mid-encode never leaves partial files behind.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static ARTIFACTS: OnceLock<Mutex<BTreeSet<PathBuf>>> = OnceLock::new();

fn registry() -> &'static Mutex<BTreeSet<PathBuf>> {
    ARTIFACTS.get_or_init(|| Mutex::new(BTreeSet::new()))
}

fn register(path: &Path) {
    registry().lock().unwrap().insert(path.to_path_buf());
}

fn deregister(path: &Path) {
    registry().lock().unwrap().remove(path);
}

/// Best-effort removal of a file or directory tree.
fn remove_artifact(path: &Path) {
    if path.is_dir() {
        let _ = std::fs::remove_dir_all(path);
    } else {
        let _ = std::fs::remove_file(path);
    }
}

/// Remove every currently registered artifact.
pub fn sweep() {
    let paths: Vec<PathBuf> = {
        let mut guard = registry().lock().unwrap();
        std::mem::take(&mut *guard).into_iter().collect()
    };
    for path in paths {
        remove_artifact(&path);
    }
}

/// Install the process-wide interrupt handler: sweep temporaries, then exit
/// with the conventional interrupted status.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        eprintln!("\ninterrupted, removing temporary files...");
        sweep();
        std::process::exit(130);
    })
}

/// Scoped ownership of a job's temporary paths. Registered on creation,
/// removed and deregistered on drop.
pub struct CleanupGuard {
    paths: Vec<PathBuf>,
}

impl CleanupGuard {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        for path in &paths {
            register(path);
        }
        Self { paths }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            remove_artifact(path);
            deregister(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_removes_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        let temp_file = dir.path().join("job.tmp.mp4");
        let temp_dir = dir.path().join("job.subs");
        std::fs::write(&temp_file, b"partial").unwrap();
        std::fs::create_dir(&temp_dir).unwrap();
        std::fs::write(temp_dir.join("a.srt"), b"1").unwrap();

        {
            let _guard = CleanupGuard::new(vec![temp_file.clone(), temp_dir.clone()]);
        }

        assert!(!temp_file.exists());
        assert!(!temp_dir.exists());
    }

    #[test]
    fn test_guard_tolerates_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let never_created = dir.path().join("never.tmp.mp4");
        {
            let _guard = CleanupGuard::new(vec![never_created.clone()]);
        }
        assert!(!never_created.exists());
    }
}
