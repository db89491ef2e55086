//! Per-file transcode job: paths, state machine, pipeline driver

use std::path::{Path, PathBuf};

use crate::config::Settings;

use super::cleanup::CleanupGuard;
use super::hardware::EncoderProfile;
use super::probe;
use super::remux::{self, FinalizeDisposition};
use super::subtitles;
use super::transcode;

/// Suffix appended to converted file names.
pub const OUTPUT_SUFFIX: &str = "_h265";

/// Target container for converted files.
pub const TARGET_EXTENSION: &str = "mp4";

/// One input file's paths. Temporary paths live inside the output directory
/// and carry the process id, so concurrent runs against different output
/// directories never collide.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub temp_video_path: PathBuf,
    pub temp_subtitle_dir: PathBuf,
}

impl TranscodeJob {
    pub fn new(input_path: PathBuf, output_dir: &Path) -> Self {
        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
            .to_string();
        let pid = std::process::id();

        Self {
            output_path: output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.{TARGET_EXTENSION}")),
            temp_video_path: output_dir.join(format!(".{stem}.{pid}.tmp.{TARGET_EXTENSION}")),
            temp_subtitle_dir: output_dir.join(format!(".{stem}.{pid}.subs")),
            input_path,
        }
    }

    pub fn stem(&self) -> &str {
        self.input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
    }
}

/// Terminal state of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Output already existed; nothing was done.
    Skipped,
    Succeeded,
    /// The video converted but subtitles were dropped at the remux stage.
    SucceededWithoutSubtitles,
    Failed,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded | Self::SucceededWithoutSubtitles)
    }
}

/// Drive one file through extract → transcode → remux. Every temporary
/// artifact is guarded, so all exit paths, including panics and the
/// interrupt sweep, leave the output directory clean.
pub fn run_job(job: &TranscodeJob, profile: &EncoderProfile, settings: &Settings) -> JobOutcome {
    if job.output_path.exists() {
        tracing::info!(
            "skipping {}: output already exists",
            job.input_path.display()
        );
        return JobOutcome::Skipped;
    }

    let _guard = CleanupGuard::new(vec![
        job.temp_video_path.clone(),
        job.temp_subtitle_dir.clone(),
    ]);

    // Extracting
    let streams = probe::subtitle_streams(&job.input_path);
    let subtitles = match subtitles::extract_all(
        &job.input_path,
        &streams,
        &settings.subtitle_languages,
        &job.temp_subtitle_dir,
        job.stem(),
    ) {
        Ok(subtitles) => subtitles,
        Err(err) => {
            tracing::warn!(
                "subtitle extraction setup failed for {}; continuing without subtitles: {err:#}",
                job.input_path.display()
            );
            Vec::new()
        }
    };

    // Transcoding
    if let Err(err) = transcode::run_transcode(&job.input_path, &job.temp_video_path, profile) {
        tracing::error!("{err:#}");
        return JobOutcome::Failed;
    }

    // Remuxing
    match remux::finalize(&job.temp_video_path, &subtitles, &job.output_path) {
        Ok(FinalizeDisposition::Remuxed | FinalizeDisposition::Promoted) => JobOutcome::Succeeded,
        Ok(FinalizeDisposition::FellBack) => JobOutcome::SucceededWithoutSubtitles,
        Err(err) => {
            tracing::error!("{err:#}");
            if job.output_path.exists() {
                let _ = std::fs::remove_file(&job.output_path);
            }
            JobOutcome::Failed
        }
    }
}
