// External tool presence checks

use std::process::Command;

use super::error::SetupError;

/// First line of `ffmpeg -version`, if the binary runs.
pub fn ffmpeg_version() -> Option<String> {
    tool_version("ffmpeg")
}

/// First line of `ffprobe -version`, if the binary runs.
pub fn ffprobe_version() -> Option<String> {
    tool_version("ffprobe")
}

fn tool_version(tool: &str) -> Option<String> {
    let output = Command::new(tool).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout.lines().next().map(|l| l.trim().to_string())
}

/// Verify that ffmpeg and ffprobe are both runnable before any work starts.
pub fn ensure_tools() -> Result<(), SetupError> {
    let ffmpeg = ffmpeg_version().ok_or(SetupError::MissingTool("ffmpeg"))?;
    tracing::debug!("{ffmpeg}");
    let ffprobe = ffprobe_version().ok_or(SetupError::MissingTool("ffprobe"))?;
    tracing::debug!("{ffprobe}");
    Ok(())
}
