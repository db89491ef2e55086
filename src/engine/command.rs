//! Structured ffmpeg invocations
//!
//! Argument lists for the transcode, extract, and remux calls vary with the
//! subtitle count, so they are assembled from named parts here instead of
//! being spliced together positionally at each call site.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Arguments applied to every invocation, ahead of everything else.
const FFMPEG_DEFAULT_ARGS: &[&str] = &["-hide_banner", "-nostdin", "-loglevel", "error", "-y"];

/// How many trailing stderr lines to keep in error messages.
const STDERR_TAIL_LINES: usize = 12;

/// A stream selection by role rather than by raw `-map` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMap {
    /// First video stream of an input: `-map {i}:v:0`
    Video { input: usize },
    /// All audio streams of an input, tolerating absence: `-map {i}:a?`
    AudioAll { input: usize },
    /// One subtitle stream by subtitle-relative index: `-map {i}:s:{stream}`
    Subtitle { input: usize, stream: usize },
    /// The single stream of a one-stream input: `-map {i}:0`
    Whole { input: usize },
}

impl StreamMap {
    fn specifier(&self) -> String {
        match self {
            Self::Video { input } => format!("{input}:v:0"),
            Self::AudioAll { input } => format!("{input}:a?"),
            Self::Subtitle { input, stream } => format!("{input}:s:{stream}"),
            Self::Whole { input } => format!("{input}:0"),
        }
    }
}

/// A metadata tag bound to an output subtitle stream index:
/// `-metadata:s:s:{index} {key}={value}`
#[derive(Debug, Clone)]
pub struct SubtitleTag {
    pub output_index: usize,
    pub key: &'static str,
    pub value: String,
}

/// One ffmpeg invocation, assembled from named parts.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRequest {
    /// Device binding and other pre-input arguments.
    pub pre_input_args: Vec<String>,
    pub inputs: Vec<PathBuf>,
    pub maps: Vec<StreamMap>,
    pub codec_args: Vec<String>,
    pub subtitle_tags: Vec<SubtitleTag>,
    /// Container-level flags, e.g. `-movflags +faststart`.
    pub container_args: Vec<String>,
    pub output: PathBuf,
}

impl FfmpegRequest {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..Default::default()
        }
    }

    /// Flatten into the final argument list.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = FFMPEG_DEFAULT_ARGS.iter().map(|s| s.to_string()).collect();
        args.extend(self.pre_input_args.iter().cloned());
        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }
        for map in &self.maps {
            args.push("-map".to_string());
            args.push(map.specifier());
        }
        args.extend(self.codec_args.iter().cloned());
        for tag in &self.subtitle_tags {
            args.push(format!("-metadata:s:s:{}", tag.output_index));
            args.push(format!("{}={}", tag.key, tag.value));
        }
        args.extend(self.container_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());
        args
    }

    /// Single-line rendering for logs and snapshot tests.
    pub fn to_command_line(&self) -> String {
        let mut parts = vec!["ffmpeg".to_string()];
        parts.extend(self.to_args());
        parts.join(" ")
    }

    /// Run the invocation to completion, capturing output. Non-zero exit
    /// becomes an error carrying the stderr tail.
    pub fn run(&self) -> Result<()> {
        tracing::debug!("{}", self.to_command_line());
        let output = Command::new("ffmpeg")
            .args(self.to_args())
            .output()
            .context("failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr_tail(&stderr)
            );
        }
        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}

/// Probe a file's subtitle stream metadata with ffprobe, returning raw JSON.
pub fn probe_subtitle_json(path: &Path) -> Result<String> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "s",
        ])
        .arg(path)
        .output()
        .context("failed to execute ffprobe")?;

    if !output.status.success() {
        bail!(
            "ffprobe exited with {}: {}",
            output.status,
            stderr_tail(&String::from_utf8_lossy(&output.stderr))
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
