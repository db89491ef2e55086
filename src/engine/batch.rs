//! Batch orchestration: discovery, sequential job loop, accounting

use anyhow::{Context, Result, bail};
use bytesize::ByteSize;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use crate::config::Settings;

use super::hardware::EncoderProfile;
use super::job::{self, JobOutcome, OUTPUT_SUFFIX, TranscodeJob};

/// Container extensions eligible for conversion (case-insensitive).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm", "mov", "avi", "flv", "m4v", "wmv"];

/// Check if a path has a video file extension
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Files already carrying the output suffix are this tool's own products;
/// re-enqueueing them would chain suffixes when the output directory is
/// scanned again.
fn already_converted(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(OUTPUT_SUFFIX))
        .unwrap_or(false)
}

/// Non-recursive scan of the input directory for eligible files, sorted for
/// a stable processing order.
pub fn discover(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        bail!(
            "input path {} does not exist or is not a directory",
            input_dir.display()
        );
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| !is_hidden(p) && is_video_file(p) && !already_converted(p))
        .collect();

    files.sort();
    Ok(files)
}

/// Accumulated counters for one run. Byte totals cover only jobs that
/// produced an output this run; skipped and failed jobs contribute nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub total_files: usize,
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub output_bytes: u64,
}

impl BatchResult {
    pub fn record(&mut self, outcome: JobOutcome, original_bytes: u64, output_bytes: u64) {
        match outcome {
            JobOutcome::Skipped => self.skipped += 1,
            JobOutcome::Failed => self.failed += 1,
            JobOutcome::Succeeded | JobOutcome::SucceededWithoutSubtitles => {
                self.successful += 1;
                self.original_bytes += original_bytes;
                self.output_bytes += output_bytes;
            }
        }
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.output_bytes as f64 / self.original_bytes as f64)
    }
}

/// Convert every eligible file in `input_dir`, one at a time, writing to
/// `output_dir`. Individual failures are reported and counted but never stop
/// the batch.
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    profile: &EncoderProfile,
    settings: &Settings,
) -> Result<BatchResult> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let files = discover(input_dir)?;
    let mut result = BatchResult {
        total_files: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        println!("No video files found in {}", input_dir.display());
        return Ok(result);
    }

    let total = files.len();
    for (i, input) in files.iter().enumerate() {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input.display().to_string());
        println!("{}", format!("[{}/{total}] {name}", i + 1).bold());

        let job = TranscodeJob::new(input.clone(), output_dir);
        let start = Instant::now();
        let outcome = job::run_job(&job, profile, settings);
        let elapsed = start.elapsed();

        let original_bytes = fs::metadata(input).map(|m| m.len()).unwrap_or(0);
        let output_bytes = if outcome.is_success() {
            fs::metadata(&job.output_path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };
        result.record(outcome, original_bytes, output_bytes);

        match outcome {
            JobOutcome::Skipped => {
                println!("{}", "  already converted, skipping".yellow());
            }
            JobOutcome::Succeeded => {
                println!(
                    "{}",
                    format!(
                        "  ✓ done in {elapsed:.0?} ({} -> {})",
                        ByteSize::b(original_bytes).to_string_as(true),
                        ByteSize::b(output_bytes).to_string_as(true),
                    )
                    .green()
                );
            }
            JobOutcome::SucceededWithoutSubtitles => {
                println!(
                    "{}",
                    format!(
                        "  ✓ done in {elapsed:.0?}, subtitles dropped ({} -> {})",
                        ByteSize::b(original_bytes).to_string_as(true),
                        ByteSize::b(output_bytes).to_string_as(true),
                    )
                    .yellow()
                );
            }
            JobOutcome::Failed => {
                println!("{}", "  ✗ failed".red());
            }
        }
    }

    print_summary(&result);
    Ok(result)
}

fn print_summary(result: &BatchResult) {
    println!();
    println!(
        "{}",
        format!(
            "Converted {} of {} file(s), {} skipped, {} failed",
            result.successful, result.total_files, result.skipped, result.failed
        )
        .bold()
    );
    if result.original_bytes > 0 {
        println!(
            "Total size: {} -> {} ({:.1}% reduction)",
            ByteSize::b(result.original_bytes).to_string_as(true),
            ByteSize::b(result.output_bytes).to_string_as(true),
            result.reduction_percent()
        );
    }
}
