//! Subtitle extraction with language and format filtering

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::command::{FfmpegRequest, StreamMap};
use super::probe::SubtitleStream;

/// Container format a subtitle stream is extracted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Ass,
    Vtt,
    /// DVD bitmap subtitles
    Sub,
    /// Blu-ray PGS bitmap subtitles
    Sup,
}

impl SubtitleFormat {
    /// Map a source codec name to its extraction format. Unrecognized codecs
    /// fall back to SRT as a best effort.
    pub fn from_codec(codec: &str) -> Self {
        match codec {
            "ass" | "ssa" => Self::Ass,
            "subrip" | "srt" => Self::Srt,
            "webvtt" => Self::Vtt,
            "dvd_subtitle" | "dvdsub" => Self::Sub,
            "hdmv_pgs_subtitle" | "pgssub" => Self::Sup,
            _ => Self::Srt,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Ass => "ass",
            Self::Vtt => "vtt",
            Self::Sub => "sub",
            Self::Sup => "sup",
        }
    }

    /// Bitmap formats cannot be converted to a text codec without rendering.
    pub fn is_bitmap(&self) -> bool {
        matches!(self, Self::Sub | Self::Sup)
    }

    /// Codec argument for the extraction call: text formats are re-coded to
    /// the target file format, bitmap formats are copied verbatim.
    fn codec_arg(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Ass => "ass",
            Self::Vtt => "webvtt",
            Self::Sub | Self::Sup => "copy",
        }
    }
}

/// A subtitle stream that passed the filter and was demuxed to its own file.
/// `output_index` is the position this stream will take in the remuxed
/// output, assigned contiguously from 0 in extraction order.
#[derive(Debug, Clone)]
pub struct ExtractedSubtitle {
    pub stream: SubtitleStream,
    pub format: SubtitleFormat,
    pub path: PathBuf,
    pub output_index: usize,
}

/// Exact-match language filter: with a non-empty allow-list only streams
/// whose trimmed tag is a member pass; untagged streams are excluded. An
/// empty allow-list keeps everything.
pub fn language_matches(language: Option<&str>, allow: &[String]) -> bool {
    if allow.is_empty() {
        return true;
    }
    match language {
        Some(tag) => allow.iter().any(|a| a == tag.trim()),
        None => false,
    }
}

/// One planned extraction: which stream, into which format and file.
#[derive(Debug, Clone)]
pub struct PlannedExtraction {
    pub stream: SubtitleStream,
    pub format: SubtitleFormat,
    pub path: PathBuf,
}

/// Apply the language filter and format mapping, deciding target paths.
/// Pure planning; no processes are spawned here.
pub fn plan_extraction(
    streams: &[SubtitleStream],
    allow: &[String],
    temp_dir: &Path,
    stem: &str,
) -> Vec<PlannedExtraction> {
    let mut planned = Vec::new();
    for stream in streams {
        if !language_matches(stream.language.as_deref(), allow) {
            tracing::info!(
                "skipping subtitle stream {} (language {})",
                stream.index,
                stream.language.as_deref().unwrap_or("untagged")
            );
            continue;
        }
        let format = SubtitleFormat::from_codec(&stream.codec);
        let filename = format!("{stem}.{}.{}", stream.index, format.extension());
        planned.push(PlannedExtraction {
            stream: stream.clone(),
            format,
            path: temp_dir.join(filename),
        });
    }
    planned
}

/// The ffmpeg call demuxing exactly one subtitle stream to its own file.
pub fn extraction_request(input: &Path, plan: &PlannedExtraction) -> FfmpegRequest {
    let mut req = FfmpegRequest::new(&plan.path);
    req.inputs = vec![input.to_path_buf()];
    req.maps = vec![StreamMap::Subtitle {
        input: 0,
        stream: plan.stream.index,
    }];
    req.codec_args = vec!["-c:s".to_string(), plan.format.codec_arg().to_string()];
    req
}

/// Extract every filter-passing subtitle stream of `input` into `temp_dir`.
/// A stream that fails to extract is logged and omitted; it never aborts the
/// job. Output indexes are assigned to successful extractions only.
pub fn extract_all(
    input: &Path,
    streams: &[SubtitleStream],
    allow: &[String],
    temp_dir: &Path,
    stem: &str,
) -> Result<Vec<ExtractedSubtitle>> {
    let planned = plan_extraction(streams, allow, temp_dir, stem);
    if planned.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(temp_dir)?;

    let mut extracted: Vec<ExtractedSubtitle> = Vec::new();
    for plan in planned {
        if plan.format.is_bitmap() {
            tracing::warn!(
                "subtitle stream {} is a bitmap format ({}); it may not survive remuxing",
                plan.stream.index,
                plan.format.extension()
            );
        }

        match extraction_request(input, &plan).run() {
            Ok(()) => {
                tracing::debug!(
                    "extracted subtitle stream {} to {}",
                    plan.stream.index,
                    plan.path.display()
                );
                extracted.push(ExtractedSubtitle {
                    output_index: extracted.len(),
                    stream: plan.stream,
                    format: plan.format,
                    path: plan.path,
                });
            }
            Err(err) => {
                tracing::warn!(
                    "failed to extract subtitle stream {}: {err:#}",
                    plan.stream.index
                );
            }
        }
    }

    if extracted.is_empty() {
        tracing::warn!("no subtitles could be extracted from {}", input.display());
    }

    Ok(extracted)
}
