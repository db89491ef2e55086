//! Final container assembly with subtitle metadata

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use super::command::{FfmpegRequest, StreamMap, SubtitleTag};
use super::subtitles::ExtractedSubtitle;

/// How a job's final output came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeDisposition {
    /// Subtitles were merged into the output.
    Remuxed,
    /// Nothing to merge; the intermediate was promoted as-is.
    Promoted,
    /// Remux failed; the intermediate was promoted without subtitles.
    FellBack,
}

/// The remux invocation: intermediate video first, one extra input per
/// extracted subtitle, everything stream-copied except subtitles which are
/// converted to the container's text codec. Metadata tags are keyed by the
/// subtitle's output index, so they stay correct whatever the source layout
/// was.
pub fn remux_request(
    temp_video: &Path,
    subtitles: &[ExtractedSubtitle],
    output: &Path,
) -> FfmpegRequest {
    let mut req = FfmpegRequest::new(output);
    req.inputs = vec![temp_video.to_path_buf()];
    req.maps = vec![
        StreamMap::Video { input: 0 },
        StreamMap::AudioAll { input: 0 },
    ];

    for sub in subtitles {
        req.inputs.push(sub.path.clone());
        req.maps.push(StreamMap::Whole {
            input: sub.output_index + 1,
        });
    }

    req.codec_args = vec![
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "copy".to_string(),
        "-c:s".to_string(),
        "mov_text".to_string(),
    ];

    for sub in subtitles {
        if let Some(language) = &sub.stream.language {
            req.subtitle_tags.push(SubtitleTag {
                output_index: sub.output_index,
                key: "language",
                value: language.clone(),
            });
        }
        if let Some(title) = &sub.stream.title {
            req.subtitle_tags.push(SubtitleTag {
                output_index: sub.output_index,
                key: "title",
                value: title.clone(),
            });
        }
    }

    req.container_args = vec!["-movflags".to_string(), "+faststart".to_string()];
    req
}

/// Produce the final output from the intermediate video and any extracted
/// subtitles. Remux failure degrades to a subtitle-less promote as long as
/// the intermediate survived; only a missing intermediate or an unpromotable
/// file is an error.
pub fn finalize(
    temp_video: &Path,
    subtitles: &[ExtractedSubtitle],
    output: &Path,
) -> Result<FinalizeDisposition> {
    if subtitles.is_empty() {
        promote(temp_video, output)?;
        return Ok(FinalizeDisposition::Promoted);
    }

    let remux_result = remux_request(temp_video, subtitles, output)
        .run()
        .and_then(|()| validate_output(output));

    match remux_result {
        Ok(()) => Ok(FinalizeDisposition::Remuxed),
        Err(err) => {
            if output.exists() {
                let _ = fs::remove_file(output);
            }
            if !temp_video.exists() {
                return Err(err.context("remux failed and the intermediate video is gone"));
            }
            tracing::warn!(
                "remux failed for {}; keeping video without subtitles: {err:#}",
                output.display()
            );
            promote(temp_video, output)?;
            Ok(FinalizeDisposition::FellBack)
        }
    }
}

/// Move the intermediate into place as the final output.
fn promote(temp_video: &Path, output: &Path) -> Result<()> {
    fs::rename(temp_video, output).with_context(|| {
        format!(
            "failed to move {} to {}",
            temp_video.display(),
            output.display()
        )
    })?;
    validate_output(output)
}

/// A final output must exist and be non-empty.
fn validate_output(output: &Path) -> Result<()> {
    let size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        bail!("output file {} is missing or empty", output.display());
    }
    Ok(())
}
