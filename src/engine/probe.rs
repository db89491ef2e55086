// Subtitle stream inspection using ffprobe

use serde::Deserialize;
use std::path::Path;

use super::command::probe_subtitle_json;

/// One subtitle stream as found in the source container. `index` is the
/// subtitle-relative position (0-based, original container order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleStream {
    pub index: usize,
    pub codec: String,
    pub language: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_name: Option<String>,
    #[serde(default)]
    tags: ProbeTags,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    language: Option<String>,
    title: Option<String>,
}

/// Parse ffprobe JSON into subtitle descriptors, preserving container order.
fn parse_subtitle_streams(json: &str) -> Result<Vec<SubtitleStream>, serde_json::Error> {
    let output: ProbeOutput = serde_json::from_str(json)?;
    Ok(output
        .streams
        .into_iter()
        .enumerate()
        .map(|(index, stream)| SubtitleStream {
            index,
            codec: stream.codec_name.unwrap_or_else(|| "unknown".to_string()),
            language: stream.tags.language.filter(|l| !l.trim().is_empty()),
            title: stream.tags.title.filter(|t| !t.trim().is_empty()),
        })
        .collect())
}

/// List a file's subtitle streams. A failed query or unparseable output is
/// treated as "no subtitles": the pipeline proceeds without them.
pub fn subtitle_streams(path: &Path) -> Vec<SubtitleStream> {
    let json = match probe_subtitle_json(path) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!("subtitle probe failed for {}: {err:#}", path.display());
            return Vec::new();
        }
    };

    match parse_subtitle_streams(&json) {
        Ok(streams) => streams,
        Err(err) => {
            tracing::warn!(
                "could not parse subtitle metadata for {}: {err}",
                path.display()
            );
            Vec::new()
        }
    }
}
