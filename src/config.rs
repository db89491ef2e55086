// Compiled-in run configuration

/// Hardware backend selector: "auto" probes NVENC first, then QSV.
/// Set to "nvenc" or "qsv" to require a specific backend.
pub const HARDWARE_BACKEND: &str = "auto";

/// Encoder preset, passed through to ffmpeg. "medium" is accepted by both
/// hevc_nvenc and hevc_qsv.
pub const ENCODER_PRESET: &str = "medium";

/// Quality level, lower is higher quality. Maps to `-cq:v` for NVENC and
/// `-global_quality` for QSV.
pub const QUALITY_LEVEL: u32 = 26;

/// Comma-separated subtitle language allow-list. Empty keeps every subtitle
/// stream, including untagged ones.
pub const SUBTITLE_LANGUAGES: &str = "";

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: String,
    pub preset: String,
    pub quality: u32,
    /// Parsed allow-list; empty means no filtering.
    pub subtitle_languages: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: HARDWARE_BACKEND.to_string(),
            preset: ENCODER_PRESET.to_string(),
            quality: QUALITY_LEVEL,
            subtitle_languages: parse_languages(SUBTITLE_LANGUAGES),
        }
    }
}

/// Split a comma-separated language list, trimming whitespace and dropping
/// empty entries.
pub fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
