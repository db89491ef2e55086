//! Hardware encoder detection and backend resolution

use std::process::Command;
use std::sync::OnceLock;

use crate::config::Settings;

use super::error::SetupError;

/// Supported hardware backends, in auto-probe priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Nvenc,
    Qsv,
}

impl Backend {
    /// The FFmpeg encoder name for this backend.
    pub fn encoder_name(&self) -> &'static str {
        match self {
            Self::Nvenc => "hevc_nvenc",
            Self::Qsv => "hevc_qsv",
        }
    }

    /// User-friendly display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nvenc => "HEVC NVENC (NVIDIA)",
            Self::Qsv => "HEVC Quick Sync (Intel)",
        }
    }
}

/// Fully resolved encoder selection for one batch run. Built once during
/// setup and shared by every job.
#[derive(Debug, Clone)]
pub struct EncoderProfile {
    pub backend: Backend,
    pub preset: String,
    pub quality: u32,
}

impl EncoderProfile {
    pub fn codec(&self) -> &'static str {
        self.backend.encoder_name()
    }

    /// Hardware device binding, applied before the input file.
    pub fn device_args(&self) -> Vec<String> {
        match self.backend {
            // hevc_nvenc binds the GPU itself, no device setup needed
            Backend::Nvenc => Vec::new(),
            Backend::Qsv => vec!["-init_hw_device".to_string(), "qsv=hw".to_string()],
        }
    }

    /// Rate control: NVENC runs VBR in constant-quality mode with no bitrate
    /// cap; QSV takes a global quality value.
    pub fn rate_control_args(&self) -> Vec<String> {
        match self.backend {
            Backend::Nvenc => vec![
                "-rc:v".to_string(),
                "vbr".to_string(),
                "-cq:v".to_string(),
                self.quality.to_string(),
                "-b:v".to_string(),
                "0".to_string(),
            ],
            Backend::Qsv => vec!["-global_quality".to_string(), self.quality.to_string()],
        }
    }
}

/// Which HEVC hardware encoders the local ffmpeg build registers.
#[derive(Debug, Clone, Copy)]
pub struct EncoderAvailability {
    pub nvenc: bool,
    pub qsv: bool,
}

impl EncoderAvailability {
    /// Parse availability out of `ffmpeg -encoders` output.
    pub fn from_registry(output: &str) -> Self {
        Self {
            nvenc: registry_lists(output, "hevc_nvenc"),
            qsv: registry_lists(output, "hevc_qsv"),
        }
    }
}

/// An encoder counts as registered when its name appears as a word in the
/// listing; substring hits inside longer names do not count.
fn registry_lists(output: &str, encoder: &str) -> bool {
    output
        .lines()
        .any(|line| line.split_whitespace().any(|word| word == encoder))
}

/// Cache for the output of `ffmpeg -encoders`.
static FFMPEG_ENCODERS_OUTPUT_CACHE: OnceLock<String> = OnceLock::new();

fn ffmpeg_encoders_output() -> &'static str {
    FFMPEG_ENCODERS_OUTPUT_CACHE.get_or_init(|| {
        Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .output()
            .ok()
            .map(|o| String::from_utf8_lossy(&o.stdout).to_string())
            .unwrap_or_default()
    })
}

fn encoder_availability() -> EncoderAvailability {
    EncoderAvailability::from_registry(ffmpeg_encoders_output())
}

/// Pick a backend for the requested mode from a known availability set.
pub fn resolve_backend(
    avail: EncoderAvailability,
    selector: &str,
) -> Result<Backend, SetupError> {
    match selector {
        "auto" => {
            if avail.nvenc {
                Ok(Backend::Nvenc)
            } else if avail.qsv {
                Ok(Backend::Qsv)
            } else {
                Err(SetupError::NoEncoderAvailable)
            }
        }
        "nvenc" => {
            if avail.nvenc {
                Ok(Backend::Nvenc)
            } else {
                Err(SetupError::BackendUnavailable("nvenc".to_string()))
            }
        }
        "qsv" => {
            if avail.qsv {
                Ok(Backend::Qsv)
            } else {
                Err(SetupError::BackendUnavailable("qsv".to_string()))
            }
        }
        other => Err(SetupError::UnknownBackend(other.to_string())),
    }
}

/// Resolve the encoder profile for this run. Queries the ffmpeg encoder
/// registry once and announces the selection.
pub fn resolve(settings: &Settings) -> Result<EncoderProfile, SetupError> {
    let backend = resolve_backend(encoder_availability(), &settings.backend)?;
    tracing::info!("using {}", backend.display_name());
    Ok(EncoderProfile {
        backend,
        preset: settings.preset.clone(),
        quality: settings.quality,
    })
}
