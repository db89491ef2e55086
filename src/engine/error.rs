use thiserror::Error;

/// Fatal errors raised during the setup phase, before any file is processed.
/// Per-file failures never surface as errors; they are folded into the batch
/// counters instead.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("required tool `{0}` was not found on PATH")]
    MissingTool(&'static str),

    #[error("no supported hardware encoder is available (probed NVENC, QSV)")]
    NoEncoderAvailable,

    #[error("requested backend `{0}` has no usable encoder in this ffmpeg build")]
    BackendUnavailable(String),

    #[error("unknown hardware backend `{0}` (expected `auto`, `nvenc`, or `qsv`)")]
    UnknownBackend(String),
}
