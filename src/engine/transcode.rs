//! Video re-encode stage

use anyhow::{Context, Result};
use std::path::Path;

use super::command::{FfmpegRequest, StreamMap};
use super::hardware::EncoderProfile;

/// The single encode invocation for one job: video stream 0 re-encoded on
/// the selected hardware, all audio streams copied verbatim. A file without
/// audio must still convert, hence the optional audio map.
pub fn transcode_request(
    input: &Path,
    temp_video: &Path,
    profile: &EncoderProfile,
) -> FfmpegRequest {
    let mut req = FfmpegRequest::new(temp_video);
    req.pre_input_args = profile.device_args();
    req.inputs = vec![input.to_path_buf()];
    req.maps = vec![
        StreamMap::Video { input: 0 },
        StreamMap::AudioAll { input: 0 },
    ];

    req.codec_args = vec![
        "-c:v".to_string(),
        profile.codec().to_string(),
        "-preset".to_string(),
        profile.preset.clone(),
    ];
    req.codec_args.extend(profile.rate_control_args());
    req.codec_args
        .extend(["-tag:v".to_string(), "hvc1".to_string()]);
    req.codec_args
        .extend(["-c:a".to_string(), "copy".to_string()]);
    req
}

/// Run the encode. Failure here is fatal to the job.
pub fn run_transcode(input: &Path, temp_video: &Path, profile: &EncoderProfile) -> Result<()> {
    transcode_request(input, temp_video, profile)
        .run()
        .with_context(|| format!("video re-encode failed for {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hardware::Backend;
    use std::path::PathBuf;

    fn profile(backend: Backend) -> EncoderProfile {
        EncoderProfile {
            backend,
            preset: "medium".to_string(),
            quality: 26,
        }
    }

    #[test]
    fn test_nvenc_request_shape() {
        let req = transcode_request(
            &PathBuf::from("/in/movie.mkv"),
            &PathBuf::from("/out/movie.tmp.mp4"),
            &profile(Backend::Nvenc),
        );
        let args = req.to_args();

        assert!(req.pre_input_args.is_empty());
        assert!(args.windows(2).any(|w| w == ["-c:v", "hevc_nvenc"]));
        assert!(args.windows(2).any(|w| w == ["-rc:v", "vbr"]));
        assert!(args.windows(2).any(|w| w == ["-b:v", "0"]));
        assert!(args.windows(2).any(|w| w == ["-c:a", "copy"]));
        assert!(args.windows(2).any(|w| w == ["-map", "0:a?"]));
    }

    #[test]
    fn test_qsv_request_binds_device() {
        let req = transcode_request(
            &PathBuf::from("/in/movie.mkv"),
            &PathBuf::from("/out/movie.tmp.mp4"),
            &profile(Backend::Qsv),
        );
        let args = req.to_args();

        assert!(args.windows(2).any(|w| w == ["-init_hw_device", "qsv=hw"]));
        assert!(args.windows(2).any(|w| w == ["-c:v", "hevc_qsv"]));
        assert!(args.windows(2).any(|w| w == ["-global_quality", "26"]));
        // device binding must precede the input
        let device = args.iter().position(|a| a == "-init_hw_device").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(device < input);
    }
}
