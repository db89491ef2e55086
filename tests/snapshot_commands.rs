use std::path::{Path, PathBuf};

use ffbatch::engine::hardware::{Backend, EncoderProfile};
use ffbatch::engine::probe::SubtitleStream;
use ffbatch::engine::remux::remux_request;
use ffbatch::engine::subtitles::{
    ExtractedSubtitle, SubtitleFormat, extraction_request, plan_extraction,
};
use ffbatch::engine::transcode::transcode_request;
use insta::assert_snapshot;

fn profile(backend: Backend) -> EncoderProfile {
    EncoderProfile {
        backend,
        preset: "medium".to_string(),
        quality: 26,
    }
}

#[test]
fn snapshot_nvenc_transcode() {
    let req = transcode_request(
        Path::new("/media/in/movie.mkv"),
        Path::new("/media/out/.movie.100.tmp.mp4"),
        &profile(Backend::Nvenc),
    );
    assert_snapshot!(
        req.to_command_line(),
        @"ffmpeg -hide_banner -nostdin -loglevel error -y -i /media/in/movie.mkv -map 0:v:0 -map 0:a? -c:v hevc_nvenc -preset medium -rc:v vbr -cq:v 26 -b:v 0 -tag:v hvc1 -c:a copy /media/out/.movie.100.tmp.mp4"
    );
}

#[test]
fn snapshot_qsv_transcode() {
    let req = transcode_request(
        Path::new("/media/in/movie.mkv"),
        Path::new("/media/out/.movie.100.tmp.mp4"),
        &profile(Backend::Qsv),
    );
    assert_snapshot!(
        req.to_command_line(),
        @"ffmpeg -hide_banner -nostdin -loglevel error -y -init_hw_device qsv=hw -i /media/in/movie.mkv -map 0:v:0 -map 0:a? -c:v hevc_qsv -preset medium -global_quality 26 -tag:v hvc1 -c:a copy /media/out/.movie.100.tmp.mp4"
    );
}

#[test]
fn snapshot_subtitle_extraction() {
    let streams = vec![SubtitleStream {
        index: 1,
        codec: "subrip".to_string(),
        language: Some("eng".to_string()),
        title: None,
    }];
    let planned = plan_extraction(&streams, &[], Path::new("/media/out/.movie.100.subs"), "movie");
    assert_eq!(planned.len(), 1);

    let req = extraction_request(Path::new("/media/in/movie.mkv"), &planned[0]);
    assert_snapshot!(
        req.to_command_line(),
        @"ffmpeg -hide_banner -nostdin -loglevel error -y -i /media/in/movie.mkv -map 0:s:1 -c:s srt /media/out/.movie.100.subs/movie.1.srt"
    );
}

#[test]
fn snapshot_remux_with_two_subtitles() {
    let subs = vec![
        ExtractedSubtitle {
            stream: SubtitleStream {
                index: 0,
                codec: "subrip".to_string(),
                language: Some("eng".to_string()),
                title: None,
            },
            format: SubtitleFormat::Srt,
            path: PathBuf::from("/media/out/.movie.100.subs/movie.0.srt"),
            output_index: 0,
        },
        ExtractedSubtitle {
            stream: SubtitleStream {
                index: 2,
                codec: "ass".to_string(),
                language: Some("fin".to_string()),
                title: Some("Signs".to_string()),
            },
            format: SubtitleFormat::Ass,
            path: PathBuf::from("/media/out/.movie.100.subs/movie.2.ass"),
            output_index: 1,
        },
    ];

    let req = remux_request(
        Path::new("/media/out/.movie.100.tmp.mp4"),
        &subs,
        Path::new("/media/out/movie_h265.mp4"),
    );
    assert_snapshot!(
        req.to_command_line(),
        @"ffmpeg -hide_banner -nostdin -loglevel error -y -i /media/out/.movie.100.tmp.mp4 -i /media/out/.movie.100.subs/movie.0.srt -i /media/out/.movie.100.subs/movie.2.ass -map 0:v:0 -map 0:a? -map 1:0 -map 2:0 -c:v copy -c:a copy -c:s mov_text -metadata:s:s:0 language=eng -metadata:s:s:1 language=fin -metadata:s:s:1 title=Signs -movflags +faststart /media/out/movie_h265.mp4"
    );
}

#[test]
fn snapshot_remux_without_metadata() {
    let subs = vec![ExtractedSubtitle {
        stream: SubtitleStream {
            index: 0,
            codec: "webvtt".to_string(),
            language: None,
            title: None,
        },
        format: SubtitleFormat::Vtt,
        path: PathBuf::from("/media/out/.clip.100.subs/clip.0.vtt"),
        output_index: 0,
    }];

    let req = remux_request(
        Path::new("/media/out/.clip.100.tmp.mp4"),
        &subs,
        Path::new("/media/out/clip_h265.mp4"),
    );
    assert_snapshot!(
        req.to_command_line(),
        @"ffmpeg -hide_banner -nostdin -loglevel error -y -i /media/out/.clip.100.tmp.mp4 -i /media/out/.clip.100.subs/clip.0.vtt -map 0:v:0 -map 0:a? -map 1:0 -c:v copy -c:a copy -c:s mov_text -movflags +faststart /media/out/clip_h265.mp4"
    );
}
