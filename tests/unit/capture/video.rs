use super::*;
use crate::capture::scheduler::ManualClock;

const PROBE_WITH_AUDIO: &str = r#"{
  "streams": [
    {"index": 0, "codec_type": "video", "width": 1280, "height": 720, "r_frame_rate": "30/1"},
    {"index": 1, "codec_type": "audio", "sample_rate": "48000"}
  ],
  "format": {"duration": "5.000000"}
}"#;

#[test]
fn probe_output_reads_size_duration_and_audio() {
    let meta = parse_probe_output(PROBE_WITH_AUDIO.as_bytes()).unwrap();
    assert_eq!(meta.size, Size::new(1280, 720));
    assert!((meta.duration_secs - 5.0).abs() < 1e-9);
    assert!(meta.has_audio);
}

#[test]
fn probe_output_without_audio_or_duration() {
    let raw = r#"{"streams":[{"codec_type":"video","width":2,"height":2}]}"#;
    let meta = parse_probe_output(raw.as_bytes()).unwrap();
    assert!(!meta.has_audio);
    assert_eq!(meta.duration_secs, 0.0);
}

#[test]
fn probe_output_without_video_stream_is_capture_error() {
    let raw = r#"{"streams":[{"codec_type":"audio"}]}"#;
    assert!(parse_probe_output(raw.as_bytes()).unwrap_err().is_capture());
    assert!(parse_probe_output(b"not json").unwrap_err().is_capture());
}

#[tokio::test]
async fn unloaded_video_is_detached_and_paused() {
    let mut video = FfmpegVideo::new("missing.mp4", Fps::whole(30), Box::new(ManualClock::new()));
    assert!(!video.is_attached());
    assert!(video.is_paused());
    assert!(!video.is_ended());
    assert!(video.audio_track().is_none());
    assert!(video.play().await.unwrap_err().is_capture());
    video.release();
    video.release();
    assert!(!video.is_attached());
}
