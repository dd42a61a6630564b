use super::*;
use crate::capture::recorder::InMemoryRecorderFactory;
use crate::capture::scheduler::{ManualClock, SteppedScheduler};
use crate::capture::video::InMemoryVideo;
use crate::foundation::core::Size;
use crate::render::surface::{CardSurface, Layer, LayerKind, LayerSource};

fn overlay_surface() -> CardSurface {
    CardSurface::new(Size::new(4, 2)).with_layer(Layer::new(
        LayerKind::Content,
        LayerSource::Fill([255, 0, 0, 128]),
    ))
}

fn green_video(clock: &ManualClock, frames: u64) -> InMemoryVideo {
    let frame = Frame::from_premul(2, 1, [0, 255, 0, 255].repeat(2)).unwrap();
    InMemoryVideo::new(frame, frames, CAPTURE_FPS, clock.clone())
}

#[tokio::test]
async fn composited_frame_has_video_under_overlay() {
    let factory = InMemoryRecorderFactory::new(vec![ContainerFormat::Mp4]);
    let engine = CaptureEngine::new(factory.clone());
    let clock = ManualClock::new();
    let mut video = green_video(&clock, 3);
    let mut sched = SteppedScheduler::new(clock, CAPTURE_FPS);

    let outcome = engine
        .record(
            &overlay_surface(),
            Some(&mut video),
            &mut sched,
            &UserInput::default(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.frames, 3);

    let log = factory.log();
    assert_eq!(log.created[0].size, Size::new(8, 4));
    let last = log.last_frame.unwrap();
    assert_eq!(last.size(), Size::new(8, 4));
    // Half-alpha red over opaque green.
    assert_eq!(last.pixel(0, 0), Some([128, 127, 0, 255]));
}

#[tokio::test]
async fn missing_video_is_a_no_op() {
    let engine = CaptureEngine::new(InMemoryRecorderFactory::new(vec![ContainerFormat::Mp4]));
    let mut sched = SteppedScheduler::new(ManualClock::new(), CAPTURE_FPS);
    let out = engine
        .record(&overlay_surface(), None, &mut sched, &UserInput::default())
        .await
        .unwrap();
    assert!(out.is_none());
    assert!(engine.factory().log().created.is_empty());
    assert!(!engine.is_active());
}

#[test]
fn artifact_saves_under_its_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = VideoArtifact {
        file_name: "水瓶座+INTJ+鼠+A型.webm".to_string(),
        container: ContainerFormat::WebM,
        bytes: b"data".to_vec(),
    };
    let path = artifact.save_to(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("水瓶座+INTJ+鼠+A型.webm"));
    assert_eq!(std::fs::read(path).unwrap(), b"data");
    assert_eq!(artifact.mime(), "video/webm");
}

#[test]
fn outcome_duration_follows_capture_fps() {
    let outcome = RecordingOutcome {
        artifact: VideoArtifact {
            file_name: "x.mp4".to_string(),
            container: ContainerFormat::Mp4,
            bytes: Vec::new(),
        },
        frames: 150,
        states: Vec::new(),
    };
    assert!((outcome.duration_secs() - 5.0).abs() < 1e-9);
}
