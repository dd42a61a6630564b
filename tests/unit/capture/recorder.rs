use super::*;

fn cfg(container: ContainerFormat) -> RecorderConfig {
    RecorderConfig::new(Size::new(4, 2), container)
}

#[test]
fn container_mime_and_extension() {
    assert_eq!(ContainerFormat::Mp4.mime(), "video/mp4");
    assert_eq!(ContainerFormat::WebM.mime(), "video/webm");
    assert_eq!(ContainerFormat::Mp4.extension(), "mp4");
    assert_eq!(ContainerFormat::WebM.extension(), "webm");
    assert_eq!(
        serde_json::to_string(&ContainerFormat::WebM).unwrap(),
        "\"webm\""
    );
}

#[test]
fn recorder_defaults_are_30fps_5mbps() {
    let c = cfg(ContainerFormat::Mp4);
    assert_eq!(c.fps, Fps::whole(30));
    assert_eq!(c.video_bits_per_second, 5_000_000);
    c.validate().unwrap();
}

#[test]
fn recorder_config_rejects_odd_or_empty_sizes() {
    let mut c = cfg(ContainerFormat::Mp4);
    c.size = Size::new(5, 4);
    assert!(c.validate().is_err());
    c.size = Size::new(0, 4);
    assert!(c.validate().is_err());
}

#[test]
fn negotiation_prefers_mp4_then_webm() {
    let both = InMemoryRecorderFactory::new(vec![ContainerFormat::WebM, ContainerFormat::Mp4]);
    assert_eq!(negotiate_container(&both).unwrap(), ContainerFormat::Mp4);

    let webm = InMemoryRecorderFactory::new(vec![ContainerFormat::WebM]);
    assert_eq!(negotiate_container(&webm).unwrap(), ContainerFormat::WebM);

    let none = InMemoryRecorderFactory::new(Vec::new());
    assert!(negotiate_container(&none).unwrap_err().is_capture());
}

#[test]
fn encoder_list_maps_to_containers() {
    let text = "\
Encoders:
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC
 A....D aac                  AAC (Advanced Audio Coding)
 A....D libopus              libopus Opus
";
    assert_eq!(parse_encoder_list(text), vec![ContainerFormat::Mp4]);

    let text = format!("{text} V....D libvpx-vp9           libvpx VP9\n");
    assert_eq!(
        parse_encoder_list(&text),
        vec![ContainerFormat::Mp4, ContainerFormat::WebM]
    );
    assert!(parse_encoder_list("").is_empty());
}

#[test]
fn encode_args_for_mp4_with_audio() {
    let track = AudioTrack {
        source: PathBuf::from("/clips/bg.mp4"),
    };
    let args = encode_args(
        &cfg(ContainerFormat::Mp4),
        Some(&track),
        std::path::Path::new("out.mp4"),
    );
    let joined = args.join(" ");
    assert!(joined.contains("-s 4x2 -r 30/1 -i pipe:0 -i /clips/bg.mp4"));
    assert!(joined.contains("-map 0:v:0 -map 1:a:0?"));
    assert!(joined.contains("-c:v libx264 -b:v 5000000"));
    assert!(joined.contains("-c:a aac -shortest"));
    assert!(joined.contains("+faststart"));
    assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
}

#[test]
fn encode_args_for_webm_without_audio() {
    let args = encode_args(
        &cfg(ContainerFormat::WebM),
        None,
        std::path::Path::new("out.webm"),
    );
    let joined = args.join(" ");
    assert!(joined.contains("-c:v libvpx-vp9"));
    assert!(joined.contains("-an"));
    assert!(!joined.contains("1:a:0"));
    assert!(!joined.contains("faststart"));
}

#[tokio::test]
async fn in_memory_recorder_logs_lifecycle() {
    let journal = Journal::new();
    let factory =
        InMemoryRecorderFactory::new(vec![ContainerFormat::Mp4]).with_journal(journal.clone());
    let mut rec = factory.create(cfg(ContainerFormat::Mp4), None).unwrap();

    let frame = Frame::transparent(Size::new(4, 2)).unwrap();
    assert!(rec.push_frame(&frame).await.is_err());

    rec.start().await.unwrap();
    rec.push_frame(&frame).await.unwrap();
    rec.push_frame(&frame).await.unwrap();
    let bad = Frame::transparent(Size::new(2, 2)).unwrap();
    assert!(rec.push_frame(&bad).await.is_err());

    let media = rec.stop().await.unwrap();
    assert_eq!(media.container, ContainerFormat::Mp4);
    assert_eq!(media.frames, 2);

    let log = factory.log();
    assert_eq!(log.created.len(), 1);
    assert_eq!((log.started, log.stopped, log.frames), (1, 1, 2));
    assert_eq!(journal.entries(), vec!["recorder:start", "recorder:stop"]);
}

#[tokio::test]
async fn failing_recorder_still_counts_stop() {
    let factory = InMemoryRecorderFactory::new(vec![ContainerFormat::Mp4]).failing_on_stop();
    let mut rec = factory.create(cfg(ContainerFormat::Mp4), None).unwrap();
    rec.start().await.unwrap();
    assert!(rec.stop().await.unwrap_err().is_capture());
    assert_eq!(factory.log().stopped, 1);
}
