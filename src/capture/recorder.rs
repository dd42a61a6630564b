//! Media recorders: container negotiation, the `ffmpeg` encoder and an in-memory double.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capture::journal::Journal;
use crate::capture::video::AudioTrack;
use crate::foundation::core::{Fps, Frame, Size};
use crate::foundation::error::{CardError, CardResult};
use crate::render::composite::flatten_to_opaque;

/// Output frame rate of every recording.
pub const CAPTURE_FPS: Fps = Fps::whole(30);
pub const VIDEO_BITS_PER_SECOND: u32 = 5_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Mp4,
    WebM,
}

impl ContainerFormat {
    /// Negotiation order, most preferred first.
    pub const PREFERENCE: [ContainerFormat; 2] = [ContainerFormat::Mp4, ContainerFormat::WebM];

    pub fn mime(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::WebM => "video/webm",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::WebM => "webm",
        }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecorderConfig {
    pub size: Size,
    pub fps: Fps,
    pub video_bits_per_second: u32,
    pub container: ContainerFormat,
}

impl RecorderConfig {
    pub fn new(size: Size, container: ContainerFormat) -> Self {
        Self {
            size,
            fps: CAPTURE_FPS,
            video_bits_per_second: VIDEO_BITS_PER_SECOND,
            container,
        }
    }

    pub fn validate(&self) -> CardResult<()> {
        if self.size.is_empty() {
            return Err(CardError::validation(
                "recorder width/height must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(CardError::validation("recorder fps must be non-zero"));
        }
        if self.video_bits_per_second == 0 {
            return Err(CardError::validation("recorder bitrate must be non-zero"));
        }
        if !self.size.width.is_multiple_of(2) || !self.size.height.is_multiple_of(2) {
            return Err(CardError::validation(
                "recorder width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }
}

/// Encoded output of a finished recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedMedia {
    pub container: ContainerFormat,
    pub bytes: Vec<u8>,
    pub frames: u64,
}

/// One recording: `start`, any number of `push_frame`, then `stop`.
#[async_trait(?Send)]
pub trait MediaRecorder {
    fn config(&self) -> &RecorderConfig;

    async fn start(&mut self) -> CardResult<()>;

    async fn push_frame(&mut self, frame: &Frame) -> CardResult<()>;

    /// Flush and return everything recorded.
    async fn stop(&mut self) -> CardResult<RecordedMedia>;
}

pub trait RecorderFactory {
    fn is_type_supported(&self, container: ContainerFormat) -> bool;

    fn create(
        &self,
        cfg: RecorderConfig,
        audio: Option<AudioTrack>,
    ) -> CardResult<Box<dyn MediaRecorder>>;
}

/// First supported container in [`ContainerFormat::PREFERENCE`] order.
pub fn negotiate_container(factory: &dyn RecorderFactory) -> CardResult<ContainerFormat> {
    ContainerFormat::PREFERENCE
        .into_iter()
        .find(|c| factory.is_type_supported(*c))
        .ok_or_else(|| CardError::capture("no supported recording container (mp4 or webm)"))
}

fn check_frame(cfg: &RecorderConfig, frame: &Frame) -> CardResult<()> {
    if frame.size() != cfg.size {
        return Err(CardError::capture(format!(
            "frame size mismatch: got {}, expected {}",
            frame.size(),
            cfg.size
        )));
    }
    Ok(())
}

/// Containers whose encoders appear in `ffmpeg -encoders` output.
pub fn parse_encoder_list(text: &str) -> Vec<ContainerFormat> {
    let has = |name: &str| {
        text.lines()
            .any(|line| line.split_whitespace().nth(1) == Some(name))
    };
    let mut out = Vec::new();
    if has("libx264") && has("aac") {
        out.push(ContainerFormat::Mp4);
    }
    if has("libvpx-vp9") && has("libopus") {
        out.push(ContainerFormat::WebM);
    }
    out
}

/// Spawns a system `ffmpeg` per recording.
#[derive(Clone, Debug, Default)]
pub struct FfmpegRecorderFactory {
    supported: Vec<ContainerFormat>,
}

impl FfmpegRecorderFactory {
    /// Ask the local `ffmpeg` which encoders it has. No `ffmpeg` means nothing is supported.
    pub fn detect() -> Self {
        let out = std::process::Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stderr(std::process::Stdio::null())
            .output();
        let supported = match out {
            Ok(out) if out.status.success() => {
                parse_encoder_list(&String::from_utf8_lossy(&out.stdout))
            }
            Ok(_) | Err(_) => Vec::new(),
        };
        tracing::debug!(?supported, "ffmpeg containers detected");
        Self { supported }
    }

    pub fn with_formats(supported: Vec<ContainerFormat>) -> Self {
        Self { supported }
    }
}

impl RecorderFactory for FfmpegRecorderFactory {
    fn is_type_supported(&self, container: ContainerFormat) -> bool {
        self.supported.contains(&container)
    }

    fn create(
        &self,
        cfg: RecorderConfig,
        audio: Option<AudioTrack>,
    ) -> CardResult<Box<dyn MediaRecorder>> {
        Ok(Box::new(FfmpegRecorder::new(cfg, audio)?))
    }
}

/// `ffmpeg` arguments for an encode reading raw RGBA frames on stdin.
pub fn encode_args(
    cfg: &RecorderConfig,
    audio: Option<&AudioTrack>,
    out: &std::path::Path,
) -> Vec<String> {
    let mut args: Vec<String> = [
        "-y",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    args.extend([
        "-s".to_string(),
        cfg.size.to_string(),
        "-r".to_string(),
        format!("{}/{}", cfg.fps.num, cfg.fps.den),
        "-i".to_string(),
        "pipe:0".to_string(),
    ]);
    if let Some(track) = audio {
        args.push("-i".to_string());
        args.push(track.source.display().to_string());
    }
    args.extend(["-map".to_string(), "0:v:0".to_string()]);
    if audio.is_some() {
        args.extend(["-map".to_string(), "1:a:0?".to_string()]);
    }

    let (vcodec, acodec) = match cfg.container {
        ContainerFormat::Mp4 => ("libx264", "aac"),
        ContainerFormat::WebM => ("libvpx-vp9", "libopus"),
    };
    args.extend([
        "-c:v".to_string(),
        vcodec.to_string(),
        "-b:v".to_string(),
        cfg.video_bits_per_second.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
    ]);
    if audio.is_some() {
        args.extend([
            "-c:a".to_string(),
            acodec.to_string(),
            "-shortest".to_string(),
        ]);
    } else {
        args.push("-an".to_string());
    }
    if cfg.container == ContainerFormat::Mp4 {
        args.extend(["-movflags".to_string(), "+faststart".to_string()]);
    }
    args.push(out.display().to_string());
    args
}

pub struct FfmpegRecorder {
    cfg: RecorderConfig,
    audio: Option<AudioTrack>,
    workdir: tempfile::TempDir,
    out_path: PathBuf,
    child: Option<tokio::process::Child>,
    stdin: Option<tokio::process::ChildStdin>,
    frames: u64,
}

impl std::fmt::Debug for FfmpegRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegRecorder")
            .field("cfg", &self.cfg)
            .field("out_path", &self.out_path)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl FfmpegRecorder {
    pub fn new(cfg: RecorderConfig, audio: Option<AudioTrack>) -> CardResult<Self> {
        cfg.validate()?;
        let workdir = tempfile::tempdir()
            .map_err(|e| CardError::capture(format!("create recorder scratch dir: {e}")))?;
        let out_path = workdir
            .path()
            .join(format!("capture.{}", cfg.container.extension()));
        Ok(Self {
            cfg,
            audio,
            workdir,
            out_path,
            child: None,
            stdin: None,
            frames: 0,
        })
    }
}

#[async_trait(?Send)]
impl MediaRecorder for FfmpegRecorder {
    fn config(&self) -> &RecorderConfig {
        &self.cfg
    }

    async fn start(&mut self) -> CardResult<()> {
        if self.child.is_some() {
            return Err(CardError::capture("recorder already started"));
        }
        let args = encode_args(&self.cfg, self.audio.as_ref(), &self.out_path);
        let mut child = tokio::process::Command::new("ffmpeg")
            .args(&args)
            .current_dir(self.workdir.path())
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CardError::capture(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CardError::capture("failed to open ffmpeg stdin (unexpected)"))?;
        tracing::debug!(container = %self.cfg.container, size = %self.cfg.size, "recorder started");
        self.stdin = Some(stdin);
        self.child = Some(child);
        Ok(())
    }

    async fn push_frame(&mut self, frame: &Frame) -> CardResult<()> {
        use tokio::io::AsyncWriteExt as _;

        check_frame(&self.cfg, frame)?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CardError::capture("recorder is not running"));
        };
        stdin
            .write_all(&flatten_to_opaque(frame))
            .await
            .map_err(|e| {
                CardError::capture(format!("failed to write frame to ffmpeg stdin: {e}"))
            })?;
        self.frames += 1;
        Ok(())
    }

    async fn stop(&mut self) -> CardResult<RecordedMedia> {
        drop(self.stdin.take());
        let child = self
            .child
            .take()
            .ok_or_else(|| CardError::capture("recorder was never started"))?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CardError::capture(format!("failed to wait for ffmpeg to finish: {e}")))?;
        if !output.status.success() {
            return Err(CardError::capture(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let bytes = tokio::fs::read(&self.out_path).await.map_err(|e| {
            CardError::capture(format!(
                "read recording '{}': {e}",
                self.out_path.display()
            ))
        })?;
        Ok(RecordedMedia {
            container: self.cfg.container,
            bytes,
            frames: self.frames,
        })
    }
}

/// What the in-memory recorders observed, shared with the test that built them.
#[derive(Clone, Debug, Default)]
pub struct RecorderLog {
    pub created: Vec<RecorderConfig>,
    pub audio: Vec<Option<AudioTrack>>,
    pub started: usize,
    pub stopped: usize,
    pub frames: u64,
    pub last_frame: Option<Frame>,
}

/// Factory for [`InMemoryRecorder`]s, for tests and dry runs.
#[derive(Clone, Debug)]
pub struct InMemoryRecorderFactory {
    supported: Vec<ContainerFormat>,
    log: Arc<Mutex<RecorderLog>>,
    journal: Journal,
    fail_on_stop: bool,
}

impl InMemoryRecorderFactory {
    pub fn new(supported: Vec<ContainerFormat>) -> Self {
        Self {
            supported,
            log: Arc::default(),
            journal: Journal::new(),
            fail_on_stop: false,
        }
    }

    /// Record `recorder:start` / `recorder:stop` into `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Recorders whose `stop` fails, to exercise the failure path.
    pub fn failing_on_stop(mut self) -> Self {
        self.fail_on_stop = true;
        self
    }

    pub fn log(&self) -> RecorderLog {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl RecorderFactory for InMemoryRecorderFactory {
    fn is_type_supported(&self, container: ContainerFormat) -> bool {
        self.supported.contains(&container)
    }

    fn create(
        &self,
        cfg: RecorderConfig,
        audio: Option<AudioTrack>,
    ) -> CardResult<Box<dyn MediaRecorder>> {
        cfg.validate()?;
        with_log(&self.log, |log| {
            log.created.push(cfg);
            log.audio.push(audio);
        })?;
        Ok(Box::new(InMemoryRecorder {
            cfg,
            log: Arc::clone(&self.log),
            journal: self.journal.clone(),
            running: false,
            frames: 0,
            fail_on_stop: self.fail_on_stop,
        }))
    }
}

fn with_log<T>(log: &Mutex<RecorderLog>, f: impl FnOnce(&mut RecorderLog) -> T) -> CardResult<T> {
    let mut guard = log
        .lock()
        .map_err(|_| CardError::capture("recorder log poisoned"))?;
    Ok(f(&mut guard))
}

#[derive(Debug)]
pub struct InMemoryRecorder {
    cfg: RecorderConfig,
    log: Arc<Mutex<RecorderLog>>,
    journal: Journal,
    running: bool,
    frames: u64,
    fail_on_stop: bool,
}

#[async_trait(?Send)]
impl MediaRecorder for InMemoryRecorder {
    fn config(&self) -> &RecorderConfig {
        &self.cfg
    }

    async fn start(&mut self) -> CardResult<()> {
        if self.running {
            return Err(CardError::capture("recorder already started"));
        }
        self.running = true;
        self.journal.push("recorder:start");
        with_log(&self.log, |log| log.started += 1)
    }

    async fn push_frame(&mut self, frame: &Frame) -> CardResult<()> {
        check_frame(&self.cfg, frame)?;
        if !self.running {
            return Err(CardError::capture("recorder is not running"));
        }
        self.frames += 1;
        with_log(&self.log, |log| {
            log.frames += 1;
            log.last_frame = Some(frame.clone());
        })
    }

    async fn stop(&mut self) -> CardResult<RecordedMedia> {
        if !self.running {
            return Err(CardError::capture("recorder was never started"));
        }
        self.running = false;
        self.journal.push("recorder:stop");
        with_log(&self.log, |log| log.stopped += 1)?;
        if self.fail_on_stop {
            return Err(CardError::capture("simulated recorder failure"));
        }
        Ok(RecordedMedia {
            container: self.cfg.container,
            bytes: format!("{}:{}", self.cfg.container.extension(), self.frames).into_bytes(),
            frames: self.frames,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/recorder.rs"]
mod tests;
