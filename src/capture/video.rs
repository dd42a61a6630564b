//! Background video sources for the compositing loop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::capture::journal::Journal;
use crate::capture::scheduler::{ManualClock, PlaybackClock};
use crate::foundation::core::{Fps, Frame, Size};
use crate::foundation::error::{CardError, CardResult};

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub size: Size,
    pub duration_secs: f64,
    pub has_audio: bool,
}

/// An audio stream to mux into the recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioTrack {
    pub source: PathBuf,
}

/// A playable background clip.
///
/// Starts paused and detached. `load_metadata` attaches it, `play` starts playback, and
/// `release` drops every decoder resource; a released video can be released again.
#[async_trait(?Send)]
pub trait BackgroundVideo {
    async fn load_metadata(&mut self) -> CardResult<VideoMetadata>;

    async fn play(&mut self) -> CardResult<()>;

    fn is_paused(&self) -> bool;

    fn is_ended(&self) -> bool;

    /// Frame at the current playback position; `None` while nothing is decoded yet or after
    /// the end.
    async fn current_frame(&mut self) -> CardResult<Option<&Frame>>;

    /// Resolve once playback reached its natural end.
    async fn wait_ended(&mut self) -> CardResult<()>;

    fn audio_track(&self) -> Option<AudioTrack>;

    fn release(&mut self);

    fn is_attached(&self) -> bool;
}

/// Whether both `ffmpeg` and `ffprobe` run from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|bin| {
        std::process::Command::new(bin)
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// Parse `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_probe_output(json: &[u8]) -> CardResult<VideoMetadata> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| CardError::capture(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CardError::capture("no video stream found"))?;
    let (Some(width), Some(height)) = (video.width, video.height) else {
        return Err(CardError::capture("missing video dimensions from ffprobe"));
    };
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoMetadata {
        size: Size::new(width, height),
        duration_secs,
        has_audio,
    })
}

pub async fn probe_video(path: &Path) -> CardResult<VideoMetadata> {
    let out = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| CardError::capture(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CardError::capture(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_output(&out.stdout)
}

/// First frame of `path`, for previews.
pub fn decode_poster_frame(path: &Path) -> CardResult<Frame> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "pipe:1"])
        .output()
        .map_err(|e| CardError::capture(format!("failed to run ffmpeg for poster decode: {e}")))?;
    if !out.status.success() || out.stdout.is_empty() {
        return Err(CardError::capture(format!(
            "poster decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    let img = image::load_from_memory_with_format(&out.stdout, image::ImageFormat::Png)
        .map_err(|e| CardError::capture(format!("poster png decode failed: {e}")))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Frame::from_straight(w, h, img.into_raw())
}

struct Decoder {
    child: tokio::process::Child,
    stdout: tokio::process::ChildStdout,
}

/// A clip decoded by a system `ffmpeg` child at the output frame rate.
///
/// The displayed frame follows the injected clock: after `play`, frame `n` is shown once the
/// clock has advanced `n` frame durations.
pub struct FfmpegVideo {
    path: PathBuf,
    fps: Fps,
    clock: Box<dyn PlaybackClock>,
    meta: Option<VideoMetadata>,
    decoder: Option<Decoder>,
    play_origin: Option<Duration>,
    frame: Option<Frame>,
    decoded: u64,
    ended: bool,
}

impl std::fmt::Debug for FfmpegVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegVideo")
            .field("path", &self.path)
            .field("fps", &self.fps)
            .field("decoded", &self.decoded)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl FfmpegVideo {
    pub fn new(path: impl Into<PathBuf>, fps: Fps, clock: Box<dyn PlaybackClock>) -> Self {
        Self {
            path: path.into(),
            fps,
            clock,
            meta: None,
            decoder: None,
            play_origin: None,
            frame: None,
            decoded: 0,
            ended: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn spawn_decoder(&self) -> CardResult<Decoder> {
        let mut child = tokio::process::Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&self.path)
            .args([
                "-an",
                "-vf",
                &format!("fps={}/{}", self.fps.num, self.fps.den),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CardError::capture(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CardError::capture("failed to open ffmpeg stdout (unexpected)"))?;
        Ok(Decoder { child, stdout })
    }

    /// Read one frame; `false` at end of stream.
    async fn read_frame(&mut self, size: Size) -> CardResult<bool> {
        use tokio::io::AsyncReadExt as _;

        let Some(decoder) = self.decoder.as_mut() else {
            self.ended = true;
            return Ok(false);
        };
        let mut buf = vec![0u8; size.rgba_len()?];
        match decoder.stdout.read_exact(&mut buf).await {
            Ok(_) => {
                self.frame = Some(Frame::from_straight(size.width, size.height, buf)?);
                self.decoded += 1;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.finish_decoder().await?;
                Ok(false)
            }
            Err(e) => Err(CardError::capture(format!(
                "failed to read decoded frame: {e}"
            ))),
        }
    }

    async fn finish_decoder(&mut self) -> CardResult<()> {
        self.ended = true;
        let Some(Decoder { child, stdout }) = self.decoder.take() else {
            return Ok(());
        };
        drop(stdout);
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CardError::capture(format!("failed to wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(CardError::capture(format!(
                "ffmpeg decode exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::debug!(
            frames = self.decoded,
            path = %self.path.display(),
            "background video ended"
        );
        Ok(())
    }

    fn metadata(&self) -> CardResult<&VideoMetadata> {
        self.meta
            .as_ref()
            .ok_or_else(|| CardError::capture("video metadata not loaded"))
    }
}

#[async_trait(?Send)]
impl BackgroundVideo for FfmpegVideo {
    async fn load_metadata(&mut self) -> CardResult<VideoMetadata> {
        let meta = probe_video(&self.path).await?;
        meta.size.check_raster_target()?;
        tracing::debug!(
            size = %meta.size,
            duration_secs = meta.duration_secs,
            has_audio = meta.has_audio,
            "background video attached"
        );
        self.meta = Some(meta.clone());
        Ok(meta)
    }

    async fn play(&mut self) -> CardResult<()> {
        self.metadata()?;
        if self.play_origin.is_some() {
            return Ok(());
        }
        self.decoder = Some(self.spawn_decoder()?);
        self.play_origin = Some(self.clock.elapsed());
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.play_origin.is_none()
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    async fn current_frame(&mut self) -> CardResult<Option<&Frame>> {
        let size = self.metadata()?.size;
        let Some(origin) = self.play_origin else {
            return Ok(None);
        };
        let target = self
            .fps
            .frame_at(self.clock.elapsed().saturating_sub(origin));
        while !self.ended && self.decoded <= target {
            if !self.read_frame(size).await? {
                break;
            }
        }
        if self.ended {
            return Ok(None);
        }
        Ok(self.frame.as_ref())
    }

    async fn wait_ended(&mut self) -> CardResult<()> {
        if self.play_origin.is_none() {
            return Err(CardError::capture("video was never played"));
        }
        if let Some(size) = self.meta.as_ref().map(|m| m.size) {
            while !self.ended {
                self.read_frame(size).await?;
            }
        }
        Ok(())
    }

    fn audio_track(&self) -> Option<AudioTrack> {
        self.meta
            .as_ref()
            .filter(|m| m.has_audio)
            .map(|_| AudioTrack {
                source: self.path.clone(),
            })
    }

    fn release(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            let _ = decoder.child.start_kill();
        }
        self.meta = None;
        self.frame = None;
        self.play_origin = None;
    }

    fn is_attached(&self) -> bool {
        self.meta.is_some()
    }
}

/// Scripted clip for tests and dry runs: `frame_count` copies of one frame, paced by a
/// [`ManualClock`].
#[derive(Debug)]
pub struct InMemoryVideo {
    frame: Frame,
    frame_count: u64,
    fps: Fps,
    clock: ManualClock,
    has_audio: bool,
    fail_metadata: bool,
    journal: Journal,
    attached: bool,
    play_origin: Option<Duration>,
    ended: bool,
    served: u64,
    releases: usize,
}

impl InMemoryVideo {
    pub fn new(frame: Frame, frame_count: u64, fps: Fps, clock: ManualClock) -> Self {
        Self {
            frame,
            frame_count,
            fps,
            clock,
            has_audio: false,
            fail_metadata: false,
            journal: Journal::new(),
            attached: false,
            play_origin: None,
            ended: false,
            served: 0,
            releases: 0,
        }
    }

    pub fn with_audio(mut self) -> Self {
        self.has_audio = true;
        self
    }

    /// `load_metadata` fails, as an unreadable clip would.
    pub fn failing_metadata(mut self) -> Self {
        self.fail_metadata = true;
        self
    }

    /// Record `video:*` events into `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Frames handed out by `current_frame`.
    pub fn frames_served(&self) -> u64 {
        self.served
    }

    pub fn releases(&self) -> usize {
        self.releases
    }
}

#[async_trait(?Send)]
impl BackgroundVideo for InMemoryVideo {
    async fn load_metadata(&mut self) -> CardResult<VideoMetadata> {
        self.journal.push("video:load");
        if self.fail_metadata {
            return Err(CardError::capture("unreadable background video"));
        }
        self.attached = true;
        Ok(VideoMetadata {
            size: self.frame.size(),
            duration_secs: self.fps.frames_to_secs(self.frame_count),
            has_audio: self.has_audio,
        })
    }

    async fn play(&mut self) -> CardResult<()> {
        if !self.attached {
            return Err(CardError::capture("video metadata not loaded"));
        }
        self.journal.push("video:play");
        self.play_origin = Some(self.clock.elapsed());
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.play_origin.is_none()
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    async fn current_frame(&mut self) -> CardResult<Option<&Frame>> {
        let Some(origin) = self.play_origin else {
            return Ok(None);
        };
        let idx = self.fps.frame_at(self.clock.elapsed().saturating_sub(origin));
        if idx >= self.frame_count {
            if !self.ended {
                self.journal.push("video:ended");
            }
            self.ended = true;
            return Ok(None);
        }
        self.served += 1;
        Ok(Some(&self.frame))
    }

    async fn wait_ended(&mut self) -> CardResult<()> {
        if self.play_origin.is_none() {
            return Err(CardError::capture("video was never played"));
        }
        self.ended = true;
        Ok(())
    }

    fn audio_track(&self) -> Option<AudioTrack> {
        (self.attached && self.has_audio).then(|| AudioTrack {
            source: PathBuf::from("memory://background"),
        })
    }

    fn release(&mut self) {
        self.journal.push("video:release");
        self.attached = false;
        self.play_origin = None;
        self.releases += 1;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/video.rs"]
mod tests;
