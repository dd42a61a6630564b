//! The capture engine: still export and background-video recording sessions.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context as _;

use crate::capture::recorder::{
    CAPTURE_FPS, ContainerFormat, MediaRecorder, RecorderConfig, RecorderFactory,
    negotiate_container,
};
use crate::capture::scheduler::FrameScheduler;
use crate::capture::session::{CaptureSession, CaptureState};
use crate::capture::still;
use crate::capture::video::BackgroundVideo;
use crate::foundation::core::Frame;
use crate::foundation::error::{CardError, CardResult};
use crate::model::card::UserInput;
use crate::naming::export_file_name;
use crate::render::composite::{draw_scaled, over_in_place};
use crate::render::surface::{CaptureSurface, EXPORT_PIXEL_RATIO, RasterizeOpts};

/// A finished recording, named after the selection that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoArtifact {
    pub file_name: String,
    pub container: ContainerFormat,
    pub bytes: Vec<u8>,
}

impl VideoArtifact {
    pub fn mime(&self) -> &'static str {
        self.container.mime()
    }

    /// Write into `dir` under [`Self::file_name`].
    pub fn save_to(&self, dir: &Path) -> CardResult<PathBuf> {
        let path = dir.join(&self.file_name);
        still::ensure_parent_dir(&path)?;
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write video '{}'", path.display()))?;
        Ok(path)
    }
}

#[derive(Clone, Debug)]
pub struct RecordingOutcome {
    pub artifact: VideoArtifact,
    /// Composited frames pushed to the recorder.
    pub frames: u64,
    pub states: Vec<CaptureState>,
}

impl RecordingOutcome {
    pub fn duration_secs(&self) -> f64 {
        CAPTURE_FPS.frames_to_secs(self.frames)
    }
}

struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns the recorder factory and allows at most one recording session at a time.
pub struct CaptureEngine<F> {
    factory: F,
    active: AtomicBool,
    last_states: Mutex<Vec<CaptureState>>,
}

impl<F: RecorderFactory> CaptureEngine<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            active: AtomicBool::new(false),
            last_states: Mutex::new(Vec::new()),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// States visited by the most recent session, including failed ones.
    pub fn last_session_states(&self) -> Vec<CaptureState> {
        self.last_states
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// See [`still::export_still`].
    pub fn export_still(&self, surface: &dyn CaptureSurface, out_path: &Path) -> Option<PathBuf> {
        still::export_still(surface, out_path)
    }

    fn begin(&self) -> CardResult<ActiveGuard<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| CardError::SessionActive)?;
        Ok(ActiveGuard(&self.active))
    }

    /// Record `surface` composited over `video`.
    ///
    /// Without a background video there is nothing to record and the call is a no-op
    /// (`Ok(None)`). A second call while a session runs fails with
    /// [`CardError::SessionActive`]. On any failure the video is released and the session
    /// ends in [`CaptureState::Failed`].
    pub async fn record(
        &self,
        surface: &dyn CaptureSurface,
        video: Option<&mut dyn BackgroundVideo>,
        scheduler: &mut dyn FrameScheduler,
        input: &UserInput,
    ) -> CardResult<Option<RecordingOutcome>> {
        let Some(video) = video else {
            tracing::warn!("no background video; nothing to record");
            return Ok(None);
        };
        let _guard = self.begin()?;

        let mut session = CaptureSession::new();
        let result = self
            .run_session(&mut session, surface, video, scheduler, input)
            .await;

        let outcome = match result {
            Ok((artifact, frames)) => {
                tracing::info!(
                    file = %artifact.file_name,
                    container = %artifact.container,
                    frames,
                    bytes = artifact.bytes.len(),
                    "recording delivered"
                );
                Ok((artifact, frames))
            }
            Err(err) => {
                if video.is_attached() {
                    video.release();
                }
                session.fail();
                tracing::error!(error = %err, "recording failed");
                Err(err)
            }
        };

        let states = session.into_history();
        if let Ok(mut last) = self.last_states.lock() {
            last.clone_from(&states);
        }
        let (artifact, frames) = outcome?;
        Ok(Some(RecordingOutcome {
            artifact,
            frames,
            states,
        }))
    }

    async fn run_session(
        &self,
        session: &mut CaptureSession,
        surface: &dyn CaptureSurface,
        video: &mut dyn BackgroundVideo,
        scheduler: &mut dyn FrameScheduler,
        input: &UserInput,
    ) -> CardResult<(VideoArtifact, u64)> {
        session.advance(CaptureState::Preparing)?;
        let overlay = surface.rasterize(&RasterizeOpts::export())?;
        let target = surface.size().scaled(EXPORT_PIXEL_RATIO)?;
        if overlay.size() != target {
            return Err(CardError::capture(format!(
                "overlay is {}, expected {target}",
                overlay.size()
            )));
        }

        let meta = video.load_metadata().await?;
        let container = negotiate_container(&self.factory)?;
        let cfg = RecorderConfig::new(target, container);
        tracing::debug!(
            source = %meta.size,
            %target,
            %container,
            audio = meta.has_audio,
            "recording prepared"
        );
        let mut recorder = self.factory.create(cfg, video.audio_track())?;

        recorder.start().await?;
        video.play().await?;
        session.advance(CaptureState::Recording)?;

        let frames = composite_loop(&overlay, video, recorder.as_mut(), scheduler).await?;

        session.advance(CaptureState::Finalizing)?;
        video.wait_ended().await?;
        let media = recorder.stop().await?;
        if media.container != container {
            return Err(CardError::capture(format!(
                "recorder produced {}, negotiated {container}",
                media.container
            )));
        }

        let artifact = VideoArtifact {
            file_name: export_file_name(input, container.extension()),
            container,
            bytes: media.bytes,
        };
        video.release();
        session.advance(CaptureState::Delivered)?;
        Ok((artifact, frames))
    }
}

/// Draw each video frame stretched to the target with the overlay on top, until the video
/// pauses or ends.
async fn composite_loop(
    overlay: &Frame,
    video: &mut dyn BackgroundVideo,
    recorder: &mut dyn MediaRecorder,
    scheduler: &mut dyn FrameScheduler,
) -> CardResult<u64> {
    let mut canvas = Frame::transparent(overlay.size())?;
    let mut frames = 0u64;
    loop {
        if video.is_paused() || video.is_ended() {
            break;
        }
        let Some(src) = video.current_frame().await? else {
            scheduler.next_frame().await;
            continue;
        };
        canvas.data.fill(0);
        draw_scaled(&mut canvas, src)?;
        over_in_place(&mut canvas, overlay, 1.0)?;
        recorder.push_frame(&canvas).await?;
        frames += 1;
        scheduler.next_frame().await;
    }
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/engine.rs"]
mod tests;
