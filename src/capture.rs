//! Still export and background-video recording.

pub mod engine;
pub mod journal;
pub mod recorder;
pub mod scheduler;
pub mod session;
pub mod still;
pub mod video;

pub use engine::{CaptureEngine, RecordingOutcome, VideoArtifact};
pub use journal::Journal;
pub use recorder::{
    CAPTURE_FPS, ContainerFormat, FfmpegRecorderFactory, InMemoryRecorderFactory, MediaRecorder,
    RecorderConfig, RecorderFactory, VIDEO_BITS_PER_SECOND, negotiate_container,
};
pub use scheduler::{
    FrameScheduler, ManualClock, PaintScheduler, PlaybackClock, SteppedScheduler, SystemClock,
};
pub use session::{CaptureSession, CaptureState};
pub use still::{export_still, render_still_png};
pub use video::{AudioTrack, BackgroundVideo, FfmpegVideo, InMemoryVideo, VideoMetadata};
