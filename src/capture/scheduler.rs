//! Playback clocks and frame pacing for the compositing loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::foundation::core::Fps;

/// Elapsed playback time since the clock was started.
pub trait PlaybackClock {
    fn elapsed(&self) -> Duration;
}

/// Wall clock, starting at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl PlaybackClock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Virtual clock advanced explicitly. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(by, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        let at = u64::try_from(at.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(at, Ordering::SeqCst);
    }
}

impl PlaybackClock for ManualClock {
    fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Yields between composited frames.
#[async_trait(?Send)]
pub trait FrameScheduler {
    /// Resolve when the next frame should be painted.
    async fn next_frame(&mut self);
}

/// Realtime pacing at the output frame rate.
#[derive(Debug)]
pub struct PaintScheduler {
    interval: tokio::time::Interval,
}

impl PaintScheduler {
    pub fn new(fps: Fps) -> Self {
        let mut interval = tokio::time::interval(fps.frame_duration());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait(?Send)]
impl FrameScheduler for PaintScheduler {
    async fn next_frame(&mut self) {
        self.interval.tick().await;
    }
}

/// Steps a [`ManualClock`] by one frame per tick: as fast as the pipeline can go, with frame
/// timing that stays exact.
#[derive(Debug, Clone)]
pub struct SteppedScheduler {
    clock: ManualClock,
    step: Duration,
    ticks: u64,
}

impl SteppedScheduler {
    pub fn new(clock: ManualClock, fps: Fps) -> Self {
        Self {
            clock,
            step: fps.frame_duration(),
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[async_trait(?Send)]
impl FrameScheduler for SteppedScheduler {
    async fn next_frame(&mut self) {
        self.clock.advance(self.step);
        self.ticks += 1;
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/scheduler.rs"]
mod tests;
