//! Capture session state machine.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    #[default]
    Idle,
    /// Overlay materialization and video metadata.
    Preparing,
    Recording,
    /// Recorder stopped, output flushing.
    Finalizing,
    Delivered,
    Failed,
}

impl CaptureState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }

    /// Legal forward edges. Any non-terminal state may fail.
    pub fn can_transition_to(self, next: CaptureState) -> bool {
        use CaptureState::*;
        match (self, next) {
            (Idle, Preparing)
            | (Preparing, Recording)
            | (Recording, Finalizing)
            | (Finalizing, Delivered) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::Recording => "recording",
            Self::Finalizing => "finalizing",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks one session's state and the path it took.
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    state: CaptureState,
    history: Vec<CaptureState>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            history: vec![CaptureState::Idle],
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn history(&self) -> &[CaptureState] {
        &self.history
    }

    pub fn advance(&mut self, next: CaptureState) -> CardResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(CardError::capture(format!(
                "illegal capture transition {} -> {next}",
                self.state
            )));
        }
        tracing::debug!(from = %self.state, to = %next, "capture state");
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Move to `Failed` unless the session already finished.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!(from = %self.state, "capture state -> failed");
            self.state = CaptureState::Failed;
            self.history.push(CaptureState::Failed);
        }
    }

    pub fn into_history(self) -> Vec<CaptureState> {
        self.history
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
