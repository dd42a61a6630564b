use std::sync::{Arc, Mutex};

/// Shared, ordered event record for the in-memory capture doubles.
#[derive(Clone, Debug, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        if let Ok(mut events) = self.0.lock() {
            events.push(event.into());
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Position of the first `event`, if recorded.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == event)
    }
}
