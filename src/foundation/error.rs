pub type CardResult<T> = Result<T, CardError>;

#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("validation error: {0}")]
    Validation(String),

    /// Upstream content generation failed (network, empty body, schema mismatch).
    #[error("content error: {0}")]
    Content(String),

    #[error("raster error: {0}")]
    Raster(String),

    #[error("capture error: {0}")]
    Capture(String),

    #[error("capture error: a capture session is already active")]
    SessionActive,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures raised while a capture session was in progress.
    pub fn is_capture(&self) -> bool {
        matches!(self, Self::Capture(_) | Self::SessionActive)
    }
}

impl From<serde_json::Error> for CardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
