//! Runtime configuration.
//!
//! Resolution order: built-in defaults, then an optional JSON file, then environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::CardResult;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Storage namespace for the generation history.
pub const HISTORY_NAMESPACE: &str = "destiny_archives";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API key for the content service. `None` only works with the offline provider.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    /// Directory holding the persisted history.
    pub data_dir: PathBuf,
    /// Default directory for exported files.
    pub output_dir: PathBuf,
    /// Extra font files for card text, on top of the system fonts.
    pub fonts_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("destiny-card");
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 120,
            data_dir,
            output_dir: PathBuf::from("."),
            fonts_dir: None,
        }
    }
}

impl AppConfig {
    /// Load defaults, overlay `path` (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> CardResult<Self> {
        let mut cfg = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("read config '{}'", path.display()))?;
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Apply environment overrides through `lookup` (injected so tests never touch the real env).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("DESTINY_CARD_MODEL") {
            self.model = model;
        }
        if let Some(endpoint) = non_empty("DESTINY_CARD_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(dir) = non_empty("DESTINY_CARD_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty("DESTINY_CARD_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(format!("{HISTORY_NAMESPACE}.json"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
