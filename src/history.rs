//! Generation history: most recent first, capped, persisted through a repository.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};
use crate::model::card::{CardData, UserInput};

/// Maximum number of entries kept.
pub const HISTORY_CAP: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    /// Creation time, unix milliseconds.
    pub timestamp: i64,
    #[serde(rename = "userInput")]
    pub input: UserInput,
    #[serde(rename = "cardData")]
    pub card: CardData,
    #[serde(rename = "viralCopy", default)]
    pub blurb: String,
}

impl HistoryItem {
    pub fn new(input: UserInput, card: CardData, blurb: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            input,
            card,
            blurb: blurb.into(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    items: Vec<HistoryItem>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored entries (already most-recent-first), enforcing the cap.
    pub fn from_items(mut items: Vec<HistoryItem>) -> Self {
        items.truncate(HISTORY_CAP);
        Self { items }
    }

    /// Prepend `item`, dropping the oldest entries beyond [`HISTORY_CAP`].
    pub fn insert(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAP);
    }

    /// Remove the entry with `id`. Relative order of the rest is unchanged.
    pub fn remove(&mut self, id: &str) -> Option<HistoryItem> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Durable storage for [`History`]: load once at startup, save after every change.
pub trait HistoryRepository {
    fn load(&self) -> CardResult<History>;
    fn save(&self, history: &History) -> CardResult<()>;
}

/// Stores the history as a JSON array in a single file.
#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryRepository for JsonFileRepository {
    fn load(&self) -> CardResult<History> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(History::new()),
            Err(e) => {
                return Err(CardError::storage(format!(
                    "read history '{}': {e}",
                    self.path.display()
                )));
            }
        };
        let items: Vec<HistoryItem> = serde_json::from_str(&raw)?;
        Ok(History::from_items(items))
    }

    fn save(&self, history: &History) -> CardResult<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create history directory '{}'", dir.display()))?;

        // Write beside the target and rename so a crash never leaves a truncated file.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("create temp file in '{}'", dir.display()))?;
        serde_json::to_writer(&mut tmp, history)?;
        tmp.flush().context("flush history temp file")?;
        tmp.persist(&self.path).map_err(|e| {
            CardError::storage(format!("replace '{}': {}", self.path.display(), e.error))
        })?;
        Ok(())
    }
}

/// Keeps the serialized history in memory; round-trips through JSON like the file store.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    stored: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with raw JSON (possibly invalid, for error-path tests).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            stored: Mutex::new(Some(raw.into())),
            saves: Mutex::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl HistoryRepository for InMemoryRepository {
    fn load(&self) -> CardResult<History> {
        let stored = self
            .stored
            .lock()
            .map_err(|_| CardError::storage("history store poisoned"))?;
        match stored.as_deref() {
            Some(raw) => Ok(History::from_items(serde_json::from_str(raw)?)),
            None => Ok(History::new()),
        }
    }

    fn save(&self, history: &History) -> CardResult<()> {
        let raw = serde_json::to_string(history)?;
        *self
            .stored
            .lock()
            .map_err(|_| CardError::storage("history store poisoned"))? = Some(raw);
        if let Ok(mut n) = self.saves.lock() {
            *n += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/history.rs"]
mod tests;
