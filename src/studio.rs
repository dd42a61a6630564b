//! Application state: selection, generation lifecycle, background clip and history.

use std::borrow::Cow;
use std::path::PathBuf;

use crate::content::provider::{BLURB_FALLBACK, ContentProvider};
use crate::foundation::error::{CardError, CardResult};
use crate::history::{History, HistoryItem, HistoryRepository};
use crate::model::card::{CardData, UserInput};
use crate::model::category::{Animal, BloodType, Mbti, Style, Zodiac};
use crate::naming::export_file_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// A blurb ready to be written out as `<stem>.txt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlurbFile {
    pub file_name: String,
    pub contents: String,
}

pub struct Studio<P, R> {
    provider: P,
    repo: R,
    input: UserInput,
    state: GenerationState,
    card: Option<CardData>,
    blurb: Option<String>,
    last_error: Option<String>,
    background: Option<PathBuf>,
    history: History,
}

impl<P: ContentProvider, R: HistoryRepository> Studio<P, R> {
    /// Build a studio and load persisted history. An unreadable store starts empty.
    pub fn new(provider: P, repo: R) -> Self {
        let history = repo.load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load history; starting empty");
            History::new()
        });
        Self {
            provider,
            repo,
            input: UserInput::default(),
            state: GenerationState::Idle,
            card: None,
            blurb: None,
            last_error: None,
            background: None,
            history,
        }
    }

    pub fn input(&self) -> &UserInput {
        &self.input
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn card(&self) -> Option<&CardData> {
        self.card.as_ref()
    }

    pub fn blurb(&self) -> Option<&str> {
        self.blurb.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn background(&self) -> Option<&PathBuf> {
        self.background.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Replace the whole selection. The current card and blurb no longer match and are dropped.
    pub fn set_input(&mut self, input: UserInput) {
        self.input = input;
        self.card = None;
        self.blurb = None;
    }

    pub fn set_zodiac(&mut self, zodiac: Zodiac) {
        self.set_input(UserInput {
            zodiac,
            ..self.input
        });
    }

    pub fn set_mbti(&mut self, mbti: Mbti) {
        self.set_input(UserInput { mbti, ..self.input });
    }

    pub fn set_animal(&mut self, animal: Animal) {
        self.set_input(UserInput {
            animal,
            ..self.input
        });
    }

    pub fn set_blood_type(&mut self, blood_type: BloodType) {
        self.set_input(UserInput {
            blood_type,
            ..self.input
        });
    }

    pub fn set_style(&mut self, style: Style) {
        self.set_input(UserInput { style, ..self.input });
    }

    /// Use `path` as the background clip; returns the clip it replaced.
    pub fn set_background(&mut self, path: Option<PathBuf>) -> Option<PathBuf> {
        let prior = std::mem::replace(&mut self.background, path);
        if let Some(prior) = &prior {
            tracing::debug!(path = %prior.display(), "background video replaced");
        }
        prior
    }

    /// Generate a card and blurb for the current selection.
    ///
    /// A failing card call leaves the studio in [`GenerationState::Error`]. A failing blurb
    /// call only logs: the card is kept and recorded with an empty blurb.
    #[tracing::instrument(skip(self), fields(input = %crate::naming::export_stem(&self.input)))]
    pub async fn generate(&mut self) -> CardResult<&CardData> {
        self.state = GenerationState::Loading;
        self.blurb = None;
        self.last_error = None;

        let card = match self.provider.generate_card(&self.input).await {
            Ok(card) => card,
            Err(err) => {
                tracing::error!(error = %err, "card generation failed");
                self.state = GenerationState::Error;
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        let blurb = match self.provider.generate_blurb(&self.input, &card).await {
            Ok(text) if text.trim().is_empty() => BLURB_FALLBACK.to_string(),
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "blurb generation failed; keeping card");
                String::new()
            }
        };

        self.history
            .insert(HistoryItem::new(self.input, card.clone(), blurb.clone()));
        if let Err(err) = self.repo.save(&self.history) {
            tracing::error!(error = %err, "failed to persist history");
        }

        self.blurb = (!blurb.is_empty()).then_some(blurb);
        self.state = GenerationState::Success;
        let card: &CardData = self.card.insert(card);
        Ok(card)
    }

    /// The card to show: the generated one, or the sample before anything was generated.
    pub fn display_card(&self) -> Cow<'_, CardData> {
        match &self.card {
            Some(card) => Cow::Borrowed(card),
            None => Cow::Owned(CardData::sample()),
        }
    }

    /// Restore a history entry as the current selection, card and blurb.
    pub fn load_history(&mut self, id: &str) -> CardResult<()> {
        let item = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| CardError::validation(format!("no history entry '{id}'")))?;
        self.input = item.input;
        self.card = Some(item.card);
        self.blurb = (!item.blurb.is_empty()).then_some(item.blurb);
        self.state = GenerationState::Success;
        Ok(())
    }

    /// Remove one entry and persist. `false` when `id` was unknown.
    pub fn delete_history(&mut self, id: &str) -> CardResult<bool> {
        if self.history.remove(id).is_none() {
            return Ok(false);
        }
        self.repo.save(&self.history)?;
        Ok(true)
    }

    /// The blurb as a `.txt` export, when there is one.
    pub fn blurb_file(&self) -> Option<BlurbFile> {
        let contents = self.blurb.as_ref()?;
        Some(BlurbFile {
            file_name: export_file_name(&self.input, "txt"),
            contents: contents.clone(),
        })
    }

    /// Recording needs a background clip.
    pub fn can_record_video(&self) -> bool {
        self.background.is_some()
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio.rs"]
mod tests;
