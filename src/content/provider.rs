use async_trait::async_trait;

use crate::foundation::error::CardResult;
use crate::model::card::{CardData, UserInput};

/// Shown in place of the blurb when the service answers with an empty body.
pub const BLURB_FALLBACK: &str = "文案生成失败，请重试。";

/// Source of card narratives and promotional blurbs.
///
/// The two calls are independent: a failing blurb never invalidates a card that was already
/// produced.
#[async_trait(?Send)]
pub trait ContentProvider {
    /// Produce the structured card record for `input`.
    async fn generate_card(&self, input: &UserInput) -> CardResult<CardData>;

    /// Produce the plain-text promotional blurb for an already generated card.
    async fn generate_blurb(&self, input: &UserInput, card: &CardData) -> CardResult<String>;
}
