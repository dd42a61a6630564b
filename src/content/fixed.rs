use async_trait::async_trait;

use crate::content::provider::ContentProvider;
use crate::foundation::error::CardResult;
use crate::model::card::{CardData, UserInput};
use crate::naming::export_stem;

/// Offline provider: the sample card retitled for the current selection.
///
/// Useful without network access and as a deterministic stand-in in tests.
#[derive(Clone, Debug, Default)]
pub struct FixedProvider;

impl FixedProvider {
    pub fn card_for(input: &UserInput) -> CardData {
        let mut card = CardData::sample();
        card.zodiac.title = input.zodiac.primary().to_string();
        card.mbti.title = input.mbti.code().to_string();
        card.animal.title = input.animal.primary().to_string();
        card.blood_type.title = input.blood_type.primary().to_string();
        card
    }
}

#[async_trait(?Send)]
impl ContentProvider for FixedProvider {
    async fn generate_card(&self, input: &UserInput) -> CardResult<CardData> {
        Ok(Self::card_for(input))
    }

    async fn generate_blurb(&self, input: &UserInput, card: &CardData) -> CardResult<String> {
        let stem = export_stem(input).replace('+', "");
        Ok(format!(
            "⚠️ 当{stem}结合，{core}！\n#{z} #{m} #性格分析",
            core = card.core_trait,
            z = input.zodiac.primary(),
            m = input.mbti.code(),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/fixed.rs"]
mod tests;
