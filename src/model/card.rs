use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};
use crate::model::category::{Animal, BloodType, Mbti, Style, Zodiac};

/// The four category selections plus the phrasing style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub zodiac: Zodiac,
    pub mbti: Mbti,
    pub animal: Animal,
    pub blood_type: BloodType,
    #[serde(default)]
    pub style: Style,
}

impl Default for UserInput {
    fn default() -> Self {
        Self {
            zodiac: Zodiac::Aquarius,
            mbti: Mbti::Intj,
            animal: Animal::Rat,
            blood_type: BloodType::A,
            style: Style::Descriptive,
        }
    }
}

/// Which of the four inputs a trait group (or an edit) refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Zodiac,
    Mbti,
    Animal,
    BloodType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitSection {
    pub title: String,
    pub traits: Vec<String>,
}

impl TraitSection {
    pub fn new(title: impl Into<String>, traits: &[&str]) -> Self {
        Self {
            title: title.into(),
            traits: traits.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// The generated narrative record rendered on the card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub zodiac: TraitSection,
    pub mbti: TraitSection,
    pub animal: TraitSection,
    pub blood_type: TraitSection,
    /// One-line synthesis of the four factors.
    pub core_trait: String,
    /// Short paragraph of advice or prediction.
    pub fortune: String,
}

impl CardData {
    /// Placeholder card shown before anything has been generated.
    pub fn sample() -> Self {
        Self {
            zodiac: TraitSection::new(
                "水瓶座",
                &["脑回路清奇可爱", "不随波逐流", "看见未来的先知", "理智与感性共存"],
            ),
            mbti: TraitSection::new(
                "INTJ",
                &["上帝视角的军师", "看透本质只需一秒", "不过好只做自己", "冷静是最强武器"],
            ),
            animal: TraitSection::new(
                "鼠",
                &["机灵劲儿无人能比", "总能嗅到机会", "适应力强得惊人", "活在当下的智者"],
            ),
            blood_type: TraitSection::new(
                "A型",
                &["比谁都认真负责", "温柔体贴入微", "承诺了一定做到", "心思极其细腻"],
            ),
            core_trait: "看见未来的冷静是最强武器家".to_string(),
            fortune: "你独特的脑回路清奇可爱与看透本质只需一秒正在为你开启新的篇章。凭借适应力强得惊人的韧性和温柔体贴的创意，近期你将迎来一次不可思议的飞跃，保持好奇心！".to_string(),
        }
    }

    pub fn section(&self, field: Field) -> &TraitSection {
        match field {
            Field::Zodiac => &self.zodiac,
            Field::Mbti => &self.mbti,
            Field::Animal => &self.animal,
            Field::BloodType => &self.blood_type,
        }
    }

    /// Reject records that parsed but carry nothing to render.
    pub fn validate(&self) -> CardResult<()> {
        for field in [Field::Zodiac, Field::Mbti, Field::Animal, Field::BloodType] {
            let section = self.section(field);
            if section.title.trim().is_empty() {
                return Err(CardError::content(format!("{field:?} section has no title")));
            }
            if section.traits.is_empty() {
                return Err(CardError::content(format!("{field:?} section has no traits")));
            }
        }
        if self.core_trait.trim().is_empty() {
            return Err(CardError::content("core trait is empty"));
        }
        Ok(())
    }

    /// Split the fortune paragraph into sentences on `。！？`, each re-terminated with `。`.
    pub fn fortune_sentences(&self) -> Vec<String> {
        split_sentences(&self.fortune)
    }
}

pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['。', '！', '？'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s}。"))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/model/card.rs"]
mod tests;
