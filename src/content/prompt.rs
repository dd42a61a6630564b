//! Prompt text for the two content calls.

use crate::model::card::{CardData, UserInput};
use crate::model::category::Style;

fn trait_requirement(style: Style) -> &'static str {
    match style {
        Style::Concise => {
            "exactly 4 short, punchy 4-character keywords/phrases (e.g., \"天马行空\", \"独立卓绝\")."
        }
        Style::Descriptive => {
            "exactly 4 descriptive, soul-searching phrases of varying lengths (6-10 characters). \
             Use the style: \"脑回路清奇可爱\", \"看见未来的先知\", \"理智与感性共存\", \"不随波逐流\"."
        }
    }
}

pub fn card_prompt(input: &UserInput) -> String {
    format!(
        "Generate a personality analysis based on:\n\
         Zodiac: {zodiac}\n\
         MBTI: {mbti}\n\
         Chinese Zodiac: {animal}\n\
         Blood Type: {blood}\n\
         \n\
         Language: Simplified Chinese (Mainland China style).\n\
         Tone: Mystical, insightful, soulful, and tailored for social media.\n\
         \n\
         Requirements:\n\
         1. For Zodiac, MBTI, Animal, and BloodType: Provide a title (e.g., \"水瓶座\") and {req}\n\
         2. Core Trait: A single powerful sentence summarizing the combination of these 4 factors. \
         (e.g., \"看见未来的冷静是最强武器家\").\n\
         3. Fortune: A short paragraph (approx 40-50 words) predicting their near future or giving advice.\n",
        zodiac = input.zodiac.label(),
        mbti = input.mbti.code(),
        animal = input.animal.label(),
        blood = input.blood_type.primary(),
        req = trait_requirement(input.style),
    )
}

pub fn blurb_prompt(input: &UserInput, card: &CardData) -> String {
    let z = input.zodiac.primary();
    let m = input.mbti.code();
    let a = input.animal.primary();
    let b = input.blood_type.primary();
    let key_traits = card
        .zodiac
        .traits
        .iter()
        .chain(card.mbti.traits.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Role: Social Media Expert for WeChat Channels (视频号) / Red Note (小红书).\n\
         Task: Create a viral social media post copy for a numerology/personality card.\n\
         \n\
         User Profile:\n\
         - Combination: {z} + {m} + {a} + {b}\n\
         - Core Trait: {core}\n\
         - Key Traits: {key_traits}\n\
         \n\
         Requirements:\n\
         1. Title: Must be catchy, clickbait-style, use \"⚠️\" or \"‼️\" emojis. \
         Format similar to: \"⚠️ 当{z}{m}{a}{b}结合... 准到离谱！\"\n\
         2. Body:\n\
         - Tone: High energy, enthusiastic, flattering, using internet slang (e.g., YYDS, 绝绝子, 天花板, 宝藏).\n\
         - Content: Praise this specific combination. Mention their unique strengths based on the traits provided.\n\
         - Narrative: \"People think you are... but actually you are...\".\n\
         - Ending: A strong Call to Action (CTA) asking for comments/likes. \
         (e.g., \"评论区告诉我，你是不是也是这个神仙组合？！👇\")\n\
         3. Tags: 5-8 relevant hashtags including #玄学 #MBTI #{z} etc.\n\
         \n\
         Output Format: Return ONLY the text content (Title + Body + Tags). \
         Do not use Markdown formatting or code blocks.\n",
        core = card.core_trait,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/content/prompt.rs"]
mod tests;
