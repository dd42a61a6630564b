//! Closed category enumerations for the four card inputs.
//!
//! Every selection has three spellings:
//!
//! - a display label (`水瓶座 (Aquarius)`), which is also the serialized form,
//! - a primary token (`水瓶座`), used for filenames and prompts,
//! - an English name (`Aquarius`), accepted when parsing.
//!
//! Visual attributes (glyphs, emoji, colors) are exhaustive `match` tables on the enums.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};

/// Straight-alpha RGB color used by the card renderer.
pub type Rgb = [u8; 3];

fn matches_any<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> bool {
    candidates.into_iter().any(|c| c.eq_ignore_ascii_case(input))
}

fn parse_from<T: Copy, A>(
    kind: &str,
    raw: &str,
    all: &[T],
    aliases: impl Fn(T) -> A,
) -> CardResult<T>
where
    A: IntoIterator<Item = &'static str>,
{
    let needle = raw.trim();
    all.iter()
        .copied()
        .find(|v| matches_any(needle, aliases(*v)))
        .ok_or_else(|| CardError::validation(format!("unknown {kind} '{raw}'")))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zodiac {
    #[serde(rename = "白羊座 (Aries)")]
    Aries,
    #[serde(rename = "金牛座 (Taurus)")]
    Taurus,
    #[serde(rename = "双子座 (Gemini)")]
    Gemini,
    #[serde(rename = "巨蟹座 (Cancer)")]
    Cancer,
    #[serde(rename = "狮子座 (Leo)")]
    Leo,
    #[serde(rename = "处女座 (Virgo)")]
    Virgo,
    #[serde(rename = "天秤座 (Libra)")]
    Libra,
    #[serde(rename = "天蝎座 (Scorpio)")]
    Scorpio,
    #[serde(rename = "射手座 (Sagittarius)")]
    Sagittarius,
    #[serde(rename = "摩羯座 (Capricorn)")]
    Capricorn,
    #[serde(rename = "水瓶座 (Aquarius)")]
    Aquarius,
    #[serde(rename = "双鱼座 (Pisces)")]
    Pisces,
}

/// Classical element grouping of the zodiac; drives the glyph badge gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    /// Gradient stops (top-left, bottom-right) for the zodiac badge.
    pub fn gradient(self) -> (Rgb, Rgb) {
        match self {
            Element::Fire => ([244, 63, 94], [220, 38, 38]),
            Element::Earth => ([52, 211, 153], [5, 150, 105]),
            Element::Air => ([56, 189, 248], [59, 130, 246]),
            Element::Water => ([167, 139, 250], [79, 70, 229]),
        }
    }
}

impl Zodiac {
    pub const ALL: [Zodiac; 12] = [
        Zodiac::Aries,
        Zodiac::Taurus,
        Zodiac::Gemini,
        Zodiac::Cancer,
        Zodiac::Leo,
        Zodiac::Virgo,
        Zodiac::Libra,
        Zodiac::Scorpio,
        Zodiac::Sagittarius,
        Zodiac::Capricorn,
        Zodiac::Aquarius,
        Zodiac::Pisces,
    ];

    pub fn primary(self) -> &'static str {
        match self {
            Zodiac::Aries => "白羊座",
            Zodiac::Taurus => "金牛座",
            Zodiac::Gemini => "双子座",
            Zodiac::Cancer => "巨蟹座",
            Zodiac::Leo => "狮子座",
            Zodiac::Virgo => "处女座",
            Zodiac::Libra => "天秤座",
            Zodiac::Scorpio => "天蝎座",
            Zodiac::Sagittarius => "射手座",
            Zodiac::Capricorn => "摩羯座",
            Zodiac::Aquarius => "水瓶座",
            Zodiac::Pisces => "双鱼座",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            Zodiac::Aries => "Aries",
            Zodiac::Taurus => "Taurus",
            Zodiac::Gemini => "Gemini",
            Zodiac::Cancer => "Cancer",
            Zodiac::Leo => "Leo",
            Zodiac::Virgo => "Virgo",
            Zodiac::Libra => "Libra",
            Zodiac::Scorpio => "Scorpio",
            Zodiac::Sagittarius => "Sagittarius",
            Zodiac::Capricorn => "Capricorn",
            Zodiac::Aquarius => "Aquarius",
            Zodiac::Pisces => "Pisces",
        }
    }

    pub fn label(self) -> String {
        format!("{} ({})", self.primary(), self.english())
    }

    pub fn glyph(self) -> char {
        match self {
            Zodiac::Aries => '♈',
            Zodiac::Taurus => '♉',
            Zodiac::Gemini => '♊',
            Zodiac::Cancer => '♋',
            Zodiac::Leo => '♌',
            Zodiac::Virgo => '♍',
            Zodiac::Libra => '♎',
            Zodiac::Scorpio => '♏',
            Zodiac::Sagittarius => '♐',
            Zodiac::Capricorn => '♑',
            Zodiac::Aquarius => '♒',
            Zodiac::Pisces => '♓',
        }
    }

    pub fn element(self) -> Element {
        match self {
            Zodiac::Aries | Zodiac::Leo | Zodiac::Sagittarius => Element::Fire,
            Zodiac::Taurus | Zodiac::Virgo | Zodiac::Capricorn => Element::Earth,
            Zodiac::Gemini | Zodiac::Libra | Zodiac::Aquarius => Element::Air,
            Zodiac::Cancer | Zodiac::Scorpio | Zodiac::Pisces => Element::Water,
        }
    }
}

impl FromStr for Zodiac {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        let labels = Zodiac::ALL.map(|z| (z, z.label()));
        if let Some((z, _)) = labels.iter().find(|(_, l)| l == s.trim()) {
            return Ok(*z);
        }
        parse_from("zodiac sign", s, &Zodiac::ALL[..], |z| [z.primary(), z.english()])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mbti {
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
}

/// The four MBTI temperament families; drives the code badge color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Temperament {
    Analyst,
    Diplomat,
    Sentinel,
    Explorer,
}

impl Temperament {
    pub fn badge_color(self) -> Rgb {
        match self {
            Temperament::Analyst => [168, 85, 247],
            Temperament::Diplomat => [16, 185, 129],
            Temperament::Sentinel => [14, 165, 233],
            Temperament::Explorer => [245, 158, 11],
        }
    }
}

impl Mbti {
    pub const ALL: [Mbti; 16] = [
        Mbti::Intj,
        Mbti::Intp,
        Mbti::Entj,
        Mbti::Entp,
        Mbti::Infj,
        Mbti::Infp,
        Mbti::Enfj,
        Mbti::Enfp,
        Mbti::Istj,
        Mbti::Isfj,
        Mbti::Estj,
        Mbti::Esfj,
        Mbti::Istp,
        Mbti::Isfp,
        Mbti::Estp,
        Mbti::Esfp,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Mbti::Intj => "INTJ",
            Mbti::Intp => "INTP",
            Mbti::Entj => "ENTJ",
            Mbti::Entp => "ENTP",
            Mbti::Infj => "INFJ",
            Mbti::Infp => "INFP",
            Mbti::Enfj => "ENFJ",
            Mbti::Enfp => "ENFP",
            Mbti::Istj => "ISTJ",
            Mbti::Isfj => "ISFJ",
            Mbti::Estj => "ESTJ",
            Mbti::Esfj => "ESFJ",
            Mbti::Istp => "ISTP",
            Mbti::Isfp => "ISFP",
            Mbti::Estp => "ESTP",
            Mbti::Esfp => "ESFP",
        }
    }

    pub fn temperament(self) -> Temperament {
        match self {
            Mbti::Intj | Mbti::Intp | Mbti::Entj | Mbti::Entp => Temperament::Analyst,
            Mbti::Infj | Mbti::Infp | Mbti::Enfj | Mbti::Enfp => Temperament::Diplomat,
            Mbti::Istj | Mbti::Isfj | Mbti::Estj | Mbti::Esfj => Temperament::Sentinel,
            Mbti::Istp | Mbti::Isfp | Mbti::Estp | Mbti::Esfp => Temperament::Explorer,
        }
    }
}

impl FromStr for Mbti {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        parse_from("personality code", s, &Mbti::ALL[..], |m| [m.code()])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animal {
    #[serde(rename = "鼠 (Rat)")]
    Rat,
    #[serde(rename = "牛 (Ox)")]
    Ox,
    #[serde(rename = "虎 (Tiger)")]
    Tiger,
    #[serde(rename = "兔 (Rabbit)")]
    Rabbit,
    #[serde(rename = "龙 (Dragon)")]
    Dragon,
    #[serde(rename = "蛇 (Snake)")]
    Snake,
    #[serde(rename = "马 (Horse)")]
    Horse,
    #[serde(rename = "羊 (Goat)")]
    Goat,
    #[serde(rename = "猴 (Monkey)")]
    Monkey,
    #[serde(rename = "鸡 (Rooster)")]
    Rooster,
    #[serde(rename = "狗 (Dog)")]
    Dog,
    #[serde(rename = "猪 (Pig)")]
    Pig,
}

impl Animal {
    pub const ALL: [Animal; 12] = [
        Animal::Rat,
        Animal::Ox,
        Animal::Tiger,
        Animal::Rabbit,
        Animal::Dragon,
        Animal::Snake,
        Animal::Horse,
        Animal::Goat,
        Animal::Monkey,
        Animal::Rooster,
        Animal::Dog,
        Animal::Pig,
    ];

    pub fn primary(self) -> &'static str {
        match self {
            Animal::Rat => "鼠",
            Animal::Ox => "牛",
            Animal::Tiger => "虎",
            Animal::Rabbit => "兔",
            Animal::Dragon => "龙",
            Animal::Snake => "蛇",
            Animal::Horse => "马",
            Animal::Goat => "羊",
            Animal::Monkey => "猴",
            Animal::Rooster => "鸡",
            Animal::Dog => "狗",
            Animal::Pig => "猪",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            Animal::Rat => "Rat",
            Animal::Ox => "Ox",
            Animal::Tiger => "Tiger",
            Animal::Rabbit => "Rabbit",
            Animal::Dragon => "Dragon",
            Animal::Snake => "Snake",
            Animal::Horse => "Horse",
            Animal::Goat => "Goat",
            Animal::Monkey => "Monkey",
            Animal::Rooster => "Rooster",
            Animal::Dog => "Dog",
            Animal::Pig => "Pig",
        }
    }

    pub fn label(self) -> String {
        format!("{} ({})", self.primary(), self.english())
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Animal::Rat => "🐀",
            Animal::Ox => "🐂",
            Animal::Tiger => "🐅",
            Animal::Rabbit => "🐇",
            Animal::Dragon => "🐉",
            Animal::Snake => "🐍",
            Animal::Horse => "🐎",
            Animal::Goat => "🐐",
            Animal::Monkey => "🐒",
            Animal::Rooster => "🐓",
            Animal::Dog => "🐕",
            Animal::Pig => "🐖",
        }
    }
}

impl FromStr for Animal {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        let labels = Animal::ALL.map(|a| (a, a.label()));
        if let Some((a, _)) = labels.iter().find(|(_, l)| l == s.trim()) {
            return Ok(*a);
        }
        parse_from("zodiac animal", s, &Animal::ALL[..], |a| [a.primary(), a.english()])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A型")]
    A,
    #[serde(rename = "B型")]
    B,
    #[serde(rename = "O型")]
    O,
    #[serde(rename = "AB型")]
    Ab,
}

impl BloodType {
    pub const ALL: [BloodType; 4] = [BloodType::A, BloodType::B, BloodType::O, BloodType::Ab];

    pub fn letter(self) -> &'static str {
        match self {
            BloodType::A => "A",
            BloodType::B => "B",
            BloodType::O => "O",
            BloodType::Ab => "AB",
        }
    }

    /// `A型`; both the display label and the primary token.
    pub fn primary(self) -> &'static str {
        match self {
            BloodType::A => "A型",
            BloodType::B => "B型",
            BloodType::O => "O型",
            BloodType::Ab => "AB型",
        }
    }

    pub fn section_title(self) -> String {
        format!("{}型血", self.letter())
    }
}

impl FromStr for BloodType {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        parse_from("blood type", s, &BloodType::ALL[..], |b| [b.primary(), b.letter()])
    }
}

/// How the trait phrases should read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Phrases of varying length (6-10 characters).
    #[default]
    Descriptive,
    /// Punchy four-character idioms.
    Concise,
}

impl FromStr for Style {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descriptive" => Ok(Style::Descriptive),
            "concise" => Ok(Style::Concise),
            other => Err(CardError::validation(format!("unknown style '{other}'"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/category.rs"]
mod tests;
