use super::*;

#[test]
fn default_input_matches_initial_form() {
    let input = UserInput::default();
    assert_eq!(input.zodiac, Zodiac::Aquarius);
    assert_eq!(input.mbti, Mbti::Intj);
    assert_eq!(input.animal, Animal::Rat);
    assert_eq!(input.blood_type, BloodType::A);
    assert_eq!(input.style, Style::Descriptive);
}

#[test]
fn user_input_wire_format_is_camel_case_labels() {
    let json = serde_json::to_value(UserInput::default()).unwrap();
    assert_eq!(json["zodiac"], "水瓶座 (Aquarius)");
    assert_eq!(json["mbti"], "INTJ");
    assert_eq!(json["animal"], "鼠 (Rat)");
    assert_eq!(json["bloodType"], "A型");
    assert_eq!(json["style"], "descriptive");
}

#[test]
fn user_input_style_is_optional_on_read() {
    let json = r#"{"zodiac":"白羊座 (Aries)","mbti":"ENFP","animal":"龙 (Dragon)","bloodType":"O型"}"#;
    let input: UserInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.zodiac, Zodiac::Aries);
    assert_eq!(input.style, Style::Descriptive);
}

#[test]
fn card_data_parses_provider_shape() {
    let json = r#"{
        "zodiac": {"title": "水瓶座", "traits": ["a", "b"]},
        "mbti": {"title": "INTJ", "traits": ["c"]},
        "animal": {"title": "鼠", "traits": ["d"]},
        "bloodType": {"title": "A型", "traits": ["e"]},
        "coreTrait": "核心",
        "fortune": "运势。"
    }"#;
    let card: CardData = serde_json::from_str(json).unwrap();
    assert_eq!(card.blood_type.title, "A型");
    assert_eq!(card.core_trait, "核心");
    card.validate().unwrap();
}

#[test]
fn card_data_missing_field_is_rejected() {
    let json = r#"{"zodiac": {"title": "x", "traits": []}}"#;
    assert!(serde_json::from_str::<CardData>(json).is_err());
}

#[test]
fn validate_rejects_empty_sections() {
    let mut card = CardData::sample();
    card.mbti.traits.clear();
    assert!(matches!(card.validate(), Err(CardError::Content(_))));

    let mut card = CardData::sample();
    card.core_trait = "  ".into();
    assert!(card.validate().is_err());
}

#[test]
fn sample_card_is_valid() {
    CardData::sample().validate().unwrap();
}

#[test]
fn fortune_sentences_split_on_cjk_terminators() {
    let out = split_sentences("第一句。第二句！ 第三句？");
    assert_eq!(out, vec!["第一句。", "第二句。", "第三句。"]);
    assert!(split_sentences("").is_empty());
    assert_eq!(CardData::sample().fortune_sentences().len(), 2);
}
