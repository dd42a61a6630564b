use super::*;
use crate::model::category::{Animal, BloodType, Mbti, Style, Zodiac};

#[test]
fn default_selection_stem() {
    assert_eq!(export_stem(&UserInput::default()), "水瓶座+INTJ+鼠+A型");
    assert_eq!(
        export_file_name(&UserInput::default(), "png"),
        "水瓶座+INTJ+鼠+A型.png"
    );
    assert_eq!(
        export_file_name(&UserInput::default(), ".webm"),
        "水瓶座+INTJ+鼠+A型.webm"
    );
}

#[test]
fn every_combination_joins_primary_tokens_without_punctuation() {
    for zodiac in Zodiac::ALL {
        for mbti in Mbti::ALL {
            for animal in Animal::ALL {
                for blood_type in BloodType::ALL {
                    let input = UserInput {
                        zodiac,
                        mbti,
                        animal,
                        blood_type,
                        style: Style::Concise,
                    };
                    let stem = export_stem(&input);
                    let parts: Vec<&str> = stem.split('+').collect();
                    assert_eq!(
                        parts,
                        vec![
                            zodiac.primary(),
                            mbti.code(),
                            animal.primary(),
                            blood_type.primary()
                        ]
                    );
                    assert!(!stem.contains(' '));
                    assert!(!stem.contains('('));
                }
            }
        }
    }
}

#[test]
fn style_does_not_affect_name() {
    let a = UserInput::default();
    let b = UserInput {
        style: Style::Concise,
        ..a
    };
    assert_eq!(export_stem(&a), export_stem(&b));
}
