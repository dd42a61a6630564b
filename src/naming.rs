use crate::model::card::UserInput;

/// `水瓶座+INTJ+鼠+A型`: the four primary tokens joined with `+`.
pub fn export_stem(input: &UserInput) -> String {
    format!(
        "{}+{}+{}+{}",
        input.zodiac.primary(),
        input.mbti.code(),
        input.animal.primary(),
        input.blood_type.primary()
    )
}

/// Export filename for `input` with extension `ext` (no leading dot).
pub fn export_file_name(input: &UserInput, ext: &str) -> String {
    format!("{}.{}", export_stem(input), ext.trim_start_matches('.'))
}

#[cfg(test)]
#[path = "../tests/unit/naming.rs"]
mod tests;
