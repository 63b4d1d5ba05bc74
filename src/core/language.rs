use crate::core::moviebox::CaptionVariant;

/// ISO 639-1 (`fr`) and both ISO 639-2 forms (`fre` bibliographic, `fra` terminological).
pub const FRENCH_LANGUAGE_CODES: [&str; 3] = ["fr", "fre", "fra"];

pub fn is_french_code(code: &str) -> bool {
    let code = code.trim();
    FRENCH_LANGUAGE_CODES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(code))
}

pub fn has_french_subtitles(captions: &[CaptionVariant]) -> bool {
    captions.iter().any(|c| is_french_code(&c.lan))
}
