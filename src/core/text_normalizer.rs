//! Text Normalization
//!
//! Canonicalizes Arabic text before matching: vowel signs and Quranic
//! annotation marks are dropped, letter variants are folded, and anything
//! outside the core Arabic letter block becomes whitespace.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Harakat, tanween, shadda, sukun and the superscript alef
    static ref DIACRITICS: Regex = Regex::new(r"[\u{064B}-\u{065F}\u{0670}]").unwrap();
    /// Quranic annotation signs (small high letters, pause marks)
    static ref QURANIC_MARKS: Regex = Regex::new(r"[\u{06D6}-\u{06ED}]").unwrap();
    static ref NON_LETTERS: Regex = Regex::new(r"[^\u{0621}-\u{064A}\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Letter-shape variants folded to one base letter
const LETTER_FOLDS: &[(char, char)] = &[
    ('أ', 'ا'),
    ('إ', 'ا'),
    ('آ', 'ا'),
    // alef wasla, common in Uthmani script
    ('ٱ', 'ا'),
    ('ى', 'ي'),
    // ta marbuta approximated as ha
    ('ة', 'ه'),
];

/// Normalize Arabic text for matching.
///
/// Always returns a string; empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let stripped = DIACRITICS.replace_all(text, "");
    let stripped = QURANIC_MARKS.replace_all(&stripped, "");

    let folded: String = stripped
        .chars()
        .map(|c| {
            LETTER_FOLDS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect();

    let letters_only = NON_LETTERS.replace_all(&folded, " ");
    WHITESPACE.replace_all(&letters_only, " ").trim().to_string()
}

/// Strip a leading word (after normalization) if present.
///
/// Returns the remainder trimmed, or the input unchanged when the prefix
/// does not match a whole word.
pub fn strip_leading_word<'a>(normalized: &'a str, word: &str) -> &'a str {
    match normalized.strip_prefix(word) {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim_start(),
        _ => normalized,
    }
}
