//! Identification results
//!
//! The structured outcome handed to rendering and playback, plus the
//! human-readable verse label.

use serde::{Deserialize, Serialize};

/// Translation text used for local matches (the corpus has none)
pub const NO_TRANSLATION: &str = "Translation unavailable";

/// Where in a chapter the identified passage sits.
///
/// Exactly one form is ever populated; when several are available the
/// priority is list, then range, then single verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerseLocator {
    Single(u32),
    Range { start: u32, end: u32 },
    List(Vec<u32>),
}

impl VerseLocator {
    /// Ordered verse numbers covered by this locator.
    ///
    /// Lists are sorted ascending, ranges are inclusive, and a single verse
    /// of 0 (unknown) yields nothing.
    pub fn expand(&self) -> Vec<u32> {
        match self {
            VerseLocator::List(verses) => {
                let mut sorted = verses.clone();
                sorted.sort_unstable();
                sorted
            }
            VerseLocator::Range { start, end } => (*start..=*end).collect(),
            VerseLocator::Single(0) => Vec::new(),
            VerseLocator::Single(verse) => vec![*verse],
        }
    }
}

/// Which stage produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Local,
    Remote,
}

/// Structured outcome of identification. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub chapter_name: String,
    /// Canonical ordinal 1..=114, or 0 when unresolved
    pub chapter_number: u32,
    pub text: String,
    pub translation: String,
    pub locator: VerseLocator,
    /// Similarity score for local matches
    pub score: Option<f64>,
    pub source: MatchSource,
}

/// Label for the verse part of a result, e.g. `آية 3` or `آيات 2–4`.
pub fn format_label(locator: &VerseLocator) -> String {
    match locator {
        VerseLocator::List(verses) => {
            let sorted = locator.expand();
            match (sorted.first(), sorted.last()) {
                (Some(first), Some(last)) if verses.len() > 1 => range_label(*first, *last),
                (Some(first), _) => single_label(*first),
                _ => single_label(0),
            }
        }
        VerseLocator::Range { start, end } => range_label(*start, *end),
        VerseLocator::Single(verse) => single_label(*verse),
    }
}

fn single_label(verse: u32) -> String {
    format!("آية {verse}")
}

fn range_label(start: u32, end: u32) -> String {
    format!("آيات {start}–{end}")
}

impl MatchResult {
    /// Verse label for this result
    pub fn label(&self) -> String {
        format_label(&self.locator)
    }
}
