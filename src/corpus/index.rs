//! Candidate index
//!
//! Expands the corpus into the units the matcher scores: every single verse,
//! and every pair of adjacent verses inside the same chapter.

use super::ReferenceCorpus;
use crate::result::VerseLocator;

/// A searchable unit of one or two verses
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub chapter_name: String,
    /// 1-based position of the chapter in the corpus
    pub chapter_number: u32,
    /// Either `Single` or a two-verse `Range`
    pub locator: VerseLocator,
    pub text: String,
}

/// Build all candidates in chapter order, then verse order, single before pair.
///
/// A corpus with N verses across C chapters yields `2N - C` candidates.
pub fn build_candidates(corpus: &ReferenceCorpus) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(corpus.verse_count() * 2);

    for (chapter_idx, chapter) in corpus.chapters.iter().enumerate() {
        let chapter_number = chapter_idx as u32 + 1;

        for (i, verse) in chapter.verses.iter().enumerate() {
            let verse_number = i as u32 + 1;

            candidates.push(Candidate {
                chapter_name: chapter.name.clone(),
                chapter_number,
                locator: VerseLocator::Single(verse_number),
                text: verse.text.clone(),
            });

            if let Some(next) = chapter.verses.get(i + 1) {
                candidates.push(Candidate {
                    chapter_name: chapter.name.clone(),
                    chapter_number,
                    locator: VerseLocator::Range {
                        start: verse_number,
                        end: verse_number + 1,
                    },
                    text: format!("{} {}", verse.text, next.text),
                });
            }
        }
    }

    candidates
}
