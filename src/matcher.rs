//! Local Matcher
//!
//! Scores a transcript against every corpus candidate and returns the best
//! one if it clears the confidence threshold.

use crate::config::Config;
use crate::core::ngram::{similarity, to_ngrams};
use crate::core::text_normalizer::normalize;
use crate::corpus::{build_candidates, Candidate, CorpusStore};
use crate::result::{MatchResult, MatchSource, NO_TRANSLATION};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Minimum Jaccard score for a local match
pub const MIN_CONFIDENCE: f64 = 0.12;

/// Candidate with its n-gram set precomputed
#[derive(Debug, Clone)]
pub struct IndexedCandidate {
    pub candidate: Candidate,
    grams: HashSet<String>,
}

/// Best-scoring candidate for a transcript
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub candidate: Candidate,
    pub score: f64,
}

impl ScoredMatch {
    pub fn into_result(self) -> MatchResult {
        MatchResult {
            chapter_name: self.candidate.chapter_name,
            chapter_number: self.candidate.chapter_number,
            text: self.candidate.text,
            translation: NO_TRANSLATION.to_string(),
            locator: self.candidate.locator,
            score: Some(self.score),
            source: MatchSource::Local,
        }
    }
}

/// Normalize and n-gram every candidate
pub fn index_candidates(candidates: Vec<Candidate>, n: usize) -> Vec<IndexedCandidate> {
    candidates
        .into_iter()
        .map(|candidate| {
            let grams = to_ngrams(&normalize(&candidate.text), n);
            IndexedCandidate { candidate, grams }
        })
        .collect()
}

/// Highest-scoring candidate for a set of transcript n-grams.
///
/// Ties keep the earliest candidate.
pub fn find_best<'a>(
    index: &'a [IndexedCandidate],
    transcript_grams: &HashSet<String>,
) -> Option<(&'a IndexedCandidate, f64)> {
    let mut best: Option<(&IndexedCandidate, f64)> = None;

    for entry in index {
        let score = similarity(transcript_grams, &entry.grams);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((entry, score)),
        }
    }

    best
}

/// Matches transcripts against the in-memory corpus
pub struct LocalMatcher {
    store: Arc<CorpusStore>,
    min_confidence: f64,
    ngram_size: usize,
    index: OnceCell<Arc<Vec<IndexedCandidate>>>,
}

impl LocalMatcher {
    pub fn new(store: Arc<CorpusStore>, config: &Config) -> Self {
        Self::with_settings(store, config.min_confidence, config.ngram_size)
    }

    pub fn with_settings(store: Arc<CorpusStore>, min_confidence: f64, ngram_size: usize) -> Self {
        Self {
            store,
            min_confidence,
            ngram_size,
            index: OnceCell::new(),
        }
    }

    /// Best candidate above the threshold, as a result
    pub async fn find_match(&self, transcript: &str) -> Option<MatchResult> {
        self.best_candidate(transcript)
            .await
            .map(ScoredMatch::into_result)
    }

    /// Best candidate above the threshold, with its score
    pub async fn best_candidate(&self, transcript: &str) -> Option<ScoredMatch> {
        let normalized = normalize(transcript);
        if normalized.is_empty() {
            debug!("Transcript empty after normalization, skipping local match");
            return None;
        }

        let index = self.index().await?;
        let transcript_grams = to_ngrams(&normalized, self.ngram_size);

        let (entry, score) = find_best(&index, &transcript_grams)?;
        if score < self.min_confidence {
            debug!(
                "Best local candidate {} {:?} scored {:.3}, below {:.2}",
                entry.candidate.chapter_name, entry.candidate.locator, score, self.min_confidence
            );
            return None;
        }

        info!(
            "🎯 Local match: {} {:?} (score {:.3})",
            entry.candidate.chapter_name, entry.candidate.locator, score
        );
        Some(ScoredMatch {
            candidate: entry.candidate.clone(),
            score,
        })
    }

    async fn index(&self) -> Option<Arc<Vec<IndexedCandidate>>> {
        let corpus = self.store.get().await?;
        let n = self.ngram_size;
        let index = self
            .index
            .get_or_init(|| async move {
                let indexed = index_candidates(build_candidates(&corpus), n);
                debug!("Indexed {} candidates", indexed.len());
                Arc::new(indexed)
            })
            .await;
        Some(index.clone())
    }
}
