//! Character n-gram similarity
//!
//! Transcripts are compared to corpus text as sets of overlapping character
//! windows scored with the Jaccard index.

use std::collections::HashSet;

/// Default window length
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// All contiguous `n`-character substrings of `text`.
///
/// Empty when the text is shorter than `n` characters (or `n` is zero).
pub fn to_ngrams(text: &str, n: usize) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if n == 0 || chars.len() < n {
        return HashSet::new();
    }

    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// Jaccard index of two n-gram sets, in `[0, 1]`.
///
/// Two empty sets score 0.0: the union is taken as 1 to avoid dividing by zero.
pub fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = match a.union(b).count() {
        0 => 1,
        n => n,
    };
    intersection as f64 / union as f64
}
