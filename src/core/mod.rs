//! Core processing modules
//!
//! Text normalization, n-gram scoring and the remote identification
//! fallback.

pub mod ngram;
pub mod remote;
pub mod text_normalizer;
