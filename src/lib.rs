//! Tilawa Library
//!
//! Identifies a recited Quran passage from a speech-to-text transcript and
//! plays back its recitation audio.

pub mod chapters;
pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod matcher;
pub mod playback;
pub mod result;
pub mod session;

pub use chapters::resolve_chapter_number;
pub use error::{TilawaError, TilawaResult};
pub use result::{format_label, MatchResult, VerseLocator};
pub use session::{RecognitionSession, RecognitionState};
