//! Tilawa Error Types
//!
//! Centralized error handling for the recitation pipeline.

use thiserror::Error;

/// Central error type for Tilawa
#[derive(Error, Debug)]
pub enum TilawaError {
    #[error("Reference corpus unavailable")]
    CorpusUnavailable,

    #[error("Transcript too short to identify")]
    EmptyTranscript,

    #[error("No confident local match")]
    NoConfidentMatch,

    #[error("Remote identification failed: {0}")]
    RemoteService(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("A recognition session is already in progress")]
    SessionBusy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TilawaError {
    /// Message shown to the person reciting
    pub fn user_message(&self) -> String {
        match self {
            TilawaError::EmptyTranscript => "No audio captured".to_string(),
            TilawaError::NoConfidentMatch | TilawaError::RemoteService(_) => {
                "Could not identify passage".to_string()
            }
            TilawaError::SessionBusy => "Please wait for the current recitation".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Tilawa operations
pub type TilawaResult<T> = Result<T, TilawaError>;
