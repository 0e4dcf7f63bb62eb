//! Recognition session
//!
//! Drives one listen → process → result cycle at a time:
//! `Idle → Listening → Processing → (Results | Error) → Idle`.
//! Local matching always runs to completion before the remote fallback is
//! consulted.

use crate::chapters::resolve_chapter_number;
use crate::config::Config;
use crate::core::remote::{PassageIdentifier, RemoteIdentifier};
use crate::corpus::CorpusStore;
use crate::core::text_normalizer::normalize;
use crate::error::{TilawaError, TilawaResult};
use crate::matcher::LocalMatcher;
use crate::playback::{CancelToken, ClipEngine, PlaybackHandle, PlaybackSequencer};
use crate::result::MatchResult;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the session currently is
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionState {
    Idle,
    Listening,
    Processing,
    Results(MatchResult),
    /// User-facing failure message
    Error(String),
}

/// One recitation identification session at a time
pub struct RecognitionSession {
    state: RecognitionState,
    transcript: String,
    matcher: LocalMatcher,
    remote: Option<Arc<dyn PassageIdentifier>>,
    sequencer: PlaybackSequencer,
    playback: Option<CancelToken>,
    min_transcript_chars: usize,
}

impl RecognitionSession {
    /// `remote` is `None` when the fallback service is disabled
    pub fn new(
        matcher: LocalMatcher,
        remote: Option<Arc<dyn PassageIdentifier>>,
        sequencer: PlaybackSequencer,
        config: &Config,
    ) -> Self {
        Self {
            state: RecognitionState::Idle,
            transcript: String::new(),
            matcher,
            remote,
            sequencer,
            playback: None,
            min_transcript_chars: config.min_transcript_chars,
        }
    }

    /// Session wired to the configured corpus sources, remote service and
    /// audio output
    pub fn from_config(config: &Config) -> TilawaResult<Self> {
        let store = Arc::new(CorpusStore::from_config(config)?);
        Self::with_store(store, config)
    }

    /// Like `from_config`, but with a caller-supplied corpus store
    pub fn with_store(store: Arc<CorpusStore>, config: &Config) -> TilawaResult<Self> {
        let matcher = LocalMatcher::new(store, config);

        let remote: Option<Arc<dyn PassageIdentifier>> = if config.remote_enabled {
            Some(Arc::new(RemoteIdentifier::new(config)?))
        } else {
            info!("Remote identification disabled");
            None
        };

        let engine = Arc::new(ClipEngine::new(config)?);
        let sequencer = PlaybackSequencer::from_config(engine, config);

        Ok(Self::new(matcher, remote, sequencer, config))
    }

    pub fn state(&self) -> &RecognitionState {
        &self.state
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Begin a new listening session.
    ///
    /// Cancels any playback and clears the transcript. Refused while a
    /// session is already listening or processing.
    pub fn start_listening(&mut self) -> TilawaResult<()> {
        if matches!(
            self.state,
            RecognitionState::Listening | RecognitionState::Processing
        ) {
            return Err(TilawaError::SessionBusy);
        }

        self.stop_playback();
        self.transcript.clear();
        self.state = RecognitionState::Listening;
        info!("🎙️ Listening");
        Ok(())
    }

    /// Append finalized speech-to-text output while listening
    pub fn push_transcript(&mut self, text: &str) {
        if self.state != RecognitionState::Listening {
            debug!("Ignoring transcript outside a listening session");
            return;
        }

        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.transcript.is_empty() {
            self.transcript.push(' ');
        }
        self.transcript.push_str(text);
    }

    /// Stop listening and identify the accumulated transcript
    pub async fn stop_listening(&mut self) -> TilawaResult<MatchResult> {
        if self.state != RecognitionState::Listening {
            return Err(TilawaError::SessionBusy);
        }

        self.state = RecognitionState::Processing;
        info!("🧠 Processing transcript ({} chars)", self.transcript.len());

        match self.identify().await {
            Ok(result) => {
                info!("✅ Identified {} {}", result.chapter_name, result.label());
                self.state = RecognitionState::Results(result.clone());
                Ok(result)
            }
            Err(e) => {
                warn!("❌ Identification failed: {}", e);
                self.state = RecognitionState::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Full cycle for an already-finalized transcript
    pub async fn submit_transcript(&mut self, text: &str) -> TilawaResult<MatchResult> {
        self.start_listening()?;
        self.push_transcript(text);
        self.stop_listening().await
    }

    /// Discard the current result or error and return to idle
    pub fn reset(&mut self) {
        if matches!(
            self.state,
            RecognitionState::Results(_) | RecognitionState::Error(_)
        ) {
            self.state = RecognitionState::Idle;
            self.transcript.clear();
        }
    }

    /// Start playing a result; `None` when it cannot be played
    pub fn play_result(&mut self, result: &MatchResult) -> Option<PlaybackHandle> {
        self.stop_playback();

        let chapter_number = match result.chapter_number {
            0 => resolve_chapter_number(&result.chapter_name),
            n => n,
        };

        let handle = self.sequencer.play(result, chapter_number)?;
        self.playback = Some(handle.token());
        Some(handle)
    }

    /// Cancel the most recent playback sequence, if any
    pub fn stop_playback(&mut self) {
        if let Some(token) = self.playback.take() {
            token.cancel();
        }
    }

    async fn identify(&self) -> TilawaResult<MatchResult> {
        let normalized = normalize(&self.transcript);
        if normalized.chars().count() < self.min_transcript_chars {
            return Err(TilawaError::EmptyTranscript);
        }

        if let Some(result) = self.matcher.find_match(&self.transcript).await {
            return Ok(result);
        }
        debug!("{}, escalating to remote identifier", TilawaError::NoConfidentMatch);

        let Some(remote) = &self.remote else {
            return Err(TilawaError::RemoteService(
                "remote identification disabled".to_string(),
            ));
        };

        match remote.identify(&self.transcript).await {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Err(TilawaError::RemoteService(format!(
                "{} returned no usable identification",
                remote.name()
            ))),
            Err(e @ TilawaError::RemoteService(_)) => Err(e),
            Err(e) => Err(TilawaError::RemoteService(e.to_string())),
        }
    }
}
