//! Playback Sequencer
//!
//! Plays the recitation audio of an identified passage, one verse clip at a
//! time. Each sequence owns its own cancellation token, so cancelling one
//! sequence never leaks into the next.

pub mod engine;

use crate::config::Config;
use crate::error::{TilawaError, TilawaResult};
use crate::result::MatchResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use engine::ClipEngine;

/// Plays individual audio clips
#[async_trait]
pub trait ClipPlayer: Send + Sync {
    /// Play the clip at `locator` and return once it has finished
    async fn play(&self, locator: &str) -> anyhow::Result<()>;

    /// Pause whatever is currently playing
    async fn pause(&self) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation flag for one playback sequence
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        loop {
            // register before checking so a concurrent cancel is not missed
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// How a sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Completed,
    Cancelled,
}

/// Handle to a running sequence
pub struct PlaybackHandle {
    token: CancelToken,
    task: JoinHandle<TilawaResult<PlaybackOutcome>>,
}

impl PlaybackHandle {
    /// Stop before the next clip and pause the current one
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the sequence to end
    pub async fn join(self) -> TilawaResult<PlaybackOutcome> {
        self.task
            .await
            .map_err(|e| TilawaError::Playback(e.to_string()))?
    }
}

/// Audio clip locator for a verse: both numbers zero-padded to 3 digits
pub fn clip_url(template: &str, chapter: u32, verse: u32) -> String {
    template
        .replace("{chapter}", &format!("{chapter:03}"))
        .replace("{verse}", &format!("{verse:03}"))
}

/// Turns results into sequences of verse clips
pub struct PlaybackSequencer {
    player: Arc<dyn ClipPlayer>,
    template: String,
}

impl PlaybackSequencer {
    pub fn new(player: Arc<dyn ClipPlayer>, template: impl Into<String>) -> Self {
        Self {
            player,
            template: template.into(),
        }
    }

    pub fn from_config(player: Arc<dyn ClipPlayer>, config: &Config) -> Self {
        Self::new(player, config.audio_url_template.clone())
    }

    /// Ordered verse numbers a result covers
    pub fn expand(result: &MatchResult) -> Vec<u32> {
        result.locator.expand()
    }

    /// Clip locators for a result, in playback order
    pub fn clip_urls(&self, result: &MatchResult, chapter_number: u32) -> Vec<String> {
        Self::expand(result)
            .into_iter()
            .map(|verse| clip_url(&self.template, chapter_number, verse))
            .collect()
    }

    /// Start playing a result in the background.
    ///
    /// `None` when the chapter is unresolved (0) or there are no verses.
    pub fn play(&self, result: &MatchResult, chapter_number: u32) -> Option<PlaybackHandle> {
        if chapter_number == 0 {
            debug!("Chapter '{}' unresolved, playback unavailable", result.chapter_name);
            return None;
        }

        let urls = self.clip_urls(result, chapter_number);
        if urls.is_empty() {
            debug!("No verses to play for {}", result.label());
            return None;
        }

        info!(
            "▶️ Playing {} clip(s) for chapter {:03}",
            urls.len(),
            chapter_number
        );

        let token = CancelToken::new();
        let task = tokio::spawn(run_sequence(self.player.clone(), urls, token.clone()));
        Some(PlaybackHandle { token, task })
    }
}

/// Play clips in order until done, cancelled, or a clip fails
pub async fn run_sequence(
    player: Arc<dyn ClipPlayer>,
    urls: Vec<String>,
    token: CancelToken,
) -> TilawaResult<PlaybackOutcome> {
    for url in urls {
        if token.is_cancelled() {
            info!("⏹️ Playback cancelled");
            return Ok(PlaybackOutcome::Cancelled);
        }

        debug!("Playing clip {}", url);
        tokio::select! {
            played = player.play(&url) => {
                if let Err(e) = played {
                    warn!("❌ Clip {} failed, aborting sequence: {}", url, e);
                    return Err(TilawaError::Playback(e.to_string()));
                }
            }
            _ = token.cancelled() => {
                if let Err(e) = player.pause().await {
                    warn!("⚠️ Failed to pause clip: {}", e);
                }
                info!("⏹️ Playback cancelled mid-clip");
                return Ok(PlaybackOutcome::Cancelled);
            }
        }
    }

    Ok(PlaybackOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{MatchSource, VerseLocator};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingPlayer {
        played: Mutex<Vec<String>>,
        paused: AtomicBool,
        fail_on: Option<usize>,
        clip_time: Duration,
    }

    #[async_trait]
    impl ClipPlayer for RecordingPlayer {
        async fn play(&self, locator: &str) -> anyhow::Result<()> {
            let index = {
                let mut played = self.played.lock().unwrap();
                played.push(locator.to_string());
                played.len() - 1
            };
            if self.fail_on == Some(index) {
                anyhow::bail!("clip not found");
            }
            tokio::time::sleep(self.clip_time).await;
            Ok(())
        }

        async fn pause(&self) -> anyhow::Result<()> {
            self.paused.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn result(locator: VerseLocator) -> MatchResult {
        MatchResult {
            chapter_name: "الكهف".to_string(),
            chapter_number: 18,
            text: String::new(),
            translation: String::new(),
            locator,
            score: None,
            source: MatchSource::Remote,
        }
    }

    const TEMPLATE: &str = "https://audio.test/{chapter}{verse}.mp3";

    #[test]
    fn test_clip_url_padding() {
        assert_eq!(clip_url(TEMPLATE, 1, 7), "https://audio.test/001007.mp3");
        assert_eq!(clip_url(TEMPLATE, 114, 6), "https://audio.test/114006.mp3");
        assert_eq!(clip_url(TEMPLATE, 2, 286), "https://audio.test/002286.mp3");
    }

    #[test]
    fn test_expand_range() {
        assert_eq!(
            PlaybackSequencer::expand(&result(VerseLocator::Range { start: 5, end: 7 })),
            vec![5, 6, 7]
        );
    }

    #[tokio::test]
    async fn test_plays_all_clips_in_order() {
        let player = Arc::new(RecordingPlayer::default());
        let sequencer = PlaybackSequencer::new(player.clone(), TEMPLATE);

        let handle = sequencer
            .play(&result(VerseLocator::List(vec![3, 1, 2])), 18)
            .expect("playable");
        assert_eq!(handle.join().await.unwrap(), PlaybackOutcome::Completed);

        assert_eq!(
            *player.played.lock().unwrap(),
            vec![
                "https://audio.test/018001.mp3",
                "https://audio.test/018002.mp3",
                "https://audio.test/018003.mp3",
            ]
        );
    }

    #[tokio::test]
    async fn test_unplayable_results() {
        let sequencer = PlaybackSequencer::new(Arc::new(RecordingPlayer::default()), TEMPLATE);
        assert!(sequencer.play(&result(VerseLocator::Single(1)), 0).is_none());
        assert!(sequencer.play(&result(VerseLocator::Single(0)), 18).is_none());
    }

    #[tokio::test]
    async fn test_cancel_after_first_clip_starts() {
        let player = Arc::new(RecordingPlayer {
            clip_time: Duration::from_millis(200),
            ..Default::default()
        });
        let sequencer = PlaybackSequencer::new(player.clone(), TEMPLATE);
        let handle = sequencer
            .play(&result(VerseLocator::Range { start: 5, end: 7 }), 18)
            .unwrap();

        while player.played.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.cancel();

        assert_eq!(handle.join().await.unwrap(), PlaybackOutcome::Cancelled);
        assert_eq!(player.played.lock().unwrap().len(), 1);
        assert!(player.paused.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_clip_error_aborts_sequence() {
        let player = Arc::new(RecordingPlayer {
            fail_on: Some(1),
            ..Default::default()
        });
        let urls = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let outcome = run_sequence(player.clone(), urls, CancelToken::new()).await;
        assert!(matches!(outcome, Err(TilawaError::Playback(_))));
        assert_eq!(*player.played.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_tokens_are_independent() {
        let stale = CancelToken::new();
        stale.cancel();

        let player = Arc::new(RecordingPlayer::default());
        let fresh = CancelToken::new();
        let outcome = run_sequence(player.clone(), vec!["a".to_string()], fresh)
            .await
            .unwrap();

        assert!(stale.is_cancelled());
        assert_eq!(outcome, PlaybackOutcome::Completed);
        assert_eq!(player.played.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let token = CancelToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() should wake")
            .unwrap();
    }
}
