//! Mock Clip Player for Testing
//!
//! Records every clip locator it is asked to play.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tilawa::playback::ClipPlayer;

#[derive(Debug, Default)]
pub struct MockPlayer {
    /// All clips that were started
    pub played: Arc<Mutex<Vec<String>>>,
    pub paused: AtomicBool,
    /// How long each clip "plays"
    pub clip_time: Duration,
}

impl MockPlayer {
    pub fn with_clip_time(clip_time: Duration) -> Self {
        Self {
            clip_time,
            ..Default::default()
        }
    }

    pub fn get_played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    pub fn was_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClipPlayer for MockPlayer {
    async fn play(&self, locator: &str) -> anyhow::Result<()> {
        self.played.lock().unwrap().push(locator.to_string());
        tokio::time::sleep(self.clip_time).await;
        Ok(())
    }

    async fn pause(&self) -> anyhow::Result<()> {
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }
}
