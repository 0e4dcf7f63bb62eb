//! Clip engine
//!
//! Uses a channel-based architecture to handle rodio's non-Send stream.
//! The engine spawns a dedicated audio thread that owns the output stream;
//! clips are downloaded on the async side and handed over as bytes.

use super::ClipPlayer;
use crate::config::Config;
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// How often the audio thread checks whether the current clip has drained
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Commands sent to the audio thread
enum AudioCommand {
    /// Play encoded audio and report when it has finished
    Play(Vec<u8>, oneshot::Sender<anyhow::Result<()>>),
    /// Pause and drop the current clip
    Pause,
}

/// Thread-safe handle to the audio thread
#[derive(Clone)]
pub struct ClipEngine {
    sender: mpsc::Sender<AudioCommand>,
    client: reqwest::Client,
}

impl std::fmt::Debug for ClipEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipEngine").finish()
    }
}

impl ClipEngine {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let (sender, receiver) = mpsc::channel::<AudioCommand>();

        thread::Builder::new()
            .name("tilawa-audio".to_string())
            .spawn(move || Self::audio_thread(receiver))?;

        Ok(Self { sender, client })
    }

    fn audio_thread(receiver: mpsc::Receiver<AudioCommand>) {
        use rodio::{Decoder, OutputStream, Sink};

        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(s) => s,
            Err(e) => {
                warn!("🔇 Failed to initialize audio output: {}", e);
                Self::reject_all(receiver, "No audio output available");
                return;
            }
        };

        // Keep stream alive
        let _stream = stream;
        let mut sink = match Sink::try_new(&stream_handle) {
            Ok(s) => s,
            Err(e) => {
                error!("❌ Failed to create audio sink: {}", e);
                Self::reject_all(receiver, "Audio sink unavailable");
                return;
            }
        };
        let mut pending: Option<oneshot::Sender<anyhow::Result<()>>> = None;

        info!("🔊 Audio thread started");

        loop {
            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCommand::Play(bytes, done)) => {
                    match Decoder::new(Cursor::new(bytes)) {
                        Ok(source) => {
                            sink.append(source);
                            sink.play();
                            pending = Some(done);
                        }
                        Err(e) => {
                            error!("❌ Failed to decode clip: {}", e);
                            let _ = done.send(Err(e.into()));
                        }
                    }
                }
                Ok(AudioCommand::Pause) => {
                    info!("⏸️ Pausing playback");
                    sink.pause();
                    sink.stop();
                    // A stopped sink cannot be reused
                    if let Ok(new_sink) = Sink::try_new(&stream_handle) {
                        sink = new_sink;
                    }
                    pending = None;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }

            if pending.is_some() && sink.empty() {
                if let Some(done) = pending.take() {
                    debug!("Clip finished");
                    let _ = done.send(Ok(()));
                }
            }
        }

        info!("🔇 Audio thread stopped");
    }

    fn reject_all(receiver: mpsc::Receiver<AudioCommand>, reason: &str) {
        while let Ok(cmd) = receiver.recv() {
            if let AudioCommand::Play(_, done) = cmd {
                let _ = done.send(Err(anyhow::anyhow!("{}", reason)));
            }
        }
    }

    /// Clip bytes from an HTTP(S) URL or a local path
    async fn fetch(&self, locator: &str) -> anyhow::Result<Vec<u8>> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            let response = self.client.get(locator).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        } else {
            Ok(tokio::fs::read(locator).await?)
        }
    }
}

#[async_trait]
impl ClipPlayer for ClipEngine {
    async fn play(&self, locator: &str) -> anyhow::Result<()> {
        let bytes = self.fetch(locator).await?;
        debug!("Fetched {} bytes from {}", bytes.len(), locator);

        let (tx, rx) = oneshot::channel();
        self.sender
            .send(AudioCommand::Play(bytes, tx))
            .map_err(|e| anyhow::anyhow!("Audio thread disconnected: {}", e))?;

        rx.await
            .map_err(|_| anyhow::anyhow!("Clip interrupted before it finished"))?
    }

    async fn pause(&self) -> anyhow::Result<()> {
        self.sender
            .send(AudioCommand::Pause)
            .map_err(|e| anyhow::anyhow!("Audio thread disconnected: {}", e))
    }
}
