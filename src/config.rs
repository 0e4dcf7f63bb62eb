use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `remote_api_key`
pub const API_KEY_ENV: &str = "TILAWA_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Corpus
    pub corpus_urls: Vec<String>,

    // Remote identification
    pub remote_enabled: bool,
    pub remote_url: String,
    pub remote_model: Option<String>,
    pub remote_api_key: Option<String>,
    pub request_timeout_secs: u64,

    // Playback
    pub audio_url_template: String,

    // Matching
    pub min_confidence: f64,
    pub ngram_size: usize,
    pub min_transcript_chars: usize,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_urls: vec![
                "https://api.alquran.cloud/v1/quran/quran-simple-clean".to_string(),
                "https://api.alquran.cloud/v1/quran/quran-uthmani".to_string(),
            ],
            remote_enabled: true,
            remote_url: "https://api.openai.com/v1/chat/completions".to_string(),
            remote_model: Some("gpt-4o-mini".to_string()),
            remote_api_key: None,
            request_timeout_secs: 15,
            audio_url_template: "https://everyayah.com/data/Alafasy_128kbps/{chapter}{verse}.mp3"
                .to_string(),
            min_confidence: 0.12,
            ngram_size: 3,
            min_transcript_chars: 6,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    // keep the broken file around for inspection
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    let backup_path = path.with_extension("json.corrupt");
                    let _ = std::fs::rename(path, &backup_path);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.remote_api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tilawa")
        .join("config.json")
}
