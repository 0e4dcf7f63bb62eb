#![allow(dead_code)]

pub mod http_stub;
pub mod mock_player;
pub mod mock_remote;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tilawa::config::Config;
use tilawa::corpus::{CorpusFetcher, CorpusStore, ReferenceCorpus};
use tilawa::matcher::LocalMatcher;
use tilawa::playback::PlaybackSequencer;
use tilawa::{RecognitionSession, TilawaError, TilawaResult};

pub use mock_player::MockPlayer;
pub use mock_remote::MockRemote;

pub const AUDIO_TEMPLATE: &str = "https://audio.test/{chapter}{verse}.mp3";

/// Al-Fatiha, Al-Ikhlas and Al-Kawthar in the alquran.cloud envelope
pub fn corpus_document() -> Value {
    json!({
        "code": 200,
        "status": "OK",
        "data": {
            "surahs": [
                {
                    "number": 1,
                    "name": "سورة الفاتحة",
                    "englishName": "Al-Faatiha",
                    "ayahs": [
                        {"text": "بسم الله الرحمن الرحيم"},
                        {"text": "الحمد لله رب العالمين"},
                        {"text": "الرحمن الرحيم"},
                        {"text": "مالك يوم الدين"},
                        {"text": "إياك نعبد وإياك نستعين"},
                        {"text": "اهدنا الصراط المستقيم"},
                        {"text": "صراط الذين أنعمت عليهم غير المغضوب عليهم ولا الضالين"}
                    ]
                },
                {
                    "number": 112,
                    "name": "سورة الإخلاص",
                    "englishName": "Al-Ikhlaas",
                    "ayahs": [
                        {"text": "قل هو الله أحد"},
                        {"text": "الله الصمد"},
                        {"text": "لم يلد ولم يولد"},
                        {"text": "ولم يكن له كفوا أحد"}
                    ]
                },
                {
                    "number": 108,
                    "name": "سورة الكوثر",
                    "englishName": "Al-Kawthar",
                    "ayahs": [
                        {"text": "إنا أعطيناك الكوثر"},
                        {"text": "فصل لربك وانحر"},
                        {"text": "إن شانئك هو الأبتر"}
                    ]
                }
            ]
        }
    })
}

pub fn sample_corpus() -> ReferenceCorpus {
    ReferenceCorpus::from_json(&corpus_document().to_string()).expect("fixture corpus parses")
}

/// Corpus fetcher serving canned documents by source name
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(entries: &[(&str, String)]) -> Self {
        Self {
            bodies: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CorpusFetcher for StaticFetcher {
    async fn fetch(&self, source: &str) -> TilawaResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .get(source)
            .cloned()
            .ok_or_else(|| TilawaError::Other(anyhow::anyhow!("{} unreachable", source)))
    }
}

/// Session over `store` with mock remote and player
pub fn build_session(
    store: CorpusStore,
    remote: Arc<MockRemote>,
    player: Arc<MockPlayer>,
) -> RecognitionSession {
    let config = Config::default();
    let matcher = LocalMatcher::new(Arc::new(store), &config);
    let sequencer = PlaybackSequencer::new(player, AUDIO_TEMPLATE);
    RecognitionSession::new(matcher, Some(remote), sequencer, &config)
}
