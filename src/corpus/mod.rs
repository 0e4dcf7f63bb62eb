//! Reference corpus
//!
//! The Quran text the local matcher searches. It is fetched once per process
//! from the first configured source that answers with a usable document;
//! when every source fails the corpus stays absent for the process lifetime.

pub mod index;

use crate::config::Config;
use crate::error::{TilawaError, TilawaResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

pub use index::{build_candidates, Candidate};

/// A single verse
#[derive(Debug, Clone, PartialEq)]
pub struct Verse {
    pub text: String,
}

/// A chapter with its native (Arabic) and romanized display names
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub name: String,
    pub alt_name: String,
    pub verses: Vec<Verse>,
}

/// Immutable, ordered chapter list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCorpus {
    pub chapters: Vec<Chapter>,
}

/// Accepted document shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusDocument {
    Envelope { data: ChapterList },
    Listed(ChapterList),
    Bare(Vec<RawChapter>),
}

#[derive(Deserialize)]
struct ChapterList {
    #[serde(alias = "chapters")]
    surahs: Vec<RawChapter>,
}

#[derive(Deserialize)]
struct RawChapter {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "englishName")]
    english_name: String,
    #[serde(alias = "verses")]
    ayahs: Vec<RawVerse>,
}

#[derive(Deserialize)]
struct RawVerse {
    text: String,
}

impl ReferenceCorpus {
    /// Parse a corpus document. A document without chapters is rejected.
    pub fn from_json(body: &str) -> TilawaResult<Self> {
        let chapters = match serde_json::from_str::<CorpusDocument>(body)? {
            CorpusDocument::Envelope { data } => data.surahs,
            CorpusDocument::Listed(list) => list.surahs,
            CorpusDocument::Bare(chapters) => chapters,
        };

        if chapters.is_empty() {
            return Err(TilawaError::CorpusUnavailable);
        }

        Ok(Self {
            chapters: chapters
                .into_iter()
                .map(|c| Chapter {
                    name: c.name,
                    alt_name: c.english_name,
                    verses: c
                        .ayahs
                        .into_iter()
                        .map(|v| Verse { text: v.text })
                        .collect(),
                })
                .collect(),
        })
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }
}

/// Retrieves a raw corpus document from a source location
#[async_trait]
pub trait CorpusFetcher: Send + Sync {
    async fn fetch(&self, source: &str) -> TilawaResult<String>;
}

/// Fetches corpus documents over HTTP
pub struct HttpCorpusFetcher {
    client: reqwest::Client,
}

impl HttpCorpusFetcher {
    pub fn new(config: &Config) -> TilawaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CorpusFetcher for HttpCorpusFetcher {
    async fn fetch(&self, source: &str) -> TilawaResult<String> {
        let response = self.client.get(source).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Process-wide corpus holder.
///
/// The first caller triggers the load; concurrent callers wait on the same
/// in-flight load instead of fetching again.
pub struct CorpusStore {
    sources: Vec<String>,
    fetcher: Option<Arc<dyn CorpusFetcher>>,
    corpus: OnceCell<Option<Arc<ReferenceCorpus>>>,
}

impl CorpusStore {
    /// Store that loads lazily from `sources`, in order
    pub fn new(sources: Vec<String>, fetcher: Arc<dyn CorpusFetcher>) -> Self {
        Self {
            sources,
            fetcher: Some(fetcher),
            corpus: OnceCell::new(),
        }
    }

    /// Store backed by the configured HTTP sources
    pub fn from_config(config: &Config) -> TilawaResult<Self> {
        let fetcher = HttpCorpusFetcher::new(config)?;
        Ok(Self::new(config.corpus_urls.clone(), Arc::new(fetcher)))
    }

    /// Store holding an already-loaded corpus
    pub fn preloaded(corpus: ReferenceCorpus) -> Self {
        Self {
            sources: Vec::new(),
            fetcher: None,
            corpus: OnceCell::new_with(Some(Some(Arc::new(corpus)))),
        }
    }

    /// Store whose corpus is permanently absent
    pub fn absent() -> Self {
        Self {
            sources: Vec::new(),
            fetcher: None,
            corpus: OnceCell::new_with(Some(None)),
        }
    }

    /// Store loaded from a local JSON document
    pub fn from_file(path: &Path) -> TilawaResult<Self> {
        let body = std::fs::read_to_string(path)?;
        let corpus = ReferenceCorpus::from_json(&body)?;
        info!(
            "📖 Corpus loaded from {}: {} chapters, {} verses",
            path.display(),
            corpus.chapters.len(),
            corpus.verse_count()
        );
        Ok(Self::preloaded(corpus))
    }

    /// The corpus, loading it on first use. `None` means unavailable.
    pub async fn get(&self) -> Option<Arc<ReferenceCorpus>> {
        self.corpus.get_or_init(|| self.load()).await.clone()
    }

    async fn load(&self) -> Option<Arc<ReferenceCorpus>> {
        let fetcher = self.fetcher.as_ref()?;

        for source in &self.sources {
            debug!("Fetching corpus from {}", source);
            let body = match fetcher.fetch(source).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("⚠️ Corpus source {} failed: {}", source, e);
                    continue;
                }
            };

            match ReferenceCorpus::from_json(&body) {
                Ok(corpus) => {
                    info!(
                        "📖 Corpus loaded from {}: {} chapters, {} verses",
                        source,
                        corpus.chapters.len(),
                        corpus.verse_count()
                    );
                    return Some(Arc::new(corpus));
                }
                Err(e) => warn!("⚠️ Corpus source {} returned unusable data: {}", source, e),
            }
        }

        warn!("❌ {}", TilawaError::CorpusUnavailable);
        None
    }
}
