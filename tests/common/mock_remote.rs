//! Mock Remote Identifier for Testing
//!
//! Records every transcript it is asked about.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tilawa::core::remote::PassageIdentifier;
use tilawa::{MatchResult, TilawaError, TilawaResult};

/// Mock identifier returning a canned reply
#[derive(Debug, Default)]
pub struct MockRemote {
    /// Transcripts received, in order
    pub transcripts: Arc<Mutex<Vec<String>>>,
    /// Reply to give (None = unusable answer)
    pub reply: Option<MatchResult>,
    /// Simulate an HTTP failure
    pub should_fail: bool,
}

impl MockRemote {
    pub fn replying(reply: MatchResult) -> Self {
        Self {
            reply: Some(reply),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.transcripts.lock().unwrap().len()
    }
}

#[async_trait]
impl PassageIdentifier for MockRemote {
    async fn identify(&self, transcript: &str) -> TilawaResult<Option<MatchResult>> {
        self.transcripts.lock().unwrap().push(transcript.to_string());
        if self.should_fail {
            return Err(TilawaError::RemoteService("HTTP 503".to_string()));
        }
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
