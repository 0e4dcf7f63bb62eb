//! Remote passage identification
//!
//! Fallback for transcripts the local matcher cannot place. The raw
//! transcript goes to an OpenAI-compatible chat completion endpoint that is
//! instructed to answer with a single JSON object; the reply is then reduced
//! to one canonical `MatchResult`.

use crate::chapters::{chapter_name, resolve_chapter_number};
use crate::config::Config;
use crate::error::{TilawaError, TilawaResult};
use crate::result::{MatchResult, MatchSource, VerseLocator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Instruction sent as the system message
pub const SYSTEM_PROMPT: &str = "أنت خبير في القرآن الكريم. ستتلقى نصًا مُفرَّغًا من تلاوة صوتية وقد يحتوي على أخطاء في التفريغ. \
حدّد السورة والآية أو الآيات المقصودة. \
أعد كائن JSON فقط بالمفاتيح التالية: \
\"surah\" (اسم السورة بالإملاء القياسي مثل \"البقرة\")، \
\"ayah\" (رقم الآية إن كانت آية واحدة) أو \"ayahStart\" و\"ayahEnd\" (لنطاق من الآيات)، \
\"arabic\" (نص الآيات المطابقة)، \
\"translation\" (ترجمة إنجليزية للآيات). \
لا تكتب أي شرح أو نص خارج JSON.";

/// Something that can name the passage behind a transcript
#[async_trait]
pub trait PassageIdentifier: Send + Sync {
    /// `Ok(None)` when the service answered but the answer was unusable.
    async fn identify(&self, transcript: &str) -> TilawaResult<Option<MatchResult>>;

    fn name(&self) -> &str;
}

#[derive(Serialize)]
struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    temperature: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Chat-completion backed identifier
pub struct RemoteIdentifier {
    client: reqwest::Client,
    url: String,
    model: Option<String>,
    api_key: Option<String>,
}

impl RemoteIdentifier {
    pub fn new(config: &Config) -> TilawaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.remote_url.clone(),
            model: config.remote_model.clone(),
            api_key: config.remote_api_key.clone(),
        })
    }

    fn build_request(&self, transcript: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            temperature: 0,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: format!(
                        "Transcript (Arabic):\n{transcript}\nRespond with JSON only."
                    ),
                },
            ],
        }
    }
}

#[async_trait]
impl PassageIdentifier for RemoteIdentifier {
    async fn identify(&self, transcript: &str) -> TilawaResult<Option<MatchResult>> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&self.build_request(transcript));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TilawaError::RemoteService(e.to_string()))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| TilawaError::RemoteService(e.to_string()))?;

        if !status.is_success() {
            warn!("❌ Remote identifier error ({}): {}", status, body_text);
            return Err(TilawaError::RemoteService(format!("HTTP {status}")));
        }

        debug!("🧠 Remote raw body: {}", body_text);

        let chat: ChatResponse = match serde_json::from_str(&body_text) {
            Ok(r) => r,
            Err(e) => {
                warn!("❌ Failed to deserialize remote response: {}", e);
                return Ok(None);
            }
        };

        let Some(content) = chat.choices.into_iter().next().map(|c| c.message.content) else {
            warn!("❌ Remote response had no choices");
            return Ok(None);
        };

        let result = parse_identification(&content);
        if let Some(found) = &result {
            info!(
                "🌐 Remote match: {} {}",
                found.chapter_name,
                found.label()
            );
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "chat-completion"
    }
}

/// Parse the model's reply into a result
pub fn parse_identification(content: &str) -> Option<MatchResult> {
    let Some(json_str) = extract_json_object(content) else {
        debug!("No JSON object found in remote reply: {}", content);
        return None;
    };

    match serde_json::from_str::<Value>(json_str) {
        Ok(value) => canonicalize(&value),
        Err(e) => {
            warn!("❌ Failed to parse remote JSON: {} - Raw: {}", e, json_str);
            None
        }
    }
}

/// First balanced top-level `{...}` block, ignoring braces inside strings
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Reduce the service's loosely-shaped object to a `MatchResult`.
///
/// Key aliases are accepted per field; a chapter is required. Verse locator
/// priority is list, then range, then single verse.
pub fn canonicalize(value: &Value) -> Option<MatchResult> {
    let obj = value.as_object()?;

    let chapter = lookup(obj, &["surah", "chapter", "surahName", "chapterName"])?;
    let (surah_name, chapter_number) = match chapter {
        Value::String(name) if !name.trim().is_empty() => {
            let name = name.trim().to_string();
            let number = resolve_chapter_number(&name);
            (name, number)
        }
        other => {
            let number = coerce_int(other).filter(|n| (1..=114).contains(n))?;
            (chapter_name(number)?.to_string(), number)
        }
    };

    let list: Vec<u32> = lookup(obj, &["ayahs", "verses", "verseNumbers"])
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(coerce_int)
                .filter(|n| *n > 0)
                .collect()
        })
        .unwrap_or_default();
    let start = lookup_int(obj, &["ayahStart", "verseStart"]);
    let end = lookup_int(obj, &["ayahEnd", "verseEnd"]);
    let single = lookup_int(obj, &["ayah", "verse"]);

    let locator = if !list.is_empty() {
        VerseLocator::List(list)
    } else if start > 0 && end > 0 {
        VerseLocator::Range {
            start: start.min(end),
            end: start.max(end),
        }
    } else {
        VerseLocator::Single(single)
    };

    Some(MatchResult {
        chapter_name: surah_name,
        chapter_number,
        text: lookup_str(obj, &["arabic", "text"]),
        translation: lookup_str(obj, &["translation"]),
        locator,
        score: None,
        source: MatchSource::Remote,
    })
}

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

fn lookup_int(obj: &Map<String, Value>, keys: &[&str]) -> u32 {
    lookup(obj, keys).and_then(coerce_int).unwrap_or(0)
}

fn lookup_str(obj: &Map<String, Value>, keys: &[&str]) -> String {
    lookup(obj, keys)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Integer from a JSON number or a numeric-looking string
fn coerce_int(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            // Arabic-Indic digits are common in replies written in Arabic
            let ascii: String = s
                .trim()
                .chars()
                .map(|c| match c {
                    '\u{0660}'..='\u{0669}' => {
                        char::from(b'0' + (c as u32 - 0x0660) as u8)
                    }
                    _ => c,
                })
                .collect();
            ascii
                .parse::<u32>()
                .ok()
                .or_else(|| ascii.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u32))
        }
        _ => None,
    }
}
