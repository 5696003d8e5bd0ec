//! Word counting and AI keyword generation.
//!
//! The word count is computed locally. Keywords come from an external chat
//! completion endpoint (Gemini's OpenAI-compatible API by default) and are
//! strictly best effort: any failure, including a missing API key, yields an
//! empty keyword list plus an [`AnalysisWarning`] instead of an error.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ExtractedContent;

/// Average reading speed used for `reading_time_minutes`.
const WORDS_PER_MINUTE: usize = 200;

/// Why a result carries no AI keywords.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisWarning {
    /// No API key was supplied, so no request was made
    #[error("no API key configured, AI keywords skipped")]
    MissingApiKey,

    /// The extracted body text is empty
    #[error("no body text to analyze, AI keywords skipped")]
    EmptyBody,

    /// The keyword request exceeded the configured timeout
    #[error("keyword request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    /// The request could not be sent or the connection failed
    #[error("keyword request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx status
    #[error("keyword service returned HTTP {0}")]
    Status(u16),

    /// The reply could not be parsed into a keyword list
    #[error("keyword service returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Configuration for the keyword service.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    pub endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Body text is cut to this many characters before being sent.
    pub max_input_chars: usize,
    /// Maximum number of keywords kept from the response.
    pub max_keywords: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout: 20,
            max_input_chars: 3000,
            max_keywords: 10,
        }
    }
}

/// Output of the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub word_count: usize,
    pub reading_time_minutes: usize,
    pub keywords: Vec<String>,
    #[serde(skip)]
    pub warning: Option<AnalysisWarning>,
}

/// A source of ranked keywords for a piece of text.
#[async_trait]
pub trait KeywordService: Send + Sync {
    /// Returns keywords ordered by relevance, most relevant first.
    async fn suggest_keywords(&self, text: &str, api_key: &str) -> Result<Vec<String>, AnalysisWarning>;
}

/// [`KeywordService`] backed by an OpenAI-compatible chat completion API.
#[derive(Debug, Clone)]
pub struct ChatKeywordService {
    config: AnalyzeConfig,
}

impl ChatKeywordService {
    pub fn new(config: AnalyzeConfig) -> Self {
        Self { config }
    }

    fn prompt(&self, text: &str) -> String {
        format!(
            "Extract up to {} topical keywords from the blog post below, ordered from most to least relevant. \
             Respond with only a JSON array of strings.\n\n{}",
            self.config.max_keywords, text
        )
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl KeywordService for ChatKeywordService {
    #[tracing::instrument(skip_all, fields(chars = text.len()))]
    async fn suggest_keywords(&self, text: &str, api_key: &str) -> Result<Vec<String>, AnalysisWarning> {
        let timeout = self.config.timeout;
        let classify = |e: reqwest::Error| {
            if e.is_timeout() { AnalysisWarning::Timeout { secs: timeout } } else { AnalysisWarning::Request(e.to_string()) }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| AnalysisWarning::Request(e.to_string()))?;

        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "temperature": 0.2,
            "messages": [
                {"role": "system", "content": "You extract SEO keywords from blog posts."},
                {"role": "user", "content": self.prompt(text)},
            ],
        });

        let response = client.post(url).bearer_auth(api_key).json(&body).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisWarning::Status(status.as_u16()));
        }

        let payload: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() { classify(e) } else { AnalysisWarning::MalformedResponse(e.to_string()) }
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AnalysisWarning::MalformedResponse("response has no message content".to_string()))?;

        parse_keywords(&content)
    }
}

/// Computes word counts and, when possible, AI keywords.
pub struct Analyzer {
    config: AnalyzeConfig,
    service: Box<dyn KeywordService>,
}

impl Analyzer {
    /// Creates an analyzer using [`ChatKeywordService`].
    pub fn new(config: AnalyzeConfig) -> Self {
        let service = ChatKeywordService::new(config.clone());
        Self { config, service: Box::new(service) }
    }

    /// Creates an analyzer with a custom keyword source.
    pub fn with_service(config: AnalyzeConfig, service: impl KeywordService + 'static) -> Self {
        Self { config, service: Box::new(service) }
    }

    /// Analyzes extracted content.
    ///
    /// Without `api_key` no request is made. Keyword failures are recorded in
    /// [`AnalysisResult::warning`] and never returned as errors.
    pub async fn analyze(&self, content: &ExtractedContent, api_key: Option<&str>) -> AnalysisResult {
        let word_count = word_count(&content.body_text);
        let reading_time_minutes = word_count.div_ceil(WORDS_PER_MINUTE);

        let keywords = match api_key.map(str::trim).filter(|key| !key.is_empty()) {
            None => Err(AnalysisWarning::MissingApiKey),
            Some(_) if content.body_text.trim().is_empty() => Err(AnalysisWarning::EmptyBody),
            Some(key) => {
                let text = truncate_chars(&content.body_text, self.config.max_input_chars);
                self.service
                    .suggest_keywords(text, key)
                    .await
                    .map(|keywords| normalize_keywords(keywords, self.config.max_keywords))
            }
        };

        let (keywords, warning) = match keywords {
            Ok(keywords) => {
                debug!(count = keywords.len(), "received keywords");
                (keywords, None)
            }
            Err(warning) => {
                warn!(%warning, "continuing without AI keywords");
                (Vec::new(), Some(warning))
            }
        };

        AnalysisResult { word_count, reading_time_minutes, keywords, warning }
    }
}

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parse a model reply into keywords.
///
/// Accepts a JSON array of strings or an object with a `keywords` array,
/// optionally wrapped in a Markdown code fence.
fn parse_keywords(reply: &str) -> Result<Vec<String>, AnalysisWarning> {
    let body = strip_code_fence(reply);
    let value: Value = serde_json::from_str(body).map_err(|e| AnalysisWarning::MalformedResponse(e.to_string()))?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("keywords") {
            Some(Value::Array(items)) => items,
            _ => return Err(AnalysisWarning::MalformedResponse("object has no keywords array".to_string())),
        },
        _ => return Err(AnalysisWarning::MalformedResponse("expected a JSON array of keywords".to_string())),
    };

    Ok(items.iter().filter_map(Value::as_str).map(str::to_string).collect())
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Trim, drop blanks and case-insensitive duplicates, keep rank order.
fn normalize_keywords(keywords: Vec<String>, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| crate::parse::normalize_whitespace(&k))
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .take(max)
        .collect()
}
