//! Knowledge lookup with caching
//!
//! Topics resolve through the summary collaborator once, then out of an
//! in-process cache for the rest of the session. The cache is unbounded —
//! acceptable for an interactive assistant's lifetime, a known soft bound.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Error, Result};

/// Sentence budget requested from the summary collaborator
const SUMMARY_SENTENCES: usize = 2;

/// Trait for knowledge-summary collaborators
#[async_trait]
pub trait KnowledgeSummarizer: Send + Sync {
    /// Summarize a topic in at most `max_sentences` sentences
    ///
    /// # Errors
    ///
    /// Returns [`Error::LookupNotFound`] for ambiguous or missing topics
    /// and [`Error::LookupFailed`] for any other collaborator failure
    async fn summarize(&self, topic: &str, max_sentences: usize) -> Result<String>;
}

/// Wikipedia page-summary response
#[derive(serde::Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Summarizer backed by the Wikipedia REST summary endpoint
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    /// Create a client against the public English Wikipedia
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url("https://en.wikipedia.org/api/rest_v1")
    }

    /// Create a client against a custom endpoint (used by tests)
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeSummarizer for WikipediaClient {
    async fn summarize(&self, topic: &str, max_sentences: usize) -> Result<String> {
        let url = format!(
            "{}/page/summary/{}",
            self.base_url,
            urlencoding::encode(topic)
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "chime-assistant/0.1")
            .send()
            .await
            .map_err(|e| Error::LookupFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::LookupNotFound(topic.to_string()));
        }

        if !response.status().is_success() {
            return Err(Error::LookupFailed(format!(
                "summary endpoint returned {}",
                response.status()
            )));
        }

        let summary: PageSummary = response
            .json()
            .await
            .map_err(|e| Error::LookupFailed(e.to_string()))?;

        // Disambiguation pages carry no usable summary
        if summary.kind == "disambiguation" || summary.extract.is_empty() {
            return Err(Error::LookupNotFound(topic.to_string()));
        }

        Ok(truncate_sentences(&summary.extract, max_sentences))
    }
}

/// Keep at most `max` sentences of `text`
fn truncate_sentences(text: &str, max: usize) -> String {
    let mut end = text.len();
    let mut count = 0;

    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            count += 1;
            if count == max {
                end = i + c.len_utf8();
                break;
            }
        }
    }

    text[..end].trim().to_string()
}

/// Cached lookup front-end, owned per session
pub struct KnowledgeLookup {
    summarizer: Arc<dyn KnowledgeSummarizer>,
    cache: RwLock<HashMap<String, String>>,
}

impl KnowledgeLookup {
    /// Create an empty-cache lookup over the given summarizer
    #[must_use]
    pub fn new(summarizer: Arc<dyn KnowledgeSummarizer>) -> Self {
        Self {
            summarizer,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a topic, serving repeats from the cache.
    ///
    /// Cache keys are the topic as extracted (case/whitespace-sensitive
    /// beyond the transcript's own normalization). First write wins: a
    /// concurrent lookup that raced us keeps the summary it already
    /// returned.
    ///
    /// # Errors
    ///
    /// Propagates the summarizer's `LookupNotFound` / `LookupFailed`
    pub async fn lookup(&self, topic: &str) -> Result<String> {
        if let Some(hit) = self.cache.read().await.get(topic) {
            tracing::debug!(topic, "knowledge cache hit");
            return Ok(hit.clone());
        }

        let summary = self.summarizer.summarize(topic, SUMMARY_SENTENCES).await?;

        let mut cache = self.cache.write().await;
        let stored = cache
            .entry(topic.to_string())
            .or_insert(summary)
            .clone();

        tracing::debug!(topic, "knowledge cached");
        Ok(stored)
    }

    /// Number of cached topics
    pub async fn cached_topics(&self) -> usize {
        self.cache.read().await.len()
    }
}
