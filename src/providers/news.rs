//! News retrieval
//!
//! Top headlines for one of the seven fixed categories, via the NewsAPI
//! top-headlines endpoint.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Error, Result};

/// The fixed set of requestable headline categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsCategory {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl NewsCategory {
    /// All categories, in spoken-prompt order
    pub const ALL: [Self; 7] = [
        Self::Business,
        Self::Entertainment,
        Self::General,
        Self::Health,
        Self::Science,
        Self::Sports,
        Self::Technology,
    ];

    /// Wire / spoken name of the category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::General => "general",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| Error::InvalidCategory(s.trim().to_string()))
    }
}

/// One headline
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    /// Headline title
    #[serde(default)]
    pub title: String,

    /// Short description, when the outlet provides one
    #[serde(default)]
    pub description: Option<String>,
}

/// Trait for news collaborators
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch today's top headlines for a category
    ///
    /// # Errors
    ///
    /// Returns error if the news backend fails
    async fn top_headlines(&self, category: NewsCategory) -> Result<Vec<Article>>;
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

/// NewsAPI top-headlines client
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
}

impl NewsApiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("NewsAPI key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn top_headlines(&self, category: NewsCategory) -> Result<Vec<Article>> {
        let url = format!(
            "https://newsapi.org/v2/top-headlines?category={category}&apiKey={}",
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "chime-assistant/0.1")
            .send()
            .await
            .map_err(|e| Error::News(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::News(format!(
                "headlines endpoint returned {}",
                response.status()
            )));
        }

        let headlines: HeadlinesResponse = response
            .json()
            .await
            .map_err(|e| Error::News(e.to_string()))?;

        tracing::debug!(category = %category, count = headlines.articles.len(), "headlines fetched");
        Ok(headlines.articles)
    }
}
