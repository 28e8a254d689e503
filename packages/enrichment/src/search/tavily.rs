//! Tavily-backed link search.
//!
//! Only result URLs are needed, so answer and raw-content synthesis are
//! switched off.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::LinkSearcher;
use crate::error::{SearchError, SearchResult};
use crate::security::SecretString;

pub const DEFAULT_TAVILY_API_URL: &str = "https://api.tavily.com";

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
}

pub struct TavilySearcher {
    api_key: SecretString,
    api_url: String,
    client: reqwest::Client,
}

impl TavilySearcher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            api_url: DEFAULT_TAVILY_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point at a different API host (tests, proxies).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LinkSearcher for TavilySearcher {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult<Vec<String>> {
        let request = TavilyRequest {
            query,
            search_depth: "basic",
            include_answer: false,
            include_raw_content: false,
            max_results,
        };

        let response = self
            .client
            .post(format!("{}/search", self.api_url))
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await?;
        let parsed: TavilyResponse = serde_json::from_slice(&body)?;

        tracing::debug!(query, results = parsed.results.len(), "Tavily search complete");

        Ok(parsed.results.into_iter().map(|r| r.url).collect())
    }
}
