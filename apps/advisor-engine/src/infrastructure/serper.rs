//! Serper research adapter: web search plus page extraction.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{CapabilityError, ResearchClient, SearchSnippet};
use crate::infrastructure::retry::{execute_with_retry, RetryPolicy};

const API_KEY_HEADER: &str = "X-API-KEY";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    markdown: String,
}

/// [`ResearchClient`] implementation over the Serper HTTP API.
#[derive(Debug, Clone)]
pub struct SerperClient {
    http: reqwest::Client,
    api_key: String,
    search_url: String,
    scrape_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl SerperClient {
    /// Build a client. The URLs are overridable so test suites can
    /// point the client at a local server.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        search_url: impl Into<String>,
        scrape_url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            search_url: search_url.into(),
            scrape_url: scrape_url.into(),
            timeout,
            retry,
        }
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<T, CapabilityError> {
        let request = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(&body);
        let response = execute_with_retry(request, self.retry).await?;
        response
            .json()
            .await
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ResearchClient for SerperClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, CapabilityError> {
        let parsed: SearchResponse = self.post(&self.search_url, json!({ "q": query })).await?;
        let snippets = parsed
            .organic
            .into_iter()
            .map(|r| SearchSnippet {
                title: r.title,
                link: r.link,
                snippet: r.snippet,
            })
            .collect::<Vec<_>>();
        tracing::debug!(query, results = snippets.len(), "search complete");
        Ok(snippets)
    }

    async fn scrape(&self, url: &str) -> Result<String, CapabilityError> {
        let parsed: ScrapeResponse = self.post(&self.scrape_url, json!({ "url": url })).await?;
        // Some pages come back only as markdown.
        let text = if parsed.text.is_empty() {
            parsed.markdown
        } else {
            parsed.text
        };
        tracing::debug!(url, text_len = text.len(), "scrape complete");
        Ok(text)
    }
}
