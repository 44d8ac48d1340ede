//! Research client port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CapabilityError;

/// One search result snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSnippet {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub link: String,
    /// Extracted snippet text.
    pub snippet: String,
}

/// Internet search and page extraction capability.
///
/// Absence of results is not an error: `search` returns an empty
/// sequence and `scrape` an empty string when nothing was found.
#[async_trait]
pub trait ResearchClient: Send + Sync {
    /// Search the web, returning result snippets in rank order.
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, CapabilityError>;

    /// Extract the readable text of a web page.
    async fn scrape(&self, url: &str) -> Result<String, CapabilityError>;
}
