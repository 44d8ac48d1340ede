//! Thin HTTP client for the `generateContent` endpoint.

use std::time::Duration;

use crate::application::ports::CapabilityError;
use crate::infrastructure::retry::{execute_with_retry, RetryPolicy};

use super::api_types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

/// Shared Gemini client; cheap to clone.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl GeminiClient {
    /// Build a client for one model.
    ///
    /// `base_url` carries no trailing slash and is overridable so test
    /// suites can point the client at a local server.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout,
            retry,
        }
    }

    /// Call `generateContent` and return the first candidate's text.
    ///
    /// The per-request timeout bounds each attempt; the retry policy
    /// bounds how many attempts are made.
    ///
    /// # Errors
    ///
    /// Returns a [`CapabilityError`] for transport, HTTP, or
    /// malformed-response failures.
    pub async fn generate(
        &self,
        contents: Vec<Content>,
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, CapabilityError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateContentRequest {
            contents,
            generation_config,
        };

        let request = self.http.post(&url).timeout(self.timeout).json(&body);
        let response = execute_with_retry(request, self.retry).await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))?;
        parsed.first_text().ok_or_else(|| {
            CapabilityError::InvalidResponse("response carried no candidate text".to_string())
        })
    }
}
