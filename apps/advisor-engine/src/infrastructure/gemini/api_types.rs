//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents; a single user turn for this adapter.
    pub contents: Vec<Content>,
    /// Decoding parameters, omitted when defaults suffice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    /// Ordered parts of the turn.
    pub parts: Vec<Part>,
}

/// One part of a turn: text or inline binary data.
#[derive(Debug, Clone, Serialize)]
pub struct Part {
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline-data part from already-encoded base64.
    #[must_use]
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded binary payload.
#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    /// MIME type of the payload.
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Decoding parameters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Forces the response into this MIME type; `application/json`
    /// turns on JSON mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Response body for `generateContent`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    /// Completion candidates; the first is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One completion candidate.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    /// Candidate content; may be absent when generation was blocked.
    pub content: Option<CandidateContent>,
}

/// Content of a completion candidate.
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    /// Parts of the candidate.
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// One part of a candidate.
#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    /// Text content of the part.
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` when the
    /// response carried no usable text.
    #[must_use]
    pub fn first_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only_parts_omit_inline_data() {
        let json = serde_json::to_value(Part::text("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hello"}));
    }

    #[test]
    fn inline_data_serializes_mime_and_payload() {
        let json = serde_json::to_value(Part::inline_data("image/png", "QUJD")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"inline_data": {"mime_type": "image/png", "data": "QUJD"}})
        );
    }

    #[test]
    fn first_text_joins_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "up"}, {"text": "trend"}]}}]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("uptrend"));
    }

    #[test]
    fn blocked_response_yields_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": [{}]})).unwrap();
        assert!(response.first_text().is_none());
    }
}
