//! Trade reasoner backed by Gemini in JSON mode.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt::Write as _;

use crate::application::ports::{AnalysisRequest, CapabilityError, SetupRequest, TradeReasoner};
use crate::models::{AnalystDraft, SetupDraft};

use super::api_types::{Content, GenerationConfig, Part};
use super::client::GeminiClient;

/// Scraped article text embedded in a prompt is cut at this length.
const SCRAPED_TEXT_LIMIT: usize = 4000;

/// Decoding temperature; low because the drafts feed strict validators.
const TEMPERATURE: f32 = 0.2;

const ANALYST_PROMPT: &str = "You are a technical analyst. Given a chart description and \
research context, decide whether the instrument sets up LONG, SHORT, or NO_TRADE, and how \
much conviction the evidence supports.\n\
Respond with a single JSON object and nothing else:\n\
{\n\
  \"direction\": \"LONG\" | \"SHORT\" | \"NO_TRADE\",\n\
  \"conviction\": \"LOW\" | \"MEDIUM\" | \"HIGH\",\n\
  \"trend\": \"<one-line trend description>\",\n\
  \"key_levels\": [{\"price\": <number>, \"label\": \"<support/resistance note>\"}],\n\
  \"pattern_notes\": \"<chart patterns observed>\",\n\
  \"rationale\": \"<why this call>\"\n\
}\n\
If the evidence is mixed or the chart is unreadable, choose NO_TRADE and explain why in \
the rationale.";

const SETUP_PROMPT: &str = "You are a trader turning an analyst call into concrete price \
levels. Keep the analyst's direction; never flip it.\n\
Respond with a single JSON object and nothing else:\n\
{\n\
  \"direction\": \"LONG\" | \"SHORT\",\n\
  \"entry\": <number>,\n\
  \"stop_loss\": <number>,\n\
  \"take_profits\": [<number>, ...],\n\
  \"rationale\": \"<why these levels>\"\n\
}\n\
For LONG the stop loss sits below the entry and targets ascend above it; for SHORT the \
stop loss sits above the entry and targets descend below it.";

/// [`TradeReasoner`] implementation producing stage drafts.
#[derive(Debug, Clone)]
pub struct GeminiReasoner {
    client: GeminiClient,
}

impl GeminiReasoner {
    /// Wrap a client.
    #[must_use]
    pub const fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    async fn generate_draft<T: DeserializeOwned>(
        &self,
        system: &str,
        user: String,
    ) -> Result<T, CapabilityError> {
        let contents = vec![Content {
            parts: vec![Part::text(system), Part::text(user)],
        }];
        let config = GenerationConfig {
            temperature: Some(TEMPERATURE),
            response_mime_type: Some("application/json".to_string()),
        };
        let text = self.client.generate(contents, Some(config)).await?;
        serde_json::from_str(extract_json(&text)).map_err(|e| {
            CapabilityError::InvalidResponse(format!("draft is not the expected JSON: {e}"))
        })
    }
}

#[async_trait]
impl TradeReasoner for GeminiReasoner {
    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<AnalystDraft, CapabilityError> {
        let mut user = format!(
            "Symbol: {}\n\nChart description:\n{}\n",
            request.symbol, request.chart_narrative
        );
        if !request.research.is_empty() {
            user.push_str("\nResearch snippets:\n");
            for snippet in request.research {
                let _ = writeln!(user, "- {}: {}", snippet.title, snippet.snippet);
            }
        }
        if let Some(scraped) = request.scraped {
            let excerpt = truncate(scraped, SCRAPED_TEXT_LIMIT);
            let _ = write!(user, "\nArticle excerpt:\n{excerpt}\n");
        }
        if let Some(prompt) = request.prompt {
            let _ = write!(user, "\nCaller focus: {prompt}\n");
        }
        self.generate_draft(ANALYST_PROMPT, user).await
    }

    async fn plan_setup(&self, request: SetupRequest<'_>) -> Result<SetupDraft, CapabilityError> {
        let recommendation = request.recommendation;
        let mut user = format!(
            "Symbol: {}\nAnalyst direction: {}\nAnalyst conviction: {}\nAnalyst rationale: {}\n\n\
             Chart description:\n{}\n",
            request.symbol,
            recommendation.direction(),
            recommendation.conviction(),
            recommendation.rationale(),
            request.chart_narrative,
        );
        if let Some(prompt) = request.prompt {
            let _ = write!(user, "\nCaller focus: {prompt}\n");
        }
        self.generate_draft(SETUP_PROMPT, user).await
    }
}

/// Strip markdown code fences some responses wrap around the JSON.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim().strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut cut = limit;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}
