//! Trade reasoner port.
//!
//! The nondeterministic reasoning engine behind the analyst and trader
//! stages, modeled as an injectable strategy with a fixed
//! request/response contract. Test suites substitute deterministic
//! fixtures implementing the same trait.

use async_trait::async_trait;

use super::research_port::SearchSnippet;
use super::CapabilityError;
use crate::models::{AnalystDraft, AnalystRecommendation, SetupDraft};

/// Evidence handed to the reasoner for the directional call.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    /// Instrument symbol.
    pub symbol: &'a str,
    /// Narrative produced by the vision capability.
    pub chart_narrative: &'a str,
    /// Research snippets gathered for the symbol.
    pub research: &'a [SearchSnippet],
    /// Scraped article text, when a result was worth following.
    pub scraped: Option<&'a str>,
    /// Free-text focus supplied by the caller.
    pub prompt: Option<&'a str>,
}

/// Context handed to the reasoner for the price-level setup.
#[derive(Debug, Clone)]
pub struct SetupRequest<'a> {
    /// Instrument symbol.
    pub symbol: &'a str,
    /// The validated analyst recommendation.
    pub recommendation: &'a AnalystRecommendation,
    /// Narrative produced by the vision capability.
    pub chart_narrative: &'a str,
    /// Free-text focus supplied by the caller.
    pub prompt: Option<&'a str>,
}

/// Opaque reasoning capability producing stage drafts.
#[async_trait]
pub trait TradeReasoner: Send + Sync {
    /// Produce a directional recommendation draft from the evidence.
    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<AnalystDraft, CapabilityError>;

    /// Produce a concrete setup draft for an actionable recommendation.
    async fn plan_setup(&self, request: SetupRequest<'_>) -> Result<SetupDraft, CapabilityError>;
}
