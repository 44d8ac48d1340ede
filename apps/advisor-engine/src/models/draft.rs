//! Loosely-typed drafts returned by the reasoning capability.
//!
//! The reasoner answers with JSON whose enum-like fields arrive as raw
//! strings. Stages parse drafts into validated artifacts; that is
//! where an out-of-range direction or conviction becomes a validation
//! failure instead of being silently defaulted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Draft of an analyst recommendation, prior to validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystDraft {
    /// Directional call as text ("LONG", "SHORT", "NO_TRADE").
    pub direction: String,
    /// Conviction as text ("LOW", "MEDIUM", "HIGH").
    pub conviction: String,
    /// Overall trend assessment.
    #[serde(default)]
    pub trend: String,
    /// Cited support/resistance levels.
    #[serde(default)]
    pub key_levels: Vec<DraftLevel>,
    /// Pattern and structure notes.
    #[serde(default)]
    pub pattern_notes: String,
    /// Concise explanation of the call.
    pub rationale: String,
}

/// A cited price level inside a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftLevel {
    /// The price.
    pub price: Decimal,
    /// What the level is ("support", "resistance", ...).
    pub label: String,
}

/// Draft of a trading setup, prior to validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupDraft {
    /// Directional call as text; must match the analyst direction.
    pub direction: String,
    /// Proposed entry price.
    pub entry: Decimal,
    /// Proposed stop-loss price.
    pub stop_loss: Decimal,
    /// Proposed take-profit targets, nearest first.
    pub take_profits: Vec<Decimal>,
    /// Setup justification.
    pub rationale: String,
}
