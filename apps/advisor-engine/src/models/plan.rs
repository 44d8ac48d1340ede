//! Final aggregate combining all stage artifacts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::allocation::RiskAllocation;
use super::analyst::AnalystRecommendation;
use super::setup::TradingSetup;
use super::ArtifactError;

/// The complete trade plan returned to the caller.
///
/// `setup` and `allocation` are both present or both absent: present
/// exactly when the analyst direction is actionable. The constructors
/// are the only way to build a plan, so an inconsistent aggregate
/// cannot exist.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteTradePlan {
    plan_id: String,
    symbol: String,
    analyst: AnalystRecommendation,
    setup: Option<TradingSetup>,
    allocation: Option<RiskAllocation>,
    executive_summary: String,
    created_at: DateTime<Utc>,
}

impl CompleteTradePlan {
    /// Build an actionable plan from all three artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::InconsistentPlan`] if the analyst
    /// direction is NO_TRADE, or [`ArtifactError::DirectionMismatch`]
    /// if the setup direction disagrees with the analyst.
    pub fn trade(
        symbol: impl Into<String>,
        analyst: AnalystRecommendation,
        setup: TradingSetup,
        allocation: RiskAllocation,
        executive_summary: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        if !analyst.direction().is_actionable() {
            return Err(ArtifactError::InconsistentPlan {
                detail: "setup and allocation attached to a NO_TRADE recommendation".to_string(),
            });
        }
        if setup.direction() != analyst.direction() {
            return Err(ArtifactError::DirectionMismatch {
                analyst: analyst.direction(),
                setup: setup.direction(),
            });
        }
        Ok(Self {
            plan_id: Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            analyst,
            setup: Some(setup),
            allocation: Some(allocation),
            executive_summary: executive_summary.into(),
            created_at: Utc::now(),
        })
    }

    /// Build the short-circuit plan for a NO_TRADE recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::InconsistentPlan`] if the analyst
    /// direction is actionable.
    pub fn no_trade(
        symbol: impl Into<String>,
        analyst: AnalystRecommendation,
        executive_summary: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        if analyst.direction().is_actionable() {
            return Err(ArtifactError::InconsistentPlan {
                detail: "actionable recommendation is missing its setup and allocation"
                    .to_string(),
            });
        }
        Ok(Self {
            plan_id: Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            analyst,
            setup: None,
            allocation: None,
            executive_summary: executive_summary.into(),
            created_at: Utc::now(),
        })
    }

    /// Unique plan identifier.
    #[must_use]
    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }

    /// Instrument symbol the plan covers.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The analyst recommendation.
    #[must_use]
    pub const fn analyst(&self) -> &AnalystRecommendation {
        &self.analyst
    }

    /// The trading setup, absent for NO_TRADE.
    #[must_use]
    pub const fn setup(&self) -> Option<&TradingSetup> {
        self.setup.as_ref()
    }

    /// The risk allocation, absent for NO_TRADE.
    #[must_use]
    pub const fn allocation(&self) -> Option<&RiskAllocation> {
        self.allocation.as_ref()
    }

    /// Deterministic human-readable summary of the structured fields.
    #[must_use]
    pub fn executive_summary(&self) -> &str {
        &self.executive_summary
    }

    /// True when the plan carries an executable setup and allocation.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        self.setup.is_some() && self.allocation.is_some()
    }

    /// When this plan was assembled.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
