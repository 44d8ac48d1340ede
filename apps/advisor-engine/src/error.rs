//! Pipeline error taxonomy.
//!
//! Every failure a caller can observe falls into one of four
//! categories:
//!
//! | Category | Retried | Meaning |
//! |----------|---------|---------|
//! | `Input` | never | Malformed or missing required input |
//! | `ExternalService` | at the capability boundary | A capability call failed after bounded retries |
//! | `Validation` | never | A stage produced an artifact violating an invariant |
//! | `Cancelled` | n/a | The run was cancelled between stages |
//!
//! Capability adapters retry transient failures internally; by the
//! time an error reaches this taxonomy it is terminal for the run.
//! Partial artifacts from completed stages ride along for diagnostics
//! and are never presented as a successful result.

use serde::Serialize;
use thiserror::Error;

use crate::models::{AnalystRecommendation, RiskAllocation, TradingSetup};

/// The pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageName {
    /// Chart analysis and directional call.
    Analyst,
    /// Concrete price-level setup.
    Trader,
    /// Position sizing.
    Risk,
    /// Final plan assembly.
    Assembler,
}

impl StageName {
    /// Stable identifier for logs and error payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analyst => "ANALYST",
            Self::Trader => "TRADER",
            Self::Risk => "RISK",
            Self::Assembler => "ASSEMBLER",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifacts completed before a run aborted, attached to the error for
/// diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PartialArtifacts {
    /// Analyst recommendation, if that stage completed.
    pub analyst: Option<AnalystRecommendation>,
    /// Trading setup, if that stage completed.
    pub setup: Option<TradingSetup>,
    /// Risk allocation, if that stage completed.
    pub allocation: Option<RiskAllocation>,
    /// The offending draft or artifact behind a validation failure.
    pub offending: Option<serde_json::Value>,
}

impl PartialArtifacts {
    /// True when no stage had completed yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.analyst.is_none()
            && self.setup.is_none()
            && self.allocation.is_none()
            && self.offending.is_none()
    }
}

/// Terminal failure of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed or missing required input. Returned immediately,
    /// before any stage runs.
    #[error("invalid input: {message}")]
    Input {
        /// What was wrong with the input.
        message: String,
    },

    /// An external capability failed or timed out after its bounded
    /// retries were exhausted.
    #[error("{capability} capability failed in {stage} stage: {message}")]
    ExternalService {
        /// The stage that issued the call.
        stage: StageName,
        /// The capability that failed ("vision", "search", ...).
        capability: &'static str,
        /// Description of the terminal failure.
        message: String,
        /// Artifacts completed before the failure.
        partial: PartialArtifacts,
    },

    /// A stage output violated an invariant. Indicates an upstream
    /// reasoning fault; never retried.
    #[error("{stage} stage produced an invalid artifact: {message}")]
    Validation {
        /// The stage whose output was rejected.
        stage: StageName,
        /// Which invariant was violated.
        message: String,
        /// Artifacts completed before the failure, plus the offender.
        partial: PartialArtifacts,
    },

    /// The run was cancelled before the named stage started.
    #[error("run cancelled before {stage} stage")]
    Cancelled {
        /// The stage that was about to run.
        stage: StageName,
        /// Artifacts completed before cancellation.
        partial: PartialArtifacts,
    },
}

impl PipelineError {
    /// Input error from any displayable message.
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// External-service error with no completed artifacts yet.
    #[must_use]
    pub fn external(stage: StageName, capability: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            stage,
            capability,
            message: message.into(),
            partial: PartialArtifacts::default(),
        }
    }

    /// Validation error, optionally carrying the offending value.
    #[must_use]
    pub fn validation(
        stage: StageName,
        message: impl Into<String>,
        offending: Option<serde_json::Value>,
    ) -> Self {
        Self::Validation {
            stage,
            message: message.into(),
            partial: PartialArtifacts {
                offending,
                ..PartialArtifacts::default()
            },
        }
    }

    /// The stage the error is attributed to, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<StageName> {
        match self {
            Self::Input { .. } => None,
            Self::ExternalService { stage, .. }
            | Self::Validation { stage, .. }
            | Self::Cancelled { stage, .. } => Some(*stage),
        }
    }

    /// Artifacts completed before the failure, if any were recorded.
    #[must_use]
    pub const fn partial(&self) -> Option<&PartialArtifacts> {
        match self {
            Self::Input { .. } => None,
            Self::ExternalService { partial, .. }
            | Self::Validation { partial, .. }
            | Self::Cancelled { partial, .. } => Some(partial),
        }
    }

    /// Attach completed upstream artifacts to a stage error.
    ///
    /// The orchestrator calls this when propagating a stage failure,
    /// since only the orchestrator holds the accumulated artifacts.
    #[must_use]
    pub fn with_artifacts(
        mut self,
        analyst: Option<&AnalystRecommendation>,
        setup: Option<&TradingSetup>,
        allocation: Option<&RiskAllocation>,
    ) -> Self {
        if let Self::ExternalService { partial, .. }
        | Self::Validation { partial, .. }
        | Self::Cancelled { partial, .. } = &mut self
        {
            partial.analyst = analyst.cloned();
            partial.setup = setup.cloned();
            partial.allocation = allocation.cloned();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConvictionLevel, TechnicalFactors, TradeDirection};

    fn recommendation() -> AnalystRecommendation {
        AnalystRecommendation::new(
            TradeDirection::Long,
            ConvictionLevel::High,
            TechnicalFactors {
                trend: "uptrend".to_string(),
                key_levels: vec![],
                pattern_notes: String::new(),
            },
            "test",
        )
        .unwrap()
    }

    #[test]
    fn errors_name_their_stage() {
        let err = PipelineError::external(StageName::Analyst, "vision", "timed out");
        assert_eq!(err.stage(), Some(StageName::Analyst));
        assert!(err.to_string().contains("vision"));
        assert!(err.to_string().contains("ANALYST"));
    }

    #[test]
    fn input_errors_have_no_stage_or_artifacts() {
        let err = PipelineError::input("empty symbol");
        assert_eq!(err.stage(), None);
        assert!(err.partial().is_none());
    }

    #[test]
    fn with_artifacts_attaches_completed_stages() {
        let err = PipelineError::validation(StageName::Trader, "bad ordering", None)
            .with_artifacts(Some(&recommendation()), None, None);
        let partial = err.partial().unwrap();
        assert!(partial.analyst.is_some());
        assert!(partial.setup.is_none());
    }

    #[test]
    fn validation_errors_keep_the_offending_value() {
        let offending = serde_json::json!({"direction": "SIDEWAYS"});
        let err =
            PipelineError::validation(StageName::Analyst, "bad direction", Some(offending.clone()));
        assert_eq!(err.partial().unwrap().offending, Some(offending));
    }
}
