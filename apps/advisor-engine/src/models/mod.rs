//! Stage artifact types shared across the pipeline.
//!
//! Artifacts are immutable once produced: constructors validate every
//! invariant, fields are private, and reads go through accessors. A
//! rejected artifact surfaces as an [`ArtifactError`] which the owning
//! stage classifies into the pipeline error taxonomy.

mod allocation;
mod analyst;
mod draft;
mod enums;
mod factors;
mod plan;
mod setup;

pub use allocation::{MAX_RISK_PCT, MIN_RISK_PCT, RiskAllocation};
pub use analyst::AnalystRecommendation;
pub use draft::{AnalystDraft, DraftLevel, SetupDraft};
pub use enums::{ConvictionLevel, ParseEnumError, TradeDirection};
pub use factors::{PriceLevel, TechnicalFactors};
pub use plan::CompleteTradePlan;
pub use setup::TradingSetup;

use rust_decimal::Decimal;

/// Violation of an artifact invariant.
///
/// Indicates an upstream reasoning fault, never a transient condition;
/// the run aborts rather than silently repairing the artifact.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtifactError {
    /// A price level must be strictly positive.
    #[error("price for '{label}' must be positive, got {price}")]
    NonPositivePrice {
        /// Label of the offending level.
        label: String,
        /// The rejected price.
        price: Decimal,
    },

    /// An actionable recommendation requires a trend assessment.
    #[error("technical factors must name a trend for an actionable recommendation")]
    EmptyTrend,

    /// A setup needs at least one take-profit target.
    #[error("trading setup requires at least one take-profit target")]
    EmptyTakeProfits,

    /// A setup was requested for a NO_TRADE recommendation.
    #[error("trading setup cannot be built for a NO_TRADE direction")]
    SetupForNoTrade,

    /// Stop loss, entry, and targets are not strictly ordered for the direction.
    #[error("{direction} setup violates price ordering: {detail}")]
    BadPriceOrdering {
        /// The setup direction.
        direction: TradeDirection,
        /// Which comparison failed.
        detail: String,
    },

    /// Setup direction does not match the analyst recommendation.
    #[error("setup direction {setup} does not match analyst direction {analyst}")]
    DirectionMismatch {
        /// Direction from the analyst recommendation.
        analyst: TradeDirection,
        /// Direction on the setup.
        setup: TradeDirection,
    },

    /// Account equity must be strictly positive.
    #[error("account equity must be positive, got {equity}")]
    NonPositiveEquity {
        /// The rejected equity.
        equity: Decimal,
    },

    /// Risk percentage escaped the hard clamp band.
    #[error("risk percentage {risk_pct} is outside [{min}, {max}]")]
    RiskPctOutOfRange {
        /// The rejected percentage.
        risk_pct: Decimal,
        /// Lower bound of the band.
        min: Decimal,
        /// Upper bound of the band.
        max: Decimal,
    },

    /// Risk per share must be strictly positive to size a position.
    #[error("risk per share must be positive, got {risk_per_share}")]
    NonPositiveRiskPerShare {
        /// The rejected distance.
        risk_per_share: Decimal,
    },

    /// Plan aggregate violates the both-or-neither rule.
    #[error("trade plan is inconsistent: {detail}")]
    InconsistentPlan {
        /// Which cross-stage check failed.
        detail: String,
    },
}
