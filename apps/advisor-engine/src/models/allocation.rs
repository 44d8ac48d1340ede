//! Risk stage artifact.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::ArtifactError;

/// Lower bound of the risk band: 0.5% of equity.
pub const MIN_RISK_PCT: Decimal = dec!(0.005);

/// Upper bound of the risk band: 2.0% of equity.
pub const MAX_RISK_PCT: Decimal = dec!(0.02);

/// Output of the risk stage: a bounded, arithmetically consistent
/// position size.
///
/// `risk_amount = equity * risk_pct`, `position_size =
/// floor(risk_amount / risk_per_share)`, and `actual_risk_amount =
/// position_size * risk_per_share`. The floor guarantees
/// `actual_risk_amount <= risk_amount`. A position size of zero is a
/// valid terminal outcome (setup unsizeable at current risk
/// tolerance), not an error.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAllocation {
    equity: Decimal,
    risk_pct: Decimal,
    risk_amount: Decimal,
    position_size: u64,
    actual_risk_amount: Decimal,
    rationale: String,
    created_at: DateTime<Utc>,
}

impl RiskAllocation {
    /// Build an allocation from equity, a risk percentage, and the
    /// setup's risk per share. All derived fields are computed here so
    /// they cannot drift out of consistency.
    ///
    /// # Errors
    ///
    /// Returns an [`ArtifactError`] if equity or risk per share is
    /// non-positive, or if `risk_pct` lies outside the hard band
    /// [[`MIN_RISK_PCT`], [`MAX_RISK_PCT`]].
    pub fn new(
        equity: Decimal,
        risk_pct: Decimal,
        risk_per_share: Decimal,
        rationale: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        if equity <= Decimal::ZERO {
            return Err(ArtifactError::NonPositiveEquity { equity });
        }
        if risk_pct < MIN_RISK_PCT || risk_pct > MAX_RISK_PCT {
            return Err(ArtifactError::RiskPctOutOfRange {
                risk_pct,
                min: MIN_RISK_PCT,
                max: MAX_RISK_PCT,
            });
        }
        if risk_per_share <= Decimal::ZERO {
            return Err(ArtifactError::NonPositiveRiskPerShare { risk_per_share });
        }

        let risk_amount = equity * risk_pct;
        let position_size = (risk_amount / risk_per_share)
            .floor()
            .to_u64()
            .unwrap_or(0);
        let actual_risk_amount = Decimal::from(position_size) * risk_per_share;

        Ok(Self {
            equity,
            risk_pct,
            risk_amount,
            position_size,
            actual_risk_amount,
            rationale: rationale.into(),
            created_at: Utc::now(),
        })
    }

    /// Account equity the allocation was sized against.
    #[must_use]
    pub const fn equity(&self) -> Decimal {
        self.equity
    }

    /// Risk percentage, within [[`MIN_RISK_PCT`], [`MAX_RISK_PCT`]].
    #[must_use]
    pub const fn risk_pct(&self) -> Decimal {
        self.risk_pct
    }

    /// Budgeted dollar risk: `equity * risk_pct`.
    #[must_use]
    pub const fn risk_amount(&self) -> Decimal {
        self.risk_amount
    }

    /// Number of units sized so a stop-out loses at most the budget.
    #[must_use]
    pub const fn position_size(&self) -> u64 {
        self.position_size
    }

    /// Dollar risk actually taken: `position_size * risk_per_share`.
    #[must_use]
    pub const fn actual_risk_amount(&self) -> Decimal {
        self.actual_risk_amount
    }

    /// True when the risk budget buys less than one unit of risk.
    #[must_use]
    pub const fn is_unsizeable(&self) -> bool {
        self.position_size == 0
    }

    /// Risk allocation reasoning.
    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// When this artifact was produced.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
