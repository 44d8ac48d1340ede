//! Analyst stage artifact.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::enums::{ConvictionLevel, TradeDirection};
use super::factors::TechnicalFactors;
use super::ArtifactError;

/// Output of the analyst stage: a directional call with conviction and
/// the technical evidence behind it.
///
/// A NO_TRADE recommendation still carries conviction and factors, but
/// the trader and risk stages must not run for it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystRecommendation {
    direction: TradeDirection,
    conviction: ConvictionLevel,
    technical_factors: TechnicalFactors,
    rationale: String,
    created_at: DateTime<Utc>,
}

impl AnalystRecommendation {
    /// Build a recommendation, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::EmptyTrend`] if the direction is
    /// actionable but the trend assessment is blank.
    pub fn new(
        direction: TradeDirection,
        conviction: ConvictionLevel,
        technical_factors: TechnicalFactors,
        rationale: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        if direction.is_actionable() && technical_factors.trend.trim().is_empty() {
            return Err(ArtifactError::EmptyTrend);
        }
        Ok(Self {
            direction,
            conviction,
            technical_factors,
            rationale: rationale.into(),
            created_at: Utc::now(),
        })
    }

    /// The directional call.
    #[must_use]
    pub const fn direction(&self) -> TradeDirection {
        self.direction
    }

    /// The conviction level behind the call.
    #[must_use]
    pub const fn conviction(&self) -> ConvictionLevel {
        self.conviction
    }

    /// Supporting technical factors.
    #[must_use]
    pub const fn technical_factors(&self) -> &TechnicalFactors {
        &self.technical_factors
    }

    /// Concise explanation of the recommendation.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(trend: &str) -> TechnicalFactors {
        TechnicalFactors {
            trend: trend.to_string(),
            key_levels: vec![],
            pattern_notes: String::new(),
        }
    }

    #[test]
    fn actionable_recommendation_requires_trend() {
        let err = AnalystRecommendation::new(
            TradeDirection::Long,
            ConvictionLevel::High,
            factors("  "),
            "breakout",
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactError::EmptyTrend));
    }

    #[test]
    fn no_trade_recommendation_allows_empty_trend() {
        let rec = AnalystRecommendation::new(
            TradeDirection::NoTrade,
            ConvictionLevel::Low,
            factors(""),
            "chop, no edge",
        )
        .unwrap();
        assert_eq!(rec.direction(), TradeDirection::NoTrade);
        assert_eq!(rec.conviction(), ConvictionLevel::Low);
    }

    #[test]
    fn recommendation_carries_its_evidence() {
        let rec = AnalystRecommendation::new(
            TradeDirection::Short,
            ConvictionLevel::Medium,
            factors("downtrend"),
            "lower highs into resistance",
        )
        .unwrap();
        assert_eq!(rec.technical_factors().trend, "downtrend");
        assert_eq!(rec.rationale(), "lower highs into resistance");
    }
}
