//! Trader stage artifact.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::enums::TradeDirection;
use super::ArtifactError;

/// Output of the trader stage: concrete price levels for one trade.
///
/// The ordering invariant is enforced by construction and never
/// repaired: for LONG, `stop_loss < entry < take_profits[0] < ...`;
/// for SHORT the strict reverse. `risk_per_share` is always computed
/// from `|entry - stop_loss|`, never supplied by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TradingSetup {
    direction: TradeDirection,
    entry: Decimal,
    stop_loss: Decimal,
    take_profits: Vec<Decimal>,
    risk_per_share: Decimal,
    rationale: String,
    created_at: DateTime<Utc>,
}

impl TradingSetup {
    /// Build a setup, validating the price ordering for its direction.
    ///
    /// # Errors
    ///
    /// Returns an [`ArtifactError`] if the direction is NO_TRADE, any
    /// price is non-positive, the target list is empty, or the levels
    /// are not strictly ordered for the direction. A violating input
    /// is rejected, not reordered: silently "fixing" levels would hide
    /// an upstream reasoning fault.
    pub fn new(
        direction: TradeDirection,
        entry: Decimal,
        stop_loss: Decimal,
        take_profits: Vec<Decimal>,
        rationale: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        if !direction.is_actionable() {
            return Err(ArtifactError::SetupForNoTrade);
        }
        for (label, price) in [("entry", entry), ("stop_loss", stop_loss)] {
            if price <= Decimal::ZERO {
                return Err(ArtifactError::NonPositivePrice {
                    label: label.to_string(),
                    price,
                });
            }
        }
        if take_profits.is_empty() {
            return Err(ArtifactError::EmptyTakeProfits);
        }
        for (i, price) in take_profits.iter().enumerate() {
            if *price <= Decimal::ZERO {
                return Err(ArtifactError::NonPositivePrice {
                    label: format!("take_profits[{i}]"),
                    price: *price,
                });
            }
        }

        Self::check_ordering(direction, entry, stop_loss, &take_profits)?;

        Ok(Self {
            direction,
            entry,
            stop_loss,
            risk_per_share: (entry - stop_loss).abs(),
            take_profits,
            rationale: rationale.into(),
            created_at: Utc::now(),
        })
    }

    fn check_ordering(
        direction: TradeDirection,
        entry: Decimal,
        stop_loss: Decimal,
        take_profits: &[Decimal],
    ) -> Result<(), ArtifactError> {
        let bad = |detail: String| ArtifactError::BadPriceOrdering { direction, detail };

        match direction {
            TradeDirection::Long => {
                if stop_loss >= entry {
                    return Err(bad(format!(
                        "stop_loss {stop_loss} must be below entry {entry}"
                    )));
                }
                let mut prev = entry;
                for (i, tp) in take_profits.iter().enumerate() {
                    if *tp <= prev {
                        return Err(bad(format!(
                            "take_profits[{i}] = {tp} must be above {prev}"
                        )));
                    }
                    prev = *tp;
                }
            }
            TradeDirection::Short => {
                if stop_loss <= entry {
                    return Err(bad(format!(
                        "stop_loss {stop_loss} must be above entry {entry}"
                    )));
                }
                let mut prev = entry;
                for (i, tp) in take_profits.iter().enumerate() {
                    if *tp >= prev {
                        return Err(bad(format!(
                            "take_profits[{i}] = {tp} must be below {prev}"
                        )));
                    }
                    prev = *tp;
                }
            }
            TradeDirection::NoTrade => return Err(ArtifactError::SetupForNoTrade),
        }
        Ok(())
    }

    /// Direction, copied from the analyst recommendation.
    #[must_use]
    pub const fn direction(&self) -> TradeDirection {
        self.direction
    }

    /// Entry price.
    #[must_use]
    pub const fn entry(&self) -> Decimal {
        self.entry
    }

    /// Stop-loss price.
    #[must_use]
    pub const fn stop_loss(&self) -> Decimal {
        self.stop_loss
    }

    /// Take-profit targets, nearest first.
    #[must_use]
    pub fn take_profits(&self) -> &[Decimal] {
        &self.take_profits
    }

    /// Absolute price distance between entry and stop; the monetary
    /// loss per unit if stopped out. Strictly positive by construction.
    #[must_use]
    pub const fn risk_per_share(&self) -> Decimal {
        self.risk_per_share
    }

    /// Reward-to-risk ratio against the first target.
    #[must_use]
    pub fn reward_to_risk(&self) -> Decimal {
        (self.take_profits[0] - self.entry).abs() / self.risk_per_share
    }

    /// Setup justification.
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
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn long(entry: Decimal, stop: Decimal, tps: Vec<Decimal>) -> Result<TradingSetup, ArtifactError> {
        TradingSetup::new(TradeDirection::Long, entry, stop, tps, "test")
    }

    fn short(entry: Decimal, stop: Decimal, tps: Vec<Decimal>) -> Result<TradingSetup, ArtifactError> {
        TradingSetup::new(TradeDirection::Short, entry, stop, tps, "test")
    }

    #[test]
    fn long_setup_computes_risk_per_share() {
        let setup = long(dec!(100), dec!(95), vec![dec!(110), dec!(120)]).unwrap();
        assert_eq!(setup.risk_per_share(), dec!(5));
        assert_eq!(setup.reward_to_risk(), dec!(2));
    }

    #[test]
    fn short_setup_computes_risk_per_share() {
        let setup = short(dec!(200), dec!(210), vec![dec!(180), dec!(170)]).unwrap();
        assert_eq!(setup.risk_per_share(), dec!(10));
        assert_eq!(setup.direction(), TradeDirection::Short);
    }

    // Invalid orderings are rejected, never silently corrected.
    #[test_case(dec!(50), dec!(55), vec![dec!(60)]; "long stop above entry")]
    #[test_case(dec!(50), dec!(50), vec![dec!(60)]; "long stop equals entry")]
    #[test_case(dec!(50), dec!(45), vec![dec!(48)]; "long target below entry")]
    #[test_case(dec!(50), dec!(45), vec![dec!(60), dec!(55)]; "long targets not increasing")]
    fn long_ordering_violations_are_rejected(entry: Decimal, stop: Decimal, tps: Vec<Decimal>) {
        assert!(matches!(
            long(entry, stop, tps),
            Err(ArtifactError::BadPriceOrdering { .. })
        ));
    }

    #[test_case(dec!(50), dec!(45), vec![dec!(40)]; "short stop below entry")]
    #[test_case(dec!(50), dec!(55), vec![dec!(52), dec!(53)]; "short targets not decreasing")]
    fn short_ordering_violations_are_rejected(entry: Decimal, stop: Decimal, tps: Vec<Decimal>) {
        assert!(matches!(
            short(entry, stop, tps),
            Err(ArtifactError::BadPriceOrdering { .. })
        ));
    }

    #[test]
    fn setup_requires_a_target() {
        assert!(matches!(
            long(dec!(100), dec!(95), vec![]),
            Err(ArtifactError::EmptyTakeProfits)
        ));
    }

    #[test]
    fn setup_rejects_no_trade_direction() {
        let err = TradingSetup::new(
            TradeDirection::NoTrade,
            dec!(100),
            dec!(95),
            vec![dec!(110)],
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactError::SetupForNoTrade));
    }

    #[test]
    fn setup_rejects_non_positive_prices() {
        assert!(long(dec!(0), dec!(95), vec![dec!(110)]).is_err());
        assert!(long(dec!(100), dec!(95), vec![dec!(110), dec!(-1)]).is_err());
    }
}
