//! Conviction-driven position sizing.
//!
//! Maps a qualitative conviction level to a risk percentage through a
//! discrete three-point table, clamps the result into the hard band
//! [[`MIN_RISK_PCT`], [`MAX_RISK_PCT`]], and floors the position size
//! so the actual risk never exceeds the budget. The mapping table is
//! configurable; the clamp is not.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    ArtifactError, ConvictionLevel, RiskAllocation, TradingSetup, MAX_RISK_PCT, MIN_RISK_PCT,
};

/// Discrete conviction -> risk percentage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvictionTable {
    /// Risk percentage for LOW conviction.
    pub low: Decimal,
    /// Risk percentage for MEDIUM conviction.
    pub medium: Decimal,
    /// Risk percentage for HIGH conviction.
    pub high: Decimal,
}

impl Default for ConvictionTable {
    fn default() -> Self {
        Self {
            low: dec!(0.005),
            medium: dec!(0.01),
            high: dec!(0.02),
        }
    }
}

impl ConvictionTable {
    /// Risk percentage for a conviction level, clamped into the hard
    /// band regardless of what the table holds.
    #[must_use]
    pub fn risk_percentage(&self, conviction: ConvictionLevel) -> Decimal {
        let raw = match conviction {
            ConvictionLevel::Low => self.low,
            ConvictionLevel::Medium => self.medium,
            ConvictionLevel::High => self.high,
        };
        raw.clamp(MIN_RISK_PCT, MAX_RISK_PCT)
    }

    /// Check that the table is monotone in conviction.
    ///
    /// # Errors
    ///
    /// Returns a description of the violation. Clamping alone cannot
    /// repair an inverted table, so an inverted one is a config error.
    pub fn validate(&self) -> Result<(), String> {
        if self.low > self.medium || self.medium > self.high {
            return Err(format!(
                "conviction table must be monotone: low {} <= medium {} <= high {}",
                self.low, self.medium, self.high
            ));
        }
        Ok(())
    }
}

/// Size a position for the setup at the given equity and conviction.
///
/// A zero position size is a valid terminal allocation: the rationale
/// notes the setup is unsizeable at current risk tolerance and the
/// caller decides whether to treat it as effectively NO_TRADE.
///
/// # Errors
///
/// Returns an [`ArtifactError`] if equity is non-positive; other
/// invariants hold by construction of the inputs.
pub fn allocate(
    equity: Decimal,
    conviction: ConvictionLevel,
    setup: &TradingSetup,
    table: &ConvictionTable,
) -> Result<RiskAllocation, ArtifactError> {
    if equity <= Decimal::ZERO {
        return Err(ArtifactError::NonPositiveEquity { equity });
    }

    let risk_pct = table.risk_percentage(conviction);
    let risk_per_share = setup.risk_per_share();
    let risk_amount = equity * risk_pct;
    let position_size = (risk_amount / risk_per_share)
        .floor()
        .to_u64()
        .unwrap_or(0);

    let pct_display = (risk_pct * dec!(100)).normalize();
    let rationale = if position_size == 0 {
        format!(
            "{conviction} conviction allocates {pct_display}% of equity (${risk_amount}), \
             below one unit of risk at ${risk_per_share} per share; \
             setup is unsizeable at current risk tolerance"
        )
    } else {
        format!(
            "{conviction} conviction allocates {pct_display}% of equity: \
             ${risk_amount} budget buys {position_size} units at \
             ${risk_per_share} risk per share"
        )
    };

    RiskAllocation::new(equity, risk_pct, risk_per_share, rationale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeDirection;
    use proptest::prelude::*;

    fn setup(entry: Decimal, stop: Decimal) -> TradingSetup {
        TradingSetup::new(
            TradeDirection::Long,
            entry,
            stop,
            vec![entry + (entry - stop)],
            "test",
        )
        .unwrap()
    }

    #[test]
    fn default_table_maps_the_three_levels() {
        let table = ConvictionTable::default();
        assert_eq!(table.risk_percentage(ConvictionLevel::Low), dec!(0.005));
        assert_eq!(table.risk_percentage(ConvictionLevel::Medium), dec!(0.01));
        assert_eq!(table.risk_percentage(ConvictionLevel::High), dec!(0.02));
    }

    #[test]
    fn table_values_are_clamped_into_the_band() {
        let table = ConvictionTable {
            low: dec!(0.0001),
            medium: dec!(0.01),
            high: dec!(0.5),
        };
        assert_eq!(table.risk_percentage(ConvictionLevel::Low), dec!(0.005));
        assert_eq!(table.risk_percentage(ConvictionLevel::High), dec!(0.02));
    }

    #[test]
    fn inverted_table_fails_validation() {
        let table = ConvictionTable {
            low: dec!(0.02),
            medium: dec!(0.01),
            high: dec!(0.005),
        };
        assert!(table.validate().is_err());
        assert!(ConvictionTable::default().validate().is_ok());
    }

    #[test]
    fn medium_conviction_sizes_two_hundred_shares() {
        let alloc = allocate(
            dec!(100000),
            ConvictionLevel::Medium,
            &setup(dec!(100), dec!(95)),
            &ConvictionTable::default(),
        )
        .unwrap();
        assert_eq!(alloc.risk_amount(), dec!(1000.00));
        assert_eq!(alloc.position_size(), 200);
        assert_eq!(alloc.actual_risk_amount(), dec!(1000));
    }

    #[test]
    fn unsizeable_setup_yields_zero_with_rationale() {
        let alloc = allocate(
            dec!(5000),
            ConvictionLevel::High,
            &setup(dec!(600), dec!(450)),
            &ConvictionTable::default(),
        )
        .unwrap();
        assert_eq!(alloc.position_size(), 0);
        assert!(alloc.rationale().contains("unsizeable"));
    }

    #[test]
    fn allocation_is_deterministic_for_identical_inputs() {
        let s = setup(dec!(100), dec!(95));
        let table = ConvictionTable::default();
        let a = allocate(dec!(100000), ConvictionLevel::Medium, &s, &table).unwrap();
        let b = allocate(dec!(100000), ConvictionLevel::Medium, &s, &table).unwrap();
        assert_eq!(a.risk_pct(), b.risk_pct());
        assert_eq!(a.position_size(), b.position_size());
        assert_eq!(a.actual_risk_amount(), b.actual_risk_amount());
        assert_eq!(a.rationale(), b.rationale());
    }

    proptest! {
        #[test]
        fn risk_pct_stays_in_band_for_any_equity(
            equity in 1u64..10_000_000,
            conviction in prop_oneof![
                Just(ConvictionLevel::Low),
                Just(ConvictionLevel::Medium),
                Just(ConvictionLevel::High),
            ],
        ) {
            let alloc = allocate(
                Decimal::from(equity),
                conviction,
                &setup(dec!(100), dec!(95)),
                &ConvictionTable::default(),
            ).unwrap();
            prop_assert!(alloc.risk_pct() >= MIN_RISK_PCT);
            prop_assert!(alloc.risk_pct() <= MAX_RISK_PCT);
        }

        #[test]
        fn actual_risk_never_exceeds_budget_or_cap(
            equity in 1u64..10_000_000,
            stop_offset in 1u32..5_000,
        ) {
            let entry = dec!(100);
            let stop = entry - Decimal::from(stop_offset) / dec!(100);
            prop_assume!(stop > Decimal::ZERO);
            let alloc = allocate(
                Decimal::from(equity),
                ConvictionLevel::High,
                &setup(entry, stop),
                &ConvictionTable::default(),
            ).unwrap();
            prop_assert!(alloc.actual_risk_amount() <= alloc.risk_amount());
            prop_assert!(alloc.risk_amount() <= Decimal::from(equity) * MAX_RISK_PCT);
        }

        #[test]
        fn mapping_is_monotone_in_conviction(equity in 1u64..1_000_000) {
            let table = ConvictionTable::default();
            let s = setup(dec!(100), dec!(95));
            let low = allocate(Decimal::from(equity), ConvictionLevel::Low, &s, &table).unwrap();
            let medium = allocate(Decimal::from(equity), ConvictionLevel::Medium, &s, &table).unwrap();
            let high = allocate(Decimal::from(equity), ConvictionLevel::High, &s, &table).unwrap();
            prop_assert!(low.risk_pct() <= medium.risk_pct());
            prop_assert!(medium.risk_pct() <= high.risk_pct());
        }
    }
}
