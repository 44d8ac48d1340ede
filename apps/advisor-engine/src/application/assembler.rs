//! Final plan assembly.
//!
//! The assembler is the last line of defense: it re-checks the
//! cross-artifact invariants the constructors already enforce and
//! renders a deterministic executive summary from the structured
//! fields. It never calls a capability, so its output is reproducible
//! for identical artifacts.

use rust_decimal_macros::dec;

use crate::error::{PipelineError, StageName};
use crate::models::{AnalystRecommendation, CompleteTradePlan, RiskAllocation, TradingSetup};

/// Assembles stage artifacts into a [`CompleteTradePlan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanAssembler;

impl PlanAssembler {
    /// Assemble an actionable plan from all three artifacts.
    ///
    /// # Errors
    ///
    /// Fails closed with a [`PipelineError::Validation`] attributed to
    /// the assembler if the artifacts contradict each other.
    pub fn assemble(
        self,
        symbol: &str,
        analyst: AnalystRecommendation,
        setup: TradingSetup,
        allocation: RiskAllocation,
    ) -> Result<CompleteTradePlan, PipelineError> {
        let summary = Self::summarize(symbol, &analyst, &setup, &allocation);
        CompleteTradePlan::trade(symbol, analyst, setup, allocation, summary)
            .map_err(|e| PipelineError::validation(StageName::Assembler, e.to_string(), None))
    }

    /// Assemble the short-circuit plan for a NO_TRADE recommendation.
    ///
    /// # Errors
    ///
    /// Fails with a [`PipelineError::Validation`] if the
    /// recommendation is actionable.
    pub fn assemble_no_trade(
        self,
        symbol: &str,
        analyst: AnalystRecommendation,
    ) -> Result<CompleteTradePlan, PipelineError> {
        let summary = format!("NO TRADE for {symbol}. {}", analyst.rationale());
        CompleteTradePlan::no_trade(symbol, analyst, summary)
            .map_err(|e| PipelineError::validation(StageName::Assembler, e.to_string(), None))
    }

    fn summarize(
        symbol: &str,
        analyst: &AnalystRecommendation,
        setup: &TradingSetup,
        allocation: &RiskAllocation,
    ) -> String {
        let targets = setup
            .take_profits()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let pct = (allocation.risk_pct() * dec!(100)).normalize();
        let size_line = if allocation.is_unsizeable() {
            "Size: 0 shares (unsizeable at current risk tolerance)".to_string()
        } else {
            format!("Size: {} shares", allocation.position_size())
        };
        format!(
            "{} {} @ {}\nStop loss: {}\nTargets: {}\nRisk: ${} ({}% of equity) | {}\nConviction: {}",
            setup.direction(),
            symbol,
            setup.entry(),
            setup.stop_loss(),
            targets,
            allocation.risk_amount(),
            pct,
            size_line,
            analyst.conviction(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConvictionLevel, TechnicalFactors, TradeDirection};
    use rust_decimal_macros::dec;

    fn analyst(direction: TradeDirection) -> AnalystRecommendation {
        AnalystRecommendation::new(
            direction,
            ConvictionLevel::Medium,
            TechnicalFactors {
                trend: "uptrend".to_string(),
                key_levels: vec![],
                pattern_notes: String::new(),
            },
            "momentum continuation",
        )
        .unwrap()
    }

    fn setup() -> TradingSetup {
        TradingSetup::new(
            TradeDirection::Long,
            dec!(100),
            dec!(95),
            vec![dec!(110), dec!(120)],
            "breakout retest",
        )
        .unwrap()
    }

    fn allocation() -> RiskAllocation {
        RiskAllocation::new(dec!(100000), dec!(0.01), dec!(5), "medium conviction").unwrap()
    }

    #[test]
    fn summary_renders_every_structured_field() {
        let plan = PlanAssembler
            .assemble("AAPL", analyst(TradeDirection::Long), setup(), allocation())
            .unwrap();
        assert_eq!(
            plan.executive_summary(),
            "LONG AAPL @ 100\nStop loss: 95\nTargets: 110, 120\n\
             Risk: $1000.00 (1% of equity) | Size: 200 shares\nConviction: MEDIUM"
        );
    }

    #[test]
    fn summary_is_deterministic_for_identical_artifacts() {
        let a = PlanAssembler
            .assemble("AAPL", analyst(TradeDirection::Long), setup(), allocation())
            .unwrap();
        let b = PlanAssembler
            .assemble("AAPL", analyst(TradeDirection::Long), setup(), allocation())
            .unwrap();
        assert_eq!(a.executive_summary(), b.executive_summary());
        assert_ne!(a.plan_id(), b.plan_id());
    }

    #[test]
    fn unsizeable_allocation_is_called_out_in_the_summary() {
        let allocation =
            RiskAllocation::new(dec!(5000), dec!(0.02), dec!(150), "unsizeable").unwrap();
        let setup = TradingSetup::new(
            TradeDirection::Long,
            dec!(600),
            dec!(450),
            vec![dec!(900)],
            "wide stop",
        )
        .unwrap();
        let plan = PlanAssembler
            .assemble("TSLA", analyst(TradeDirection::Long), setup, allocation)
            .unwrap();
        assert!(plan
            .executive_summary()
            .contains("Size: 0 shares (unsizeable at current risk tolerance)"));
    }

    #[test]
    fn no_trade_summary_carries_the_rationale() {
        let plan = PlanAssembler
            .assemble_no_trade("AAPL", analyst(TradeDirection::NoTrade))
            .unwrap();
        assert_eq!(
            plan.executive_summary(),
            "NO TRADE for AAPL. momentum continuation"
        );
        assert!(!plan.is_actionable());
    }

    #[test]
    fn contradictory_artifacts_fail_closed() {
        let err = PlanAssembler
            .assemble("AAPL", analyst(TradeDirection::NoTrade), setup(), allocation())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                stage: StageName::Assembler,
                ..
            }
        ));
    }
}
