//! Trader stage: directional call in, concrete price levels out.

use std::sync::Arc;

use crate::application::ports::{SetupRequest, TradeReasoner};
use crate::error::{PipelineError, StageName};
use crate::models::{AnalystRecommendation, TradeDirection, TradingSetup};

/// Second stage: turns an actionable recommendation into a
/// [`TradingSetup`] with validated price levels.
pub struct TraderStage {
    reasoner: Arc<dyn TradeReasoner>,
}

impl TraderStage {
    /// Wire the stage to its reasoning capability.
    #[must_use]
    pub fn new(reasoner: Arc<dyn TradeReasoner>) -> Self {
        Self { reasoner }
    }

    /// Run the stage.
    ///
    /// The orchestrator short-circuits NO_TRADE before this stage; a
    /// NO_TRADE recommendation arriving here is an invariant breach
    /// and is rejected rather than planned around.
    pub async fn run(
        &self,
        symbol: &str,
        recommendation: &AnalystRecommendation,
        chart_narrative: &str,
        prompt: Option<&str>,
    ) -> Result<TradingSetup, PipelineError> {
        if !recommendation.direction().is_actionable() {
            tracing::error!(symbol, "trader stage invoked for NO_TRADE recommendation");
            return Err(PipelineError::validation(
                StageName::Trader,
                "cannot plan a setup for a NO_TRADE recommendation",
                serde_json::to_value(recommendation).ok(),
            ));
        }

        let draft = self
            .reasoner
            .plan_setup(SetupRequest {
                symbol,
                recommendation,
                chart_narrative,
                prompt,
            })
            .await
            .map_err(|e| PipelineError::external(StageName::Trader, "reasoner", e.to_string()))?;

        let offending = serde_json::to_value(&draft).ok();
        let invalid =
            |message: String| PipelineError::validation(StageName::Trader, message, offending.clone());

        let direction: TradeDirection =
            draft.direction.parse().map_err(|e| invalid(format!("{e}")))?;
        if direction != recommendation.direction() {
            return Err(invalid(format!(
                "setup direction {direction} contradicts analyst direction {}",
                recommendation.direction()
            )));
        }

        let setup = TradingSetup::new(
            direction,
            draft.entry,
            draft.stop_loss,
            draft.take_profits.clone(),
            draft.rationale.clone(),
        )
        .map_err(|e| invalid(e.to_string()))?;

        tracing::info!(
            symbol,
            direction = %setup.direction(),
            entry = %setup.entry(),
            stop_loss = %setup.stop_loss(),
            risk_per_share = %setup.risk_per_share(),
            "trader stage complete"
        );
        Ok(setup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AnalysisRequest, CapabilityError};
    use crate::models::{AnalystDraft, ConvictionLevel, SetupDraft, TechnicalFactors};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct FixtureReasoner {
        draft: SetupDraft,
    }

    #[async_trait]
    impl TradeReasoner for FixtureReasoner {
        async fn analyze(
            &self,
            _request: AnalysisRequest<'_>,
        ) -> Result<AnalystDraft, CapabilityError> {
            Err(CapabilityError::InvalidInput("not under test".to_string()))
        }

        async fn plan_setup(
            &self,
            _request: SetupRequest<'_>,
        ) -> Result<SetupDraft, CapabilityError> {
            Ok(self.draft.clone())
        }
    }

    fn recommendation(direction: TradeDirection) -> AnalystRecommendation {
        AnalystRecommendation::new(
            direction,
            ConvictionLevel::Medium,
            TechnicalFactors {
                trend: "uptrend".to_string(),
                key_levels: vec![],
                pattern_notes: String::new(),
            },
            "fixture",
        )
        .unwrap()
    }

    fn stage(draft: SetupDraft) -> TraderStage {
        TraderStage::new(Arc::new(FixtureReasoner { draft }))
    }

    #[tokio::test]
    async fn valid_draft_becomes_a_setup() {
        let setup = stage(SetupDraft {
            direction: "LONG".to_string(),
            entry: dec!(100),
            stop_loss: dec!(95),
            take_profits: vec![dec!(110), dec!(120)],
            rationale: "breakout".to_string(),
        })
        .run("AAPL", &recommendation(TradeDirection::Long), "narrative", None)
        .await
        .unwrap();
        assert_eq!(setup.risk_per_share(), dec!(5));
    }

    #[tokio::test]
    async fn inverted_stop_is_a_validation_error_with_the_draft_attached() {
        let err = stage(SetupDraft {
            direction: "LONG".to_string(),
            entry: dec!(50),
            stop_loss: dec!(55),
            take_profits: vec![dec!(60)],
            rationale: "inverted".to_string(),
        })
        .run("AAPL", &recommendation(TradeDirection::Long), "narrative", None)
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                stage: StageName::Trader,
                ..
            }
        ));
        assert!(err.partial().unwrap().offending.is_some());
    }

    #[tokio::test]
    async fn direction_mismatch_is_rejected() {
        let err = stage(SetupDraft {
            direction: "SHORT".to_string(),
            entry: dec!(100),
            stop_loss: dec!(105),
            take_profits: vec![dec!(90)],
            rationale: "flipped".to_string(),
        })
        .run("AAPL", &recommendation(TradeDirection::Long), "narrative", None)
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                stage: StageName::Trader,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn no_trade_recommendation_is_rejected_without_calling_the_reasoner() {
        let err = stage(SetupDraft {
            direction: "LONG".to_string(),
            entry: dec!(100),
            stop_loss: dec!(95),
            take_profits: vec![dec!(110)],
            rationale: "unused".to_string(),
        })
        .run("AAPL", &recommendation(TradeDirection::NoTrade), "narrative", None)
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                stage: StageName::Trader,
                ..
            }
        ));
    }
}
