//! Analyst stage: chart + context in, directional call out.

use std::sync::Arc;

use crate::application::ports::{
    AnalysisRequest, CapabilityError, ChartSource, ResearchClient, SearchSnippet, TradeReasoner,
    VisionAnalyzer,
};
use crate::error::{PipelineError, StageName};
use crate::models::{
    AnalystRecommendation, ConvictionLevel, PriceLevel, TechnicalFactors, TradeDirection,
};

/// Default instruction for the vision capability when the caller
/// supplies no focus of their own.
const DEFAULT_CHART_INSTRUCTIONS: &str = "Identify the prevailing trend, key support and \
     resistance levels, chart patterns, and any breakout or breakdown structure visible on \
     this trading chart. Note volume behavior if shown.";

/// Evidence gathered by the analyst stage, propagated to later stages
/// so they can reference the same context.
#[derive(Debug, Clone, Default)]
pub struct ResearchEvidence {
    /// Narrative produced by the vision capability.
    pub chart_narrative: String,
    /// Research snippets gathered for the symbol.
    pub research: Vec<SearchSnippet>,
    /// Scraped article text, when a result was worth following.
    pub scraped: Option<String>,
}

/// The analyst stage result: the artifact plus the evidence behind it.
#[derive(Debug, Clone)]
pub struct AnalystOutcome {
    /// The validated recommendation.
    pub recommendation: AnalystRecommendation,
    /// The evidence it was drawn from.
    pub evidence: ResearchEvidence,
}

/// First stage: produces an [`AnalystRecommendation`] from the chart,
/// the symbol, and whatever research the capabilities turn up.
pub struct AnalystStage {
    vision: Arc<dyn VisionAnalyzer>,
    research: Arc<dyn ResearchClient>,
    reasoner: Arc<dyn TradeReasoner>,
}

impl AnalystStage {
    /// Wire the stage to its capabilities.
    #[must_use]
    pub fn new(
        vision: Arc<dyn VisionAnalyzer>,
        research: Arc<dyn ResearchClient>,
        reasoner: Arc<dyn TradeReasoner>,
    ) -> Self {
        Self {
            vision,
            research,
            reasoner,
        }
    }

    /// Run the stage. Side effects are read-only capability calls; the
    /// two research queries are issued concurrently, but the stage
    /// returns only once all of its calls have completed.
    pub async fn run(
        &self,
        chart: &ChartSource,
        symbol: &str,
        prompt: Option<&str>,
    ) -> Result<AnalystOutcome, PipelineError> {
        let instructions = prompt.map_or_else(
            || DEFAULT_CHART_INSTRUCTIONS.to_string(),
            |p| format!("{DEFAULT_CHART_INSTRUCTIONS}\n\nCaller focus: {p}"),
        );

        let chart_narrative = self
            .vision
            .analyze(chart, &instructions)
            .await
            .map_err(|e| external(e, "vision"))?;
        tracing::debug!(symbol, narrative_len = chart_narrative.len(), "chart analyzed");

        let news_query = format!("{symbol} stock latest news");
        let context_query = format!("{symbol} technical analysis key levels");
        let (news, context) = tokio::join!(
            self.research.search(&news_query),
            self.research.search(&context_query),
        );
        let mut research = news.map_err(|e| external(e, "search"))?;
        research.extend(context.map_err(|e| external(e, "search"))?);

        // Follow the top-ranked result for depth; an empty result set
        // simply means no scrape.
        let scraped = match research.first().map(|s| s.link.clone()) {
            Some(url) if !url.is_empty() => {
                let text = self
                    .research
                    .scrape(&url)
                    .await
                    .map_err(|e| external(e, "scrape"))?;
                (!text.is_empty()).then_some(text)
            }
            _ => None,
        };

        let draft = self
            .reasoner
            .analyze(AnalysisRequest {
                symbol,
                chart_narrative: &chart_narrative,
                research: &research,
                scraped: scraped.as_deref(),
                prompt,
            })
            .await
            .map_err(|e| external(e, "reasoner"))?;

        let offending = serde_json::to_value(&draft).ok();
        let invalid =
            |message: String| PipelineError::validation(StageName::Analyst, message, offending.clone());

        let direction: TradeDirection =
            draft.direction.parse().map_err(|e| invalid(format!("{e}")))?;
        let conviction: ConvictionLevel =
            draft.conviction.parse().map_err(|e| invalid(format!("{e}")))?;

        let mut key_levels = Vec::with_capacity(draft.key_levels.len());
        for level in &draft.key_levels {
            key_levels
                .push(PriceLevel::new(level.price, level.label.clone()).map_err(|e| invalid(e.to_string()))?);
        }

        let factors = TechnicalFactors {
            trend: draft.trend.clone(),
            key_levels,
            pattern_notes: draft.pattern_notes.clone(),
        };

        let recommendation =
            AnalystRecommendation::new(direction, conviction, factors, draft.rationale.clone())
                .map_err(|e| invalid(e.to_string()))?;

        tracing::info!(
            symbol,
            direction = %recommendation.direction(),
            conviction = %recommendation.conviction(),
            "analyst stage complete"
        );

        Ok(AnalystOutcome {
            recommendation,
            evidence: ResearchEvidence {
                chart_narrative,
                research,
                scraped,
            },
        })
    }
}

fn external(err: CapabilityError, capability: &'static str) -> PipelineError {
    PipelineError::external(StageName::Analyst, capability, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SetupRequest;
    use crate::models::{AnalystDraft, SetupDraft};
    use async_trait::async_trait;

    struct FixtureVision;

    #[async_trait]
    impl VisionAnalyzer for FixtureVision {
        async fn analyze(
            &self,
            _chart: &ChartSource,
            _instructions: &str,
        ) -> Result<String, CapabilityError> {
            Ok("uptrend with higher lows".to_string())
        }
    }

    struct EmptyResearch;

    #[async_trait]
    impl ResearchClient for EmptyResearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchSnippet>, CapabilityError> {
            Ok(vec![])
        }

        async fn scrape(&self, _url: &str) -> Result<String, CapabilityError> {
            Ok(String::new())
        }
    }

    struct FixtureReasoner {
        draft: AnalystDraft,
    }

    #[async_trait]
    impl TradeReasoner for FixtureReasoner {
        async fn analyze(
            &self,
            _request: AnalysisRequest<'_>,
        ) -> Result<AnalystDraft, CapabilityError> {
            Ok(self.draft.clone())
        }

        async fn plan_setup(
            &self,
            _request: SetupRequest<'_>,
        ) -> Result<SetupDraft, CapabilityError> {
            Err(CapabilityError::InvalidInput("not under test".to_string()))
        }
    }

    fn chart() -> ChartSource {
        ChartSource::Bytes {
            data: vec![1, 2, 3],
            mime: "image/png".to_string(),
        }
    }

    fn draft(direction: &str, conviction: &str, trend: &str) -> AnalystDraft {
        AnalystDraft {
            direction: direction.to_string(),
            conviction: conviction.to_string(),
            trend: trend.to_string(),
            key_levels: vec![],
            pattern_notes: String::new(),
            rationale: "fixture".to_string(),
        }
    }

    fn stage(draft: AnalystDraft) -> AnalystStage {
        AnalystStage::new(
            Arc::new(FixtureVision),
            Arc::new(EmptyResearch),
            Arc::new(FixtureReasoner { draft }),
        )
    }

    #[tokio::test]
    async fn valid_draft_becomes_a_recommendation() {
        let outcome = stage(draft("LONG", "HIGH", "uptrend"))
            .run(&chart(), "AAPL", None)
            .await
            .unwrap();
        assert_eq!(outcome.recommendation.direction(), TradeDirection::Long);
        assert_eq!(outcome.recommendation.conviction(), ConvictionLevel::High);
        assert_eq!(outcome.evidence.chart_narrative, "uptrend with higher lows");
    }

    #[tokio::test]
    async fn out_of_range_conviction_is_a_validation_error() {
        let err = stage(draft("LONG", "EXTREME", "uptrend"))
            .run(&chart(), "AAPL", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                stage: StageName::Analyst,
                ..
            }
        ));
        assert!(err.partial().unwrap().offending.is_some());
    }

    #[tokio::test]
    async fn actionable_draft_without_trend_is_rejected() {
        let err = stage(draft("SHORT", "LOW", ""))
            .run(&chart(), "AAPL", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));
    }

    #[tokio::test]
    async fn vision_failure_is_an_external_service_error() {
        struct FailingVision;

        #[async_trait]
        impl VisionAnalyzer for FailingVision {
            async fn analyze(
                &self,
                _chart: &ChartSource,
                _instructions: &str,
            ) -> Result<String, CapabilityError> {
                Err(CapabilityError::RetriesExhausted {
                    attempts: 3,
                    last: "timed out".to_string(),
                })
            }
        }

        let stage = AnalystStage::new(
            Arc::new(FailingVision),
            Arc::new(EmptyResearch),
            Arc::new(FixtureReasoner {
                draft: draft("LONG", "HIGH", "uptrend"),
            }),
        );
        let err = stage.run(&chart(), "AAPL", None).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ExternalService {
                stage: StageName::Analyst,
                capability: "vision",
                ..
            }
        ));
    }
}
