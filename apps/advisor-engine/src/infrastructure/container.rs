//! Dependency wiring.
//!
//! [`Advisor`] is the composition root: it builds the HTTP adapters
//! from configuration and environment credentials, assembles the
//! stages, and exposes the one entry point callers use. Test suites
//! bypass the HTTP adapters through [`Advisor::with_ports`].

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::application::orchestrator::{PipelineRequest, StageOrchestrator};
use crate::application::ports::{
    AccountInfoProvider, ChartSource, ResearchClient, TradeReasoner, VisionAnalyzer,
};
use crate::application::stages::{AnalystStage, RiskStage, TraderStage};
use crate::config::{require_credentials, Config, ConfigError};
use crate::error::PipelineError;
use crate::infrastructure::account::ExplicitEquityProvider;
use crate::infrastructure::gemini::{GeminiClient, GeminiReasoner, GeminiVision};
use crate::infrastructure::serper::SerperClient;
use crate::models::CompleteTradePlan;
use crate::risk::ConvictionTable;

/// The assembled pipeline, ready to take requests.
pub struct Advisor {
    orchestrator: StageOrchestrator,
}

impl Advisor {
    /// Build the production wiring from configuration and environment
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required credential is missing.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let credentials = require_credentials()?;
        let http = reqwest::Client::new();

        let gemini = GeminiClient::new(
            http.clone(),
            credentials.google_api_key,
            config.gemini.base_url.clone(),
            config.gemini.model.clone(),
            Duration::from_secs(config.gemini.timeout_secs),
            config.gemini.retry.policy(),
        );
        let serper = SerperClient::new(
            http,
            credentials.serper_api_key,
            config.serper.search_url.clone(),
            config.serper.scrape_url.clone(),
            Duration::from_secs(config.serper.timeout_secs),
            config.serper.retry.policy(),
        );

        Ok(Self::with_ports(
            Arc::new(GeminiVision::new(gemini.clone())),
            Arc::new(serper),
            Arc::new(GeminiReasoner::new(gemini)),
            Arc::new(ExplicitEquityProvider),
            config.risk.conviction_table(),
        ))
    }

    /// Build the pipeline from already-constructed ports.
    #[must_use]
    pub fn with_ports(
        vision: Arc<dyn VisionAnalyzer>,
        research: Arc<dyn ResearchClient>,
        reasoner: Arc<dyn TradeReasoner>,
        account: Arc<dyn AccountInfoProvider>,
        table: ConvictionTable,
    ) -> Self {
        let analyst = AnalystStage::new(vision, research, Arc::clone(&reasoner));
        let trader = TraderStage::new(reasoner);
        let risk = RiskStage::new(table);
        Self {
            orchestrator: StageOrchestrator::new(analyst, trader, risk, account),
        }
    }

    /// Run the pipeline for one chart without external cancellation.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] per the taxonomy in [`crate::error`].
    pub async fn submit(
        &self,
        chart: ChartSource,
        symbol: impl Into<String>,
        equity: Option<Decimal>,
        prompt: Option<String>,
    ) -> Result<CompleteTradePlan, PipelineError> {
        let request = PipelineRequest {
            chart,
            symbol: symbol.into(),
            equity,
            prompt,
        };
        self.submit_with_cancellation(&request, &CancellationToken::new())
            .await
    }

    /// Run the pipeline, observing the token at stage boundaries.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] per the taxonomy in [`crate::error`].
    pub async fn submit_with_cancellation(
        &self,
        request: &PipelineRequest,
        cancel: &CancellationToken,
    ) -> Result<CompleteTradePlan, PipelineError> {
        self.orchestrator.run(request, cancel).await
    }
}
