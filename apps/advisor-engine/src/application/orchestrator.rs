//! Stage orchestrator.
//!
//! Drives the analyst, trader, and risk stages in order, enforcing the
//! pipeline-level rules the stages cannot see: input validation before
//! any stage runs, the NO_TRADE short-circuit, cancellation checks at
//! stage boundaries, and attachment of completed artifacts to stage
//! failures.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::application::assembler::PlanAssembler;
use crate::application::ports::{AccountInfoProvider, ChartSource};
use crate::application::stages::{AnalystStage, RiskStage, TraderStage};
use crate::error::{PartialArtifacts, PipelineError, StageName};
use crate::models::CompleteTradePlan;

/// One pipeline run's worth of input.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// The chart image to analyze.
    pub chart: ChartSource,
    /// Instrument symbol.
    pub symbol: String,
    /// Account equity override; when absent the account provider
    /// decides whether a run can proceed.
    pub equity: Option<Decimal>,
    /// Optional free-text focus threaded through to the reasoning
    /// capabilities.
    pub prompt: Option<String>,
}

/// Runs the full pipeline for one request.
pub struct StageOrchestrator {
    analyst: AnalystStage,
    trader: TraderStage,
    risk: RiskStage,
    account: Arc<dyn AccountInfoProvider>,
    assembler: PlanAssembler,
}

impl StageOrchestrator {
    /// Wire the orchestrator to its stages.
    #[must_use]
    pub fn new(
        analyst: AnalystStage,
        trader: TraderStage,
        risk: RiskStage,
        account: Arc<dyn AccountInfoProvider>,
    ) -> Self {
        Self {
            analyst,
            trader,
            risk,
            account,
            assembler: PlanAssembler,
        }
    }

    /// Run the pipeline to completion or first terminal error.
    ///
    /// Cancellation is observed between stages: a stage already in
    /// flight runs to completion (its capability calls are bounded by
    /// per-call timeouts), and the run stops before the next stage
    /// starts. Artifacts completed before the failure ride along on
    /// the error.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] per the taxonomy in [`crate::error`].
    pub async fn run(
        &self,
        request: &PipelineRequest,
        cancel: &CancellationToken,
    ) -> Result<CompleteTradePlan, PipelineError> {
        let symbol = request.symbol.trim();
        if symbol.is_empty() {
            return Err(PipelineError::input("symbol must not be empty"));
        }
        request.chart.validate().map_err(PipelineError::input)?;
        let equity = self
            .account
            .equity(request.equity)
            .await
            .map_err(|e| PipelineError::input(e.to_string()))?;

        tracing::info!(symbol, %equity, "pipeline run started");

        check_cancelled(cancel, StageName::Analyst, PartialArtifacts::default())?;
        let outcome = self
            .analyst
            .run(&request.chart, symbol, request.prompt.as_deref())
            .await?;
        let analyst = outcome.recommendation;

        if !analyst.direction().is_actionable() {
            tracing::info!(symbol, "NO_TRADE recommendation, short-circuiting");
            return self.assembler.assemble_no_trade(symbol, analyst);
        }

        check_cancelled(
            cancel,
            StageName::Trader,
            PartialArtifacts {
                analyst: Some(analyst.clone()),
                ..PartialArtifacts::default()
            },
        )?;
        let setup = self
            .trader
            .run(
                symbol,
                &analyst,
                &outcome.evidence.chart_narrative,
                request.prompt.as_deref(),
            )
            .await
            .map_err(|e| e.with_artifacts(Some(&analyst), None, None))?;

        check_cancelled(
            cancel,
            StageName::Risk,
            PartialArtifacts {
                analyst: Some(analyst.clone()),
                setup: Some(setup.clone()),
                ..PartialArtifacts::default()
            },
        )?;
        let allocation = self
            .risk
            .run(symbol, equity, &analyst, &setup)
            .map_err(|e| e.with_artifacts(Some(&analyst), Some(&setup), None))?;

        let plan = self
            .assembler
            .assemble(symbol, analyst.clone(), setup.clone(), allocation.clone())
            .map_err(|e| e.with_artifacts(Some(&analyst), Some(&setup), Some(&allocation)))?;

        tracing::info!(
            symbol,
            plan_id = plan.plan_id(),
            actionable = plan.is_actionable(),
            "pipeline run complete"
        );
        Ok(plan)
    }
}

fn check_cancelled(
    cancel: &CancellationToken,
    next: StageName,
    partial: PartialArtifacts,
) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        tracing::warn!(stage = %next, "run cancelled before stage");
        return Err(PipelineError::Cancelled {
            stage: next,
            partial,
        });
    }
    Ok(())
}
