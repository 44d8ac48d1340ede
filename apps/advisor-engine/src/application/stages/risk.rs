//! Risk stage: setup + equity in, position size out.

use rust_decimal::Decimal;

use crate::error::{PipelineError, StageName};
use crate::models::{AnalystRecommendation, RiskAllocation, TradingSetup};
use crate::risk::{allocate, ConvictionTable};

/// Third stage: deterministic position sizing. No capability calls,
/// no nondeterminism; the same inputs always produce the same
/// allocation apart from its timestamp.
pub struct RiskStage {
    table: ConvictionTable,
}

impl RiskStage {
    /// Build the stage around a conviction table.
    #[must_use]
    pub const fn new(table: ConvictionTable) -> Self {
        Self { table }
    }

    /// Size the position for the setup.
    pub fn run(
        &self,
        symbol: &str,
        equity: Decimal,
        recommendation: &AnalystRecommendation,
        setup: &TradingSetup,
    ) -> Result<RiskAllocation, PipelineError> {
        let allocation = allocate(equity, recommendation.conviction(), setup, &self.table)
            .map_err(|e| PipelineError::validation(StageName::Risk, e.to_string(), None))?;

        if allocation.is_unsizeable() {
            tracing::warn!(
                symbol,
                risk_per_share = %setup.risk_per_share(),
                risk_amount = %allocation.risk_amount(),
                "setup is unsizeable at current risk tolerance"
            );
        } else {
            tracing::info!(
                symbol,
                position_size = allocation.position_size(),
                risk_amount = %allocation.risk_amount(),
                "risk stage complete"
            );
        }
        Ok(allocation)
    }
}
