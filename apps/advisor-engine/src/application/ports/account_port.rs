//! Account information port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::CapabilityError;

/// Account equity lookup for risk sizing.
#[async_trait]
pub trait AccountInfoProvider: Send + Sync {
    /// Resolve the account equity.
    ///
    /// Returns the explicit value when supplied and strictly positive;
    /// otherwise fails with [`CapabilityError::InvalidInput`], which
    /// the orchestrator surfaces as an input error before any stage
    /// runs.
    async fn equity(&self, explicit: Option<Decimal>) -> Result<Decimal, CapabilityError>;
}
