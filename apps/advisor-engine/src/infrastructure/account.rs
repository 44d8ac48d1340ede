//! Account equity resolution.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::application::ports::{AccountInfoProvider, CapabilityError};

/// Equity provider with no brokerage behind it: the caller supplies
/// the account equity with each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEquityProvider;

#[async_trait]
impl AccountInfoProvider for ExplicitEquityProvider {
    async fn equity(&self, explicit: Option<Decimal>) -> Result<Decimal, CapabilityError> {
        match explicit {
            Some(equity) if equity > Decimal::ZERO => Ok(equity),
            Some(equity) => Err(CapabilityError::InvalidInput(format!(
                "equity must be positive, got {equity}"
            ))),
            None => Err(CapabilityError::InvalidInput(
                "no account source configured; equity must be supplied with the request"
                    .to_string(),
            )),
        }
    }
}
