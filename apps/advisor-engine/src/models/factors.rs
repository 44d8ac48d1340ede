//! Supporting value objects for the analyst recommendation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ArtifactError;

/// A price level with a short label, used for support/resistance and targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    price: Decimal,
    label: String,
}

impl PriceLevel {
    /// Create a price level.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::NonPositivePrice`] if `price <= 0`.
    pub fn new(price: Decimal, label: impl Into<String>) -> Result<Self, ArtifactError> {
        let label = label.into();
        if price <= Decimal::ZERO {
            return Err(ArtifactError::NonPositivePrice { label, price });
        }
        Ok(Self { price, label })
    }

    /// The price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// The label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Technical analysis factors supporting a recommendation.
///
/// Purely descriptive. The only invariant (non-empty trend for an
/// actionable call) is enforced by the recommendation constructor,
/// since only the recommendation knows its direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalFactors {
    /// Overall trend assessment (e.g. "uptrend", "sideways").
    pub trend: String,
    /// Key support/resistance levels, in the order the analyst cited them.
    pub key_levels: Vec<PriceLevel>,
    /// Identified chart patterns and structure notes.
    pub pattern_notes: String,
}
