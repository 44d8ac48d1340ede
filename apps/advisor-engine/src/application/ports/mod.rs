//! Driven ports: the external capabilities the pipeline consumes.
//!
//! Each port is defined by contract, not implementation. Adapters live
//! in `infrastructure` and are the only place transport errors exist;
//! everything above the port boundary sees [`CapabilityError`].

mod account_port;
mod reasoner_port;
mod research_port;
mod vision_port;

pub use account_port::AccountInfoProvider;
pub use reasoner_port::{AnalysisRequest, SetupRequest, TradeReasoner};
pub use research_port::{ResearchClient, SearchSnippet};
pub use vision_port::{ChartSource, VisionAnalyzer};

/// Failure of an external capability call, classified at the adapter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CapabilityError {
    /// The call exceeded its per-call timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The request never completed (connection reset, DNS, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered but the payload was unusable.
    #[error("unusable response: {0}")]
    InvalidResponse(String),

    /// The caller supplied an invalid input to the capability.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Bounded retries were exhausted on a transient failure.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last transient failure observed.
        last: String,
    },
}

impl CapabilityError {
    /// Whether an adapter retry loop should try again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::Http { status, .. } => crate::infrastructure::retry::is_retryable_status(*status),
            Self::InvalidResponse(_) | Self::InvalidInput(_) | Self::RetriesExhausted { .. } => {
                false
            }
        }
    }
}
