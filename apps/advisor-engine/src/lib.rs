//! Chart-to-trade-plan advisor pipeline.
//!
//! Takes a chart image plus account context and produces a structured
//! trade plan through three sequential stages:
//!
//! 1. **Analyst** reads the chart and gathered research, producing a
//!    directional recommendation (LONG, SHORT, or NO_TRADE) with a
//!    conviction level.
//! 2. **Trader** turns an actionable recommendation into concrete
//!    entry, stop-loss, and take-profit levels.
//! 3. **Risk** deterministically sizes the position from conviction
//!    and account equity.
//!
//! A NO_TRADE recommendation short-circuits the pipeline: the later
//! stages never run and the plan carries neither setup nor allocation.
//! Every stage artifact is validated at construction, so an aggregate
//! violating an invariant cannot be built.
//!
//! The reasoning, vision, and research capabilities sit behind ports
//! ([`application::ports`]); production wiring against their HTTP
//! services lives in [`infrastructure`], and test suites substitute
//! deterministic fixtures via [`Advisor::with_ports`].

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_possible_truncation,
        clippy::too_many_lines
    )
)]

pub mod application;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod risk;
pub mod telemetry;

pub use application::{PipelineRequest, StageOrchestrator};
pub use error::{PipelineError, StageName};
pub use infrastructure::Advisor;
pub use models::CompleteTradePlan;
