//! Pipeline stages.
//!
//! Each stage consumes the accumulated upstream context and produces
//! exactly one validated artifact. Capability failures are classified
//! at the stage boundary; raw transport errors never cross it.

mod analyst;
mod risk;
mod trader;

pub use analyst::{AnalystOutcome, AnalystStage, ResearchEvidence};
pub use risk::RiskStage;
pub use trader::TraderStage;
