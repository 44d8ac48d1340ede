//! Application layer: ports, stages, orchestration, and assembly.

pub mod assembler;
pub mod orchestrator;
pub mod ports;
pub mod stages;

pub use assembler::PlanAssembler;
pub use orchestrator::{PipelineRequest, StageOrchestrator};
