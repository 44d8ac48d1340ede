//! Deterministic risk-sizing engine.

pub mod sizing;

pub use sizing::{allocate, ConvictionTable};
