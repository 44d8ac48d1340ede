//! Gemini REST adapter.
//!
//! One HTTP client shared by two port implementations: the vision
//! analyzer (chart image in, narrative out) and the trade reasoner
//! (evidence in, JSON draft out).

pub mod api_types;
mod client;
mod reasoner;
mod vision;

pub use client::GeminiClient;
pub use reasoner::GeminiReasoner;
pub use vision::GeminiVision;
