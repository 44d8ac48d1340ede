//! Infrastructure adapters.
//!
//! Concrete implementations of the application ports against external
//! HTTP services, plus the retry machinery and the container that
//! wires everything together. Only this layer touches the network.

pub mod account;
pub mod container;
pub mod gemini;
pub mod retry;
pub mod serper;

pub use account::ExplicitEquityProvider;
pub use container::Advisor;
pub use retry::RetryPolicy;
