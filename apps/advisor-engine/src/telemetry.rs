//! Logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize console logging.
///
/// `RUST_LOG` takes precedence; the configured default filter applies
/// when it is unset. Calling this twice panics, so it belongs in main.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
