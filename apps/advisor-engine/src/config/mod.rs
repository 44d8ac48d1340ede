//! Configuration loading and validation.
//!
//! Settings come from a YAML file with per-field defaults, so an empty
//! or absent file yields a fully working configuration. Credentials
//! never live in the file; they are read from the environment at
//! startup.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::RetryPolicy;
use crate::risk::ConvictionTable;

/// Default config file path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable holding the Gemini API key.
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable holding the Serper API key.
pub const SERPER_API_KEY_VAR: &str = "SERPER_API_KEY";

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml_bw::Error),

    /// The parsed configuration violates a constraint.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// A required environment variable is unset or empty.
    #[error("missing required environment variable {0}")]
    MissingEnvVar(&'static str),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini adapter settings.
    pub gemini: GeminiConfig,
    /// Serper adapter settings.
    pub serper: SerperConfig,
    /// Risk sizing settings.
    pub risk: RiskConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Gemini adapter settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Model identifier.
    pub model: String,
    /// API base URL, no trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry schedule.
    pub retry: RetryConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 60,
            retry: RetryConfig::default(),
        }
    }
}

/// Serper adapter settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerperConfig {
    /// Search endpoint URL.
    pub search_url: String,
    /// Scrape endpoint URL.
    pub scrape_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry schedule.
    pub retry: RetryConfig,
}

impl Default for SerperConfig {
    fn default() -> Self {
        Self {
            search_url: "https://google.serper.dev/search".to_string(),
            scrape_url: "https://scrape.serper.dev".to_string(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry schedule, in config-friendly units.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Ceiling on any single delay, in milliseconds.
    pub max_backoff_ms: u64,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Fraction of the delay added as random jitter, in `[0, 1]`.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
            multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryConfig {
    /// Convert to the runtime policy.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            multiplier: self.multiplier,
            jitter_factor: self.jitter_factor,
        }
    }
}

/// Risk sizing settings. Decimal fields are quoted strings in YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Risk percentage for LOW conviction.
    pub low_conviction_pct: Decimal,
    /// Risk percentage for MEDIUM conviction.
    pub medium_conviction_pct: Decimal,
    /// Risk percentage for HIGH conviction.
    pub high_conviction_pct: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            low_conviction_pct: dec!(0.005),
            medium_conviction_pct: dec!(0.01),
            high_conviction_pct: dec!(0.02),
        }
    }
}

impl RiskConfig {
    /// Convert to the runtime conviction table.
    #[must_use]
    pub const fn conviction_table(&self) -> ConvictionTable {
        ConvictionTable {
            low: self.low_conviction_pct,
            medium: self.medium_conviction_pct,
            high: self.high_conviction_pct,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// API credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Gemini API key.
    pub google_api_key: String,
    /// Serper API key.
    pub serper_api_key: String,
}

impl Config {
    /// Check constraints the schema cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk
            .conviction_table()
            .validate()
            .map_err(ConfigError::Validation)?;
        for (name, config) in [
            ("gemini", (self.gemini.timeout_secs, &self.gemini.retry)),
            ("serper", (self.serper.timeout_secs, &self.serper.retry)),
        ] {
            let (timeout_secs, retry) = config;
            if timeout_secs == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name}.timeout_secs must be positive"
                )));
            }
            if retry.max_attempts == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name}.retry.max_attempts must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate configuration.
///
/// With an explicit path the file must exist. Without one, the default
/// path is used when present and built-in defaults otherwise.
///
/// # Errors
///
/// Returns a [`ConfigError`] on read, parse, or validation failure.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).is_file() => {
            parse_file(DEFAULT_CONFIG_PATH)?
        }
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn parse_file(path: &str) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    Ok(serde_yaml_bw::from_str(&raw)?)
}

/// Read API credentials from the environment.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] naming the first unset or
/// empty variable.
pub fn require_credentials() -> Result<Credentials, ConfigError> {
    Ok(Credentials {
        google_api_key: require_env(GOOGLE_API_KEY_VAR)?,
        serper_api_key: require_env(SERPER_API_KEY_VAR)?,
    })
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(name)),
    }
}
