//! Direction and conviction enumerations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Directional call for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeDirection {
    /// Expect price to rise.
    Long,
    /// Expect price to fall.
    Short,
    /// No actionable setup.
    NoTrade,
}

impl TradeDirection {
    /// Returns true for LONG and SHORT.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::Long | Self::Short)
    }

    /// Wire representation of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::NoTrade => "NO_TRADE",
        }
    }
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Ok(Self::Long),
            "SHORT" => Ok(Self::Short),
            "NO_TRADE" => Ok(Self::NoTrade),
            _ => Err(ParseEnumError::new("direction", s)),
        }
    }
}

/// Qualitative confidence attached to a directional call.
///
/// Totally ordered: LOW < MEDIUM < HIGH. The ordering drives the risk
/// budget, so the declaration order is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConvictionLevel {
    /// Weak signal.
    Low,
    /// Moderate signal.
    Medium,
    /// Strong signal.
    High,
}

impl ConvictionLevel {
    /// Wire representation of the conviction level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for ConvictionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConvictionLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            // An out-of-range value is a validation failure, never a default.
            _ => Err(ParseEnumError::new("conviction", s)),
        }
    }
}

/// Failed to parse an enum value received from the reasoning capability.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized {kind} value '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("long".parse::<TradeDirection>().unwrap(), TradeDirection::Long);
        assert_eq!(" SHORT ".parse::<TradeDirection>().unwrap(), TradeDirection::Short);
        assert_eq!(
            "no_trade".parse::<TradeDirection>().unwrap(),
            TradeDirection::NoTrade
        );
    }

    #[test]
    fn direction_rejects_unknown_values() {
        assert!("SIDEWAYS".parse::<TradeDirection>().is_err());
        assert!("".parse::<TradeDirection>().is_err());
    }

    #[test]
    fn conviction_is_totally_ordered() {
        assert!(ConvictionLevel::Low < ConvictionLevel::Medium);
        assert!(ConvictionLevel::Medium < ConvictionLevel::High);
    }

    #[test]
    fn conviction_rejects_unknown_values_without_defaulting() {
        let err = "EXTREME".parse::<ConvictionLevel>().unwrap_err();
        assert!(err.to_string().contains("EXTREME"));
    }

    #[test]
    fn actionable_excludes_no_trade() {
        assert!(TradeDirection::Long.is_actionable());
        assert!(TradeDirection::Short.is_actionable());
        assert!(!TradeDirection::NoTrade.is_actionable());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&TradeDirection::NoTrade).unwrap();
        assert_eq!(json, "\"NO_TRADE\"");
        let level: ConvictionLevel = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(level, ConvictionLevel::Medium);
    }
}
