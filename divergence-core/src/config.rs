//! Detector configuration.
//!
//! Loaded from TOML, validated once at construction. The oscillator choice is a
//! closed sum type; an unknown `type` tag is rejected while parsing, never
//! silently ignored.
//!
//! ```toml
//! left = 5
//! right = 5
//!
//! [oscillator]
//! type = "macd"
//! fast = 12
//! slow = 26
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceKind;
use crate::style::StyleSet;

/// Smallest retention window that still leaves a comparison partner.
pub const MIN_RETENTION: usize = 3;

/// Largest pivot lookback accepted on either side.
pub const MAX_WINDOW: usize = 9999;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pivot window must be 1..=9999 bars on each side (left={left}, right={right})")]
    InvalidWindow { left: usize, right: usize },
    #[error("{oscillator} {name} period must be >= 1")]
    InvalidPeriod {
        oscillator: OscillatorKind,
        name: &'static str,
    },
    #[error("{oscillator} fast period ({fast}) must be shorter than slow period ({slow})")]
    InvalidPeriodOrder {
        oscillator: OscillatorKind,
        fast: usize,
        slow: usize,
    },
    #[error("max_history must keep at least 3 extrema, got {0}")]
    InvalidRetention(usize),
    #[error("unknown oscillator '{0}' (expected one of: rsi, macd, ao)")]
    UnknownOscillator(String),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Full detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// Bars to the left of a pivot candidate.
    pub left: usize,
    /// Bars to the right of a pivot candidate (confirmation lag).
    pub right: usize,
    /// Optional cap on retained extrema per direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history: Option<usize>,
    pub oscillator: OscillatorConfig,
    pub styles: StyleSet,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            left: 5,
            right: 5,
            max_history: None,
            oscillator: OscillatorConfig::default(),
            styles: StyleSet::default(),
        }
    }
}

impl DetectorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = 1..=MAX_WINDOW;
        if !side.contains(&self.left) || !side.contains(&self.right) {
            return Err(ConfigError::InvalidWindow {
                left: self.left,
                right: self.right,
            });
        }
        if let Some(n) = self.max_history {
            if n < MIN_RETENTION {
                return Err(ConfigError::InvalidRetention(n));
            }
        }
        self.oscillator.validate()
    }

    /// Bars required before the first pivot can be evaluated.
    pub fn window_len(&self) -> usize {
        self.left.saturating_add(self.right).saturating_add(1)
    }
}

/// Names of the supported oscillators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorKind {
    Rsi,
    Macd,
    Ao,
}

impl OscillatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OscillatorKind::Rsi => "rsi",
            OscillatorKind::Macd => "macd",
            OscillatorKind::Ao => "ao",
        }
    }
}

impl fmt::Display for OscillatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OscillatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsi" => Ok(OscillatorKind::Rsi),
            "macd" => Ok(OscillatorKind::Macd),
            "ao" | "awesome" | "awesome_oscillator" => Ok(OscillatorKind::Ao),
            _ => Err(ConfigError::UnknownOscillator(s.to_string())),
        }
    }
}

/// RSI averaging of gains and losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiMode {
    /// Plain moving average over the period.
    Simple,
    /// Wilder smoothing.
    #[default]
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsiParams {
    pub period: usize,
    pub source: PriceKind,
    pub mode: RsiMode,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            source: PriceKind::Close,
            mode: RsiMode::Exponential,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub source: PriceKind,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            source: PriceKind::Close,
        }
    }
}

/// Awesome Oscillator periods; always computed on median price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AoParams {
    pub fast: usize,
    pub slow: usize,
}

impl Default for AoParams {
    fn default() -> Self {
        Self { fast: 5, slow: 34 }
    }
}

/// The active oscillator and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OscillatorConfig {
    Rsi(RsiParams),
    Macd(MacdParams),
    Ao(AoParams),
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        OscillatorConfig::Rsi(RsiParams::default())
    }
}

impl OscillatorConfig {
    /// Default parameter block for a named oscillator.
    pub fn defaults_for(kind: OscillatorKind) -> Self {
        match kind {
            OscillatorKind::Rsi => OscillatorConfig::Rsi(RsiParams::default()),
            OscillatorKind::Macd => OscillatorConfig::Macd(MacdParams::default()),
            OscillatorKind::Ao => OscillatorConfig::Ao(AoParams::default()),
        }
    }

    pub fn kind(&self) -> OscillatorKind {
        match self {
            OscillatorConfig::Rsi(_) => OscillatorKind::Rsi,
            OscillatorConfig::Macd(_) => OscillatorKind::Macd,
            OscillatorConfig::Ao(_) => OscillatorKind::Ao,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let kind = self.kind();
        match *self {
            OscillatorConfig::Rsi(p) => require_period(kind, "rsi", p.period),
            OscillatorConfig::Macd(MacdParams { fast, slow, .. })
            | OscillatorConfig::Ao(AoParams { fast, slow }) => {
                require_period(kind, "fast", fast)?;
                require_period(kind, "slow", slow)?;
                if fast >= slow {
                    return Err(ConfigError::InvalidPeriodOrder {
                        oscillator: kind,
                        fast,
                        slow,
                    });
                }
                Ok(())
            }
        }
    }
}

fn require_period(
    oscillator: OscillatorKind,
    name: &'static str,
    period: usize,
) -> Result<(), ConfigError> {
    if period < 1 {
        return Err(ConfigError::InvalidPeriod { oscillator, name });
    }
    Ok(())
}
