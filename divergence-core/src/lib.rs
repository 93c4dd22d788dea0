//! Divergence Core: pivot detection and divergence bookkeeping.
//!
//! This crate contains the detection side of the oscillator divergence detector:
//! - Domain types (bars, divergence records, update notifications)
//! - Host interfaces for bar history and oscillator output
//! - Pivot scanner, extremum tracker, divergence classifier, divergence store
//! - The per-bar detector loop
//! - Configuration and line styles
//!
//! Oscillator math lives behind the `Oscillator` / `OscillatorFactory` traits
//! and is supplied by the host.

pub mod components;
pub mod config;
pub mod detection;
pub mod domain;
pub mod engine;
pub mod series;
pub mod style;

pub use components::{Oscillator, OscillatorFactory};
pub use config::{ConfigError, DetectorConfig, OscillatorConfig, OscillatorKind};
pub use domain::{Bar, Direction, DivergenceRecord, DivergenceType, PriceKind, UpdateReason};
pub use engine::{detect, DetectorError, DivergenceDetector};
pub use series::{BarHistory, HistoryError, PriceHistory, Series};
