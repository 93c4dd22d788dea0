//! Oscillator trait and factory seam.
//!
//! The detector never computes oscillator values itself. It owns one
//! `Oscillator` built by an injected `OscillatorFactory`, pushes each
//! confirmed bar into it, and reads the resulting series back by index.

use crate::config::{ConfigError, OscillatorConfig};
use crate::domain::Bar;
use crate::series::Series;

/// A streaming oscillator: one output value per pushed bar.
///
/// Values are `f64::NAN` until the oscillator has seen `warmup()` bars.
///
/// # Look-ahead contamination guard
/// The value at bar t may not depend on bars after t: pushing more bars never
/// changes values already produced.
pub trait Oscillator: Series + Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "macd_12_26").
    fn name(&self) -> &str;

    /// Number of leading bars whose output is NaN.
    fn warmup(&self) -> usize;

    /// Consume the next confirmed bar and append one output value.
    fn push(&mut self, bar: &Bar);
}

/// Builds oscillators from configuration.
///
/// Held by the detector for its whole lifetime so that resets and oscillator
/// switches can build a fresh instance.
pub trait OscillatorFactory: Send + Sync {
    fn create(&self, config: &OscillatorConfig) -> Result<Box<dyn Oscillator>, ConfigError>;
}

/// An oscillator whose output was computed elsewhere.
///
/// Replays a fixed value series: the n-th pushed bar exposes the n-th value.
/// Bars pushed past the end of the series read as NaN.
#[derive(Debug, Clone)]
pub struct Precomputed {
    name: String,
    values: Vec<f64>,
    pushed: usize,
}

impl Precomputed {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            pushed: 0,
        }
    }
}

impl Series for Precomputed {
    fn len(&self) -> usize {
        self.pushed
    }

    fn get(&self, index: usize) -> Option<f64> {
        if index >= self.pushed {
            return None;
        }
        Some(self.values.as_slice().get(index).copied().unwrap_or(f64::NAN))
    }
}

impl Oscillator for Precomputed {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.values.iter().take_while(|v| v.is_nan()).count()
    }

    fn push(&mut self, _bar: &Bar) {
        self.pushed += 1;
    }
}

/// Factory that hands out the same precomputed series for every config.
#[derive(Debug, Clone)]
pub struct PrecomputedFactory {
    values: Vec<f64>,
}

impl PrecomputedFactory {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl OscillatorFactory for PrecomputedFactory {
    fn create(&self, config: &OscillatorConfig) -> Result<Box<dyn Oscillator>, ConfigError> {
        config.validate()?;
        Ok(Box::new(Precomputed::new(
            format!("precomputed_{}", config.kind()),
            self.values.clone(),
        )))
    }
}
