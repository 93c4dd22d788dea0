//! Factory system: converts `OscillatorConfig` into runtime oscillators.

use divergence_core::config::{ConfigError, OscillatorConfig};
use divergence_core::{Oscillator, OscillatorFactory};
use tracing::debug;

use crate::{AwesomeOscillator, Macd, Rsi};

/// Builds the RSI, MACD and Awesome Oscillator implementations of this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinOscillators;

impl OscillatorFactory for BuiltinOscillators {
    fn create(&self, config: &OscillatorConfig) -> Result<Box<dyn Oscillator>, ConfigError> {
        config.validate()?;
        let oscillator: Box<dyn Oscillator> = match *config {
            OscillatorConfig::Rsi(params) => Box::new(Rsi::new(params)),
            OscillatorConfig::Macd(params) => Box::new(Macd::new(params)),
            OscillatorConfig::Ao(params) => Box::new(AwesomeOscillator::new(params)),
        };
        debug!(oscillator = oscillator.name(), "built oscillator");
        Ok(oscillator)
    }
}
