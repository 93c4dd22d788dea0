//! Awesome Oscillator (AO), streaming.
//!
//! AO = SMA(median, fast) - SMA(median, slow), median = (high + low) / 2.
//! Lookback: slow - 1.

use divergence_core::config::AoParams;
use divergence_core::domain::{Bar, PriceKind};
use divergence_core::{Oscillator, Series};

use crate::sma::Sma;

#[derive(Debug, Clone)]
pub struct AwesomeOscillator {
    fast: Sma,
    slow: Sma,
    slow_period: usize,
    name: String,
    values: Vec<f64>,
}

impl AwesomeOscillator {
    pub fn new(params: AoParams) -> Self {
        Self {
            fast: Sma::new(params.fast),
            slow: Sma::new(params.slow),
            slow_period: params.slow.max(1),
            name: format!("ao_{}_{}", params.fast, params.slow),
            values: Vec::new(),
        }
    }
}

impl Default for AwesomeOscillator {
    fn default() -> Self {
        Self::new(AoParams::default())
    }
}

impl Series for AwesomeOscillator {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, index: usize) -> Option<f64> {
        self.values.as_slice().get(index).copied()
    }
}

impl Oscillator for AwesomeOscillator {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.slow_period - 1
    }

    fn push(&mut self, bar: &Bar) {
        let median = bar.price(PriceKind::Median);
        let fast = self.fast.update(median);
        let slow = self.slow.update(median);
        self.values.push(fast - slow);
    }
}
