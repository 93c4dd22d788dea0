//! MACD line, streaming.
//!
//! MACD = EMA(source, fast) - EMA(source, slow).
//! Lookback: slow - 1. Only the MACD line is produced; divergence detection
//! compares against it, not against the signal line or histogram.

use divergence_core::config::MacdParams;
use divergence_core::domain::{Bar, PriceKind};
use divergence_core::{Oscillator, Series};

use crate::ema::Ema;

#[derive(Debug, Clone)]
pub struct Macd {
    source: PriceKind,
    fast: Ema,
    slow: Ema,
    slow_period: usize,
    name: String,
    values: Vec<f64>,
}

impl Macd {
    pub fn new(params: MacdParams) -> Self {
        Self {
            source: params.source,
            fast: Ema::new(params.fast),
            slow: Ema::new(params.slow),
            slow_period: params.slow.max(1),
            name: format!("macd_{}_{}", params.fast, params.slow),
            values: Vec::new(),
        }
    }
}

impl Series for Macd {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, index: usize) -> Option<f64> {
        self.values.as_slice().get(index).copied()
    }
}

impl Oscillator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.slow_period - 1
    }

    fn push(&mut self, bar: &Bar) {
        let price = bar.price(self.source);
        let fast = self.fast.update(price);
        let slow = self.slow.update(price);
        // NaN - x stays NaN, so warm-up and tainted inputs fall through.
        self.values.push(fast - slow);
    }
}
