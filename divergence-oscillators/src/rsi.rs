//! Relative Strength Index (RSI), streaming.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Exponential mode: Wilder smoothing seeded with the plain average of the
//! first `period` changes. Simple mode: plain rolling average of the last
//! `period` changes.
//! Lookback: period.
//! Edge cases: no movement → 50; avg_loss == 0 → 100; avg_gain == 0 → 0.

use divergence_core::config::{RsiMode, RsiParams};
use divergence_core::domain::{Bar, PriceKind};
use divergence_core::{Oscillator, Series};

use crate::sma::Sma;

#[derive(Debug, Clone)]
enum Averaging {
    Wilder {
        seen: usize,
        avg_gain: f64,
        avg_loss: f64,
    },
    Rolling {
        gains: Sma,
        losses: Sma,
    },
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    source: PriceKind,
    name: String,
    averaging: Averaging,
    prev: Option<f64>,
    tainted: bool,
    values: Vec<f64>,
}

impl Rsi {
    pub fn new(params: RsiParams) -> Self {
        let period = params.period.max(1);
        let averaging = match params.mode {
            RsiMode::Exponential => Averaging::Wilder {
                seen: 0,
                avg_gain: 0.0,
                avg_loss: 0.0,
            },
            RsiMode::Simple => Averaging::Rolling {
                gains: Sma::new(period),
                losses: Sma::new(period),
            },
        };
        Self {
            period,
            source: params.source,
            name: format!("rsi_{period}"),
            averaging,
            prev: None,
            tainted: false,
            values: Vec::new(),
        }
    }

    /// RSI with Wilder smoothing on close.
    pub fn with_period(period: usize) -> Self {
        Self::new(RsiParams {
            period,
            ..RsiParams::default()
        })
    }

    fn next_value(&mut self, price: f64) -> f64 {
        if self.tainted || price.is_nan() {
            self.tainted = true;
            return f64::NAN;
        }
        let Some(prev) = self.prev.replace(price) else {
            return f64::NAN;
        };
        let change = price - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        let period = self.period as f64;

        match &mut self.averaging {
            Averaging::Wilder {
                seen,
                avg_gain,
                avg_loss,
            } => {
                *seen += 1;
                if *seen <= self.period {
                    *avg_gain += gain / period;
                    *avg_loss += loss / period;
                    if *seen < self.period {
                        return f64::NAN;
                    }
                } else {
                    let alpha = 1.0 / period;
                    *avg_gain = alpha * gain + (1.0 - alpha) * *avg_gain;
                    *avg_loss = alpha * loss + (1.0 - alpha) * *avg_loss;
                }
                compute_rsi(*avg_gain, *avg_loss)
            }
            Averaging::Rolling { gains, losses } => {
                let avg_gain = gains.update(gain);
                let avg_loss = losses.update(loss);
                if avg_gain.is_nan() || avg_loss.is_nan() {
                    return f64::NAN;
                }
                compute_rsi(avg_gain, avg_loss)
            }
        }
    }
}

impl Series for Rsi {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, index: usize) -> Option<f64> {
        self.values.as_slice().get(index).copied()
    }
}

impl Oscillator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn push(&mut self, bar: &Bar) {
        let value = self.next_value(bar.price(self.source));
        self.values.push(value);
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    // Rolling sums can drift a hair below zero.
    let (avg_gain, avg_loss) = (avg_gain.max(0.0), avg_loss.max(0.0));
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
