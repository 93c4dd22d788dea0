//! Simple Moving Average (SMA), streaming.
//!
//! Rolling mean over a fixed window.
//! Lookback: period - 1 (first valid value at index period-1).
//! Output is NaN while any NaN input is inside the window.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
    nan_count: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            sum: 0.0,
            nan_count: 0,
        }
    }

    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    /// Feed the next input and return the current mean (NaN until the window fills).
    pub fn update(&mut self, x: f64) -> f64 {
        self.window.push_back(x);
        if x.is_nan() {
            self.nan_count += 1;
        } else {
            self.sum += x;
        }
        if self.window.len() > self.period {
            if let Some(leaving) = self.window.pop_front() {
                if leaving.is_nan() {
                    self.nan_count -= 1;
                } else {
                    self.sum -= leaving;
                }
            }
        }
        if self.window.len() < self.period || self.nan_count > 0 {
            return f64::NAN;
        }
        self.sum / self.period as f64
    }
}

/// Compute SMA values for a whole slice.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut sma = Sma::new(period);
    values.iter().map(|&v| sma.update(v)).collect()
}
