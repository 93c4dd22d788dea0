//! Exponential Moving Average (EMA), streaming.
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of the first `period` inputs.
//! Lookback: period - 1.
//! A NaN input taints every later output.

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    seen: usize,
    seed_sum: f64,
    value: f64,
    tainted: bool,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            seen: 0,
            seed_sum: 0.0,
            value: f64::NAN,
            tainted: false,
        }
    }

    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    /// Feed the next input and return the current EMA (NaN while seeding).
    pub fn update(&mut self, x: f64) -> f64 {
        if self.tainted || x.is_nan() {
            self.tainted = true;
            self.value = f64::NAN;
            return f64::NAN;
        }
        self.seen += 1;
        if self.seen < self.period {
            self.seed_sum += x;
            return f64::NAN;
        }
        if self.seen == self.period {
            self.seed_sum += x;
            self.value = self.seed_sum / self.period as f64;
        } else {
            self.value = self.alpha * x + (1.0 - self.alpha) * self.value;
        }
        self.value
    }
}

/// Compute EMA values for a whole slice.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut ema = Ema::new(period);
    values.iter().map(|&v| ema.update(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_input() {
        let result = ema_of_series(&[100.0, 200.0, 300.0], 1);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5
        // Seed at index 2: SMA(10,11,12) = 11.0
        // EMA[3] = 0.5*13 + 0.5*11.0 = 12.0
        // EMA[4] = 0.5*14 + 0.5*12.0 = 13.0
        let result = ema_of_series(&[10.0, 11.0, 12.0, 13.0, 14.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_nan_in_seed_produces_all_nan() {
        let result = ema_of_series(&[10.0, f64::NAN, 12.0, 13.0, 14.0], 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_nan_after_seed_propagates() {
        let result = ema_of_series(&[10.0, 11.0, 12.0, f64::NAN, 14.0], 3);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(20).lookback(), 19);
        assert_eq!(Ema::new(1).lookback(), 0);
    }
}
