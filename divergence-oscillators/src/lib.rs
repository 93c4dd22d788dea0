//! Streaming oscillators for the divergence detector.
//!
//! Every oscillator implements `divergence_core::Oscillator`: it consumes one
//! confirmed bar at a time and appends one value, NaN during warm-up.
//! `BuiltinOscillators` is the `OscillatorFactory` hosts inject into the detector.
//!
//! `Ema` and `Sma` are building blocks over plain `f64` inputs.

pub mod awesome;
pub mod ema;
pub mod factory;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use awesome::AwesomeOscillator;
pub use ema::Ema;
pub use factory::BuiltinOscillators;
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;

use divergence_core::domain::Bar;
use divergence_core::{Oscillator, Series};

/// Push every bar through `oscillator` and return its full output series.
pub fn compute(oscillator: &mut dyn Oscillator, bars: &[Bar]) -> Vec<f64> {
    for bar in bars {
        oscillator.push(bar);
    }
    (0..oscillator.len())
        .map(|i| oscillator.get(i).unwrap_or(f64::NAN))
        .collect()
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                time: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for oscillator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
