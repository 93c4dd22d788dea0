//! Divergence classifier.
//!
//! Compares two confirmed extrema of the same direction. Price and oscillator
//! moving apart is a divergence; which way they move decides regular vs hidden.

use crate::domain::{Direction, DivergenceType};

/// Oscillator and price reading at one extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumSample {
    pub oscillator: f64,
    pub price: f64,
}

impl ExtremumSample {
    pub fn new(oscillator: f64, price: f64) -> Self {
        Self { oscillator, price }
    }

    fn is_defined(&self) -> bool {
        !self.oscillator.is_nan() && !self.price.is_nan()
    }
}

/// Classify the move from `prev` to `curr`.
///
/// Returns `None` for ties, for price and oscillator moving the same way, and
/// whenever a reading is NaN.
pub fn classify(
    direction: Direction,
    prev: ExtremumSample,
    curr: ExtremumSample,
) -> Option<DivergenceType> {
    if !prev.is_defined() || !curr.is_defined() {
        return None;
    }

    let osc_up = curr.oscillator > prev.oscillator;
    let osc_down = curr.oscillator < prev.oscillator;
    let price_up = curr.price > prev.price;
    let price_down = curr.price < prev.price;

    match direction {
        Direction::Bullish if osc_up && price_down => Some(DivergenceType::RegularBullish),
        Direction::Bullish if osc_down && price_up => Some(DivergenceType::HiddenBullish),
        Direction::Bearish if osc_down && price_up => Some(DivergenceType::RegularBearish),
        Direction::Bearish if osc_up && price_down => Some(DivergenceType::HiddenBearish),
        _ => None,
    }
}
