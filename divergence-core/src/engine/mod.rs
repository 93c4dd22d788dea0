//! Detector orchestration.

pub mod detector;

pub use detector::{detect, DetectorError, DivergenceDetector, MIN_EXTREMA};
