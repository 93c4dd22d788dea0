//! Collaborator seams the detector consumes.

pub mod oscillator;

pub use oscillator::{Oscillator, OscillatorFactory, Precomputed, PrecomputedFactory};
