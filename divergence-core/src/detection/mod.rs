//! Detection building blocks: pivot scanner, extremum tracker, divergence
//! classifier and divergence store.

pub mod classifier;
pub mod pivot;
pub mod store;
pub mod tracker;

pub use classifier::{classify, ExtremumSample};
pub use pivot::{is_pivot, is_pivot_high, is_pivot_low};
pub use store::DivergenceStore;
pub use tracker::ExtremumTracker;
