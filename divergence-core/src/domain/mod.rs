//! Domain types for the divergence detector

pub mod bar;
pub mod divergence;
pub mod update;

pub use bar::{Bar, PriceKind};
pub use divergence::{Anchor, Direction, DivergenceRecord, DivergenceType};
pub use update::UpdateReason;
