//! Divergence records and their classification tags.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::bar::PriceKind;

/// Which side of the market an extremum belongs to.
///
/// Bullish divergences are built from oscillator lows compared against bar
/// lows; bearish ones from oscillator highs compared against bar highs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    /// Bar price compared against the oscillator for this direction.
    pub fn price_kind(self) -> PriceKind {
        match self {
            Direction::Bullish => PriceKind::Low,
            Direction::Bearish => PriceKind::High,
        }
    }
}

/// The four divergence patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceType {
    /// Lower price low, higher oscillator low.
    RegularBullish,
    /// Higher price low, lower oscillator low.
    HiddenBullish,
    /// Higher price high, lower oscillator high.
    RegularBearish,
    /// Lower price high, higher oscillator high.
    HiddenBearish,
}

impl DivergenceType {
    pub const ALL: [DivergenceType; 4] = [
        DivergenceType::RegularBullish,
        DivergenceType::HiddenBullish,
        DivergenceType::RegularBearish,
        DivergenceType::HiddenBearish,
    ];

    pub fn direction(self) -> Direction {
        match self {
            DivergenceType::RegularBullish | DivergenceType::HiddenBullish => Direction::Bullish,
            DivergenceType::RegularBearish | DivergenceType::HiddenBearish => Direction::Bearish,
        }
    }

    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            DivergenceType::HiddenBullish | DivergenceType::HiddenBearish
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            DivergenceType::RegularBullish => "regular bullish",
            DivergenceType::HiddenBullish => "hidden bullish",
            DivergenceType::RegularBearish => "regular bearish",
            DivergenceType::HiddenBearish => "hidden bearish",
        }
    }
}

impl std::fmt::Display for DivergenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One end of a divergence line: the extremum bar and its price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Absolute bar index (0 = oldest bar of the series).
    pub index: usize,
    pub time: NaiveDateTime,
    pub price: f64,
}

/// A classified divergence between two confirmed extrema.
///
/// Immutable once created: the store hands out shared references only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceRecord {
    pub kind: DivergenceType,
    /// The earlier extremum.
    pub start: Anchor,
    /// The newly confirmed extremum.
    pub end: Anchor,
}

impl DivergenceRecord {
    pub fn new(kind: DivergenceType, start: Anchor, end: Anchor) -> Self {
        Self { kind, start, end }
    }

    /// Number of bars spanned by the divergence line.
    pub fn span(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_directions() {
        assert_eq!(DivergenceType::RegularBullish.direction(), Direction::Bullish);
        assert_eq!(DivergenceType::HiddenBullish.direction(), Direction::Bullish);
        assert_eq!(DivergenceType::RegularBearish.direction(), Direction::Bearish);
        assert_eq!(DivergenceType::HiddenBearish.direction(), Direction::Bearish);
    }

    #[test]
    fn direction_reads_matching_price() {
        assert_eq!(Direction::Bullish.price_kind(), PriceKind::Low);
        assert_eq!(Direction::Bearish.price_kind(), PriceKind::High);
    }

    #[test]
    fn span_counts_bars_between_anchors() {
        let time = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let record = DivergenceRecord::new(
            DivergenceType::RegularBearish,
            Anchor { index: 12, time, price: 101.0 },
            Anchor { index: 19, time, price: 104.5 },
        );
        assert_eq!(record.span(), 7);
    }

    #[test]
    fn hidden_flag() {
        let hidden: Vec<_> = DivergenceType::ALL
            .iter()
            .filter(|k| k.is_hidden())
            .collect();
        assert_eq!(hidden.len(), 2);
    }
}
