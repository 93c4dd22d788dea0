//! Read access to the host's bar history and to oscillator output.
//!
//! Both are addressed by absolute bar index (0 = oldest bar). Offset access
//! ("k bars before the newest") is provided on top of that for hosts that
//! think right-to-left.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::{Bar, PriceKind};

/// Errors from history access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    #[error("bar index {index} out of range (history has {len} entries)")]
    OutOfRange { index: usize, len: usize },
    #[error("bar time {time} is not after the previous bar ({previous})")]
    NonMonotonicTime {
        time: NaiveDateTime,
        previous: NaiveDateTime,
    },
}

/// An append-only numeric series, one value per bar.
pub trait Series {
    /// Number of values available.
    fn len(&self) -> usize;

    /// Value at absolute index, `None` past the end.
    fn get(&self, index: usize) -> Option<f64>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value `offset` bars before the newest (0 = newest).
    fn back(&self, offset: usize) -> Option<f64> {
        let len = self.len();
        if offset >= len {
            return None;
        }
        self.get(len - 1 - offset)
    }
}

impl Series for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn get(&self, index: usize) -> Option<f64> {
        <[f64]>::get(self, index).copied()
    }
}

impl Series for Vec<f64> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<f64> {
        self.as_slice().get(index).copied()
    }
}

/// Confirmed bars supplied by the host.
pub trait PriceHistory {
    /// Number of confirmed bars.
    fn len(&self) -> usize;

    /// Bar at absolute index, `None` past the end.
    fn bar(&self, index: usize) -> Option<&Bar>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bar `offset` bars before the newest (0 = newest).
    fn bar_back(&self, offset: usize) -> Option<&Bar> {
        let len = self.len();
        if offset >= len {
            return None;
        }
        self.bar(len - 1 - offset)
    }

    /// Price of `kind` at absolute index.
    fn price(&self, kind: PriceKind, index: usize) -> Result<f64, HistoryError> {
        self.bar(index)
            .map(|b| b.price(kind))
            .ok_or(HistoryError::OutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Bar time at absolute index.
    fn time(&self, index: usize) -> Result<NaiveDateTime, HistoryError> {
        self.bar(index)
            .map(|b| b.time)
            .ok_or(HistoryError::OutOfRange {
                index,
                len: self.len(),
            })
    }
}

/// Vec-backed bar history with strictly increasing timestamps.
#[derive(Debug, Clone, Default)]
pub struct BarHistory {
    bars: Vec<Bar>,
}

impl BarHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from bars already in time order.
    pub fn from_bars(bars: Vec<Bar>) -> Result<Self, HistoryError> {
        let mut history = Self::with_capacity(bars.len());
        for bar in bars {
            history.push(bar)?;
        }
        Ok(history)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bars: Vec::with_capacity(capacity),
        }
    }

    /// Append a confirmed bar. Rejects bars that do not move time forward.
    pub fn push(&mut self, bar: Bar) -> Result<(), HistoryError> {
        if let Some(last) = self.bars.last() {
            if bar.time <= last.time {
                return Err(HistoryError::NonMonotonicTime {
                    time: bar.time,
                    previous: last.time,
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn clear(&mut self) {
        self.bars.clear();
    }
}

impl PriceHistory for BarHistory {
    fn len(&self) -> usize {
        self.bars.len()
    }

    fn bar(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }
}

impl PriceHistory for [Bar] {
    fn len(&self) -> usize {
        <[Bar]>::len(self)
    }

    fn bar(&self, index: usize) -> Option<&Bar> {
        self.get(index)
    }
}
