//! Extremum tracker: confirmed pivot indices for one direction.

use std::collections::VecDeque;

use crate::series::HistoryError;

/// Ordered, deduplicated bar indices of confirmed pivots.
///
/// Entries only ever get appended. With a retention limit the oldest entries
/// fall off the front, but `confirmed()` keeps counting every append.
#[derive(Debug, Clone, Default)]
pub struct ExtremumTracker {
    indices: VecDeque<usize>,
    retention: Option<usize>,
    confirmed: usize,
}

impl ExtremumTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `retention` entries.
    pub fn with_retention(retention: usize) -> Self {
        Self {
            indices: VecDeque::with_capacity(retention),
            retention: Some(retention),
            confirmed: 0,
        }
    }

    /// Record a confirmed pivot at `bar_index`.
    ///
    /// Returns `false` when the newest entry already is `bar_index` (the host
    /// re-delivered the same bar). Indices that would go backwards are ignored too.
    pub fn confirm(&mut self, bar_index: usize) -> bool {
        if let Some(&last) = self.indices.back() {
            if bar_index <= last {
                return false;
            }
        }
        self.indices.push_back(bar_index);
        self.confirmed += 1;
        if let Some(limit) = self.retention {
            while self.indices.len() > limit {
                self.indices.pop_front();
            }
        }
        true
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Total number of pivots ever confirmed, including evicted ones.
    pub fn confirmed(&self) -> usize {
        self.confirmed
    }

    /// The k-th most recent entry (0 = newest).
    pub fn last(&self, k: usize) -> Result<usize, HistoryError> {
        let len = self.indices.len();
        if k >= len {
            return Err(HistoryError::OutOfRange { index: k, len });
        }
        Ok(self.indices[len - 1 - k])
    }

    /// Retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.confirmed = 0;
    }
}
