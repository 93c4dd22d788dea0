//! Divergence detector: the per-bar event loop.
//!
//! For every confirmed bar the detector
//! 1. pushes the bar into its oscillator,
//! 2. checks the bar `right` positions back for an oscillator pivot low/high,
//! 3. records confirmed pivots in the matching extremum tracker,
//! 4. classifies the new pivot against the previous one and stores any divergence.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::components::{Oscillator, OscillatorFactory};
use crate::config::{ConfigError, DetectorConfig, OscillatorConfig};
use crate::detection::{classify, pivot, DivergenceStore, ExtremumSample, ExtremumTracker};
use crate::domain::{Anchor, Bar, Direction, DivergenceRecord, UpdateReason};
use crate::series::{HistoryError, PriceHistory, Series};

/// Errors from the detector.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("history shrank from {seen} to {len} bars; reset the detector before reloading")]
    HistoryRewound { seen: usize, len: usize },
}

/// Minimum confirmed extrema in a direction before classification runs.
pub const MIN_EXTREMA: usize = 3;

/// Incremental divergence detector for one price series.
pub struct DivergenceDetector {
    config: DetectorConfig,
    factory: Arc<dyn OscillatorFactory>,
    oscillator: Box<dyn Oscillator>,
    lows: ExtremumTracker,
    highs: ExtremumTracker,
    store: DivergenceStore,
    bars_seen: usize,
}

impl std::fmt::Debug for DivergenceDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DivergenceDetector")
            .field("config", &self.config)
            .field("oscillator", &self.oscillator.name())
            .field("lows", &self.lows)
            .field("highs", &self.highs)
            .field("divergences", &self.store.len())
            .field("bars_seen", &self.bars_seen)
            .finish()
    }
}

impl DivergenceDetector {
    /// Validate `config` and build its oscillator through `factory`.
    pub fn new(
        config: DetectorConfig,
        factory: Arc<dyn OscillatorFactory>,
    ) -> Result<Self, DetectorError> {
        config.validate()?;
        let oscillator = factory.create(&config.oscillator)?;
        info!(
            oscillator = oscillator.name(),
            left = config.left,
            right = config.right,
            "divergence detector ready"
        );
        Ok(Self {
            lows: new_tracker(&config),
            highs: new_tracker(&config),
            store: DivergenceStore::new(),
            bars_seen: 0,
            config,
            factory,
            oscillator,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn oscillator(&self) -> &dyn Oscillator {
        self.oscillator.as_ref()
    }

    pub fn store(&self) -> &DivergenceStore {
        &self.store
    }

    pub fn into_store(self) -> DivergenceStore {
        self.store
    }

    /// Confirmed oscillator lows.
    pub fn lows(&self) -> &ExtremumTracker {
        &self.lows
    }

    /// Confirmed oscillator highs.
    pub fn highs(&self) -> &ExtremumTracker {
        &self.highs
    }

    pub fn tracker(&self, direction: Direction) -> &ExtremumTracker {
        match direction {
            Direction::Bullish => &self.lows,
            Direction::Bearish => &self.highs,
        }
    }

    /// Number of confirmed bars processed so far.
    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    /// Handle a host update notification.
    ///
    /// Ticks are ignored. For confirmed updates every bar not yet seen is
    /// processed exactly once, so re-delivered notifications are harmless.
    /// Returns the number of divergences added.
    pub fn on_update<H>(&mut self, reason: UpdateReason, history: &H) -> Result<usize, DetectorError>
    where
        H: PriceHistory + ?Sized,
    {
        if !reason.is_confirmed() {
            trace!("ignoring intra-bar tick");
            return Ok(0);
        }
        let len = history.len();
        if len < self.bars_seen {
            return Err(DetectorError::HistoryRewound {
                seen: self.bars_seen,
                len,
            });
        }

        let before = self.store.len();
        while self.bars_seen < len {
            let index = self.bars_seen;
            let bar = history
                .bar(index)
                .ok_or(HistoryError::OutOfRange { index, len })?;
            self.push_bar(bar);
            self.evaluate(index, history)?;
        }
        Ok(self.store.len() - before)
    }

    /// Drop all per-series state and start over with a fresh oscillator.
    pub fn reset(&mut self) -> Result<(), DetectorError> {
        self.oscillator = self.factory.create(&self.config.oscillator)?;
        self.clear_state();
        info!(oscillator = self.oscillator.name(), "detector reset");
        Ok(())
    }

    /// Switch to a different oscillator.
    ///
    /// Values of different oscillators are not comparable, so extrema and
    /// divergences are discarded; the next confirmed update replays the
    /// host's history through the new oscillator. On error nothing changes.
    pub fn select_oscillator(&mut self, oscillator: OscillatorConfig) -> Result<(), DetectorError> {
        oscillator.validate()?;
        let built = self.factory.create(&oscillator)?;
        info!(
            from = self.oscillator.name(),
            to = built.name(),
            "switching oscillator"
        );
        self.oscillator = built;
        self.config.oscillator = oscillator;
        self.clear_state();
        Ok(())
    }

    fn clear_state(&mut self) {
        self.lows.clear();
        self.highs.clear();
        self.store.clear();
        self.bars_seen = 0;
    }

    fn push_bar(&mut self, bar: &Bar) {
        self.oscillator.push(bar);
        self.bars_seen += 1;
    }

    /// Run pivot detection and classification with `index` as the newest bar.
    fn evaluate<H>(&mut self, index: usize, history: &H) -> Result<(), DetectorError>
    where
        H: PriceHistory + ?Sized,
    {
        let (left, right) = (self.config.left, self.config.right);
        let Some(candidate) = pivot::candidate(index, left, right) else {
            return Ok(());
        };

        for direction in [Direction::Bullish, Direction::Bearish] {
            if !pivot::is_pivot(self.oscillator.as_ref(), direction, index, left, right) {
                continue;
            }

            let tracker = match direction {
                Direction::Bullish => &mut self.lows,
                Direction::Bearish => &mut self.highs,
            };
            if !tracker.confirm(candidate) {
                continue;
            }
            debug!(bar = candidate, ?direction, "pivot confirmed");
            if tracker.confirmed() < MIN_EXTREMA {
                continue;
            }
            // Entry at len - 2: the extremum confirmed just before this one.
            let previous = tracker.last(1)?;

            let start = self.anchor(direction, previous, history)?;
            let end = self.anchor(direction, candidate, history)?;
            let prev_sample = ExtremumSample::new(self.oscillator_at(previous), start.price);
            let curr_sample = ExtremumSample::new(self.oscillator_at(candidate), end.price);

            if let Some(kind) = classify(direction, prev_sample, curr_sample) {
                debug!(%kind, start = start.index, end = end.index, "divergence");
                self.store.add(DivergenceRecord::new(kind, start, end));
            }
        }
        Ok(())
    }

    fn oscillator_at(&self, index: usize) -> f64 {
        self.oscillator.get(index).unwrap_or(f64::NAN)
    }

    fn anchor<H>(&self, direction: Direction, index: usize, history: &H) -> Result<Anchor, HistoryError>
    where
        H: PriceHistory + ?Sized,
    {
        Ok(Anchor {
            index,
            time: history.time(index)?,
            price: history.price(direction.price_kind(), index)?,
        })
    }
}

fn new_tracker(config: &DetectorConfig) -> ExtremumTracker {
    match config.max_history {
        Some(n) => ExtremumTracker::with_retention(n),
        None => ExtremumTracker::new(),
    }
}

/// Run a complete bar series through a fresh detector and return its divergences.
pub fn detect<H>(
    config: DetectorConfig,
    factory: Arc<dyn OscillatorFactory>,
    history: &H,
) -> Result<DivergenceStore, DetectorError>
where
    H: PriceHistory + ?Sized,
{
    let mut detector = DivergenceDetector::new(config, factory)?;
    detector.on_update(UpdateReason::HistoryUpdate, history)?;
    Ok(detector.into_store())
}
