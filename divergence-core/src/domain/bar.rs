//! Bar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single symbol, confirmed (closed) by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    /// Extract one price field (or a derived price) from the bar.
    pub fn price(&self, kind: PriceKind) -> f64 {
        match kind {
            PriceKind::Open => self.open,
            PriceKind::High => self.high,
            PriceKind::Low => self.low,
            PriceKind::Close => self.close,
            PriceKind::Median => (self.high + self.low) / 2.0,
            PriceKind::Typical => (self.high + self.low + self.close) / 3.0,
            PriceKind::Weighted => (self.high + self.low + 2.0 * self.close) / 4.0,
        }
    }
}

/// Which price an oscillator or comparison reads from a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceKind {
    Open,
    High,
    Low,
    #[default]
    Close,
    /// (high + low) / 2
    Median,
    /// (high + low + close) / 3
    Typical,
    /// (high + low + 2 * close) / 4
    Weighted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bar() -> Bar {
        Bar {
            symbol: "SPY".into(),
            time: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn derived_prices() {
        let bar = sample_bar();
        assert_eq!(bar.price(PriceKind::Low), 98.0);
        assert_eq!(bar.price(PriceKind::Median), 101.5);
        assert_eq!(bar.price(PriceKind::Typical), (105.0 + 98.0 + 103.0) / 3.0);
        assert_eq!(bar.price(PriceKind::Weighted), (105.0 + 98.0 + 206.0) / 4.0);
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }

    #[test]
    fn price_kind_uses_snake_case() {
        let json = serde_json::to_string(&PriceKind::Median).unwrap();
        assert_eq!(json, "\"median\"");
    }
}
