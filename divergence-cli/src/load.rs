//! CSV bar loading.
//!
//! Columns: `time,open,high,low,close[,volume]`, header row required.
//! `time` is `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS`.
//! Rows must be in ascending time order.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use divergence_core::domain::Bar;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

/// Symbol name for a CSV file: its file stem, upper-cased.
pub fn symbol_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

pub fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(time);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("unrecognized time '{raw}'"))
}

/// Read every bar from a CSV file.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_bars(file, &symbol_for(path)).with_context(|| format!("in {}", path.display()))
}

pub fn read_bars<R: std::io::Read>(reader: R, symbol: &str) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        // +2: header row, 1-based lines
        let line = line + 2;
        let row = row.with_context(|| format!("bad row at line {line}"))?;
        let bar = Bar {
            symbol: symbol.to_string(),
            time: parse_time(&row.time).with_context(|| format!("line {line}"))?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.map_or(0, |v| v.max(0.0) as u64),
        };
        if !bar.is_void() && !bar.is_sane() {
            warn!(symbol, line, "inconsistent OHLC values");
        }
        bars.push(bar);
    }
    debug!(symbol, bars = bars.len(), "loaded bars");
    Ok(bars)
}
