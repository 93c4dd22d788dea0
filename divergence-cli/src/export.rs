//! Report rendering: plain table, JSON and CSV.

use anyhow::{Context, Result};
use divergence_core::domain::DivergenceRecord;
use serde::Serialize;

/// Detection result for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub symbol: String,
    pub source: String,
    pub oscillator: String,
    pub bars: usize,
    /// Divergences whose line style is enabled.
    pub divergences: Vec<DivergenceRecord>,
}

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

pub fn render(reports: &[FileReport], format: Format) -> Result<String> {
    match format {
        Format::Table => Ok(render_table(reports)),
        Format::Json => export_json(reports),
        Format::Csv => export_csv(reports),
    }
}

pub fn render_table(reports: &[FileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!(
            "=== {} ({}, {} bars, {}) ===\n",
            report.symbol,
            report.source,
            report.bars,
            report.oscillator
        ));
        if report.divergences.is_empty() {
            out.push_str("No divergences.\n\n");
            continue;
        }
        out.push_str(&format!(
            "{:<16} {:>6} {:<20} {:>12} {:>6} {:<20} {:>12}\n",
            "Kind", "Start", "Start Time", "Start Price", "End", "End Time", "End Price"
        ));
        out.push_str(&"-".repeat(98));
        out.push('\n');
        for r in &report.divergences {
            out.push_str(&format!(
                "{:<16} {:>6} {:<20} {:>12.4} {:>6} {:<20} {:>12.4}\n",
                r.kind.label(),
                r.start.index,
                r.start.time.to_string(),
                r.start.price,
                r.end.index,
                r.end.time.to_string(),
                r.end.price
            ));
        }
        out.push('\n');
    }
    out
}

pub fn export_json(reports: &[FileReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("failed to serialize divergences to JSON")
}

/// One row per divergence.
///
/// Columns: symbol, kind, start_index, start_time, start_price, end_index,
/// end_time, end_price
pub fn export_csv(reports: &[FileReport]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "symbol",
        "kind",
        "start_index",
        "start_time",
        "start_price",
        "end_index",
        "end_time",
        "end_price",
    ])?;
    for report in reports {
        for r in &report.divergences {
            wtr.write_record([
                report.symbol.clone(),
                r.kind.label().to_string(),
                r.start.index.to_string(),
                r.start.time.to_string(),
                format!("{:.6}", r.start.price),
                r.end.index.to_string(),
                r.end.time.to_string(),
                format!("{:.6}", r.end.price),
            ])?;
        }
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
