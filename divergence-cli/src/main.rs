//! Divergence CLI: detect oscillator divergences in CSV bar files.
//!
//! Commands:
//! - `detect`: run the detector over one or more CSV files and report divergences
//! - `config`: print the default detector configuration as TOML

mod export;
mod load;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use divergence_core::config::{DetectorConfig, OscillatorConfig, OscillatorKind};
use divergence_core::domain::UpdateReason;
use divergence_core::style::visible;
use divergence_core::{BarHistory, DivergenceDetector, OscillatorFactory, PriceHistory};
use divergence_oscillators::BuiltinOscillators;

use crate::export::{render, FileReport, Format};

#[derive(Parser)]
#[command(
    name = "divergence",
    about = "Divergence CLI: price/oscillator divergence detection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect divergences in CSV bar files (time,open,high,low,close[,volume]).
    Detect {
        /// CSV files to scan, one symbol per file.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Path to a TOML detector config. Defaults to the built-in config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Oscillator: rsi, macd, ao. Replaces the config's oscillator with its defaults.
        #[arg(long)]
        oscillator: Option<String>,

        /// Bars to the left of a pivot.
        #[arg(long)]
        left: Option<usize>,

        /// Bars to the right of a pivot (confirmation lag).
        #[arg(long)]
        right: Option<usize>,

        /// Report hidden divergences too.
        #[arg(long, default_value_t = false)]
        all_kinds: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Write the report to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the default detector configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "divergence=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            files,
            config,
            oscillator,
            left,
            right,
            all_kinds,
            format,
            output,
        } => {
            let config = build_config(
                config.as_deref(),
                oscillator.as_deref(),
                left,
                right,
                all_kinds,
            )?;
            run_detect(&files, &config, format, output.as_deref())
        }
        Commands::Config => {
            print!("{}", DetectorConfig::default().to_toml()?);
            Ok(())
        }
    }
}

/// Layer command-line overrides on top of the file (or default) config.
fn build_config(
    path: Option<&Path>,
    oscillator: Option<&str>,
    left: Option<usize>,
    right: Option<usize>,
    all_kinds: bool,
) -> Result<DetectorConfig> {
    let mut config = match path {
        Some(path) => DetectorConfig::from_file(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(name) = oscillator {
        let kind: OscillatorKind = name.parse()?;
        if config.oscillator.kind() != kind {
            config.oscillator = OscillatorConfig::defaults_for(kind);
        }
    }
    if let Some(left) = left {
        config.left = left;
    }
    if let Some(right) = right {
        config.right = right;
    }
    if all_kinds {
        config.styles.enable_all();
    }
    config.validate()?;
    Ok(config)
}

fn run_detect(
    files: &[PathBuf],
    config: &DetectorConfig,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let factory: Arc<dyn OscillatorFactory> = Arc::new(BuiltinOscillators);

    let reports = files
        .par_iter()
        .map(|path| detect_file(path, config, Arc::clone(&factory)))
        .collect::<Result<Vec<_>>>()?;

    let total: usize = reports.iter().map(|r| r.divergences.len()).sum();
    info!(files = reports.len(), divergences = total, "detection finished");

    let rendered = render(&reports, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report saved to: {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Feed one file's bars to a fresh detector, one confirmed bar at a time.
fn detect_file(
    path: &Path,
    config: &DetectorConfig,
    factory: Arc<dyn OscillatorFactory>,
) -> Result<FileReport> {
    let bars = load::load_bars(path)?;
    let symbol = load::symbol_for(path);

    let mut detector = DivergenceDetector::new(config.clone(), factory)?;
    let mut history = BarHistory::with_capacity(bars.len());
    for bar in bars {
        history
            .push(bar)
            .with_context(|| format!("{}: bars out of order", path.display()))?;
        detector.on_update(UpdateReason::NewBar, &history)?;
    }

    let divergences = visible(detector.store(), &config.styles)
        .map(|(record, _)| record.clone())
        .collect::<Vec<_>>();
    info!(
        symbol = %symbol,
        bars = history.len(),
        found = detector.store().len(),
        shown = divergences.len(),
        "scanned"
    );

    Ok(FileReport {
        symbol,
        source: path.display().to_string(),
        oscillator: detector.oscillator().name().to_string(),
        bars: history.len(),
        divergences,
    })
}
