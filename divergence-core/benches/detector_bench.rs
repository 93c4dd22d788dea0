//! Criterion benchmarks for detection hot paths.
//!
//! Benchmarks:
//! 1. Pivot scan over a full series at several window sizes
//! 2. Detector bulk replay (history load)
//! 3. Detector bar-by-bar feed (live updates)

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use divergence_core::components::PrecomputedFactory;
use divergence_core::config::DetectorConfig;
use divergence_core::detection::{is_pivot_high, is_pivot_low};
use divergence_core::domain::{Bar, UpdateReason};
use divergence_core::{BarHistory, DivergenceDetector};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                symbol: "BENCH".into(),
                time: base + chrono::Duration::minutes(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn make_oscillator(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 50.0 + (i as f64 * 0.13).sin() * 25.0 + (i % 11) as f64 * 0.7)
        .collect()
}

fn config(left: usize, right: usize) -> DetectorConfig {
    DetectorConfig {
        left,
        right,
        ..DetectorConfig::default()
    }
}

// ── 1. Pivot scan ────────────────────────────────────────────────────

fn bench_pivot_scan(c: &mut Criterion) {
    let series = make_oscillator(10_000);
    let mut group = c.benchmark_group("pivot_scan");
    for window in [2usize, 5, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &w| {
            b.iter(|| {
                let mut hits = 0usize;
                for index in 0..series.len() {
                    if is_pivot_low(&series, index, w, w) || is_pivot_high(&series, index, w, w) {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }
    group.finish();
}

// ── 2–3. Detector ────────────────────────────────────────────────────

fn bench_detector(c: &mut Criterion) {
    let n = 10_000;
    let bars = make_bars(n);
    let osc = make_oscillator(n);

    c.bench_function("detector_bulk_10k", |b| {
        b.iter(|| {
            let factory = Arc::new(PrecomputedFactory::new(osc.clone()));
            let mut det = DivergenceDetector::new(config(5, 5), factory).unwrap();
            det.on_update(UpdateReason::HistoryUpdate, black_box(bars.as_slice()))
                .unwrap();
            black_box(det.store().len())
        })
    });

    c.bench_function("detector_bar_by_bar_10k", |b| {
        b.iter(|| {
            let factory = Arc::new(PrecomputedFactory::new(osc.clone()));
            let mut det = DivergenceDetector::new(config(5, 5), factory).unwrap();
            let mut history = BarHistory::with_capacity(n);
            for bar in &bars {
                history.push(bar.clone()).unwrap();
                det.on_update(UpdateReason::NewBar, &history).unwrap();
            }
            black_box(det.store().len())
        })
    });
}

criterion_group!(benches, bench_pivot_scan, bench_detector);
criterion_main!(benches);
