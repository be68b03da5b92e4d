//! Criterion benchmarks for the evaluation hot paths.
//!
//! Benchmarks:
//! 1. Pivot detection over long RSI histories
//! 2. Consensus trendline search (pair enumeration + interior scan)
//! 3. Full single-snapshot evaluation

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rsilab_core::config::TrendlineConfig;
use rsilab_core::domain::{Candle, InstitutionalMetrics, MarketSnapshot};
use rsilab_core::trendline::{find_pivots, fit_trendline, PivotKind, TrendlineDirection};
use rsilab_core::{DecisionEngine, EngineConfig};

// ── Helpers ──────────────────────────────────────────────────────────

/// Oscillating RSI with a slow downward drift in its highs.
fn make_rsi(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let drift = 20.0 * (1.0 - t / n as f64);
            (50.0 + drift * (t * 0.21).sin() + 6.0 * (t * 0.05).cos()).clamp(1.0, 99.0)
        })
        .collect()
}

fn make_candles(rsi: &[f64]) -> Vec<Candle> {
    rsi.iter()
        .enumerate()
        .map(|(i, &r)| {
            let close = 100.0 + 0.5 * (r - 50.0);
            Candle {
                open_time: Utc
                    .timestamp_opt(1_700_000_000 + i as i64 * 3600, 0)
                    .unwrap(),
                open: close - 0.2,
                high: close + 0.8,
                low: close - 0.8,
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}

// ── 1. Pivots ────────────────────────────────────────────────────────

fn bench_pivots(c: &mut Criterion) {
    let mut group = c.benchmark_group("pivots");
    for &n in &[200, 1_000, 5_000] {
        let rsi = make_rsi(n);
        group.bench_with_input(BenchmarkId::new("highs", n), &n, |b, _| {
            b.iter(|| find_pivots(black_box(&rsi), 5, PivotKind::High));
        });
    }
    group.finish();
}

// ── 2. Trendline Search ──────────────────────────────────────────────

fn bench_fitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("trendline_fit");
    let config = TrendlineConfig::default();
    for &n in &[200, 1_000, 5_000] {
        let rsi = make_rsi(n);
        let pivots = find_pivots(&rsi, 3, PivotKind::High);
        group.bench_with_input(BenchmarkId::new("resistance", n), &n, |b, _| {
            b.iter(|| {
                fit_trendline(
                    black_box(&rsi),
                    black_box(&pivots),
                    TrendlineDirection::Resistance,
                    &config,
                )
            });
        });
    }
    group.finish();
}

// ── 3. Full Evaluation ───────────────────────────────────────────────

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let engine = DecisionEngine::new(EngineConfig::default()).unwrap();
    let metrics = InstitutionalMetrics::with_oi_z_score(2.0, true);
    for &n in &[200, 1_000] {
        let rsi = make_rsi(n);
        let candles = make_candles(&rsi);
        let obv: Vec<f64> = (0..n).map(|i| 1_000.0 + 10.0 * i as f64).collect();
        let snapshot = MarketSnapshot {
            symbol: "BENCH",
            candles: &candles,
            rsi: &rsi,
            obv: &obv,
            atr: Some(1.0),
            institutional: &metrics,
            htf_rsi: None,
        };
        group.bench_with_input(BenchmarkId::new("default", n), &n, |b, _| {
            b.iter(|| engine.evaluate(black_box(&snapshot)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pivots, bench_fitter, bench_evaluate);
criterion_main!(benches);
