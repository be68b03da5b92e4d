//! Hand-built RSI paths with price tracking RSI.
//!
//! A resistance line runs from an 82 peak at bar 5 to a 74 lower high at
//! bar 40 and is crossed at bar 56.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use rsilab_core::domain::{Candle, InstitutionalMetrics};
use rsilab_runner::EvaluationJob;

pub fn base_rsi() -> Vec<f64> {
    let mut rsi = vec![60.0, 64.0, 68.0, 72.0, 76.0, 82.0, 76.0, 70.0, 64.0, 58.0, 55.0];
    rsi.extend([
        52.0, 50.0, 48.0, 47.0, 49.0, 52.0, 55.0, 53.0, 50.0, 48.0, 46.0, 47.0, 50.0, 53.0, 55.0,
        54.0, 51.0, 49.0, 47.0, 46.0, 48.0, 51.0, 53.0, 54.0, 55.0,
    ]);
    rsi.extend([56.0, 60.0, 64.0, 68.0, 74.0, 68.0, 63.0, 59.0, 56.0, 55.0]);
    rsi.extend([56.0, 57.5, 59.0, 60.5, 62.0, 63.5, 65.0, 66.5, 68.0, 69.5, 72.0]);
    rsi
}

/// Breakout at 56, pullback to the line at 62.
pub fn retest_rsi() -> Vec<f64> {
    let mut rsi = base_rsi();
    rsi.extend([74.0, 75.0, 75.0, 72.0, 69.0, 70.0]);
    rsi
}

/// Breakout at 56, twenty bars of extension.
pub fn continuation_rsi() -> Vec<f64> {
    let mut rsi = base_rsi();
    rsi.extend((57..77).map(|i| 72.0 + 0.2 * (i - 56) as f64));
    rsi
}

/// Close moves half a price point per RSI point; range ±0.5.
pub fn candles_tracking(rsi: &[f64]) -> Vec<Candle> {
    rsi.iter()
        .enumerate()
        .map(|(i, &r)| {
            let close = 100.0 + 0.5 * (r - 50.0);
            Candle {
                open_time: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}

pub fn rising_obv(n: usize) -> Vec<f64> {
    (0..n).map(|i| 1_000.0 + 10.0 * i as f64).collect()
}

pub fn strong_flow() -> InstitutionalMetrics {
    InstitutionalMetrics::with_oi_z_score(2.0, true)
}

pub fn job(symbol: &str, rsi: Vec<f64>) -> EvaluationJob {
    EvaluationJob {
        symbol: symbol.to_string(),
        candles: candles_tracking(&rsi),
        obv: rising_obv(rsi.len()),
        rsi,
        atr: Some(1.0),
        institutional: strong_flow(),
        htf_rsi: None,
    }
}
