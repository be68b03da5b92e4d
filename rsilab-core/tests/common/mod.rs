//! Shared fixtures for integration tests.
//!
//! The base RSI path: an overbought peak at bar 5 (82), a choppy base in the
//! high 40s and low 50s, a lower high at bar 40 (74), a dip to 55 at bar 45,
//! then a steady climb that crosses the 5→40 resistance line at bar 56.
//! Prices track RSI linearly so that swings line up across both series.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use rsilab_core::domain::{Candle, InstitutionalMetrics, MarketSnapshot};

pub fn base_rsi() -> Vec<f64> {
    let mut rsi = vec![60.0, 64.0, 68.0, 72.0, 76.0, 82.0, 76.0, 70.0, 64.0, 58.0, 55.0];
    // 11..=35: base with two swing highs at 55 and swing lows at 46-47
    rsi.extend([
        52.0, 50.0, 48.0, 47.0, 49.0, 52.0, 55.0, 53.0, 50.0, 48.0, 46.0, 47.0, 50.0, 53.0, 55.0,
        54.0, 51.0, 49.0, 47.0, 46.0, 48.0, 51.0, 53.0, 54.0, 55.0,
    ]);
    // 36..=45: rally to the lower high, pullback
    rsi.extend([56.0, 60.0, 64.0, 68.0, 74.0, 68.0, 63.0, 59.0, 56.0, 55.0]);
    // 46..=56: climb through the line
    rsi.extend([56.0, 57.5, 59.0, 60.5, 62.0, 63.5, 65.0, 66.5, 68.0, 69.5, 72.0]);
    rsi
}

/// Breakout at bar 56, extension, then back to within a point of the line
/// six bars later with a small upward bounce.
pub fn retest_rsi() -> Vec<f64> {
    let mut rsi = base_rsi();
    rsi.extend([74.0, 75.0, 75.0, 72.0, 69.0, 70.0]);
    rsi
}

/// Breakout at bar 56 followed by twenty bars of steady extension.
pub fn continuation_rsi() -> Vec<f64> {
    let mut rsi = base_rsi();
    rsi.extend((57..77).map(|i| 72.0 + 0.2 * (i - 56) as f64));
    rsi
}

/// Candles whose close moves half a price point per RSI point.
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

/// Owned inputs for one evaluation.
pub struct Fixture {
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub rsi: Vec<f64>,
    pub obv: Vec<f64>,
    pub atr: Option<f64>,
    pub metrics: InstitutionalMetrics,
    pub htf_rsi: Option<Vec<f64>>,
}

impl Fixture {
    /// Rising OBV, ATR of 1.0, valid OI z-score of 2.0.
    pub fn from_rsi(rsi: Vec<f64>) -> Self {
        let candles = candles_tracking(&rsi);
        let obv = (0..rsi.len()).map(|i| 1_000.0 + 10.0 * i as f64).collect();
        Self {
            symbol: "BTCUSDT".into(),
            candles,
            rsi,
            obv,
            atr: Some(1.0),
            metrics: InstitutionalMetrics::with_oi_z_score(2.0, true),
            htf_rsi: None,
        }
    }

    pub fn snapshot(&self) -> MarketSnapshot<'_> {
        MarketSnapshot {
            symbol: &self.symbol,
            candles: &self.candles,
            rsi: &self.rsi,
            obv: &self.obv,
            atr: self.atr,
            institutional: &self.metrics,
            htf_rsi: self.htf_rsi.as_deref(),
        }
    }
}
