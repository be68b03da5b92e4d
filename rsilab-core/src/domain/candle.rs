//! Candle: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candle for a single instrument and interval.
///
/// Indicator series handed to the engine (RSI, OBV) are index-aligned with
/// the candle slice: `rsi[i]` was computed from `candles[..=i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Returns true if any OHLC field is NaN (void candle).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic sanity check: high >= low, high bounds open/close, prices positive.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Highest high and lowest low over `candles[from..=to]`, skipping void candles.
///
/// Returns `None` when the range is empty, out of bounds, or entirely void.
pub fn price_range(candles: &[Candle], from: usize, to: usize) -> Option<(f64, f64)> {
    if from > to || to >= candles.len() {
        return None;
    }
    candles[from..=to]
        .iter()
        .filter(|c| !c.is_void())
        .fold(None, |acc, c| match acc {
            None => Some((c.high, c.low)),
            Some((hi, lo)) => Some((hi.max(c.high), lo.min(c.low))),
        })
}
