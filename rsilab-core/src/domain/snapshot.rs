//! Market snapshot: the frozen, read-only input of one evaluation.
//!
//! Snapshots borrow their series so that a replay can build one per bar over
//! a growing prefix without copying. Institutional metrics arrive already
//! fetched, rate-limited and cached by an external client; the engine only
//! reads them and treats missing values as "unavailable".

use serde::{Deserialize, Serialize};

use super::candle::Candle;

/// Externally resolved institutional-flow inputs for the evaluation bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalMetrics {
    /// Standard score of current open interest against its recent mean.
    pub oi_z_score: Option<f64>,
    /// Provider-side validity flag for `oi_z_score` (enough history, fresh data).
    pub oi_z_score_valid: bool,
    /// Precomputed OBV slope. When absent the engine regresses the OBV series.
    pub obv_slope: Option<f64>,
    /// Perpetual funding rate as a fraction (0.0001 = 0.01%).
    pub funding_rate: Option<f64>,
    /// Ratio of long to short accounts.
    pub long_short_ratio: Option<f64>,
}

impl InstitutionalMetrics {
    /// Metrics carrying only an open-interest z-score.
    pub fn with_oi_z_score(z_score: f64, valid: bool) -> Self {
        Self {
            oi_z_score: Some(z_score),
            oi_z_score_valid: valid,
            ..Self::default()
        }
    }
}

/// Read-only bundle passed into the decision engine.
///
/// `rsi` and (when non-empty) `obv` must be index-aligned with `candles`; the
/// last index is the evaluation bar.
#[derive(Debug, Clone, Copy)]
pub struct MarketSnapshot<'a> {
    pub symbol: &'a str,
    pub candles: &'a [Candle],
    pub rsi: &'a [f64],
    pub obv: &'a [f64],
    /// ATR at the evaluation bar.
    pub atr: Option<f64>,
    pub institutional: &'a InstitutionalMetrics,
    /// Higher-timeframe RSI readings, most recent last.
    pub htf_rsi: Option<&'a [f64]>,
}

impl<'a> MarketSnapshot<'a> {
    pub fn current_candle(&self) -> Option<&'a Candle> {
        self.candles.last()
    }

    pub fn current_rsi(&self) -> Option<f64> {
        self.rsi.last().copied()
    }

    /// Number of evaluable bars (the shorter of candles and RSI).
    pub fn len(&self) -> usize {
        self.candles.len().min(self.rsi.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
