//! Hidden divergence: a continuation pattern that adds score, never rejects.
//!
//! Bullish: price prints a higher swing low while RSI prints a lower low at
//! the same bars. Bearish mirrors it on swing highs. Only the last two price
//! swings inside the lookback window are compared.

use crate::config::DivergenceConfig;
use crate::domain::{MarketSnapshot, TradeSide};
use crate::trendline::{find_pivots, PivotKind};

use super::{ConfirmationGate, GateContext, GateKind, GateOutcome};

/// Metadata key set to 1.0 when a divergence was found.
pub const FOUND_KEY: &str = "found";

/// Search the snapshot for hidden divergence supporting `side`.
pub fn hidden_divergence(
    snapshot: &MarketSnapshot<'_>,
    side: TradeSide,
    config: &DivergenceConfig,
) -> bool {
    let n = snapshot.candles.len().min(snapshot.rsi.len());
    let start = n.saturating_sub(config.lookback);
    let window = &snapshot.candles[start..n];

    let (kind, prices): (PivotKind, Vec<f64>) = match side {
        TradeSide::Long => (PivotKind::Low, window.iter().map(|c| c.low).collect()),
        TradeSide::Short => (PivotKind::High, window.iter().map(|c| c.high).collect()),
    };
    let swings = find_pivots(&prices, config.order, kind);
    let [.., older, newer] = swings.as_slice() else {
        return false;
    };

    let rsi_older = snapshot.rsi[start + older.index];
    let rsi_newer = snapshot.rsi[start + newer.index];
    if rsi_older.is_nan() || rsi_newer.is_nan() {
        return false;
    }
    match side {
        TradeSide::Long => newer.value > older.value && rsi_newer < rsi_older,
        TradeSide::Short => newer.value < older.value && rsi_newer > rsi_older,
    }
}

#[derive(Debug, Clone)]
pub struct DivergenceGate {
    config: DivergenceConfig,
}

impl DivergenceGate {
    pub fn new(config: DivergenceConfig) -> Self {
        Self { config }
    }
}

impl ConfirmationGate for DivergenceGate {
    fn kind(&self) -> GateKind {
        GateKind::HiddenDivergence
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::skipped(self.kind());
        }
        if hidden_divergence(ctx.snapshot, ctx.side, &self.config) {
            GateOutcome::passed(self.kind()).with_metric(FOUND_KEY, 1.0)
        } else {
            GateOutcome::passed(self.kind())
                .with_metric(FOUND_KEY, 0.0)
                .with_reason("no hidden divergence")
        }
    }
}
