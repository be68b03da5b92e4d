//! Simplified historical replay.
//!
//! Walks a series bar by bar, evaluating the prefix ending at each bar as if
//! it were live. An actionable decision opens a position at that bar's close;
//! later bars are checked against its stop and target until one is hit or the
//! data runs out. One position at a time, no sizing, no costs.
//!
//! Intrabar ambiguity resolves worst case: when a bar spans both levels the
//! stop is assumed to fill first.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use rsilab_core::domain::{Candle, InstitutionalMetrics, MarketSnapshot, TradeSetup};
use rsilab_core::{DecisionEngine, EvaluationError, TradeSide};

use crate::metrics::ReplayMetrics;

/// Borrowed full-history inputs for one instrument.
#[derive(Debug, Clone, Copy)]
pub struct ReplaySeries<'a> {
    pub symbol: &'a str,
    pub candles: &'a [Candle],
    pub rsi: &'a [f64],
    pub obv: &'a [f64],
    /// ATR per bar, aligned with `candles`.
    pub atr: &'a [f64],
    pub institutional: &'a InstitutionalMetrics,
}

impl<'a> ReplaySeries<'a> {
    /// Snapshot of bars `0..=index`.
    fn prefix(&self, index: usize) -> MarketSnapshot<'a> {
        let end = index + 1;
        MarketSnapshot {
            symbol: self.symbol,
            candles: &self.candles[..end],
            rsi: self.rsi.get(..end).unwrap_or(self.rsi),
            obv: self.obv.get(..end).unwrap_or(self.obv),
            atr: self.atr.get(index).copied().filter(|v| v.is_finite()),
            institutional: self.institutional,
            htf_rsi: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Still open at the last bar; closed at its close.
    EndOfData,
}

/// A completed replay position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayTrade {
    pub side: TradeSide,
    pub entry_index: usize,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Decision score at entry.
    pub score: f64,
    /// Result in units of initial risk.
    pub r_multiple: f64,
}

impl ReplayTrade {
    pub fn is_winner(&self) -> bool {
        self.r_multiple > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }
}

/// Output of one replay run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub symbol: String,
    /// Bars for which a decision was computed.
    pub bars_evaluated: usize,
    /// Actionable decisions seen while flat.
    pub signals: usize,
    pub trades: Vec<ReplayTrade>,
    pub metrics: ReplayMetrics,
}

struct OpenPosition {
    entry_index: usize,
    setup: TradeSetup,
    score: f64,
}

impl OpenPosition {
    /// Exit level hit by `candle`, stop first.
    fn exit_on(&self, candle: &Candle) -> Option<(f64, ExitReason)> {
        let s = &self.setup;
        let (stop_hit, target_hit) = match s.side {
            TradeSide::Long => (candle.low <= s.stop_loss, candle.high >= s.take_profit),
            TradeSide::Short => (candle.high >= s.stop_loss, candle.low <= s.take_profit),
        };
        if stop_hit {
            Some((s.stop_loss, ExitReason::StopLoss))
        } else if target_hit {
            Some((s.take_profit, ExitReason::TakeProfit))
        } else {
            None
        }
    }

    fn close(self, exit_index: usize, exit_price: f64, exit_reason: ExitReason) -> ReplayTrade {
        let s = self.setup;
        let risk = s.risk();
        let r_multiple = if risk > 0.0 {
            s.side.sign() * (exit_price - s.entry) / risk
        } else {
            0.0
        };
        ReplayTrade {
            side: s.side,
            entry_index: self.entry_index,
            entry_price: s.entry,
            exit_index,
            exit_price,
            exit_reason,
            stop_loss: s.stop_loss,
            take_profit: s.take_profit,
            score: self.score,
            r_multiple,
        }
    }
}

/// Replay `series` through `engine`.
///
/// Bars before the engine's `min_bars` are skipped since every decision there
/// is a `Wait`. Misaligned series surface as the engine's input error.
pub fn replay(
    engine: &DecisionEngine,
    series: &ReplaySeries<'_>,
) -> Result<ReplayReport, EvaluationError> {
    let n = series.candles.len();
    let first = engine.config().min_bars.saturating_sub(1);
    let mut trades = Vec::new();
    let mut open: Option<OpenPosition> = None;
    let mut bars_evaluated = 0;
    let mut signals = 0;

    for index in first..n {
        let candle = &series.candles[index];

        if let Some(position) = open.take() {
            match position.exit_on(candle) {
                Some((price, reason)) => {
                    trace!(symbol = series.symbol, index, ?reason, "exit");
                    trades.push(position.close(index, price, reason));
                    continue;
                }
                None => {
                    open = Some(position);
                    continue;
                }
            }
        }

        let decision = engine.evaluate(&series.prefix(index))?;
        bars_evaluated += 1;
        if let (true, Some(setup)) = (decision.is_actionable(), decision.setup) {
            signals += 1;
            trace!(symbol = series.symbol, index, side = ?setup.side, "entry");
            open = Some(OpenPosition {
                entry_index: index,
                setup,
                score: decision.score,
            });
        }
    }

    if let Some(position) = open {
        let last = n - 1;
        let price = series.candles[last].close;
        trades.push(position.close(last, price, ExitReason::EndOfData));
    }

    let metrics = ReplayMetrics::compute(&trades);
    debug!(
        symbol = series.symbol,
        bars_evaluated,
        trades = trades.len(),
        total_r = metrics.total_r,
        "replay finished"
    );
    Ok(ReplayReport {
        symbol: series.symbol.to_string(),
        bars_evaluated,
        signals,
        trades,
        metrics,
    })
}
