//! Replay statistics: pure functions over completed trades.
//!
//! Everything is measured in R (multiples of initial risk) so results from
//! instruments with different prices and volatilities are comparable.

use serde::{Deserialize, Serialize};

use crate::replay::ReplayTrade;

/// Aggregate statistics for one replay run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayMetrics {
    pub trade_count: usize,
    pub win_rate: f64,
    pub total_r: f64,
    pub avg_r: f64,
    pub profit_factor: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
}

impl ReplayMetrics {
    pub fn compute(trades: &[ReplayTrade]) -> Self {
        Self {
            trade_count: trades.len(),
            win_rate: win_rate(trades),
            total_r: total_r(trades),
            avg_r: avg_r(trades),
            profit_factor: profit_factor(trades),
            max_consecutive_wins: max_consecutive_wins(trades),
            max_consecutive_losses: max_consecutive_losses(trades),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Fraction of trades with a positive R multiple.
pub fn win_rate(trades: &[ReplayTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

pub fn total_r(trades: &[ReplayTrade]) -> f64 {
    trades.iter().map(|t| t.r_multiple).sum()
}

pub fn avg_r(trades: &[ReplayTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    total_r(trades) / trades.len() as f64
}

/// Profit factor: gross winning R / gross losing R.
///
/// Capped at 100.0 for edge cases (all winners, zero losses).
pub fn profit_factor(trades: &[ReplayTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = trades
        .iter()
        .filter(|t| t.r_multiple > 0.0)
        .map(|t| t.r_multiple)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.r_multiple < 0.0)
        .map(|t| t.r_multiple.abs())
        .sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

pub fn max_consecutive_wins(trades: &[ReplayTrade]) -> usize {
    max_consecutive(trades, true)
}

pub fn max_consecutive_losses(trades: &[ReplayTrade]) -> usize {
    max_consecutive(trades, false)
}

fn max_consecutive(trades: &[ReplayTrade], winners: bool) -> usize {
    let mut max_streak = 0usize;
    let mut current = 0;

    for trade in trades {
        if trade.is_winner() == winners {
            current += 1;
            max_streak = max_streak.max(current);
        } else {
            current = 0;
        }
    }
    max_streak
}
