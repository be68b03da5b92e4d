//! Decision types: the engine's output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WaitReason;
use crate::gates::cardwell::CardwellRange;
use crate::gates::GateOutcome;
use crate::scoring::ScoreBreakdown;
use crate::trendline::{Interaction, Trendline};

/// Side of a trade setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    /// +1 for longs, -1 for shorts; turns side-relative distances into price offsets.
    pub fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }

    pub fn bias(self) -> Bias {
        match self {
            Self::Long => Bias::Bullish,
            Self::Short => Bias::Bearish,
        }
    }
}

/// What the caller should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalAction {
    Wait,
    Long,
    Short,
}

impl From<TradeSide> for SignalAction {
    fn from(side: TradeSide) -> Self {
        match side {
            TradeSide::Long => Self::Long,
            TradeSide::Short => Self::Short,
        }
    }
}

/// Directional market bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Risk-managed trade parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub side: TradeSide,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward_ratio: f64,
    /// The structure projection exceeded the maximum move and was capped.
    pub target_capped: bool,
    /// The target was raised to meet the minimum risk:reward.
    pub target_raised_for_min_rr: bool,
}

impl TradeSetup {
    /// Price distance from entry to stop.
    pub fn risk(&self) -> f64 {
        (self.entry - self.stop_loss).abs()
    }

    /// Price distance from entry to target.
    pub fn reward(&self) -> f64 {
        (self.take_profit - self.entry).abs()
    }

    /// Both the stop and the target sit above zero.
    pub fn has_positive_levels(&self) -> bool {
        let below_entry = match self.side {
            TradeSide::Long => self.risk(),
            TradeSide::Short => self.reward(),
        };
        self.entry > 0.0 && self.entry - below_entry > 0.0
    }
}

/// Everything the pipeline looked at, pass or fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub trendline: Option<Trendline>,
    pub interaction: Option<Interaction>,
    pub cardwell_range: Option<CardwellRange>,
    /// Gate outcomes in pipeline order, up to and including the first rejection.
    pub gates: Vec<GateOutcome>,
    pub score_breakdown: Option<ScoreBreakdown>,
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDecision {
    pub symbol: String,
    pub action: SignalAction,
    pub bias: Bias,
    pub setup: Option<TradeSetup>,
    /// Composite confidence in [0, 100]; zero for `Wait`.
    pub score: f64,
    pub rejection_reason: Option<WaitReason>,
    pub diagnostics: Diagnostics,
    /// Open time of the evaluation candle.
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl SignalDecision {
    /// A `Wait` decision with its reason and whatever diagnostics were gathered.
    pub fn wait(
        symbol: &str,
        reason: WaitReason,
        bias: Bias,
        diagnostics: Diagnostics,
        evaluated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            action: SignalAction::Wait,
            bias,
            setup: None,
            score: 0.0,
            rejection_reason: Some(reason),
            diagnostics,
            evaluated_at,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.action != SignalAction::Wait
    }
}
