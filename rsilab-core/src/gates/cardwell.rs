//! Cardwell range gate: the RSI regime must agree with the breakout side.
//!
//! Range-shift theory: in uptrends RSI oscillates between roughly 40 and 80,
//! in downtrends between 20 and 60. The current reading is bucketed into six
//! bands, each implying a bias.

use serde::{Deserialize, Serialize};

use crate::config::CardwellConfig;
use crate::domain::Bias;

use super::{ConfirmationGate, GateContext, GateKind, GateOutcome};

/// RSI regime per Cardwell range rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardwellRange {
    BullOverbought,
    BullMomentum,
    BullNeutral,
    BearNeutral,
    BearMomentum,
    BearOversold,
}

/// Scoring tier of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeTier {
    Momentum,
    Neutral,
    /// Overbought / oversold; late in the move.
    Exhaustion,
}

impl CardwellRange {
    /// Bucket an RSI value. Band edges are inclusive on the bull side.
    pub fn classify(rsi: f64, config: &CardwellConfig) -> Self {
        if rsi >= config.overbought {
            Self::BullOverbought
        } else if rsi >= config.bull_momentum_floor {
            Self::BullMomentum
        } else if rsi >= config.midline {
            Self::BullNeutral
        } else if rsi >= config.bear_momentum_ceiling {
            Self::BearNeutral
        } else if rsi > config.oversold {
            Self::BearMomentum
        } else {
            Self::BearOversold
        }
    }

    pub fn bias(self) -> Bias {
        match self {
            Self::BullOverbought | Self::BullMomentum | Self::BullNeutral => Bias::Bullish,
            Self::BearNeutral | Self::BearMomentum | Self::BearOversold => Bias::Bearish,
        }
    }

    pub fn tier(self) -> RangeTier {
        match self {
            Self::BullMomentum | Self::BearMomentum => RangeTier::Momentum,
            Self::BullNeutral | Self::BearNeutral => RangeTier::Neutral,
            Self::BullOverbought | Self::BearOversold => RangeTier::Exhaustion,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardwellGate {
    config: CardwellConfig,
}

impl CardwellGate {
    pub fn new(config: CardwellConfig) -> Self {
        Self { config }
    }
}

impl ConfirmationGate for CardwellGate {
    fn kind(&self) -> GateKind {
        GateKind::CardwellRange
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::skipped(self.kind());
        }
        let Some(rsi) = ctx.current_rsi() else {
            return GateOutcome::rejected(self.kind(), "current rsi unavailable");
        };

        let range = CardwellRange::classify(rsi, &self.config);
        let outcome = if range.bias() == ctx.side.bias() {
            GateOutcome::passed(self.kind())
        } else {
            GateOutcome::rejected(
                self.kind(),
                format!("{range:?} range disagrees with {:?} side", ctx.side),
            )
        };
        outcome.with_metric("rsi", rsi)
    }
}
