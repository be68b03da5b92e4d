//! Multi-timeframe confluence: no longs into a bearish higher timeframe,
//! no shorts into a bullish one.

use crate::config::MtfConfig;
use crate::domain::TradeSide;

use super::{ConfirmationGate, GateContext, GateKind, GateOutcome};

#[derive(Debug, Clone)]
pub struct MtfGate {
    config: MtfConfig,
}

impl MtfGate {
    pub fn new(config: MtfConfig) -> Self {
        Self { config }
    }
}

impl ConfirmationGate for MtfGate {
    fn kind(&self) -> GateKind {
        GateKind::MultiTimeframe
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::skipped(self.kind());
        }
        let htf = ctx
            .snapshot
            .htf_rsi
            .and_then(|series| series.iter().rev().copied().find(|v| v.is_finite()));
        let Some(htf) = htf else {
            return GateOutcome::rejected(self.kind(), "higher-timeframe rsi unavailable");
        };

        let outcome = match ctx.side {
            TradeSide::Long if htf < self.config.bearish_below => GateOutcome::rejected(
                self.kind(),
                format!(
                    "higher timeframe bearish: rsi {htf:.1} below {:.1}",
                    self.config.bearish_below
                ),
            ),
            TradeSide::Short if htf > self.config.bullish_above => GateOutcome::rejected(
                self.kind(),
                format!(
                    "higher timeframe bullish: rsi {htf:.1} above {:.1}",
                    self.config.bullish_above
                ),
            ),
            _ => GateOutcome::passed(self.kind()),
        };
        outcome.with_metric("htf_rsi", htf)
    }
}
