//! K-bar confirmation: the bars after the breakout must hold beyond the line.
//!
//! Filters one-bar fakeouts. Until the confirmation bars have printed the
//! gate rejects as pending, so a same-bar breakout waits for the next
//! evaluation.

use crate::config::KBarConfig;

use super::{ConfirmationGate, GateContext, GateKind, GateOutcome};

#[derive(Debug, Clone)]
pub struct KBarGate {
    config: KBarConfig,
}

impl KBarGate {
    pub fn new(config: KBarConfig) -> Self {
        Self { config }
    }
}

impl ConfirmationGate for KBarGate {
    fn kind(&self) -> GateKind {
        GateKind::KBarConfirmation
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::skipped(self.kind());
        }
        let Some(breakout) = ctx.interaction.breakout_index else {
            return GateOutcome::rejected(self.kind(), "no breakout bar");
        };
        let k = self.config.confirm_bars;
        let printed = ctx.interaction.bars_since_breakout.min(k);
        if printed < k {
            return GateOutcome::rejected(
                self.kind(),
                format!("pending confirmation: {printed} of {k} bars printed"),
            )
            .with_metric("confirm_bars", k as f64);
        }

        let rsi = ctx.snapshot.rsi;
        let direction = ctx.trendline.direction;
        for i in breakout + 1..=breakout + k {
            let value = rsi.get(i).copied().unwrap_or(f64::NAN);
            if value.is_nan() || !direction.is_beyond(value, ctx.trendline.value_at(i)) {
                return GateOutcome::rejected(
                    self.kind(),
                    format!("bar {i} fell back inside the line"),
                )
                .with_metric("failed_index", i as f64);
            }
        }
        GateOutcome::passed(self.kind()).with_metric("confirm_bars", k as f64)
    }
}
