//! Institutional flow gate: open-interest z-score must confirm the move.
//!
//! Fail-closed: a missing or provider-invalidated z-score rejects. The
//! z-score is unsigned with respect to the trade side; rising open interest
//! confirms participation in either direction.

use crate::config::InstitutionalGateConfig;

use super::{ConfirmationGate, GateContext, GateKind, GateOutcome};

#[derive(Debug, Clone)]
pub struct InstitutionalFlowGate {
    config: InstitutionalGateConfig,
}

impl InstitutionalFlowGate {
    pub fn new(config: InstitutionalGateConfig) -> Self {
        Self { config }
    }
}

impl ConfirmationGate for InstitutionalFlowGate {
    fn kind(&self) -> GateKind {
        GateKind::InstitutionalFlow
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::skipped(self.kind());
        }
        let threshold = self.config.oi_z_threshold;
        let metrics = ctx.snapshot.institutional;

        let Some(z) = metrics.oi_z_score.filter(|z| z.is_finite()) else {
            return GateOutcome::rejected(self.kind(), "oi z-score unavailable")
                .with_metric("threshold", threshold);
        };
        let outcome = |o: GateOutcome| {
            o.with_metric("oi_z_score", z)
                .with_metric("threshold", threshold)
        };

        if !metrics.oi_z_score_valid {
            return outcome(GateOutcome::rejected(self.kind(), "oi z-score flagged invalid"));
        }
        if z < threshold {
            return outcome(GateOutcome::rejected(
                self.kind(),
                format!("oi z-score {z:.2} below {threshold:.2}"),
            ));
        }
        outcome(GateOutcome::passed(self.kind()))
    }
}
