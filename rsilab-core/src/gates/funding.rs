//! Funding crowding gate: refuse to join an already crowded side.
//!
//! Longs are rejected when perpetual funding is strongly positive or the
//! long/short account ratio is stretched; shorts mirror this. Missing inputs
//! reject while the gate is enabled.

use crate::config::FundingGateConfig;
use crate::domain::TradeSide;

use super::{ConfirmationGate, GateContext, GateKind, GateOutcome};

#[derive(Debug, Clone)]
pub struct FundingGate {
    config: FundingGateConfig,
}

impl FundingGate {
    pub fn new(config: FundingGateConfig) -> Self {
        Self { config }
    }
}

impl ConfirmationGate for FundingGate {
    fn kind(&self) -> GateKind {
        GateKind::FundingCrowding
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::skipped(self.kind());
        }
        let metrics = ctx.snapshot.institutional;
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        let (Some(funding), Some(ratio)) =
            (finite(metrics.funding_rate), finite(metrics.long_short_ratio))
        else {
            return GateOutcome::rejected(self.kind(), "funding or long/short ratio unavailable");
        };

        let max_funding = self.config.max_funding_rate;
        let max_ratio = self.config.max_long_short_ratio;
        let crowded = match ctx.side {
            TradeSide::Long if funding > max_funding => {
                Some(format!("funding {funding:.5} above {max_funding:.5}"))
            }
            TradeSide::Long if ratio > max_ratio => {
                Some(format!("long/short ratio {ratio:.2} above {max_ratio:.2}"))
            }
            TradeSide::Short if funding < -max_funding => {
                Some(format!("funding {funding:.5} below {:.5}", -max_funding))
            }
            TradeSide::Short if ratio < 1.0 / max_ratio => Some(format!(
                "long/short ratio {ratio:.2} below {:.2}",
                1.0 / max_ratio
            )),
            _ => None,
        };

        let outcome = match crowded {
            Some(reason) => GateOutcome::rejected(self.kind(), reason),
            None => GateOutcome::passed(self.kind()),
        };
        outcome
            .with_metric("funding_rate", funding)
            .with_metric("long_short_ratio", ratio)
    }
}
