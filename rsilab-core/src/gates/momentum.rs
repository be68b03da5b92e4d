//! Momentum direction gate: OBV must be flowing with the trade.

use serde::{Deserialize, Serialize};

use crate::config::MomentumGateConfig;
use crate::domain::MarketSnapshot;
use crate::indicators::{linear_regression_slope, mean_abs, trailing_finite};

use super::{ConfirmationGate, GateContext, GateKind, GateOutcome};

/// OBV slope at the evaluation bar plus the scale it is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObvTrend {
    pub slope: f64,
    /// Mean |OBV| over the regression window; `None` without an OBV series.
    pub mean_abs: Option<f64>,
}

impl ObvTrend {
    /// Resolve the OBV trend for a snapshot.
    ///
    /// A provider-supplied `obv_slope` wins; otherwise the last `window`
    /// finite OBV values are regressed. Fewer than `window` finite values and
    /// no supplied slope means the trend is unavailable.
    pub fn resolve(snapshot: &MarketSnapshot<'_>, window: usize) -> Option<Self> {
        let recent = trailing_finite(snapshot.obv, window);
        let mean_abs = mean_abs(&recent);

        let supplied = snapshot
            .institutional
            .obv_slope
            .filter(|s| s.is_finite());
        let slope = match supplied {
            Some(slope) => slope,
            None if recent.len() == window => linear_regression_slope(&recent)?,
            None => return None,
        };
        Some(Self { slope, mean_abs })
    }

    /// Slope scaled by the OBV magnitude; `None` when no scale is known.
    pub fn normalized_slope(&self) -> Option<f64> {
        self.mean_abs
            .filter(|m| *m > 0.0)
            .map(|m| self.slope / m)
    }
}

#[derive(Debug, Clone)]
pub struct MomentumGate {
    config: MomentumGateConfig,
}

impl MomentumGate {
    pub fn new(config: MomentumGateConfig) -> Self {
        Self { config }
    }
}

impl ConfirmationGate for MomentumGate {
    fn kind(&self) -> GateKind {
        GateKind::MomentumDirection
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::skipped(self.kind());
        }
        let Some(trend) = ObvTrend::resolve(ctx.snapshot, self.config.obv_window) else {
            return GateOutcome::rejected(self.kind(), "obv slope unavailable");
        };

        let outcome = if ctx.side.sign() * trend.slope > 0.0 {
            GateOutcome::passed(self.kind())
        } else {
            GateOutcome::rejected(
                self.kind(),
                format!("obv slope {:.4} against {:?} side", trend.slope, ctx.side),
            )
        };
        outcome.with_metric("obv_slope", trend.slope)
    }
}
