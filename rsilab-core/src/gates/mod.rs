//! Confirmation gates: independent checks run on a breakout candidate.
//!
//! Each gate inspects the frozen snapshot plus the candidate (side, line,
//! interaction) and produces a `GateOutcome`. The pipeline runs the enabled
//! gates in a fixed order and stops at the first rejection. Disabled gates
//! report `Skipped` and count as passed.
//!
//! # Architecture invariant
//! Gates are stateless and see only the snapshot and the candidate. They never
//! reach for external data; anything institutional arrives pre-resolved in
//! `InstitutionalMetrics`.

pub mod cardwell;
pub mod divergence;
pub mod funding;
pub mod institutional;
pub mod k_bar;
pub mod momentum;
pub mod mtf;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::domain::{MarketSnapshot, TradeSide};
use crate::trendline::{Interaction, Trendline};

pub use cardwell::{CardwellGate, CardwellRange, RangeTier};
pub use divergence::DivergenceGate;
pub use funding::FundingGate;
pub use institutional::InstitutionalFlowGate;
pub use k_bar::KBarGate;
pub use momentum::{MomentumGate, ObvTrend};
pub use mtf::MtfGate;

/// Identity of a gate, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    InstitutionalFlow,
    FundingCrowding,
    MomentumDirection,
    CardwellRange,
    KBarConfirmation,
    MultiTimeframe,
    HiddenDivergence,
}

impl GateKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::InstitutionalFlow => "institutional_flow",
            Self::FundingCrowding => "funding_crowding",
            Self::MomentumDirection => "momentum_direction",
            Self::CardwellRange => "cardwell_range",
            Self::KBarConfirmation => "k_bar_confirmation",
            Self::MultiTimeframe => "multi_timeframe",
            Self::HiddenDivergence => "hidden_divergence",
        }
    }

    /// Mandatory gates can reject; the divergence gate only adds score.
    pub fn is_mandatory(self) -> bool {
        self != Self::HiddenDivergence
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verdict of a single gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateVerdict {
    Passed,
    Rejected,
    /// Gate disabled by configuration; treated as passed.
    Skipped,
}

/// A gate's verdict plus the values it looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub gate: GateKind,
    pub verdict: GateVerdict,
    pub reason: Option<String>,
    /// Numeric state at evaluation time (actual vs threshold and the like).
    /// `BTreeMap` keeps serialized diagnostics stable.
    pub metadata: BTreeMap<String, f64>,
}

impl GateOutcome {
    pub fn passed(gate: GateKind) -> Self {
        Self {
            gate,
            verdict: GateVerdict::Passed,
            reason: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn rejected(gate: GateKind, reason: impl Into<String>) -> Self {
        Self {
            gate,
            verdict: GateVerdict::Rejected,
            reason: Some(reason.into()),
            metadata: BTreeMap::new(),
        }
    }

    pub fn skipped(gate: GateKind) -> Self {
        Self {
            gate,
            verdict: GateVerdict::Skipped,
            reason: Some("disabled".into()),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, key: &str, value: f64) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_rejected(&self) -> bool {
        self.verdict == GateVerdict::Rejected
    }

    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).copied()
    }
}

/// Everything a gate may look at for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub snapshot: &'a MarketSnapshot<'a>,
    pub side: TradeSide,
    pub trendline: &'a Trendline,
    pub interaction: &'a Interaction,
}

impl GateContext<'_> {
    /// RSI at the evaluation bar.
    pub fn current_rsi(&self) -> Option<f64> {
        self.snapshot.current_rsi().filter(|v| !v.is_nan())
    }
}

/// A single confirmation check.
///
/// # Architecture invariant
/// `check` is pure: the same context always yields the same outcome.
pub trait ConfirmationGate: Send + Sync {
    fn kind(&self) -> GateKind;

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome;
}

// ─── Pipeline ────────────────────────────────────────────────────────

/// Result of running the pipeline on one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Outcomes in pipeline order, up to and including the first rejection.
    pub outcomes: Vec<GateOutcome>,
}

impl PipelineReport {
    /// The first rejecting outcome, if any.
    pub fn rejection(&self) -> Option<&GateOutcome> {
        self.outcomes.iter().find(|o| o.is_rejected())
    }

    pub fn outcome(&self, gate: GateKind) -> Option<&GateOutcome> {
        self.outcomes.iter().find(|o| o.gate == gate)
    }

    /// Whether the divergence gate ran and found a pattern.
    pub fn divergence_found(&self) -> bool {
        self.outcome(GateKind::HiddenDivergence)
            .and_then(|o| o.metric(divergence::FOUND_KEY))
            .is_some_and(|v| v > 0.0)
    }
}

/// The ordered gate sequence of one engine configuration.
pub struct GatePipeline {
    gates: Vec<Box<dyn ConfirmationGate>>,
}

impl GatePipeline {
    /// All gates in fixed order, each carrying its own configuration
    /// (including its `enabled` flag).
    pub fn from_config(config: &GateConfig) -> Self {
        let gates: Vec<Box<dyn ConfirmationGate>> = vec![
            Box::new(InstitutionalFlowGate::new(config.institutional.clone())),
            Box::new(FundingGate::new(config.funding.clone())),
            Box::new(MomentumGate::new(config.momentum.clone())),
            Box::new(CardwellGate::new(config.cardwell.clone())),
            Box::new(KBarGate::new(config.k_bar.clone())),
            Box::new(MtfGate::new(config.mtf.clone())),
            Box::new(DivergenceGate::new(config.divergence.clone())),
        ];
        Self { gates }
    }

    pub fn kinds(&self) -> Vec<GateKind> {
        self.gates.iter().map(|g| g.kind()).collect()
    }

    /// Run gates in order, stopping after the first rejection.
    pub fn run(&self, ctx: &GateContext<'_>) -> PipelineReport {
        let mut outcomes = Vec::with_capacity(self.gates.len());
        for gate in &self.gates {
            let outcome = gate.check(ctx);
            let rejected = outcome.is_rejected();
            outcomes.push(outcome);
            if rejected {
                break;
            }
        }
        PipelineReport { outcomes }
    }
}

impl fmt::Debug for GatePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatePipeline")
            .field("gates", &self.kinds())
            .finish()
    }
}
