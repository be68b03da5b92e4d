//! RsiLab Core: RSI trendline breakout decision engine.
//!
//! This crate turns a frozen market snapshot into a trade decision:
//! - Domain types (candles, snapshots, setups, decisions)
//! - Pivot detection and consensus trendline fitting on RSI
//! - Breakout / retest / continuation classification
//! - Ordered confirmation gates (institutional flow, momentum, Cardwell range,
//!   K-bar, multi-timeframe, hidden divergence)
//! - ATR stop, capped structure target, composite score
//!
//! Evaluation is pure and synchronous. Indicators arrive precomputed and
//! institutional data arrives already resolved; nothing here performs I/O.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod gates;
pub mod indicators;
pub mod scoring;
pub mod setup;
pub mod trendline;

pub use config::{EngineConfig, StrategyVariant, TradingMode};
pub use domain::{
    Bias, Candle, InstitutionalMetrics, MarketSnapshot, SignalAction, SignalDecision, TradeSetup,
    TradeSide,
};
pub use engine::DecisionEngine;
pub use error::{ConfigError, EvaluationError, WaitReason};
pub use fingerprint::ConfigHash;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a worker thread touches is Send + Sync.
    ///
    /// The runner shares one engine per variant across rayon workers and
    /// moves decisions back to the caller.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::InstitutionalMetrics>();
        require_sync::<domain::InstitutionalMetrics>();
        require_send::<domain::MarketSnapshot<'static>>();
        require_sync::<domain::MarketSnapshot<'static>>();
        require_send::<domain::TradeSetup>();
        require_sync::<domain::TradeSetup>();
        require_send::<domain::SignalDecision>();
        require_sync::<domain::SignalDecision>();

        // Structure types
        require_send::<trendline::PivotPoint>();
        require_sync::<trendline::PivotPoint>();
        require_send::<trendline::Trendline>();
        require_sync::<trendline::Trendline>();
        require_send::<trendline::Interaction>();
        require_sync::<trendline::Interaction>();

        // Gates
        require_send::<gates::GateOutcome>();
        require_sync::<gates::GateOutcome>();
        require_send::<gates::GatePipeline>();
        require_sync::<gates::GatePipeline>();

        // Engine and configuration
        require_send::<engine::DecisionEngine>();
        require_sync::<engine::DecisionEngine>();
        require_send::<config::EngineConfig>();
        require_sync::<config::EngineConfig>();
        require_send::<fingerprint::ConfigHash>();
        require_sync::<fingerprint::ConfigHash>();
        require_send::<error::WaitReason>();
        require_sync::<error::WaitReason>();
    }

    /// Architecture contract: gates see the snapshot and the candidate only.
    ///
    /// `check` takes a `GateContext` and nothing else; a gate that needed
    /// external data would have to change the trait.
    #[test]
    fn gate_trait_takes_only_context() {
        fn _check_trait_object_builds(
            gate: &dyn gates::ConfirmationGate,
            ctx: &gates::GateContext<'_>,
        ) -> gates::GateOutcome {
            gate.check(ctx)
        }
    }
}
