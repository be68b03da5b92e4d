//! RsiLab Runner: batch evaluation, replay and replay statistics.
//!
//! This crate builds on `rsilab-core` to provide:
//! - Runner configuration: named strategy variants with TOML overrides
//! - Parallel (instrument × variant) batch evaluation on rayon
//! - Simplified bar-by-bar replay of historical series
//! - R-multiple statistics over replayed trades
//! - Tracing subscriber setup

pub mod batch;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod replay;

pub use batch::{BatchEvaluator, EvaluationJob, JobResult};
pub use config::{RunnerConfig, RunnerError, VariantSpec};
pub use logging::init_tracing;
pub use metrics::ReplayMetrics;
pub use replay::{replay, ExitReason, ReplayReport, ReplaySeries, ReplayTrade};
