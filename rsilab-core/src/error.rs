//! Error taxonomy.
//!
//! Only two things are real errors: a configuration that cannot work
//! (`ConfigError`, raised once at engine construction) and input whose shape
//! is malformed (`EvaluationError`). Everything data-quality related is a
//! `WaitReason` carried inside an ordinary `Wait` decision.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gates::GateKind;

/// Invalid engine configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error("parse config TOML: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Malformed evaluation input. Never raised for missing or NaN data.
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("{series} has {actual} values but {expected} candles were supplied")]
    MisalignedSeries {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Why an evaluation resolved to `Wait`.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum WaitReason {
    #[error("insufficient data: {available} bars available, {required} required")]
    InsufficientData { required: usize, available: usize },
    #[error("indicator unavailable: {0}")]
    MissingIndicator(String),
    #[error("no valid trendline")]
    NoTrendline,
    #[error("trendline intact, no breakout in lookback window")]
    NoBreakout,
    #[error("stale breakout {bars_since} bars ago")]
    StaleBreakout { bars_since: usize },
    #[error("rejected by {gate}: {detail}")]
    GateRejection { gate: GateKind, detail: String },
    #[error("setup levels not positive: stop {stop_loss}, target {take_profit}")]
    InvalidSetup { stop_loss: f64, take_profit: f64 },
}

impl WaitReason {
    /// The rejecting gate, if this is a gate rejection.
    pub fn gate(&self) -> Option<GateKind> {
        match self {
            Self::GateRejection { gate, .. } => Some(*gate),
            _ => None,
        }
    }
}
