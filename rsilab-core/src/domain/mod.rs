//! Domain types for the RSI trendline engine.

pub mod candle;
pub mod decision;
pub mod snapshot;

pub use candle::{price_range, Candle};
pub use decision::{Bias, Diagnostics, SignalAction, SignalDecision, TradeSetup, TradeSide};
pub use snapshot::{InstitutionalMetrics, MarketSnapshot};
