//! Oscillator trendlines: pivots, consensus fitting, and bar interaction.
//!
//! Lines are drawn on the RSI series, not on price. A resistance line joins
//! descending RSI highs that start in overbought territory; a break above it
//! is a bullish momentum-structure shift. Support lines mirror this for
//! shorts.

pub mod fitter;
pub mod interaction;
pub mod pivots;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::TradeSide;

pub use fitter::fit_trendline;
pub use interaction::classify;
pub use pivots::find_pivots;

/// Which extremum a pivot marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotKind {
    High,
    Low,
}

/// A local extremum of the oscillator series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotPoint {
    pub index: usize,
    pub value: f64,
    pub kind: PivotKind,
}

/// Role of a trendline relative to the oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendlineDirection {
    /// Line above the series, built from highs; broken upward.
    Resistance,
    /// Line below the series, built from lows; broken downward.
    Support,
}

impl TrendlineDirection {
    pub fn pivot_kind(self) -> PivotKind {
        match self {
            Self::Resistance => PivotKind::High,
            Self::Support => PivotKind::Low,
        }
    }

    /// Trade side implied by breaking this line.
    pub fn side(self) -> TradeSide {
        match self {
            Self::Resistance => TradeSide::Long,
            Self::Support => TradeSide::Short,
        }
    }

    pub fn for_side(side: TradeSide) -> Self {
        match side {
            TradeSide::Long => Self::Resistance,
            TradeSide::Short => Self::Support,
        }
    }

    /// Signed distance of `value` past `line` in the breakout direction.
    ///
    /// Positive means the value sits on the forbidden (breakout) side.
    pub fn excess(self, value: f64, line: f64) -> f64 {
        match self {
            Self::Resistance => value - line,
            Self::Support => line - value,
        }
    }

    /// True if `value` is strictly beyond the line.
    pub fn is_beyond(self, value: f64, line: f64) -> bool {
        self.excess(value, line) > 0.0
    }
}

/// A validated line hypothesis through two pivots.
///
/// Candidate lines and the selected line share this shape; the fitter keeps
/// only the best-scoring candidate per direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub p1: PivotPoint,
    pub p2: PivotPoint,
    pub slope: f64,
    pub intercept: f64,
    pub direction: TrendlineDirection,
    /// Indices of other pivots lying within touch tolerance of the line.
    pub touched_pivots: BTreeSet<usize>,
    pub duration_bars: usize,
    pub score: f64,
}

impl Trendline {
    /// Projected oscillator value of the line at `index`.
    pub fn value_at(&self, index: usize) -> f64 {
        self.slope * index as f64 + self.intercept
    }

    pub fn touches(&self) -> usize {
        self.touched_pivots.len()
    }
}

/// Relationship between the evaluation bar and a trendline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    InitialBreakout,
    Retest,
    /// Broken long enough ago (or far enough away) that the entry has passed.
    Continuation,
    NoSignal,
}

impl InteractionKind {
    /// Whether this interaction can produce a trade.
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::InitialBreakout | Self::Retest)
    }
}

/// Outcome of classifying the evaluation bar against a trendline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub breakout_index: Option<usize>,
    pub bars_since_breakout: usize,
    /// Signed distance from the line at the evaluation bar, positive on the
    /// breakout side.
    pub distance_from_line: f64,
    /// Retest quality in [0, 100]; zero for every other kind.
    pub quality: f64,
}

impl Interaction {
    pub fn no_signal() -> Self {
        Self {
            kind: InteractionKind::NoSignal,
            breakout_index: None,
            bars_since_breakout: 0,
            distance_from_line: 0.0,
            quality: 0.0,
        }
    }
}
