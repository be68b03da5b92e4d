//! Trendline fitting by pivot consensus.
//!
//! Not a regression. Every pair of pivots starting in the extreme zone is a
//! line hypothesis; a hypothesis survives only if no bar of its segment pokes
//! through the line, and survivors are ranked by how many other pivots touch
//! the line, how long the line has held, and whether its slope is in the
//! tradable band. This is how a chart reader draws oscillator trendlines:
//! the line many swings respect beats the line that fits them best.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::TrendlineConfig;

use super::{PivotPoint, Trendline, TrendlineDirection};

/// Why a single pivot pair was not accepted as a trendline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HypothesisRejection {
    /// `p1` is not in the overbought (resistance) or oversold (support) zone.
    OutsideExtremeZone,
    /// `p2` does not come after `p1` or its kind does not match the direction.
    InvalidPair,
    TooShort { duration: usize },
    SlopeOutOfBand { slope: f64 },
    /// Resistance must fall, support must rise.
    WrongSlopeSign { slope: f64 },
    /// Extrapolation leaves the oscillator's plausible range.
    ProjectionOutOfBounds { index: usize, value: f64 },
    /// A bar of the fitted segment crosses the line beyond tolerance.
    InteriorViolation { index: usize, excess: f64 },
    /// Pivot indices lie outside the series.
    OutOfRange,
}

/// Select the best trendline for `direction` from `pivots`.
///
/// Only pivots of the direction's kind are used, and only the most recent
/// `max_candidates` of them. Returns `None` when no pair survives, which is an
/// ordinary outcome.
pub fn fit_trendline(
    series: &[f64],
    pivots: &[PivotPoint],
    direction: TrendlineDirection,
    config: &TrendlineConfig,
) -> Option<Trendline> {
    let kind = direction.pivot_kind();
    let mut candidates: Vec<PivotPoint> = pivots
        .iter()
        .filter(|p| p.kind == kind)
        .copied()
        .collect();
    if candidates.len() > config.max_candidates {
        candidates.drain(..candidates.len() - config.max_candidates);
    }

    let mut best: Option<Trendline> = None;
    let mut evaluated = 0usize;
    let mut accepted = 0usize;

    for (i, p1) in candidates.iter().enumerate() {
        if !in_extreme_zone(p1.value, direction, config) {
            continue;
        }
        for p2 in &candidates[i + 1..] {
            evaluated += 1;
            let result = evaluate_hypothesis(series, &candidates, p1, p2, direction, config);
            let Ok(line) = result else {
                continue;
            };
            accepted += 1;
            if best.as_ref().map_or(true, |b| line.score > b.score) {
                best = Some(line);
            }
        }
    }

    trace!(
        ?direction,
        candidates = candidates.len(),
        evaluated,
        accepted,
        best_score = best.as_ref().map(|b| b.score),
        "trendline search finished"
    );
    best
}

/// Validate and score one `(p1, p2)` hypothesis.
///
/// `pivots` supplies the touch candidates; pivots of the other kind are ignored.
pub fn evaluate_hypothesis(
    series: &[f64],
    pivots: &[PivotPoint],
    p1: &PivotPoint,
    p2: &PivotPoint,
    direction: TrendlineDirection,
    config: &TrendlineConfig,
) -> Result<Trendline, HypothesisRejection> {
    let kind = direction.pivot_kind();
    if p1.kind != kind || p2.kind != kind || p2.index <= p1.index {
        return Err(HypothesisRejection::InvalidPair);
    }
    if !in_extreme_zone(p1.value, direction, config) {
        return Err(HypothesisRejection::OutsideExtremeZone);
    }
    let segment = series
        .get(p1.index..=p2.index)
        .ok_or(HypothesisRejection::OutOfRange)?;
    let last = series.len() - 1;

    let duration = p2.index - p1.index;
    if duration < config.min_duration_bars {
        return Err(HypothesisRejection::TooShort { duration });
    }

    let slope = (p2.value - p1.value) / duration as f64;
    let intercept = p1.value - slope * p1.index as f64;
    let abs_slope = slope.abs();
    if abs_slope < config.min_slope || abs_slope > config.max_slope {
        return Err(HypothesisRejection::SlopeOutOfBand { slope });
    }
    let sign_ok = match direction {
        TrendlineDirection::Resistance => slope <= 0.0,
        TrendlineDirection::Support => slope >= 0.0,
    };
    if !sign_ok {
        return Err(HypothesisRejection::WrongSlopeSign { slope });
    }

    let project = |index: usize| slope * index as f64 + intercept;

    for index in [last, p2.index + config.projection_bars] {
        let value = project(index);
        if value < config.projection_floor || value > config.projection_ceiling {
            return Err(HypothesisRejection::ProjectionOutOfBounds { index, value });
        }
    }

    for (offset, &value) in segment.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        let index = p1.index + offset;
        let excess = direction.excess(value, project(index));
        if excess > config.violation_tolerance {
            return Err(HypothesisRejection::InteriorViolation { index, excess });
        }
    }

    // Touches inside the segment and forward confirmation after p2.
    let touched_pivots: BTreeSet<usize> = pivots
        .iter()
        .filter(|p| p.kind == kind && p.index > p1.index && p.index != p2.index)
        .filter(|p| (p.value - project(p.index)).abs() <= config.touch_tolerance)
        .map(|p| p.index)
        .collect();

    let in_ideal_band = abs_slope >= config.ideal_slope_min && abs_slope <= config.ideal_slope_max;
    let slope_bonus = if in_ideal_band {
        config.slope_bonus
    } else {
        0.0
    };
    let score = touched_pivots.len() as f64 * config.weight_touch
        + duration as f64 * config.weight_duration
        + slope_bonus;

    Ok(Trendline {
        p1: *p1,
        p2: *p2,
        slope,
        intercept,
        direction,
        touched_pivots,
        duration_bars: duration,
        score,
    })
}

fn in_extreme_zone(value: f64, direction: TrendlineDirection, config: &TrendlineConfig) -> bool {
    match direction {
        TrendlineDirection::Resistance => value >= config.extreme_high,
        TrendlineDirection::Support => value <= config.extreme_low,
    }
}
