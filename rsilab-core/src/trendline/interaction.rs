//! Interaction classification: how the evaluation bar relates to a line.
//!
//! The breakout bar is the earliest bar in the lookback window where the
//! series steps from the permitted side of the line to strictly beyond it.
//! Elapsed bars since then decide between a fresh breakout, a retest (only
//! when the series is back near the line) and a stale continuation.

use crate::config::InteractionConfig;

use super::{Interaction, InteractionKind, Trendline};

/// Classify the last bar of `series` against `trendline`.
///
/// Pure and idempotent. The signal direction follows the line: resistance
/// breaks upward, support breaks downward.
pub fn classify(series: &[f64], trendline: &Trendline, config: &InteractionConfig) -> Interaction {
    let Some(current) = series.len().checked_sub(1) else {
        return Interaction::no_signal();
    };
    let current_value = series[current];
    if current_value.is_nan() {
        return Interaction::no_signal();
    }

    let Some(breakout) = find_breakout(series, trendline, config.breakout_lookback) else {
        return Interaction::no_signal();
    };

    let direction = trendline.direction;
    let bars_since = current - breakout;
    let distance = direction.excess(current_value, trendline.value_at(current));

    let mut interaction = Interaction {
        kind: InteractionKind::Continuation,
        breakout_index: Some(breakout),
        bars_since_breakout: bars_since,
        distance_from_line: distance,
        quality: 0.0,
    };

    if bars_since <= config.initial_breakout_max_bars {
        interaction.kind = InteractionKind::InitialBreakout;
    } else if bars_since <= config.retest_max_bars && distance.abs() <= config.retest_tolerance {
        let previous = series[current - 1];
        let change = if previous.is_nan() {
            0.0
        } else {
            direction.excess(current_value, previous)
        };
        interaction.kind = InteractionKind::Retest;
        interaction.quality = retest_quality(distance, change, bars_since, config);
    }

    interaction
}

/// Earliest permitted-to-beyond transition within the lookback window.
///
/// Bars up to and including `p2` are never breakout bars: the line is only
/// defined as intact from its second pivot on.
pub fn find_breakout(series: &[f64], trendline: &Trendline, lookback: usize) -> Option<usize> {
    let current = series.len().checked_sub(1)?;
    let start = (trendline.p2.index + 1)
        .max(current.saturating_sub(lookback))
        .max(1);
    let direction = trendline.direction;

    (start..=current).find(|&i| {
        let (prev, value) = (series[i - 1], series[i]);
        if prev.is_nan() || value.is_nan() {
            return false;
        }
        let was_permitted = !direction.is_beyond(prev, trendline.value_at(i - 1));
        was_permitted && direction.is_beyond(value, trendline.value_at(i))
    })
}

/// Retest quality in [0, 100].
///
/// - proximity: full points on the line, falling linearly to zero at the
///   retest tolerance;
/// - bounce: directional change against the prior bar, saturating at
///   `bounce_norm`;
/// - timing: full points inside the ideal window, minus a quarter of the
///   points per bar outside it.
pub fn retest_quality(
    distance: f64,
    change: f64,
    bars_since: usize,
    config: &InteractionConfig,
) -> f64 {
    let proximity =
        config.proximity_points * (1.0 - distance.abs() / config.retest_tolerance).clamp(0.0, 1.0);
    let bounce = config.bounce_points * (change / config.bounce_norm).clamp(0.0, 1.0);

    let bars_outside = if bars_since < config.ideal_retest_min {
        config.ideal_retest_min - bars_since
    } else {
        bars_since.saturating_sub(config.ideal_retest_max)
    };
    let timing = (config.timing_points - config.timing_points / 4.0 * bars_outside as f64).max(0.0);

    (proximity + bounce + timing).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trendline::{PivotKind, PivotPoint, TrendlineDirection};
    use std::collections::BTreeSet;

    /// Resistance from (5, 82) to (40, 74).
    fn resistance() -> Trendline {
        let slope = -8.0 / 35.0;
        Trendline {
            p1: PivotPoint { index: 5, value: 82.0, kind: PivotKind::High },
            p2: PivotPoint { index: 40, value: 74.0, kind: PivotKind::High },
            slope,
            intercept: 82.0 - slope * 5.0,
            direction: TrendlineDirection::Resistance,
            touched_pivots: BTreeSet::new(),
            duration_bars: 35,
            score: 8.5,
        }
    }

    /// 50s up to `breakout`, then a value 3 points above the line, then
    /// whatever `tail` describes relative to the line.
    fn series(breakout: usize, tail: &[f64]) -> Vec<f64> {
        let line = resistance();
        let mut s = vec![50.0; breakout];
        s.push(line.value_at(breakout) + 3.0);
        for (k, offset) in tail.iter().enumerate() {
            let i = breakout + 1 + k;
            s.push(line.value_at(i) + offset);
        }
        s
    }

    #[test]
    fn no_breakout_is_no_signal() {
        let s = vec![50.0; 60];
        let i = classify(&s, &resistance(), &InteractionConfig::default());
        assert_eq!(i.kind, InteractionKind::NoSignal);
        assert_eq!(i.breakout_index, None);
    }

    #[test]
    fn breakout_on_current_bar_is_initial() {
        let s = series(55, &[]);
        let i = classify(&s, &resistance(), &InteractionConfig::default());
        assert_eq!(i.kind, InteractionKind::InitialBreakout);
        assert_eq!(i.breakout_index, Some(55));
        assert_eq!(i.bars_since_breakout, 0);
        assert!((i.distance_from_line - 3.0).abs() < 1e-9);
        assert_eq!(i.quality, 0.0);
    }

    #[test]
    fn two_bars_after_is_still_initial() {
        let s = series(55, &[4.0, 5.0]);
        let i = classify(&s, &resistance(), &InteractionConfig::default());
        assert_eq!(i.kind, InteractionKind::InitialBreakout);
        assert_eq!(i.bars_since_breakout, 2);
    }

    #[test]
    fn pullback_to_line_is_retest() {
        // Breakout at 50, extension, then back within tolerance six bars later.
        let s = series(50, &[5.0, 6.0, 5.0, 3.0, 0.5, 1.0]);
        let i = classify(&s, &resistance(), &InteractionConfig::default());
        assert_eq!(i.kind, InteractionKind::Retest);
        assert_eq!(i.bars_since_breakout, 6);
        assert!(i.quality > 0.0 && i.quality <= 100.0);
    }

    #[test]
    fn far_from_line_after_three_bars_is_continuation() {
        let s = series(50, &[5.0, 6.0, 8.0, 9.0]);
        let i = classify(&s, &resistance(), &InteractionConfig::default());
        assert_eq!(i.kind, InteractionKind::Continuation);
        assert_eq!(i.bars_since_breakout, 4);
    }

    #[test]
    fn near_line_but_too_old_is_continuation() {
        let mut tail = vec![5.0; 19];
        tail.push(0.5);
        let s = series(40 + 1, &tail);
        let i = classify(&s, &resistance(), &InteractionConfig::default());
        assert_eq!(i.kind, InteractionKind::Continuation);
        assert_eq!(i.bars_since_breakout, 20);
    }

    #[test]
    fn breakout_outside_lookback_is_ignored() {
        let config = InteractionConfig {
            breakout_lookback: 5,
            initial_breakout_max_bars: 2,
            retest_max_bars: 5,
            ..InteractionConfig::default()
        };
        let s = series(50, &[5.0; 10]);
        assert_eq!(classify(&s, &resistance(), &config).kind, InteractionKind::NoSignal);
    }

    #[test]
    fn support_breaks_downward() {
        let slope = 7.0 / 30.0;
        let line = Trendline {
            p1: PivotPoint { index: 8, value: 22.0, kind: PivotKind::Low },
            p2: PivotPoint { index: 38, value: 29.0, kind: PivotKind::Low },
            slope,
            intercept: 22.0 - slope * 8.0,
            direction: TrendlineDirection::Support,
            touched_pivots: BTreeSet::new(),
            duration_bars: 30,
            score: 8.0,
        };
        let mut s = vec![50.0; 55];
        s.push(line.value_at(55) - 2.0);
        let i = classify(&s, &line, &InteractionConfig::default());
        assert_eq!(i.kind, InteractionKind::InitialBreakout);
        assert!((i.distance_from_line - 2.0).abs() < 1e-9);
    }

    #[test]
    fn classify_is_idempotent() {
        let s = series(50, &[5.0, 6.0, 5.0, 3.0, 0.5, 1.0]);
        let line = resistance();
        let config = InteractionConfig::default();
        assert_eq!(classify(&s, &line, &config), classify(&s, &line, &config));
    }

    #[test]
    fn nan_current_value_is_no_signal() {
        let mut s = series(55, &[2.0]);
        s.push(f64::NAN);
        assert_eq!(
            classify(&s, &resistance(), &InteractionConfig::default()).kind,
            InteractionKind::NoSignal
        );
    }

    #[test]
    fn quality_components() {
        let config = InteractionConfig::default();
        // On the line, full bounce, ideal timing.
        assert_eq!(retest_quality(0.0, 3.0, 6, &config), 100.0);
        // At the tolerance edge, no bounce, ideal timing.
        assert_eq!(retest_quality(3.0, -1.0, 6, &config), 30.0);
        // Two bars past the ideal window loses half the timing points.
        assert_eq!(retest_quality(3.0, 0.0, 10, &config), 15.0);
        // One bar early loses a quarter.
        assert_eq!(retest_quality(3.0, 0.0, 3, &config), 22.5);
    }
}
