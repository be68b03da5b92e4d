//! Trade setup construction: ATR stop, structure target, risk:reward floor.
//!
//! The target projects the price amplitude of the trendline's defining
//! segment, scaled by the structure multiplier, and is capped as a fraction of
//! entry. If the capped target no longer pays the minimum risk:reward it is
//! raised to exactly that minimum; the raise wins over the cap.

use crate::config::SetupConfig;
use crate::domain::{TradeSetup, TradeSide};
use crate::trendline::InteractionKind;

/// Inputs to [`build_setup`], all in price units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupInputs {
    pub side: TradeSide,
    pub kind: InteractionKind,
    pub entry: f64,
    pub atr: f64,
    /// Max high minus min low over the candles between the line's pivots.
    pub structure_amplitude: f64,
}

/// ATR multiple used for the stop: tighter on retests.
pub fn stop_multiple(kind: InteractionKind, config: &SetupConfig) -> f64 {
    match kind {
        InteractionKind::Retest => config.retest_atr_multiple,
        _ => config.initial_atr_multiple,
    }
}

/// Build the setup. Caller guarantees `entry > 0` and `atr > 0`.
pub fn build_setup(inputs: &SetupInputs, config: &SetupConfig) -> TradeSetup {
    let sign = inputs.side.sign();
    let risk = stop_multiple(inputs.kind, config) * inputs.atr;
    let stop_loss = inputs.entry - sign * risk;

    let projected = inputs.structure_amplitude.max(0.0) * config.structure_multiplier;
    let cap = inputs.entry * config.max_target_pct;
    let target_capped = projected > cap;
    let mut reward = projected.min(cap);

    let min_reward = config.min_risk_reward * risk;
    let target_raised_for_min_rr = reward < min_reward;
    if target_raised_for_min_rr {
        reward = min_reward;
    }

    TradeSetup {
        side: inputs.side,
        entry: inputs.entry,
        stop_loss,
        take_profit: inputs.entry + sign * reward,
        risk_reward_ratio: reward / risk,
        target_capped,
        target_raised_for_min_rr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(side: TradeSide, kind: InteractionKind, amplitude: f64) -> SetupInputs {
        SetupInputs {
            side,
            kind,
            entry: 100.0,
            atr: 2.0,
            structure_amplitude: amplitude,
        }
    }

    #[test]
    fn long_initial_breakout_uses_wider_stop() {
        let setup = build_setup(
            &inputs(TradeSide::Long, InteractionKind::InitialBreakout, 5.0),
            &SetupConfig::default(),
        );
        assert!((setup.stop_loss - 97.0).abs() < 1e-9);
        assert!((setup.take_profit - (100.0 + 5.0 * 1.618)).abs() < 1e-9);
        assert!((setup.risk_reward_ratio - 5.0 * 1.618 / 3.0).abs() < 1e-9);
        assert!(!setup.target_capped);
        assert!(!setup.target_raised_for_min_rr);
    }

    #[test]
    fn retest_stop_is_tighter() {
        let setup = build_setup(
            &inputs(TradeSide::Long, InteractionKind::Retest, 5.0),
            &SetupConfig::default(),
        );
        assert!((setup.stop_loss - 98.0).abs() < 1e-9);
        assert!((setup.risk() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn short_mirrors_prices() {
        let setup = build_setup(
            &inputs(TradeSide::Short, InteractionKind::InitialBreakout, 5.0),
            &SetupConfig::default(),
        );
        assert!((setup.stop_loss - 103.0).abs() < 1e-9);
        assert!(setup.take_profit < setup.entry);
    }

    #[test]
    fn large_structure_is_capped() {
        let setup = build_setup(
            &inputs(TradeSide::Long, InteractionKind::Retest, 40.0),
            &SetupConfig::default(),
        );
        assert!(setup.target_capped);
        assert!((setup.take_profit - 115.0).abs() < 1e-9);
        assert!((setup.risk_reward_ratio - 7.5).abs() < 1e-9);
    }

    #[test]
    fn small_structure_is_raised_to_minimum_rr() {
        let setup = build_setup(
            &inputs(TradeSide::Long, InteractionKind::InitialBreakout, 1.0),
            &SetupConfig::default(),
        );
        assert!(setup.target_raised_for_min_rr);
        assert!((setup.risk_reward_ratio - 1.5).abs() < 1e-9);
        assert!((setup.take_profit - 104.5).abs() < 1e-9);
    }

    #[test]
    fn raise_overrides_cap() {
        let config = SetupConfig {
            max_target_pct: 0.01,
            ..SetupConfig::default()
        };
        let setup = build_setup(
            &inputs(TradeSide::Long, InteractionKind::InitialBreakout, 40.0),
            &config,
        );
        assert!(setup.target_capped);
        assert!(setup.target_raised_for_min_rr);
        assert!((setup.risk_reward_ratio - 1.5).abs() < 1e-9);
    }

    #[test]
    fn outsized_atr_pushes_levels_below_zero() {
        let mut short = inputs(TradeSide::Short, InteractionKind::InitialBreakout, 5.0);
        short.atr = 80.0;
        let setup = build_setup(&short, &SetupConfig::default());
        assert!((setup.stop_loss - 220.0).abs() < 1e-9);
        assert!((setup.take_profit + 80.0).abs() < 1e-9);
        assert!(!setup.has_positive_levels());

        let long = SetupInputs {
            side: TradeSide::Long,
            ..short
        };
        let setup = build_setup(&long, &SetupConfig::default());
        assert!((setup.stop_loss + 20.0).abs() < 1e-9);
        assert!(!setup.has_positive_levels());
    }
}
