//! Composite confidence score.
//!
//! A base pass score plus six bonuses, each clamped to `[0, cap]`, summed and
//! clamped to `[0, 100]`. Inputs are already side-adjusted by the caller: a
//! momentum slope against the trade contributes nothing.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::gates::RangeTier;

/// Raw values feeding the score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreInputs {
    /// Open-interest z-score, when valid.
    pub oi_z_score: Option<f64>,
    /// OBV slope over mean |OBV|, signed so that positive favours the trade.
    pub directional_obv_slope: Option<f64>,
    /// Range tier, only when the range bias agrees with the trade side.
    pub range_tier: Option<RangeTier>,
    pub risk_reward: f64,
    pub min_risk_reward: f64,
    pub divergence: bool,
    /// Retest quality in [0, 100]; `None` for initial breakouts.
    pub retest_quality: Option<f64>,
}

/// Per-component contributions, kept in diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub flow: f64,
    pub momentum: f64,
    pub range: f64,
    pub risk_reward: f64,
    pub divergence: f64,
    pub retest: f64,
    pub total: f64,
}

/// `value` clamped to `[0, cap]`; NaN counts as zero.
fn capped(value: f64, cap: f64) -> f64 {
    value.max(0.0).min(cap.max(0.0))
}

pub fn score(inputs: &ScoreInputs, config: &ScoringConfig) -> ScoreBreakdown {
    let base = capped(config.base, 100.0);
    let flow = capped(
        inputs.oi_z_score.unwrap_or(0.0) * config.flow_per_z,
        config.flow_max,
    );
    let momentum = capped(
        inputs.directional_obv_slope.unwrap_or(0.0) * config.momentum_scale,
        config.momentum_max,
    );
    let range = match inputs.range_tier {
        Some(RangeTier::Momentum) => config.range_momentum_bonus,
        Some(RangeTier::Neutral) => config.range_neutral_bonus,
        Some(RangeTier::Exhaustion) | None => 0.0,
    };
    let range = capped(range, config.range_momentum_bonus.max(config.range_neutral_bonus));
    let risk_reward = capped(
        (inputs.risk_reward - inputs.min_risk_reward) * config.rr_per_unit,
        config.rr_max,
    );
    let divergence = if inputs.divergence {
        capped(config.divergence_bonus, config.divergence_bonus)
    } else {
        0.0
    };
    let retest = capped(
        inputs.retest_quality.unwrap_or(0.0) / 100.0 * config.retest_quality_max,
        config.retest_quality_max,
    );

    let total = capped(
        base + flow + momentum + range + risk_reward + divergence + retest,
        100.0,
    );
    ScoreBreakdown {
        base,
        flow,
        momentum,
        range,
        risk_reward,
        divergence,
        retest,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_only_when_nothing_contributes() {
        let breakdown = score(
            &ScoreInputs {
                min_risk_reward: 1.5,
                risk_reward: 1.5,
                ..ScoreInputs::default()
            },
            &ScoringConfig::default(),
        );
        assert_eq!(breakdown.total, 40.0);
        assert_eq!(breakdown.flow, 0.0);
        assert_eq!(breakdown.risk_reward, 0.0);
    }

    #[test]
    fn components_are_capped() {
        let breakdown = score(
            &ScoreInputs {
                oi_z_score: Some(10.0),
                directional_obv_slope: Some(1.0),
                range_tier: Some(RangeTier::Momentum),
                risk_reward: 20.0,
                min_risk_reward: 1.5,
                divergence: true,
                retest_quality: Some(100.0),
            },
            &ScoringConfig::default(),
        );
        assert_eq!(breakdown.flow, 15.0);
        assert_eq!(breakdown.momentum, 10.0);
        assert_eq!(breakdown.range, 10.0);
        assert_eq!(breakdown.risk_reward, 10.0);
        assert_eq!(breakdown.divergence, 10.0);
        assert_eq!(breakdown.retest, 15.0);
        assert_eq!(breakdown.total, 100.0);
    }

    #[test]
    fn adverse_inputs_contribute_nothing() {
        let breakdown = score(
            &ScoreInputs {
                oi_z_score: Some(-3.0),
                directional_obv_slope: Some(-0.02),
                range_tier: Some(RangeTier::Exhaustion),
                risk_reward: 1.0,
                min_risk_reward: 1.5,
                divergence: false,
                retest_quality: Some(f64::NAN),
            },
            &ScoringConfig::default(),
        );
        assert_eq!(breakdown.total, 40.0);
    }

    #[test]
    fn neutral_range_earns_half_bonus() {
        let breakdown = score(
            &ScoreInputs {
                range_tier: Some(RangeTier::Neutral),
                ..ScoreInputs::default()
            },
            &ScoringConfig::default(),
        );
        assert_eq!(breakdown.range, 5.0);
    }

    #[test]
    fn retest_quality_scales_linearly() {
        let breakdown = score(
            &ScoreInputs {
                retest_quality: Some(50.0),
                ..ScoreInputs::default()
            },
            &ScoringConfig::default(),
        );
        assert!((breakdown.retest - 7.5).abs() < 1e-12);
    }
}
