//! Engine configuration.
//!
//! Every threshold of the pipeline lives here rather than as a constant in
//! the code that uses it: tolerances, extreme zones and slope bands are
//! empirical and get tuned per market. All sections carry serde defaults, so a
//! TOML document only needs the keys it overrides.

use serde::{Deserialize, Serialize};

use crate::domain::TradeSide;
use crate::error::ConfigError;

/// Which directions the engine may signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingMode {
    LongOnly,
    ShortOnly,
    #[default]
    LongShort,
}

impl TradingMode {
    pub fn allows(self, side: TradeSide) -> bool {
        match self {
            Self::LongOnly => side == TradeSide::Long,
            Self::ShortOnly => side == TradeSide::Short,
            Self::LongShort => true,
        }
    }
}

/// Named gate combinations of the one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyVariant {
    /// Flow, momentum, range and divergence; enters on the breakout bar.
    Classic,
    /// Classic plus K-bar confirmation and higher-timeframe confluence.
    Confirmed,
}

impl StrategyVariant {
    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Confirmed => "confirmed",
        }
    }

    pub fn all() -> &'static [StrategyVariant] {
        &[Self::Classic, Self::Confirmed]
    }
}

// ─── Sections ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PivotConfig {
    /// Neighbourhood size on each side of a pivot.
    pub order: usize,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self { order: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendlineConfig {
    /// Resistance lines must start at or above this RSI value.
    pub extreme_high: f64,
    /// Support lines must start at or below this RSI value.
    pub extreme_low: f64,
    pub min_duration_bars: usize,
    pub min_slope: f64,
    pub max_slope: f64,
    pub ideal_slope_min: f64,
    pub ideal_slope_max: f64,
    /// Maximum excursion of any fitted-segment bar past the line.
    pub violation_tolerance: f64,
    /// Distance within which another pivot counts as touching the line.
    pub touch_tolerance: f64,
    /// Bars past `p2` the line is projected to for the bounds check.
    pub projection_bars: usize,
    pub projection_floor: f64,
    pub projection_ceiling: f64,
    /// Most recent pivots considered; bounds the pair enumeration.
    pub max_candidates: usize,
    pub weight_touch: f64,
    pub weight_duration: f64,
    pub slope_bonus: f64,
}

impl Default for TrendlineConfig {
    fn default() -> Self {
        Self {
            extreme_high: 70.0,
            extreme_low: 30.0,
            min_duration_bars: 10,
            min_slope: 0.02,
            max_slope: 2.0,
            ideal_slope_min: 0.05,
            ideal_slope_max: 0.5,
            violation_tolerance: 2.0,
            touch_tolerance: 1.5,
            projection_bars: 10,
            projection_floor: -10.0,
            projection_ceiling: 110.0,
            max_candidates: 40,
            weight_touch: 10.0,
            weight_duration: 0.1,
            slope_bonus: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Bars scanned backwards from the evaluation bar for the breakout.
    pub breakout_lookback: usize,
    pub initial_breakout_max_bars: usize,
    pub retest_max_bars: usize,
    /// Maximum |distance| from the line for a retest.
    pub retest_tolerance: f64,
    pub ideal_retest_min: usize,
    pub ideal_retest_max: usize,
    /// RSI change per bar that earns the full bounce score.
    pub bounce_norm: f64,
    pub proximity_points: f64,
    pub bounce_points: f64,
    pub timing_points: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            breakout_lookback: 30,
            initial_breakout_max_bars: 2,
            retest_max_bars: 15,
            retest_tolerance: 3.0,
            ideal_retest_min: 4,
            ideal_retest_max: 8,
            bounce_norm: 3.0,
            proximity_points: 40.0,
            bounce_points: 30.0,
            timing_points: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstitutionalGateConfig {
    pub enabled: bool,
    pub oi_z_threshold: f64,
}

impl Default for InstitutionalGateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            oi_z_threshold: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FundingGateConfig {
    pub enabled: bool,
    /// Absolute funding rate beyond which the trade side is crowded.
    pub max_funding_rate: f64,
    /// Long/short account ratio beyond which longs are crowded
    /// (its reciprocal bounds shorts).
    pub max_long_short_ratio: f64,
}

impl Default for FundingGateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_funding_rate: 0.0005,
            max_long_short_ratio: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MomentumGateConfig {
    pub enabled: bool,
    /// OBV values regressed when no slope is supplied.
    pub obv_window: usize,
}

impl Default for MomentumGateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            obv_window: 14,
        }
    }
}

/// Cardwell range band edges, ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardwellConfig {
    pub enabled: bool,
    pub oversold: f64,
    pub bear_momentum_ceiling: f64,
    pub midline: f64,
    pub bull_momentum_floor: f64,
    pub overbought: f64,
}

impl Default for CardwellConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            oversold: 20.0,
            bear_momentum_ceiling: 40.0,
            midline: 50.0,
            bull_momentum_floor: 60.0,
            overbought: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KBarConfig {
    pub enabled: bool,
    pub confirm_bars: usize,
}

impl Default for KBarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confirm_bars: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MtfConfig {
    pub enabled: bool,
    /// Higher-timeframe RSI below this blocks longs.
    pub bearish_below: f64,
    /// Higher-timeframe RSI above this blocks shorts.
    pub bullish_above: f64,
}

impl Default for MtfConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bearish_below: 40.0,
            bullish_above: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DivergenceConfig {
    pub enabled: bool,
    /// Pivot order for price swing detection.
    pub order: usize,
    /// Bars back from the evaluation bar searched for swings.
    pub lookback: usize,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: 3,
            lookback: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub institutional: InstitutionalGateConfig,
    pub funding: FundingGateConfig,
    pub momentum: MomentumGateConfig,
    pub cardwell: CardwellConfig,
    pub k_bar: KBarConfig,
    pub mtf: MtfConfig,
    pub divergence: DivergenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    pub initial_atr_multiple: f64,
    pub retest_atr_multiple: f64,
    /// Multiplier applied to the price amplitude of the trendline segment.
    pub structure_multiplier: f64,
    /// Target cap as a fraction of entry (0.15 = 15%).
    pub max_target_pct: f64,
    pub min_risk_reward: f64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            initial_atr_multiple: 1.5,
            retest_atr_multiple: 1.0,
            structure_multiplier: 1.618,
            max_target_pct: 0.15,
            min_risk_reward: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub base: f64,
    pub flow_per_z: f64,
    pub flow_max: f64,
    /// Multiplier on OBV slope normalised by mean |OBV|.
    pub momentum_scale: f64,
    pub momentum_max: f64,
    pub range_momentum_bonus: f64,
    pub range_neutral_bonus: f64,
    pub rr_per_unit: f64,
    pub rr_max: f64,
    pub divergence_bonus: f64,
    pub retest_quality_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base: 40.0,
            flow_per_z: 5.0,
            flow_max: 15.0,
            momentum_scale: 1000.0,
            momentum_max: 10.0,
            range_momentum_bonus: 10.0,
            range_neutral_bonus: 5.0,
            rr_per_unit: 5.0,
            rr_max: 10.0,
            divergence_bonus: 10.0,
            retest_quality_max: 15.0,
        }
    }
}

// ─── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration of one strategy variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum aligned bars before anything is evaluated.
    pub min_bars: usize,
    pub trading_mode: TradingMode,
    pub pivot: PivotConfig,
    pub trendline: TrendlineConfig,
    pub interaction: InteractionConfig,
    pub gates: GateConfig,
    pub setup: SetupConfig,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            trading_mode: TradingMode::default(),
            pivot: PivotConfig::default(),
            trendline: TrendlineConfig::default(),
            interaction: InteractionConfig::default(),
            gates: GateConfig::default(),
            setup: SetupConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default thresholds with the gate set of a named variant.
    pub fn preset(variant: StrategyVariant) -> Self {
        let mut config = Self::default();
        match variant {
            StrategyVariant::Classic => {
                config.gates.k_bar.enabled = false;
                config.gates.mtf.enabled = false;
            }
            StrategyVariant::Confirmed => {
                config.gates.k_bar.enabled = true;
                config.gates.mtf.enabled = true;
            }
        }
        config
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every threshold for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.pivot.order >= 1, "pivot.order", "must be >= 1")?;
        ensure(
            self.min_bars > 2 * self.pivot.order,
            "min_bars",
            "must exceed twice the pivot order",
        )?;

        let t = &self.trendline;
        ensure(
            t.extreme_low < t.extreme_high,
            "trendline.extreme_low",
            "must be below extreme_high",
        )?;
        ensure(t.min_duration_bars >= 1, "trendline.min_duration_bars", "must be >= 1")?;
        ensure(t.min_slope >= 0.0, "trendline.min_slope", "must be >= 0")?;
        ensure(t.min_slope <= t.max_slope, "trendline.min_slope", "must not exceed max_slope")?;
        ensure(
            t.ideal_slope_min <= t.ideal_slope_max,
            "trendline.ideal_slope_min",
            "must not exceed ideal_slope_max",
        )?;
        ensure(t.violation_tolerance >= 0.0, "trendline.violation_tolerance", "must be >= 0")?;
        ensure(t.touch_tolerance >= 0.0, "trendline.touch_tolerance", "must be >= 0")?;
        ensure(
            t.projection_floor < t.projection_ceiling,
            "trendline.projection_floor",
            "must be below projection_ceiling",
        )?;
        ensure(t.max_candidates >= 2, "trendline.max_candidates", "must be >= 2")?;

        let i = &self.interaction;
        ensure(
            i.initial_breakout_max_bars <= i.retest_max_bars,
            "interaction.initial_breakout_max_bars",
            "must not exceed retest_max_bars",
        )?;
        ensure(
            i.retest_max_bars <= i.breakout_lookback,
            "interaction.retest_max_bars",
            "must not exceed breakout_lookback",
        )?;
        ensure(i.retest_tolerance > 0.0, "interaction.retest_tolerance", "must be > 0")?;
        ensure(
            i.ideal_retest_min <= i.ideal_retest_max,
            "interaction.ideal_retest_min",
            "must not exceed ideal_retest_max",
        )?;
        ensure(i.bounce_norm > 0.0, "interaction.bounce_norm", "must be > 0")?;

        let g = &self.gates;
        ensure(
            g.institutional.oi_z_threshold.is_finite(),
            "gates.institutional.oi_z_threshold",
            "must be finite",
        )?;
        ensure(g.funding.max_funding_rate > 0.0, "gates.funding.max_funding_rate", "must be > 0")?;
        ensure(
            g.funding.max_long_short_ratio > 0.0,
            "gates.funding.max_long_short_ratio",
            "must be > 0",
        )?;
        ensure(g.momentum.obv_window >= 2, "gates.momentum.obv_window", "must be >= 2")?;
        let c = &g.cardwell;
        ensure(
            c.oversold < c.bear_momentum_ceiling
                && c.bear_momentum_ceiling < c.midline
                && c.midline < c.bull_momentum_floor
                && c.bull_momentum_floor < c.overbought,
            "gates.cardwell",
            "band edges must be strictly ascending",
        )?;
        ensure(g.k_bar.confirm_bars >= 1, "gates.k_bar.confirm_bars", "must be >= 1")?;
        ensure(
            g.mtf.bearish_below <= g.mtf.bullish_above,
            "gates.mtf.bearish_below",
            "must not exceed bullish_above",
        )?;
        ensure(g.divergence.order >= 1, "gates.divergence.order", "must be >= 1")?;
        ensure(
            g.divergence.lookback > 2 * g.divergence.order,
            "gates.divergence.lookback",
            "must exceed twice the divergence order",
        )?;

        let s = &self.setup;
        ensure(s.initial_atr_multiple > 0.0, "setup.initial_atr_multiple", "must be > 0")?;
        ensure(s.retest_atr_multiple > 0.0, "setup.retest_atr_multiple", "must be > 0")?;
        ensure(s.structure_multiplier > 0.0, "setup.structure_multiplier", "must be > 0")?;
        ensure(s.max_target_pct > 0.0, "setup.max_target_pct", "must be > 0")?;
        ensure(s.min_risk_reward > 0.0, "setup.min_risk_reward", "must be > 0")?;

        let sc = &self.scoring;
        let caps = [
            sc.base,
            sc.flow_per_z,
            sc.flow_max,
            sc.momentum_scale,
            sc.momentum_max,
            sc.range_momentum_bonus,
            sc.range_neutral_bonus,
            sc.rr_per_unit,
            sc.rr_max,
            sc.divergence_bonus,
            sc.retest_quality_max,
        ];
        ensure(
            caps.iter().all(|v| v.is_finite() && *v >= 0.0),
            "scoring",
            "weights and caps must be finite and >= 0",
        )?;

        Ok(())
    }
}

fn ensure(condition: bool, field: &'static str, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
        for variant in StrategyVariant::all() {
            assert_eq!(EngineConfig::preset(*variant).validate(), Ok(()));
        }
    }

    #[test]
    fn presets_toggle_optional_gates() {
        let classic = EngineConfig::preset(StrategyVariant::Classic);
        assert!(!classic.gates.k_bar.enabled);
        assert!(!classic.gates.mtf.enabled);
        let confirmed = EngineConfig::preset(StrategyVariant::Confirmed);
        assert!(confirmed.gates.k_bar.enabled);
        assert!(confirmed.gates.mtf.enabled);
    }

    #[test]
    fn rejects_inverted_slope_band() {
        let mut config = EngineConfig::default();
        config.trendline.min_slope = 3.0;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::invalid("trendline.min_slope", "must not exceed max_slope")
        );
    }

    #[test]
    fn rejects_zero_pivot_order() {
        let mut config = EngineConfig::default();
        config.pivot.order = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unordered_cardwell_bands() {
        let mut config = EngineConfig::default();
        config.gates.cardwell.midline = 65.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_retest_window_beyond_lookback() {
        let mut config = EngineConfig::default();
        config.interaction.breakout_lookback = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            trading_mode = "long_only"

            [trendline]
            extreme_high = 65.0

            [gates.k_bar]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.trading_mode, TradingMode::LongOnly);
        assert_eq!(config.trendline.extreme_high, 65.0);
        assert_eq!(config.trendline.extreme_low, 30.0);
        assert!(!config.gates.k_bar.enabled);
        assert!(config.gates.institutional.enabled);
    }

    #[test]
    fn toml_validation_runs_after_parse() {
        let err = EngineConfig::from_toml_str("[setup]\nmin_risk_reward = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "setup.min_risk_reward", .. }));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = EngineConfig::from_toml_str("[trendline]\nmin_slop = 0.1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn trading_mode_allows_sides() {
        assert!(TradingMode::LongOnly.allows(TradeSide::Long));
        assert!(!TradingMode::LongOnly.allows(TradeSide::Short));
        assert!(TradingMode::ShortOnly.allows(TradeSide::Short));
        assert!(TradingMode::LongShort.allows(TradeSide::Long));
        assert!(TradingMode::LongShort.allows(TradeSide::Short));
    }
}
