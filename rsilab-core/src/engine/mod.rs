//! Decision engine: one configurable pipeline from RSI structure to decision.
//!
//! Per evaluation:
//!
//! 1. Shape checks (misaligned series are the only hard error)
//! 2. Data sufficiency (too few bars, NaN RSI, missing ATR resolve to `Wait`)
//! 3. Pivots → per-side trendline fit → interaction classification
//! 4. Candidate selection across sides
//! 5. Confirmation gates in fixed order
//! 6. Setup and composite score
//!
//! Strategy variants are configurations of this pipeline, not separate types.
//! The engine holds only immutable state and is shared across threads by
//! reference.

pub mod selection;

use tracing::debug;

use crate::config::{EngineConfig, StrategyVariant};
use crate::domain::{
    price_range, Bias, Diagnostics, MarketSnapshot, SignalAction, SignalDecision, TradeSide,
};
use crate::error::{ConfigError, EvaluationError, WaitReason};
use crate::fingerprint::ConfigHash;
use crate::gates::{CardwellRange, GateContext, GatePipeline, ObvTrend};
use crate::scoring::{score, ScoreInputs};
use crate::setup::{build_setup, SetupInputs};
use crate::trendline::{
    classify, find_pivots, fit_trendline, InteractionKind, TrendlineDirection,
};

pub use selection::{select, Candidate, Selection};

/// Stateless evaluator for one validated configuration.
#[derive(Debug)]
pub struct DecisionEngine {
    config: EngineConfig,
    pipeline: GatePipeline,
    fingerprint: ConfigHash,
}

impl DecisionEngine {
    /// Validate `config` once and build the gate pipeline.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pipeline = GatePipeline::from_config(&config.gates);
        let fingerprint = config.fingerprint();
        Ok(Self {
            config,
            pipeline,
            fingerprint,
        })
    }

    pub fn preset(variant: StrategyVariant) -> Result<Self, ConfigError> {
        Self::new(EngineConfig::preset(variant))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> &ConfigHash {
        &self.fingerprint
    }

    /// Evaluate the last bar of `snapshot`.
    ///
    /// Data-quality problems never error; they resolve to a `Wait` decision
    /// carrying the reason. Only misaligned series are rejected.
    pub fn evaluate(
        &self,
        snapshot: &MarketSnapshot<'_>,
    ) -> Result<SignalDecision, EvaluationError> {
        check_shape(snapshot)?;

        let symbol = snapshot.symbol;
        let evaluated_at = snapshot.current_candle().map(|c| c.open_time);
        let wait = |reason: WaitReason,
                    diagnostics: Diagnostics|
         -> Result<SignalDecision, EvaluationError> {
            let bias = diagnostics
                .cardwell_range
                .map_or(Bias::Neutral, CardwellRange::bias);
            debug!(symbol, %reason, "wait");
            Ok(SignalDecision::wait(symbol, reason, bias, diagnostics, evaluated_at))
        };

        // ── Data sufficiency ──
        let available = snapshot.len();
        if available < self.config.min_bars {
            return wait(
                WaitReason::InsufficientData {
                    required: self.config.min_bars,
                    available,
                },
                Diagnostics::default(),
            );
        }
        let (Some(candle), Some(rsi)) = (snapshot.current_candle(), snapshot.current_rsi()) else {
            return wait(
                WaitReason::InsufficientData {
                    required: self.config.min_bars,
                    available,
                },
                Diagnostics::default(),
            );
        };
        if rsi.is_nan() {
            return wait(WaitReason::MissingIndicator("rsi".into()), Diagnostics::default());
        }
        if !candle.is_sane() {
            return wait(WaitReason::MissingIndicator("close".into()), Diagnostics::default());
        }

        let range = CardwellRange::classify(rsi, &self.config.gates.cardwell);
        let mut diagnostics = Diagnostics {
            cardwell_range: Some(range),
            ..Diagnostics::default()
        };

        // ── Structure ──
        let candidates = self.candidates(snapshot.rsi);
        let candidate = match select(&candidates) {
            Selection::Actionable(c) => c,
            Selection::Stale(c) => {
                diagnostics.trendline = Some(c.trendline.clone());
                diagnostics.interaction = Some(c.interaction);
                let bars_since = c.interaction.bars_since_breakout;
                return wait(WaitReason::StaleBreakout { bars_since }, diagnostics);
            }
            Selection::Intact(c) => {
                diagnostics.trendline = Some(c.trendline.clone());
                diagnostics.interaction = Some(c.interaction);
                return wait(WaitReason::NoBreakout, diagnostics);
            }
            Selection::NoTrendline => return wait(WaitReason::NoTrendline, diagnostics),
        };
        diagnostics.trendline = Some(candidate.trendline.clone());
        diagnostics.interaction = Some(candidate.interaction);
        let side = candidate.side;
        debug!(
            symbol,
            ?side,
            kind = ?candidate.interaction.kind,
            bars_since = candidate.interaction.bars_since_breakout,
            "candidate selected"
        );

        // ── Gates ──
        let ctx = GateContext {
            snapshot,
            side,
            trendline: &candidate.trendline,
            interaction: &candidate.interaction,
        };
        let report = self.pipeline.run(&ctx);
        diagnostics.gates = report.outcomes.clone();
        if let Some(rejection) = report.rejection() {
            let reason = WaitReason::GateRejection {
                gate: rejection.gate,
                detail: rejection.reason.clone().unwrap_or_default(),
            };
            return wait(reason, diagnostics);
        }

        // ── Setup ──
        let Some(atr) = snapshot.atr.filter(|a| a.is_finite() && *a > 0.0) else {
            return wait(WaitReason::MissingIndicator("atr".into()), diagnostics);
        };
        let trendline = &candidate.trendline;
        let structure_amplitude =
            price_range(snapshot.candles, trendline.p1.index, trendline.p2.index)
                .map_or(0.0, |(hi, lo)| hi - lo);
        let setup = build_setup(
            &SetupInputs {
                side,
                kind: candidate.interaction.kind,
                entry: candle.close,
                atr,
                structure_amplitude,
            },
            &self.config.setup,
        );
        if !setup.has_positive_levels() {
            let reason = WaitReason::InvalidSetup {
                stop_loss: setup.stop_loss,
                take_profit: setup.take_profit,
            };
            return wait(reason, diagnostics);
        }

        // ── Score ──
        let metrics = snapshot.institutional;
        let obv_trend = ObvTrend::resolve(snapshot, self.config.gates.momentum.obv_window);
        let inputs = ScoreInputs {
            oi_z_score: metrics
                .oi_z_score
                .filter(|z| metrics.oi_z_score_valid && z.is_finite()),
            directional_obv_slope: obv_trend
                .and_then(|t| t.normalized_slope())
                .map(|s| s * side.sign()),
            range_tier: (range.bias() == side.bias()).then(|| range.tier()),
            risk_reward: setup.risk_reward_ratio,
            min_risk_reward: self.config.setup.min_risk_reward,
            divergence: report.divergence_found(),
            retest_quality: (candidate.interaction.kind == InteractionKind::Retest)
                .then_some(candidate.interaction.quality),
        };
        let breakdown = score(&inputs, &self.config.scoring);
        diagnostics.score_breakdown = Some(breakdown);

        debug!(symbol, ?side, score = breakdown.total, rr = setup.risk_reward_ratio, "signal");
        Ok(SignalDecision {
            symbol: symbol.to_string(),
            action: SignalAction::from(side),
            bias: side.bias(),
            setup: Some(setup),
            score: breakdown.total,
            rejection_reason: None,
            diagnostics,
            evaluated_at,
        })
    }

    /// Fit and classify one line per side the trading mode allows.
    pub fn candidates(&self, rsi: &[f64]) -> Vec<Candidate> {
        let order = self.config.pivot.order;
        [TradeSide::Long, TradeSide::Short]
            .into_iter()
            .filter(|side| self.config.trading_mode.allows(*side))
            .filter_map(|side| {
                let direction = TrendlineDirection::for_side(side);
                let pivots = find_pivots(rsi, order, direction.pivot_kind());
                let trendline = fit_trendline(rsi, &pivots, direction, &self.config.trendline)?;
                let interaction = classify(rsi, &trendline, &self.config.interaction);
                Some(Candidate {
                    side,
                    trendline,
                    interaction,
                })
            })
            .collect()
    }
}

fn check_shape(snapshot: &MarketSnapshot<'_>) -> Result<(), EvaluationError> {
    let expected = snapshot.candles.len();
    if snapshot.rsi.len() != expected {
        return Err(EvaluationError::MisalignedSeries {
            series: "rsi",
            expected,
            actual: snapshot.rsi.len(),
        });
    }
    if !snapshot.obv.is_empty() && snapshot.obv.len() != expected {
        return Err(EvaluationError::MisalignedSeries {
            series: "obv",
            expected,
            actual: snapshot.obv.len(),
        });
    }
    Ok(())
}
