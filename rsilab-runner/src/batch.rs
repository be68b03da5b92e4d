//! Parallel batch evaluation: (instrument × strategy variant) fan-out.
//!
//! One `DecisionEngine` is built per named variant up front, so a bad
//! configuration fails before any work starts. Jobs own their data; workers
//! share nothing mutable. Results come back in input order: for each job,
//! one result per variant in configuration order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rsilab_core::config::EngineConfig;
use rsilab_core::domain::{Candle, InstitutionalMetrics, MarketSnapshot};
use rsilab_core::{ConfigHash, DecisionEngine, SignalDecision};

use crate::config::{RunnerConfig, RunnerError};

/// Owned inputs for one instrument at one evaluation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationJob {
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub rsi: Vec<f64>,
    #[serde(default)]
    pub obv: Vec<f64>,
    pub atr: Option<f64>,
    #[serde(default)]
    pub institutional: InstitutionalMetrics,
    #[serde(default)]
    pub htf_rsi: Option<Vec<f64>>,
}

impl EvaluationJob {
    pub fn snapshot(&self) -> MarketSnapshot<'_> {
        MarketSnapshot {
            symbol: &self.symbol,
            candles: &self.candles,
            rsi: &self.rsi,
            obv: &self.obv,
            atr: self.atr,
            institutional: &self.institutional,
            htf_rsi: self.htf_rsi.as_deref(),
        }
    }
}

/// Outcome of one (job, variant) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub symbol: String,
    pub variant: String,
    pub config_hash: ConfigHash,
    /// The decision, or the message of a fatal input error.
    pub outcome: Result<SignalDecision, String>,
}

impl JobResult {
    pub fn decision(&self) -> Option<&SignalDecision> {
        self.outcome.as_ref().ok()
    }

    pub fn is_actionable(&self) -> bool {
        self.decision().is_some_and(SignalDecision::is_actionable)
    }
}

/// Evaluates jobs against every configured variant.
pub struct BatchEvaluator {
    variants: Vec<(String, DecisionEngine)>,
    pool: Option<rayon::ThreadPool>,
}

impl BatchEvaluator {
    /// Build engines for named configurations; `threads == 0` uses the
    /// global rayon pool.
    pub fn new(variants: Vec<(String, EngineConfig)>, threads: usize) -> Result<Self, RunnerError> {
        if variants.is_empty() {
            return Err(RunnerError::NoVariants);
        }
        let variants = variants
            .into_iter()
            .map(|(name, config)| Ok((name, DecisionEngine::new(config)?)))
            .collect::<Result<Vec<_>, RunnerError>>()?;
        let pool = if threads > 0 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?,
            )
        } else {
            None
        };
        for (name, engine) in &variants {
            debug!(variant = %name, config_hash = engine.fingerprint().short(), "engine ready");
        }
        Ok(Self { variants, pool })
    }

    pub fn from_config(config: &RunnerConfig) -> Result<Self, RunnerError> {
        Self::new(config.engine_configs()?, config.threads)
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(name, _)| name.as_str())
    }

    /// Evaluate every job under every variant.
    pub fn evaluate(&self, jobs: &[EvaluationJob]) -> Vec<JobResult> {
        let pairs: Vec<(&EvaluationJob, &(String, DecisionEngine))> = jobs
            .iter()
            .flat_map(|job| self.variants.iter().map(move |variant| (job, variant)))
            .collect();

        let run = || -> Vec<JobResult> {
            pairs
                .par_iter()
                .map(|(job, (name, engine))| evaluate_one(job, name, engine))
                .collect()
        };
        let results = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let actionable = results.iter().filter(|r| r.is_actionable()).count();
        let errors = results.iter().filter(|r| r.outcome.is_err()).count();
        info!(
            jobs = jobs.len(),
            variants = self.variants.len(),
            actionable,
            errors,
            "batch evaluated"
        );
        results
    }
}

fn evaluate_one(job: &EvaluationJob, name: &str, engine: &DecisionEngine) -> JobResult {
    let outcome = engine
        .evaluate(&job.snapshot())
        .map_err(|e| e.to_string());
    if let Err(message) = &outcome {
        debug!(symbol = %job.symbol, variant = name, %message, "evaluation failed");
    }
    JobResult {
        symbol: job.symbol.clone(),
        variant: name.to_string(),
        config_hash: engine.fingerprint().clone(),
        outcome,
    }
}

impl std::fmt::Debug for BatchEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchEvaluator")
            .field("variants", &self.variant_names().collect::<Vec<_>>())
            .field("threads", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .finish()
    }
}
