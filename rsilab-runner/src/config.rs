//! Serializable runner configuration.
//!
//! A runner file names the strategy variants to evaluate side by side and
//! the size of the worker pool:
//!
//! ```toml
//! threads = 4
//!
//! [[variants]]
//! name = "classic"
//! preset = "classic"
//!
//! [[variants]]
//! name = "confirmed-tight"
//! preset = "confirmed"
//! [variants.overrides.setup]
//! min_risk_reward = 2.5
//! ```
//!
//! Overrides are merged key by key over the preset, so a variant only spells
//! out what differs.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rsilab_core::config::{EngineConfig, StrategyVariant};
use rsilab_core::ConfigError;

/// Errors from loading or applying a runner configuration.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("engine config error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("runner config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("runner config encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("unknown strategy variant '{0}'")]
    UnknownVariant(String),
    #[error("variant name '{0}' used more than once")]
    DuplicateVariant(String),
    #[error("no strategy variants configured")]
    NoVariants,
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One named strategy variant: a preset plus optional overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSpec {
    /// Label carried on every batch result.
    pub name: String,
    /// Preset name (`classic`, `confirmed`); defaults thresholds otherwise.
    #[serde(default)]
    pub preset: Option<String>,
    /// Partial `EngineConfig` document merged over the preset.
    #[serde(default)]
    pub overrides: Option<toml::Table>,
}

impl VariantSpec {
    pub fn preset(name: &str, variant: StrategyVariant) -> Self {
        Self {
            name: name.to_string(),
            preset: Some(variant.name().to_string()),
            overrides: None,
        }
    }

    /// Resolve to a validated engine configuration.
    pub fn engine_config(&self) -> Result<EngineConfig, RunnerError> {
        let base = match self.preset.as_deref() {
            Some(name) => EngineConfig::preset(parse_variant(name)?),
            None => EngineConfig::default(),
        };
        let config = match &self.overrides {
            Some(overrides) if !overrides.is_empty() => {
                let mut value = toml::Value::try_from(&base)?;
                merge(&mut value, overrides);
                value.try_into::<EngineConfig>()?
            }
            _ => base,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Top-level runner file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Worker threads for batch evaluation; 0 uses the rayon default.
    #[serde(default)]
    pub threads: usize,
    pub variants: Vec<VariantSpec>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            variants: StrategyVariant::all()
                .iter()
                .map(|&v| VariantSpec::preset(v.name(), v))
                .collect(),
        }
    }
}

impl RunnerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RunnerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RunnerError> {
        let config: Self = toml::from_str(content)?;
        config.check_names()?;
        Ok(config)
    }

    /// Resolve every variant, failing on the first invalid one.
    pub fn engine_configs(&self) -> Result<Vec<(String, EngineConfig)>, RunnerError> {
        self.check_names()?;
        self.variants
            .iter()
            .map(|spec| Ok((spec.name.clone(), spec.engine_config()?)))
            .collect()
    }

    fn check_names(&self) -> Result<(), RunnerError> {
        if self.variants.is_empty() {
            return Err(RunnerError::NoVariants);
        }
        let mut seen = BTreeSet::new();
        for spec in &self.variants {
            if !seen.insert(spec.name.as_str()) {
                return Err(RunnerError::DuplicateVariant(spec.name.clone()));
            }
        }
        Ok(())
    }
}

fn parse_variant(name: &str) -> Result<StrategyVariant, RunnerError> {
    StrategyVariant::all()
        .iter()
        .copied()
        .find(|v| v.name() == name)
        .ok_or_else(|| RunnerError::UnknownVariant(name.to_string()))
}

/// Recursive table merge: tables merge, everything else is replaced.
fn merge(target: &mut toml::Value, overrides: &toml::Table) {
    let toml::Value::Table(table) = target else {
        *target = toml::Value::Table(overrides.clone());
        return;
    };
    for (key, value) in overrides {
        match (table.get_mut(key), value) {
            (Some(existing @ toml::Value::Table(_)), toml::Value::Table(inner)) => {
                merge(existing, inner);
            }
            _ => {
                table.insert(key.clone(), value.clone());
            }
        }
    }
}
