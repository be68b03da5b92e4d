//! Configuration fingerprinting: deterministic identity of an engine config.
//!
//! Two configs with equal thresholds hash equal regardless of how they were
//! built (preset, TOML, code). Batch results are keyed by this hash so that
//! decisions from different variants never mix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// BLAKE3 hex digest of the canonical JSON form of an `EngineConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// First 12 hex characters, for logs.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl EngineConfig {
    /// Structural + parametric identity of this configuration.
    ///
    /// Field order is fixed by the struct definitions, so serde_json output is
    /// canonical.
    pub fn fingerprint(&self) -> ConfigHash {
        // Plain structs of numbers, bools and unit enums: serialization cannot fail.
        let json = serde_json::to_vec(self).expect("EngineConfig must serialize");
        ConfigHash::from_bytes(&json)
    }
}
