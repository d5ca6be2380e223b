use crate::{
    history::DEFAULT_NO_PARTICIPATION_MARKER,
    rng::Seed,
    scoring::PenaltyTable,
};
use serde::{Deserialize, Serialize};

/// Run configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SantaConfig {
    pub seed:                    Seed,
    pub iterations:              u64,
    pub no_participation_marker: String,
    pub policy:                  PenaltyTable,
}

impl Default for SantaConfig {
    fn default() -> Self {
        Self {
            seed:                    Seed::Number(42),
            iterations:              10_000,
            no_participation_marker: DEFAULT_NO_PARTICIPATION_MARKER.to_string(),
            policy:                  PenaltyTable::default(),
        }
    }
}

impl SantaConfig {
    /// Load from a JSON file.
    /// In tests, use SantaConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.iterations == 0 {
            anyhow::bail!("{path}: iterations must be at least 1");
        }
        Ok(config)
    }

    /// Small, fast configuration for tests.
    pub fn default_test() -> Self {
        Self {
            iterations: 500,
            ..Self::default()
        }
    }
}
