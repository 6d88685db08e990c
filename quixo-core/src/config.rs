//! Bot configuration, stored as JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::{SearchConfig, BOT_NAME};
use crate::board::Side;
use crate::eval::Heuristics;

/// Everything needed to build a `QuixoBot`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
    pub side: Side,
    pub search: SearchConfig,
    pub heuristics: Heuristics,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: BOT_NAME.to_string(),
            side: Side::X,
            search: SearchConfig::default(),
            heuristics: Heuristics::default(),
        }
    }
}

impl BotConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BotConfig = serde_json::from_str(&content)?;
        config.heuristics.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
