//! Balance configuration
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config.
//!
//! ```rust,ignore
//! let config = BalanceConfig::from_env()?;
//! let session = GameSession::new(user_id, store, clock, calendar, config);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

use crate::error::{CoreError, Result};
use crate::profile::STAT_MAX;

pub const CONFIG_PATH_ENV: &str = "SOLORANK_CONFIG_PATH";

/// How completed-quest categories are counted for achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryInference {
    /// Substring match of quest names against keyword lists
    #[default]
    Keywords,
    /// Category recorded on each completion row
    Stored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Share of the estimated duration (percent) that must pass on the wall
    /// clock before a quest can be completed (default: 60)
    #[serde(default = "default_completable_percent")]
    pub completable_percent: u32,

    /// Reject `complete_quest` before the threshold (default: true)
    #[serde(default = "default_true")]
    pub enforce_completion_gate: bool,

    /// Per-stat ceiling (default: 100)
    #[serde(default = "default_stat_cap")]
    pub stat_cap: u8,

    #[serde(default)]
    pub category_inference: CategoryInference,
}

fn default_completable_percent() -> u32 {
    60
}
fn default_true() -> bool {
    true
}
fn default_stat_cap() -> u8 {
    STAT_MAX
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            completable_percent: default_completable_percent(),
            enforce_completion_gate: true,
            stat_cap: STAT_MAX,
            category_inference: CategoryInference::default(),
        }
    }
}

impl BalanceConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: BalanceConfig = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Config from the file named by `SOLORANK_CONFIG_PATH`, or defaults
    /// when the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::load(path).map_err(|e| CoreError::Config(format!("{CONFIG_PATH_ENV}='{path}': {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.completable_percent == 0 || self.completable_percent > 100 {
            return Err(CoreError::Config(format!(
                "completable_percent must be 1-100, got {}",
                self.completable_percent
            )));
        }
        if self.stat_cap == 0 || self.stat_cap > STAT_MAX {
            return Err(CoreError::Config(format!(
                "stat_cap must be 1-{}, got {}",
                STAT_MAX, self.stat_cap
            )));
        }
        Ok(())
    }
}
