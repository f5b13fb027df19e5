//! # Engine Configuration
//!
//! Loaded once at startup from a YAML file. Every field is optional; a
//! missing file means all defaults.
//!
//! ```yaml
//! data_directory: /home/sam/Documents/Chore Tracker
//! household_id: household::default
//! bind_address: 127.0.0.1:3000
//! health_window_days: 14
//! bonus_multiplier: 1.5
//! default_history_limit: 20
//! ```

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::completion::DEFAULT_BONUS_MULTIPLIER;
use crate::domain::health::DEFAULT_WINDOW_DAYS;
use crate::storage::csv::CsvConnection;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CHORE_TRACKER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "chore_tracker.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data_directory: PathBuf,
    pub household_id: String,
    pub bind_address: SocketAddr,
    pub health_window_days: u32,
    pub bonus_multiplier: f64,
    pub default_history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_directory: CsvConnection::default_data_directory(),
            household_id: "household::default".to_string(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            health_window_days: DEFAULT_WINDOW_DAYS,
            bonus_multiplier: DEFAULT_BONUS_MULTIPLIER,
            default_history_limit: 20,
        }
    }
}

impl EngineConfig {
    /// Read the config from `path`, falling back to defaults when the file
    /// does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Config file named by `CHORE_TRACKER_CONFIG`, or `chore_tracker.yaml`
    pub fn load_from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(Path::new(&path))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: EngineConfig = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(contents)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.health_window_days < 1 {
            bail!("health_window_days must be at least 1");
        }
        if self.bonus_multiplier.is_nan() || self.bonus_multiplier < 1.0 {
            bail!("bonus_multiplier must be at least 1.0, got {}", self.bonus_multiplier);
        }
        if self.household_id.trim().is_empty() {
            bail!("household_id cannot be empty");
        }
        Ok(())
    }
}
