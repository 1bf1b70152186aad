use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::aggregate::DEFAULT_BASELINE_YEAR;

/// Environment variable naming the trade CSV.
pub const DATA_PATH_ENV: &str = "TRADE_CSV";

pub const DEFAULT_TOP_N: usize = 15;

/// Filter applied when the command line does not say otherwise.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FilterDefaults {
    #[serde(default)]
    pub reporters: Vec<String>,
    #[serde(default)]
    pub partners: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub fta_only: bool,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_baseline_year() -> i32 {
    DEFAULT_BASELINE_YEAR
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: Option<String>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_baseline_year")]
    pub baseline_year: i32,
    #[serde(default)]
    pub defaults: FilterDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: None,
            top_n: DEFAULT_TOP_N,
            baseline_year: DEFAULT_BASELINE_YEAR,
            defaults: FilterDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from its default location, or defaults if there is
    /// no file there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "tradedash", "tradedash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Resolves the trade CSV: an explicit override first, then
    /// `TRADE_CSV`, then `data_path`, then the platform data directory.
    pub fn resolve_data_path(&self, explicit: Option<&str>) -> Result<PathBuf> {
        self.resolve_data_path_with(explicit, std::env::var(DATA_PATH_ENV).ok())
    }

    /// Same as [`Self::resolve_data_path`] with the environment value given.
    pub fn resolve_data_path_with(
        &self,
        explicit: Option<&str>,
        env_path: Option<String>,
    ) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = env_path.filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "tradedash", "tradedash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("trade_data.csv"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
