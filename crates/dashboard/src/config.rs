//! Layered dashboard configuration
//!
//! Built-in defaults, then an optional TOML file, then `CROPYIELD_*`
//! environment variables. Nested keys use a double underscore, e.g.
//! `CROPYIELD_THRESHOLDS__LOW_YIELD_TONS_HA=3.2`.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File as ConfigFile, FileFormat};
use cropyield_model::forest::{DEFAULT_N_ESTIMATORS, DEFAULT_SEED};
use cropyield_model::{AdvisoryThresholds, ForestConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";
pub const ENV_PREFIX: &str = "CROPYIELD";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub dataset_path: PathBuf,
    pub n_estimators: usize,
    pub seed: u64,
    pub log_level: String,
    pub log_format: String,
    pub thresholds: AdvisoryThresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            dataset_path: PathBuf::from("data/wheat_yield_data.csv"),
            n_estimators: DEFAULT_N_ESTIMATORS,
            seed: DEFAULT_SEED,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            thresholds: AdvisoryThresholds::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from the process environment and the resolved config file.
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path_override, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(config_path_override: Option<&Path>, env: Environment) -> Result<Self> {
        let resolved_path = match config_path_override {
            Some(path) if !path.exists() => {
                bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                path.exists().then_some(path)
            }
        };

        let mut builder = Config::builder();

        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            env.prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("failed to assemble configuration")?;
        let parsed: DashboardConfig = config
            .try_deserialize()
            .context("invalid dashboard configuration")?;

        if parsed.n_estimators == 0 {
            bail!("n_estimators must be at least 1");
        }

        Ok(parsed)
    }

    pub fn forest_config(&self) -> ForestConfig {
        ForestConfig {
            n_estimators: self.n_estimators,
            seed: self.seed,
            ..ForestConfig::default()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
