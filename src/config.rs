use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::graph::RelationConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "FLEETGRAPH_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relations: RelationConfig,
    #[serde(default)]
    pub workloads: WorkloadLabels,
    #[serde(default)]
    pub render: RenderOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Label keys used to recover workload back-references
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadLabels {
    /// Label holding the id of the schedule that deployed the workload
    #[serde(default = "default_schedule_label")]
    pub schedule_label: String,
    /// Label holding the working directory the workload was deployed from
    #[serde(default = "default_deployment_group_label")]
    pub deployment_group_label: String,
    /// Path segment preceding the deployment-group id in that directory
    #[serde(default = "default_deployment_group_marker")]
    pub deployment_group_marker: String,
}

impl Default for WorkloadLabels {
    fn default() -> Self {
        WorkloadLabels {
            schedule_label: default_schedule_label(),
            deployment_group_label: default_deployment_group_label(),
            deployment_group_marker: default_deployment_group_marker(),
        }
    }
}

fn default_schedule_label() -> String {
    "io.portainer.update.scheduleId".to_string()
}

fn default_deployment_group_label() -> String {
    "com.docker.compose.project.working_dir".to_string()
}

fn default_deployment_group_marker() -> String {
    "/edge_stacks/".to_string()
}

/// Options passed through to the renderer; they do not affect graph contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default, alias = "use_3d")]
    pub use_3d: bool,
    #[serde(default, alias = "show_names")]
    pub show_names: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in FLEETGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    ///
    /// Without either, the defaults are used.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = match std::env::var(CONFIG_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => {
                let fallback = PathBuf::from("config.toml");
                if !fallback.exists() {
                    log::debug!("No config.toml found, using defaults");
                    return Ok(Config::default());
                }
                fallback
            }
        };

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.workloads.schedule_label.trim().is_empty() {
            anyhow::bail!("workloads.schedule_label must not be empty");
        }

        if self.workloads.deployment_group_label.trim().is_empty() {
            anyhow::bail!("workloads.deployment_group_label must not be empty");
        }

        if self.workloads.deployment_group_marker.is_empty() {
            anyhow::bail!("workloads.deployment_group_marker must not be empty");
        }

        Ok(())
    }
}
