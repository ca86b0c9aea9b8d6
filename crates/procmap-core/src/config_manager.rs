use config as cfg;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment prefix; `PROCMAP__GRAPH__START_LABEL` maps to `graph.start_label`.
pub const ENV_PREFIX: &str = "PROCMAP";
/// Looked up in the working directory when no explicit file is given.
pub const DEFAULT_CONFIG_FILE: &str = "procmap.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for the process-map core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProcMapConfig {
    /// Process-map construction options
    #[serde(default)]
    pub graph: GraphConfig,

    /// Insight filtering thresholds
    #[serde(default)]
    pub insights: InsightConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How node ids are derived from activity labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Label with every whitespace character removed
    #[default]
    Sanitized,
    /// `n{index}` in order of first sight
    Surrogate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Label of the synthetic process start activity
    #[serde(default = "default_start_label")]
    pub start_label: String,

    /// Label of the synthetic process end activity
    #[serde(default = "default_end_label")]
    pub end_label: String,

    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            start_label: default_start_label(),
            end_label: default_end_label(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl GraphConfig {
    /// Sentinel labels must be non-empty and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_label.is_empty() || self.end_label.is_empty() {
            return Err(ConfigError::ValidationError(
                "start_label and end_label must not be empty".to_string(),
            ));
        }
        if self.start_label == self.end_label {
            return Err(ConfigError::ValidationError(format!(
                "start_label and end_label must differ (both '{}')",
                self.start_label
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Coverage an insight must exceed (strictly) to be kept
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,

    /// Keep insights that touch no case at all
    #[serde(default = "default_keep_uncovered")]
    pub keep_uncovered: bool,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            min_coverage: default_min_coverage(),
            keep_uncovered: default_keep_uncovered(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_start_label() -> String {
    "Startknoten".to_string()
}
fn default_end_label() -> String {
    "Endknoten".to_string()
}
fn default_min_coverage() -> f64 {
    0.25
}
fn default_keep_uncovered() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Loads and validates [`ProcMapConfig`]
pub struct ConfigManager {
    config: ProcMapConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (`PROCMAP__*`)
    /// 2. Config file (explicit path, else `./procmap.toml` when present)
    /// 3. Defaults
    ///
    /// Nothing is logged here since the logging setup itself comes from this
    /// configuration; call [`ConfigManager::log_summary`] once a subscriber
    /// is installed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.display().to_string())),
            Some(p) => Some(p.to_path_buf()),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                local.exists().then(|| local.to_path_buf())
            }
        };

        let config = Self::load_from_sources(config_path.as_deref())?;
        Self::validate_config(&config)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Report where the configuration came from and its effective values.
    pub fn log_summary(&self) {
        match self.config_path {
            Some(ref p) => info!("Configuration loaded from {}", p.display()),
            None => info!("No config file found, using defaults"),
        }
        debug!(
            start_label = %self.config.graph.start_label,
            end_label = %self.config.graph.end_label,
            id_strategy = ?self.config.graph.id_strategy,
            min_coverage = self.config.insights.min_coverage,
            keep_uncovered = self.config.insights.keep_uncovered,
            "effective configuration"
        );
    }

    /// Same as [`ConfigManager::load`] without touching the working directory.
    pub fn defaults() -> Self {
        Self {
            config: ProcMapConfig::default(),
            config_path: None,
        }
    }

    pub fn load_from_sources(path: Option<&Path>) -> Result<ProcMapConfig, ConfigError> {
        let mut builder = cfg::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(cfg::File::from(path.to_path_buf()).required(true));
        }
        builder = builder.add_source(
            cfg::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .map_err(|e| ConfigError::ReadError(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn validate_config(config: &ProcMapConfig) -> Result<(), ConfigError> {
        config.graph.validate()?;

        let min = config.insights.min_coverage;
        if !(0.0..=1.0).contains(&min) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid min_coverage: {}. Must be within [0, 1]",
                min
            )));
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        match config.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, compact, json",
                    other
                )))
            }
        }

        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ProcMapConfig {
        &self.config
    }

    /// Get the path to the config file that was loaded, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Write the current configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        info!("Configuration written to {}", path.display());
        Ok(())
    }
}
