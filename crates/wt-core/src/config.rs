//! Configuration loading and validation for transition analysis.
//!
//! Resolution order:
//! 1. Explicit path passed by the caller
//! 2. `WT_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! Environment overrides (`WT_BUFFER_CAPACITY`, `WT_CALC_FPTS`) are applied
//! after the file is loaded, then the result is validated.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wt_store::{Compression, StoreConfig};

/// Default buffer capacity in records (~38 MiB of records).
pub const DEFAULT_BUFFER_CAPACITY: usize = 524_288;

/// Default fraction of buffer capacity that triggers a mid-segment flush.
pub const DEFAULT_BURST_FLUSH_FRACTION: f64 = 0.1;

/// Default number of segments between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1000;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 40,
            ConfigError::ParseError { .. } => 41,
            ConfigError::IoError { .. } => 42,
            ConfigError::InvalidValue { .. } => 43,
        }
    }

    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Accumulator tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccumulatorConfig {
    /// Records held in memory before writing to the store.
    pub buffer_capacity: usize,
    /// Flush mid-segment once this fraction of capacity is pending.
    pub burst_flush_fraction: f64,
    /// Compute first-passage times; when off every record carries 0.
    pub calc_fpts: bool,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        AccumulatorConfig {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            burst_flush_fraction: DEFAULT_BURST_FLUSH_FRACTION,
            calc_fpts: true,
        }
    }
}

impl AccumulatorConfig {
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_calc_fpts(mut self, enabled: bool) -> Self {
        self.calc_fpts = enabled;
        self
    }

    /// Pending-record count above which a segment flushes early.
    pub fn burst_limit(&self) -> f64 {
        self.buffer_capacity as f64 * self.burst_flush_fraction
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::invalid(
                "accumulator.buffer_capacity",
                "must be at least 1",
            ));
        }
        if !(self.burst_flush_fraction > 0.0 && self.burst_flush_fraction <= 1.0) {
            return Err(ConfigError::invalid(
                "accumulator.burst_flush_fraction",
                format!("must be in (0, 1], got {}", self.burst_flush_fraction),
            ));
        }
        Ok(())
    }
}

/// Output store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    pub output_dir: PathBuf,
    pub compression: Compression,
    pub row_group_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            output_dir: PathBuf::from("transitions"),
            compression: Compression::Zstd,
            row_group_size: wt_store::DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

impl StoreSettings {
    /// Parquet store configuration for one run.
    pub fn store_config(&self, run_id: &str) -> StoreConfig {
        StoreConfig::new(self.output_dir.clone(), run_id)
            .with_compression(self.compression)
            .with_row_group_size(self.row_group_size)
    }
}

/// Run-driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    /// Segments between progress events.
    pub progress_interval: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Complete analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub accumulator: AccumulatorConfig,
    pub store: StoreSettings,
    pub analysis: RunSettings,
}

impl AnalysisConfig {
    /// Resolve, load, override from the environment, and validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("WT_CONFIG").map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => AnalysisConfig::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = env::var("WT_BUFFER_CAPACITY") {
            self.accumulator.buffer_capacity = val.trim().parse().map_err(|_| {
                ConfigError::invalid("WT_BUFFER_CAPACITY", format!("not an integer: {}", val))
            })?;
        }
        if let Ok(val) = env::var("WT_CALC_FPTS") {
            self.accumulator.calc_fpts = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid("WT_CALC_FPTS", format!("not a boolean: {}", val)))?;
        }
        Ok(())
    }

    /// Semantic validation of all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.accumulator.validate()?;
        if self.store.row_group_size == 0 {
            return Err(ConfigError::invalid(
                "store.row_group_size",
                "must be at least 1",
            ));
        }
        if self.analysis.progress_interval == 0 {
            return Err(ConfigError::invalid(
                "analysis.progress_interval",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
