//! Logging configuration from `WT_LOG` and `WT_LOG_FORMAT`.
//!
//! Explicit caller values win over the environment. `RUST_LOG`, when set,
//! is honoured as a full filter directive by the subscriber itself.

use std::env;
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "human" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Level for the workspace crates when `RUST_LOG` is unset.
    pub level: LevelFilter,
    /// Timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LevelFilter::INFO,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Read the environment, then apply explicit overrides.
    ///
    /// Unparseable environment values are ignored.
    pub fn from_env(level: Option<LevelFilter>, format: Option<LogFormat>) -> Self {
        let defaults = LogConfig::default();
        let env_level = env::var("WT_LOG").ok().and_then(|v| v.trim().parse().ok());
        let env_format = env::var("WT_LOG_FORMAT").ok().and_then(|v| v.parse().ok());

        LogConfig {
            level: level.or(env_level).unwrap_or(defaults.level),
            format: format.or(env_format).unwrap_or(defaults.format),
            ..defaults
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!(" human ".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_explicit_overrides_win() {
        let config = LogConfig::from_env(Some(LevelFilter::ERROR), Some(LogFormat::Jsonl));
        assert_eq!(config.level, LevelFilter::ERROR);
        assert_eq!(config.format, LogFormat::Jsonl);
        assert!(config.timestamps);
    }
}
