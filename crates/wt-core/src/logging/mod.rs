//! Structured logging for transition analysis.
//!
//! Human-readable output for interactive use, JSON lines for pipelines.
//! All log output goes to stderr.

pub mod config;

pub use config::{LogConfig, LogFormat};
pub use tracing_subscriber::filter::LevelFilter;

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.level.to_string().to_lowercase();
        EnvFilter::new(format!("wt_core={level},wt_store={level}"))
    })
}

/// Install the global subscriber, failing if one is already set.
pub fn try_init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
}

/// Initialize the logging subsystem.
///
/// Call once at startup; a second call is reported on stderr and ignored.
pub fn init_logging(config: &LogConfig) {
    if let Err(err) = try_init_logging(config) {
        eprintln!("Warning: logging already initialized: {}", err);
    }
}

/// Initialize logging from the environment only.
pub fn init_default_logging() {
    init_logging(&LogConfig::from_env(None, None));
}

/// Generate a unique run ID for one analysis run.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // Shorten to first 12 hex chars for readability
    format!("run-{}", &uuid.simple().to_string()[..12])
}
