//! Logging setup for test binaries
//!
//! The watcher emits `tracing` events (`debug` when a wait starts and ends,
//! `trace` per failed check, `warn` when a timeout is swallowed). Nothing is
//! printed unless a subscriber is installed; this module installs one.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Environment variable selecting the logging mode
pub const LOG_MODE_ENV: &str = "CONDITION_WATCHER_LOG_MODE";

/// Environment variable overriding the log filter
pub const LOG_LEVEL_ENV: &str = "CONDITION_WATCHER_LOG_LEVEL";

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber installed
    Silent,
    /// Compact stderr output at `info`
    Development,
    /// Verbose output with thread ids and source locations at `debug`
    Debug,
}

impl LoggingMode {
    /// Parse a mode name, defaulting to `Silent` for anything unrecognised
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => LoggingMode::Development,
            "debug" => LoggingMode::Debug,
            _ => LoggingMode::Silent,
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

/// Initialize logging with the specified mode
///
/// Call once near the start of a test binary. A second call in the same
/// process returns [`LoggingError::TracingInit`].
///
/// # Environment Variables
///
/// - `CONDITION_WATCHER_LOG_LEVEL`: filter directive (e.g. `condition_watcher=trace`)
/// - `RUST_LOG`: used when the above is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_test_writer()
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_test_writer(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `CONDITION_WATCHER_LOG_MODE`
///
/// Defaults to Silent mode if not specified or unrecognised.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var(LOG_MODE_ENV)
        .map(|name| LoggingMode::from_name(&name))
        .unwrap_or(LoggingMode::Silent);

    init_logging(mode)
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = filter_directives(|key| std::env::var(key).ok(), default_level);

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidFilter(format!("{directives}: {e}")))
}

// CONDITION_WATCHER_LOG_LEVEL, then RUST_LOG, then the mode default
fn filter_directives<L>(lookup: L, default_level: &str) -> String
where
    L: Fn(&str) -> Option<String>,
{
    lookup(LOG_LEVEL_ENV)
        .or_else(|| lookup("RUST_LOG"))
        .unwrap_or_else(|| default_level.to_string())
}
