//! Configuration for condition polling
//!
//! `WatchConfig` holds the two tunables of a wait: how long to keep trying
//! and how long to sleep between checks. It replaces process-wide defaults;
//! each [`ConditionWatcher`](crate::ConditionWatcher) owns one.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchError};

/// Default timeout limit: 5 seconds
pub const DEFAULT_TIMEOUT_LIMIT: Duration = Duration::from_millis(5000);

/// Default poll interval: 16 milliseconds
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_millis(16);

/// Environment variable overriding the timeout limit, in milliseconds
pub const TIMEOUT_ENV: &str = "CONDITION_WATCHER_TIMEOUT_MS";

/// Environment variable overriding the poll interval, in milliseconds
pub const INTERVAL_ENV: &str = "CONDITION_WATCHER_INTERVAL_MS";

/// Timeout limit and poll interval for a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Maximum accounted elapsed time before giving up
    /// Default: 5000 ms
    pub timeout_limit: Duration,

    /// Delay between successive checks
    /// Default: 16 ms
    pub watch_interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            timeout_limit: DEFAULT_TIMEOUT_LIMIT,
            watch_interval: DEFAULT_WATCH_INTERVAL,
        }
    }
}

impl WatchConfig {
    /// Create a WatchConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a WatchConfig for conditions expected to settle quickly
    pub fn fast() -> Self {
        Self {
            timeout_limit: Duration::from_secs(1),
            watch_interval: Duration::from_millis(5),
        }
    }

    /// Create a WatchConfig for slow devices and emulators
    pub fn patient() -> Self {
        Self {
            timeout_limit: Duration::from_secs(30),
            watch_interval: Duration::from_millis(100),
        }
    }

    /// Set the timeout limit
    pub fn with_timeout_limit(mut self, timeout_limit: Duration) -> Self {
        self.timeout_limit = timeout_limit;
        self
    }

    /// Set the poll interval
    pub fn with_watch_interval(mut self, watch_interval: Duration) -> Self {
        self.watch_interval = watch_interval;
        self
    }

    /// Build a configuration from the environment, falling back to defaults
    ///
    /// Reads `CONDITION_WATCHER_TIMEOUT_MS` and `CONDITION_WATCHER_INTERVAL_MS`.
    /// A variable that is set but not a whole number of milliseconds is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(millis) = parse_millis(&lookup, TIMEOUT_ENV)? {
            config.timeout_limit = millis;
        }
        if let Some(millis) = parse_millis(&lookup, INTERVAL_ENV)? {
            config.watch_interval = millis;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// A zero interval never accumulates elapsed time, so a predicate that
    /// stays false would be polled forever.
    pub fn validate(&self) -> Result<()> {
        check_watch_interval(self.watch_interval)
    }
}

/// Reject intervals that cannot make progress towards a timeout
pub(crate) fn check_watch_interval(watch_interval: Duration) -> Result<()> {
    if watch_interval.is_zero() {
        return Err(WatchError::InvalidConfig(
            "watch interval must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn parse_millis<L>(lookup: &L, key: &str) -> Result<Option<Duration>>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|millis| Some(Duration::from_millis(millis)))
            .map_err(|e| WatchError::InvalidConfig(format!("{key}={raw:?}: {e}"))),
    }
}
