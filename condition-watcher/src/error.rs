//! Error types for the condition-watcher crate.

use std::time::Duration;

/// Errors that can occur while waiting on a condition.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The condition was not met before the timeout limit was reached
    ///
    /// Only raised when the instruction has not disabled throwing on timeout.
    #[error("{description} - took more than {} seconds. Test stopped.", .timeout.as_secs())]
    Timeout {
        /// Description of the instruction that timed out
        description: String,
        /// The timeout limit that was exceeded
        timeout: Duration,
    },

    /// The watch configuration cannot be used for polling
    #[error("Invalid watch configuration: {0}")]
    InvalidConfig(String),

    /// A value latch was never filled within its timeout
    #[error("Value was never set within {timeout:?}")]
    ValueNeverSet {
        /// How long the latch was awaited
        timeout: Duration,
    },
}

impl WatchError {
    /// Whether this error came from a condition or latch running out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, WatchError::Timeout { .. } | WatchError::ValueNeverSet { .. })
    }
}

/// Convenience type alias for Results using WatchError.
pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let error = WatchError::Timeout {
            description: "wait reminders reflect to the list".to_string(),
            timeout: Duration::from_millis(5000),
        };
        assert_eq!(
            error.to_string(),
            "wait reminders reflect to the list - took more than 5 seconds. Test stopped."
        );
    }

    #[test]
    fn test_timeout_display_truncates_seconds() {
        let error = WatchError::Timeout {
            description: "checking snackbar".to_string(),
            timeout: Duration::from_millis(2999),
        };
        assert_eq!(
            error.to_string(),
            "checking snackbar - took more than 2 seconds. Test stopped."
        );

        let error = WatchError::Timeout {
            description: "fast".to_string(),
            timeout: Duration::from_millis(500),
        };
        assert!(error.to_string().contains("took more than 0 seconds"));
    }

    #[test]
    fn test_other_variants() {
        let error = WatchError::InvalidConfig("watch interval must be greater than 0".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid watch configuration: watch interval must be greater than 0"
        );
        assert!(!error.is_timeout());

        let error = WatchError::ValueNeverSet {
            timeout: Duration::from_secs(2),
        };
        assert!(error.to_string().contains("never set"));
        assert!(error.is_timeout());
    }
}
