//! Condition polling for asynchronous tests
//!
//! Tests that drive asynchronous code often need to wait until some state
//! becomes observable. This crate repeatedly checks a predicate at a fixed
//! interval until it holds or a timeout limit is reached, then returns or
//! fails with a descriptive error.
//!
//! # Features
//!
//! - **Instructions**: a trait pairing a predicate with a description, a
//!   timeout policy and an optional [`DataBundle`] payload
//! - **Explicit configuration**: timeout and interval live in a
//!   [`ConditionWatcher`] or [`WatchConfig`] value, never in global state
//! - **Deterministic accounting**: elapsed time advances in whole intervals
//! - **Value latches**: block until another thread delivers a value
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use condition_watcher::{Condition, ConditionWatcher, DataBundle, WatchError};
//!
//! let watcher = ConditionWatcher::new();
//!
//! // Never true: the watcher gives up after the timeout limit
//! let mut empty_list = Condition::new("wait reminders reflect to the list", |_: &DataBundle| false);
//! let err = watcher
//!     .wait_for_condition_with(&mut empty_list, Duration::from_millis(20), Duration::from_millis(5))
//!     .unwrap_err();
//! assert!(matches!(err, WatchError::Timeout { .. }));
//!
//! // Same condition, but a timeout is not a failure
//! let mut optional = Condition::new("optional banner", |_: &DataBundle| false)
//!     .disable_throwing_exceptions();
//! let report = watcher
//!     .wait_for_condition_with(&mut optional, Duration::from_millis(20), Duration::from_millis(5))
//!     .unwrap();
//! assert!(!report.is_met());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ConditionWatcher<S: Sleeper>
//!     │
//!     ├── config: WatchConfig { timeout_limit, watch_interval }
//!     │
//!     └── wait_for_condition*(&mut dyn Instruction)
//!             │
//!             ├── Ok(WaitReport { status, checks, elapsed, .. })
//!             └── Err(WatchError::Timeout { description, timeout })
//! ```

// Modules
pub mod bundle;
pub mod config;
pub mod error;
pub mod instruction;
pub mod latch;
pub mod logging;
pub mod status;
pub mod watcher;

// Re-exports - Public API
pub use bundle::DataBundle;
pub use config::{WatchConfig, DEFAULT_TIMEOUT_LIMIT, DEFAULT_WATCH_INTERVAL};
pub use error::{Result, WatchError};
pub use instruction::{Condition, Instruction};
pub use latch::{LatchSender, ValueLatch};
pub use status::{ConditionStatus, WaitReport};
pub use watcher::{
    wait_for_condition_with_config, wait_until, ConditionWatcher, Sleeper, ThreadSleeper,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bundle::DataBundle;
    pub use crate::config::WatchConfig;
    pub use crate::error::WatchError;
    pub use crate::instruction::{Condition, Instruction};
    pub use crate::watcher::ConditionWatcher;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_full_workflow() {
        // Background work fills the list while the test polls for it
        let rows = Arc::new(AtomicUsize::new(0));
        let writer = rows.clone();
        let handle = thread::spawn(move || {
            for _ in 0..2 {
                thread::sleep(Duration::from_millis(5));
                writer.fetch_add(1, Ordering::SeqCst);
            }
        });

        let mut watcher = ConditionWatcher::new();
        watcher.set_watch_interval(Duration::from_millis(2));

        let observed = rows.clone();
        let mut two_rows = Condition::new("wait reminders reflect to the list", move |data: &DataBundle| {
            let expected = data.get::<usize>("expected").copied().unwrap_or(0);
            observed.load(Ordering::SeqCst) == expected
        })
        .with_data(DataBundle::new().with("expected", 2usize));

        let report = watcher.wait_for_condition(&mut two_rows).unwrap();
        assert!(report.is_met());
        assert!(report.checks >= 1);

        handle.join().unwrap();
    }

    #[test]
    fn test_timeout_message_from_public_api() {
        let watcher = ConditionWatcher::new();
        let mut never = Condition::new("checking snackbar", |_: &DataBundle| false);

        let err = watcher
            .wait_for_condition_with(&mut never, Duration::from_millis(1000), Duration::from_millis(250))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "checking snackbar - took more than 1 seconds. Test stopped."
        );
    }
}
