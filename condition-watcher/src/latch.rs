//! Blocking wait for a value produced elsewhere
//!
//! A `ValueLatch` is a single slot filled through one or more [`LatchSender`]s,
//! typically from a background thread or a callback, and awaited by the test
//! with a timeout. Setting the slot again replaces the previous value, so an
//! await always sees the latest one. Awaiting takes the value out of the slot.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::error::{Result, WatchError};

/// Default time to wait for a value: 2 seconds
pub const DEFAULT_VALUE_TIMEOUT: Duration = Duration::from_secs(2);

struct Slot<T> {
    value: Mutex<Option<T>>,
    filled: Condvar,
}

/// Receiving side of a latch
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use std::time::Duration;
/// use condition_watcher::ValueLatch;
///
/// let latch = ValueLatch::new();
/// let sender = latch.sender();
///
/// let value = latch.get_or_await_value(Duration::from_secs(1), || {
///     thread::spawn(move || {
///         sender.set("Reminder saved".to_string());
///     });
/// })?;
/// assert_eq!(value, "Reminder saved");
/// # Ok::<(), condition_watcher::WatchError>(())
/// ```
pub struct ValueLatch<T> {
    slot: Arc<Slot<T>>,
}

/// Sending side of a latch, cheap to clone
///
/// Holds the slot weakly; once every [`ValueLatch`] handle is dropped,
/// [`set`](Self::set) returns false.
pub struct LatchSender<T> {
    slot: Weak<Slot<T>>,
}

impl<T> LatchSender<T> {
    /// Store a value, replacing any value not yet taken
    ///
    /// Returns false if every latch handle was dropped.
    pub fn set(&self, value: T) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            return false;
        };

        *slot.value.lock() = Some(value);
        slot.filled.notify_all();
        true
    }
}

impl<T> ValueLatch<T> {
    /// Create an empty latch
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Slot {
                value: Mutex::new(None),
                filled: Condvar::new(),
            }),
        }
    }

    /// Get a handle for delivering values
    pub fn sender(&self) -> LatchSender<T> {
        LatchSender {
            slot: Arc::downgrade(&self.slot),
        }
    }

    /// Whether a value is waiting to be taken
    pub fn is_set(&self) -> bool {
        self.slot.value.lock().is_some()
    }

    /// Take the value if one is already available
    pub fn try_get(&self) -> Option<T> {
        self.slot.value.lock().take()
    }

    /// Run `after_observe`, then block up to `timeout` for a value
    ///
    /// `after_observe` is where the test triggers whatever should produce the
    /// value. Returns [`WatchError::ValueNeverSet`] if nothing arrives in time.
    pub fn get_or_await_value<F>(&self, timeout: Duration, after_observe: F) -> Result<T>
    where
        F: FnOnce(),
    {
        after_observe();

        let deadline = Instant::now().checked_add(timeout);
        let mut value = self.slot.value.lock();

        while value.is_none() {
            match deadline {
                Some(deadline) => {
                    if self.slot.filled.wait_until(&mut value, deadline).timed_out() {
                        break;
                    }
                }
                None => self.slot.filled.wait(&mut value),
            }
        }

        value.take().ok_or_else(|| {
            debug!(timeout_ms = timeout.as_millis() as u64, "Value was never set");
            WatchError::ValueNeverSet { timeout }
        })
    }

    /// Block up to two seconds for a value
    pub fn get_or_await_default(&self) -> Result<T> {
        self.get_or_await_value(DEFAULT_VALUE_TIMEOUT, || {})
    }
}

impl<T> Default for ValueLatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Handles share the slot, so cloning never needs `T: Clone`
impl<T> Clone for ValueLatch<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Clone for LatchSender<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Weak::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for ValueLatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueLatch")
            .field("is_set", &self.is_set())
            .finish()
    }
}

impl<T> fmt::Debug for LatchSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatchSender")
            .field("connected", &(self.slot.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_try_get_empty() {
        let latch = ValueLatch::<u32>::new();
        assert!(latch.try_get().is_none());
        assert!(!latch.is_set());
    }

    #[test]
    fn test_value_already_set() {
        let latch = ValueLatch::new();
        assert!(latch.sender().set(7u32));
        assert_eq!(latch.get_or_await_default().unwrap(), 7);
    }

    #[test]
    fn test_value_from_other_thread() {
        let latch = ValueLatch::new();
        let sender = latch.sender();

        let value = latch
            .get_or_await_value(Duration::from_millis(500), move || {
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(10));
                    sender.set(42u32);
                });
            })
            .unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_value_never_set() {
        let latch = ValueLatch::<String>::new();
        let start = Instant::now();
        let result = latch.get_or_await_value(Duration::from_millis(50), || {});

        assert!(matches!(result, Err(WatchError::ValueNeverSet { .. })));
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_latest_value_wins() {
        let latch = ValueLatch::new();
        let sender = latch.sender();
        sender.set("initial".to_string());
        sender.set("updated".to_string());

        let value = latch.get_or_await_value(Duration::from_millis(50), || {}).unwrap();
        assert_eq!(value, "updated");
        assert!(latch.try_get().is_none());
    }

    #[test]
    fn test_value_taken_once() {
        let latch = ValueLatch::new();
        latch.sender().set(3u8);

        assert_eq!(latch.get_or_await_default().unwrap(), 3);
        let second = latch.get_or_await_value(Duration::from_millis(20), || {});
        assert!(matches!(second, Err(WatchError::ValueNeverSet { .. })));
    }

    #[test]
    fn test_clone_without_clone_payload() {
        struct Token(u32);

        let latch = ValueLatch::<Token>::new();
        let other = latch.clone();
        let sender = latch.sender().clone();
        assert!(format!("{:?}", latch).contains("is_set: false"));

        assert!(sender.set(Token(9)));
        assert!(latch.is_set());
        assert_eq!(other.try_get().map(|token| token.0), Some(9));
    }

    #[test]
    fn test_sender_after_latch_dropped() {
        let latch = ValueLatch::<u8>::new();
        let sender = latch.sender();
        drop(latch);
        assert!(!sender.set(1));
    }
}
