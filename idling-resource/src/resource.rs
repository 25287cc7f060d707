//! Counter of in-flight work
//!
//! - `CountingIdlingResource`: shared counter, idle when it reads zero
//! - `BusyGuard`: marks the resource busy for its lifetime

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::instruction::IdleInstruction;

/// Name used by [`CountingIdlingResource::default`]
pub const DEFAULT_RESOURCE_NAME: &str = "GLOBAL";

struct Inner {
    name: String,
    counter: AtomicUsize,
}

/// Shared busy counter
///
/// Application code increments before starting background work and
/// decrements when it finishes; tests wait for the count to return to zero.
/// Clones share the same counter.
///
/// # Example
///
/// ```rust
/// use idling_resource::CountingIdlingResource;
///
/// let resource = CountingIdlingResource::new("reminders");
/// {
///     let _busy = resource.busy();
///     assert!(!resource.is_idle_now());
/// }
/// assert!(resource.is_idle_now());
/// ```
#[derive(Clone)]
pub struct CountingIdlingResource {
    inner: Arc<Inner>,
}

impl CountingIdlingResource {
    /// Create an idle resource with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                counter: AtomicUsize::new(0),
            }),
        }
    }

    /// Name of the resource, used in log output and timeout messages
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current number of outstanding units of work
    pub fn count(&self) -> usize {
        self.inner.counter.load(Ordering::SeqCst)
    }

    /// Whether no work is outstanding
    pub fn is_idle_now(&self) -> bool {
        self.count() == 0
    }

    /// Mark one more unit of work as started, returning the new count
    pub fn increment(&self) -> usize {
        let count = self.inner.counter.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(resource = %self.inner.name, count, "Idling resource busy");
        count
    }

    /// Mark one unit of work as finished, returning the new count
    ///
    /// Does nothing when the resource is already idle.
    pub fn decrement(&self) -> usize {
        match self
            .inner
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| count.checked_sub(1))
        {
            Ok(previous) => {
                let count = previous - 1;
                trace!(resource = %self.inner.name, count, "Idling resource released");
                count
            }
            Err(_) => {
                trace!(resource = %self.inner.name, "Decrement on idle resource ignored");
                0
            }
        }
    }

    /// Mark the resource busy until the returned guard is dropped
    pub fn busy(&self) -> BusyGuard {
        self.increment();
        BusyGuard {
            resource: self.clone(),
        }
    }

    /// Instruction whose condition holds once the resource is idle
    pub fn idle_instruction(&self) -> IdleInstruction {
        IdleInstruction::new(self.clone())
    }
}

impl Default for CountingIdlingResource {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE_NAME)
    }
}

impl fmt::Debug for CountingIdlingResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingIdlingResource")
            .field("name", &self.inner.name)
            .field("count", &self.count())
            .finish()
    }
}

/// Keeps a resource busy while alive
#[must_use = "the resource becomes idle again as soon as the guard is dropped"]
#[derive(Debug)]
pub struct BusyGuard {
    resource: CountingIdlingResource,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.resource.decrement();
    }
}

/// Run `function` with `resource` marked busy
///
/// The resource is released when `function` returns or unwinds.
pub fn wrap<T, F>(resource: &CountingIdlingResource, function: F) -> T
where
    F: FnOnce() -> T,
{
    let _busy = resource.busy();
    function()
}
