//! Busy/idle tracking for tests that wait on background work
//!
//! Application code marks a [`CountingIdlingResource`] busy while work is in
//! flight; tests wait until it is idle again, either directly or through an
//! [`IdleInstruction`] polled by a
//! [`ConditionWatcher`](condition_watcher::ConditionWatcher).
//!
//! ```rust
//! use idling_resource::{wrap, CountingIdlingResource};
//!
//! let resource = CountingIdlingResource::default();
//! let rows = wrap(&resource, || vec!["Reminder 1", "Reminder 2"]);
//! assert_eq!(rows.len(), 2);
//! assert!(resource.is_idle_now());
//! ```

pub mod instruction;
pub mod resource;

pub use instruction::IdleInstruction;
pub use resource::{wrap, BusyGuard, CountingIdlingResource, DEFAULT_RESOURCE_NAME};
