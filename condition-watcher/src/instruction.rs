//! Instruction trait describing a condition to wait for
//!
//! An instruction bundles a predicate with a description used in failure
//! messages, a policy for what happens on timeout, and an optional
//! [`DataBundle`] payload.
//!
//! # Example
//!
//! ```rust
//! use condition_watcher::Instruction;
//!
//! struct ListHasRows {
//!     rows: Vec<&'static str>,
//!     expected: usize,
//! }
//!
//! impl Instruction for ListHasRows {
//!     fn description(&self) -> String {
//!         format!("wait for {} rows", self.expected)
//!     }
//!
//!     fn check_condition(&mut self) -> bool {
//!         self.rows.len() == self.expected
//!     }
//! }
//! ```

use std::fmt;

use crate::bundle::DataBundle;

/// A condition the watcher polls until it holds
///
/// Only `description` and `check_condition` are required. `check_condition`
/// is called once per poll and should be cheap; it may read external state.
pub trait Instruction {
    /// Human-readable description, used only in the timeout error message
    fn description(&self) -> String;

    /// Evaluate the condition once
    fn check_condition(&mut self) -> bool;

    /// Whether a timeout completes silently instead of returning an error
    fn skip_exception(&self) -> bool {
        false
    }

    /// Context payload attached by the caller, if any
    fn data(&self) -> Option<&DataBundle> {
        None
    }
}

impl<I: Instruction + ?Sized> Instruction for Box<I> {
    fn description(&self) -> String {
        (**self).description()
    }

    fn check_condition(&mut self) -> bool {
        (**self).check_condition()
    }

    fn skip_exception(&self) -> bool {
        (**self).skip_exception()
    }

    fn data(&self) -> Option<&DataBundle> {
        (**self).data()
    }
}

/// Closure-backed instruction
///
/// The predicate receives the attached [`DataBundle`], so setup code can pass
/// context in without capturing it.
///
/// # Example
///
/// ```rust
/// use condition_watcher::{Condition, DataBundle, Instruction};
///
/// let mut condition = Condition::new("snackbar shows the title", |data: &DataBundle| {
///     data.get::<String>("shown").map(String::as_str) == Some("Reminder 1")
/// })
/// .with_data(DataBundle::new().with("shown", "Reminder 1".to_string()))
/// .disable_throwing_exceptions();
///
/// assert!(condition.check_condition());
/// assert!(condition.skip_exception());
/// ```
pub struct Condition<F> {
    description: String,
    predicate: F,
    skip_exception: bool,
    data: DataBundle,
}

impl<F> Condition<F>
where
    F: FnMut(&DataBundle) -> bool,
{
    /// Create a condition with an empty payload that errors on timeout
    pub fn new(description: impl Into<String>, predicate: F) -> Self {
        Self {
            description: description.into(),
            predicate,
            skip_exception: false,
            data: DataBundle::new(),
        }
    }

    /// Attach a payload, replacing any existing one
    pub fn with_data(mut self, data: DataBundle) -> Self {
        self.data = data;
        self
    }

    /// Make a timeout complete silently
    pub fn disable_throwing_exceptions(mut self) -> Self {
        self.skip_exception = true;
        self
    }

    /// Replace the payload in place
    pub fn set_data(&mut self, data: DataBundle) {
        self.data = data;
    }

    /// Borrow the payload
    pub fn data_container(&self) -> &DataBundle {
        &self.data
    }

    /// Mutably borrow the payload
    pub fn data_container_mut(&mut self) -> &mut DataBundle {
        &mut self.data
    }

    /// Take the payload out, e.g. to inspect what the predicate recorded
    pub fn into_data(self) -> DataBundle {
        self.data
    }
}

impl<F> Instruction for Condition<F>
where
    F: FnMut(&DataBundle) -> bool,
{
    fn description(&self) -> String {
        self.description.clone()
    }

    fn check_condition(&mut self) -> bool {
        (self.predicate)(&self.data)
    }

    fn skip_exception(&self) -> bool {
        self.skip_exception
    }

    fn data(&self) -> Option<&DataBundle> {
        Some(&self.data)
    }
}

impl<F> fmt::Debug for Condition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("description", &self.description)
            .field("skip_exception", &self.skip_exception)
            .field("data", &self.data)
            .finish()
    }
}
