//! Waiting for an idling resource through the condition watcher

use condition_watcher::Instruction;

use crate::resource::CountingIdlingResource;

/// Instruction that holds once its resource has no outstanding work
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use std::time::Duration;
/// use condition_watcher::ConditionWatcher;
/// use idling_resource::CountingIdlingResource;
///
/// let resource = CountingIdlingResource::new("reminders");
/// let busy = resource.busy();
/// thread::spawn(move || {
///     thread::sleep(Duration::from_millis(20));
///     drop(busy);
/// });
///
/// ConditionWatcher::new().wait_for_condition(&mut resource.idle_instruction())?;
/// assert!(resource.is_idle_now());
/// # Ok::<(), condition_watcher::WatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IdleInstruction {
    resource: CountingIdlingResource,
    skip_exception: bool,
}

impl IdleInstruction {
    pub(crate) fn new(resource: CountingIdlingResource) -> Self {
        Self {
            resource,
            skip_exception: false,
        }
    }

    /// Make a timeout complete silently
    pub fn disable_throwing_exceptions(mut self) -> Self {
        self.skip_exception = true;
        self
    }

    /// The resource being watched
    pub fn resource(&self) -> &CountingIdlingResource {
        &self.resource
    }
}

impl Instruction for IdleInstruction {
    fn description(&self) -> String {
        format!(
            "wait for idling resource '{}' to become idle ({} busy)",
            self.resource.name(),
            self.resource.count()
        )
    }

    fn check_condition(&mut self) -> bool {
        self.resource.is_idle_now()
    }

    fn skip_exception(&self) -> bool {
        self.skip_exception
    }
}
