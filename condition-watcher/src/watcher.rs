//! The polling loop
//!
//! `ConditionWatcher` checks an [`Instruction`] at a fixed interval until it
//! holds or the timeout limit is reached:
//!
//! ```text
//! NotMet ──check──▶ true ───────────────────────────▶ Met
//!   ▲                 │
//!   │               false
//!   │                 ▼
//!   └── elapsed < timeout ◀── elapsed += interval; sleep(interval)
//!                     │
//!            elapsed >= timeout ─────────────────────▶ TimedOut
//! ```
//!
//! Elapsed time is accounted in whole intervals, not read from a clock. A
//! check that succeeds always wins, even with a zero timeout; once the
//! accounted time reaches the limit no further check is made. A predicate that
//! never holds is therefore checked `ceil(timeout / interval)` times, and at
//! least once.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::config::{check_watch_interval, WatchConfig};
use crate::error::{Result, WatchError};
use crate::instruction::{Condition, Instruction};
use crate::status::{ConditionStatus, WaitReport};
use crate::DataBundle;

/// Blocks the calling thread between checks
///
/// The default [`ThreadSleeper`] calls `std::thread::sleep`. Tests can supply
/// their own implementation to drive the loop without real time passing.
pub trait Sleeper {
    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Sleeps on the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Polls instructions using a default timeout and interval
///
/// The defaults apply to [`wait_for_condition`](Self::wait_for_condition) and
/// [`wait_for_condition_with_timeout`](Self::wait_for_condition_with_timeout).
/// Changing them never affects calls that pass explicit values.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use condition_watcher::{Condition, ConditionWatcher, DataBundle};
///
/// let mut watcher = ConditionWatcher::new();
/// watcher.set_watch_interval(Duration::from_millis(1));
///
/// let mut polls = 0;
/// let mut ready = Condition::new("list shows two rows", |_: &DataBundle| {
///     polls += 1;
///     polls == 3
/// });
///
/// let report = watcher.wait_for_condition(&mut ready)?;
/// assert_eq!(report.checks, 3);
/// # Ok::<(), condition_watcher::WatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConditionWatcher<S = ThreadSleeper> {
    config: WatchConfig,
    sleeper: S,
}

impl ConditionWatcher {
    /// Create a watcher with the default 5 s timeout and 16 ms interval
    pub fn new() -> Self {
        Self::with_config(WatchConfig::default())
    }

    /// Create a watcher from an existing configuration
    pub fn with_config(config: WatchConfig) -> Self {
        Self {
            config,
            sleeper: ThreadSleeper,
        }
    }

    /// Create a watcher configured from the environment
    ///
    /// See [`WatchConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        WatchConfig::from_env().map(Self::with_config)
    }
}

impl Default for ConditionWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sleeper> ConditionWatcher<S> {
    /// Create a watcher that blocks through a custom [`Sleeper`]
    pub fn with_sleeper(config: WatchConfig, sleeper: S) -> Self {
        Self { config, sleeper }
    }

    /// Current default timeout and interval
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// The sleeper used between checks
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Change the default poll interval
    pub fn set_watch_interval(&mut self, watch_interval: Duration) {
        self.config.watch_interval = watch_interval;
    }

    /// Change the default timeout limit
    pub fn set_timeout_limit(&mut self, timeout_limit: Duration) {
        self.config.timeout_limit = timeout_limit;
    }

    /// Wait using the default timeout and interval
    pub fn wait_for_condition<I>(&self, instruction: &mut I) -> Result<WaitReport>
    where
        I: Instruction + ?Sized,
    {
        self.wait_for_condition_with(
            instruction,
            self.config.timeout_limit,
            self.config.watch_interval,
        )
    }

    /// Wait using an explicit timeout and the default interval
    pub fn wait_for_condition_with_timeout<I>(
        &self,
        instruction: &mut I,
        timeout_limit: Duration,
    ) -> Result<WaitReport>
    where
        I: Instruction + ?Sized,
    {
        self.wait_for_condition_with(instruction, timeout_limit, self.config.watch_interval)
    }

    /// Wait using an explicit timeout and interval
    ///
    /// Returns `Ok` when the condition is met, or when it timed out and the
    /// instruction disabled throwing on timeout. Otherwise returns
    /// [`WatchError::Timeout`].
    pub fn wait_for_condition_with<I>(
        &self,
        instruction: &mut I,
        timeout_limit: Duration,
        watch_interval: Duration,
    ) -> Result<WaitReport>
    where
        I: Instruction + ?Sized,
    {
        poll(instruction, timeout_limit, watch_interval, &self.sleeper)
    }
}

/// Wait on an instruction using an explicit configuration
pub fn wait_for_condition_with_config<I>(
    instruction: &mut I,
    config: &WatchConfig,
) -> Result<WaitReport>
where
    I: Instruction + ?Sized,
{
    poll(
        instruction,
        config.timeout_limit,
        config.watch_interval,
        &ThreadSleeper,
    )
}

/// Wait for a closure to return true, using the default configuration
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let loaded = Arc::new(AtomicBool::new(false));
/// let flag = loaded.clone();
/// thread::spawn(move || {
///     thread::sleep(Duration::from_millis(20));
///     flag.store(true, Ordering::SeqCst);
/// });
///
/// condition_watcher::wait_until("data loaded", || loaded.load(Ordering::SeqCst))?;
/// # Ok::<(), condition_watcher::WatchError>(())
/// ```
pub fn wait_until<F>(description: &str, mut predicate: F) -> Result<WaitReport>
where
    F: FnMut() -> bool,
{
    let mut condition = Condition::new(description, |_: &DataBundle| predicate());
    ConditionWatcher::new().wait_for_condition(&mut condition)
}

fn poll<I, S>(
    instruction: &mut I,
    timeout_limit: Duration,
    watch_interval: Duration,
    sleeper: &S,
) -> Result<WaitReport>
where
    I: Instruction + ?Sized,
    S: Sleeper + ?Sized,
{
    check_watch_interval(watch_interval)?;

    debug!(
        description = %instruction.description(),
        timeout_ms = timeout_limit.as_millis() as u64,
        interval_ms = watch_interval.as_millis() as u64,
        "Waiting for condition"
    );

    let mut status = ConditionStatus::NotMet;
    let mut elapsed = Duration::ZERO;
    let mut checks: u32 = 0;

    while !status.is_terminal() {
        checks = checks.saturating_add(1);

        if instruction.check_condition() {
            status = ConditionStatus::Met;
            continue;
        }

        elapsed = elapsed.saturating_add(watch_interval);
        trace!(
            checks,
            elapsed_ms = elapsed.as_millis() as u64,
            "Condition not met, sleeping"
        );
        sleeper.sleep(watch_interval);

        if elapsed >= timeout_limit {
            status = ConditionStatus::TimedOut;
        }
    }

    let report = WaitReport {
        status,
        checks,
        elapsed,
        timeout: timeout_limit,
        interval: watch_interval,
    };

    match status {
        ConditionStatus::Met => {
            debug!(checks, elapsed_ms = elapsed.as_millis() as u64, "Condition met");
            Ok(report)
        }
        _ if instruction.skip_exception() => {
            warn!(
                description = %instruction.description(),
                checks,
                "Condition timed out, continuing because exceptions are disabled"
            );
            Ok(report)
        }
        _ => Err(WatchError::Timeout {
            description: instruction.description(),
            timeout: timeout_limit,
        }),
    }
}
