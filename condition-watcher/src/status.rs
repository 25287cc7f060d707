//! Condition status and the report returned by a finished wait

use std::fmt;
use std::time::Duration;

/// Progress of a single wait call
///
/// Every wait starts at `NotMet` and ends in one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionStatus {
    /// The predicate has not returned true yet
    NotMet,
    /// The predicate returned true
    Met,
    /// The accounted elapsed time reached the timeout limit
    TimedOut,
}

impl ConditionStatus {
    /// Whether polling stops in this state
    pub fn is_terminal(self) -> bool {
        !matches!(self, ConditionStatus::NotMet)
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConditionStatus::NotMet => "not met",
            ConditionStatus::Met => "met",
            ConditionStatus::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// Summary of a wait that completed without an error
///
/// `status` is `Met` on success, or `TimedOut` when the instruction disabled
/// throwing on timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitReport {
    /// Terminal status of the wait
    pub status: ConditionStatus,
    /// How many times the predicate was evaluated
    pub checks: u32,
    /// Elapsed time accounted in interval increments (not wall-clock)
    pub elapsed: Duration,
    /// Timeout limit used for this wait
    pub timeout: Duration,
    /// Poll interval used for this wait
    pub interval: Duration,
}

impl WaitReport {
    /// Whether the condition was observed as met
    pub fn is_met(&self) -> bool {
        self.status == ConditionStatus::Met
    }
}
