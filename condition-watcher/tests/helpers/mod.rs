//! Test helpers for driving the watcher without real sleeps

#![allow(dead_code)]

use std::cell::Cell;
use std::time::Duration;

use condition_watcher::{Condition, ConditionWatcher, DataBundle, Sleeper, WatchConfig};

/// Sleeper that records sleeps instead of blocking
#[derive(Debug, Default)]
pub struct CountingSleeper {
    pub sleeps: Cell<u32>,
    pub total: Cell<Duration>,
}

impl Sleeper for CountingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.total.set(self.total.get() + duration);
    }
}

/// Watcher with the given defaults (milliseconds) and a counting sleeper
pub fn watcher(timeout_ms: u64, interval_ms: u64) -> ConditionWatcher<CountingSleeper> {
    ConditionWatcher::with_sleeper(
        WatchConfig::new()
            .with_timeout_limit(Duration::from_millis(timeout_ms))
            .with_watch_interval(Duration::from_millis(interval_ms)),
        CountingSleeper::default(),
    )
}

/// Condition that first holds on check `n` (0 means never)
pub fn true_on_check(n: u32) -> Condition<impl FnMut(&DataBundle) -> bool> {
    let mut calls = 0u32;
    Condition::new(format!("true on check {n}"), move |_: &DataBundle| {
        calls += 1;
        n != 0 && calls >= n
    })
}
