//! Integration tests: waiting for background work through the watcher

use std::thread;
use std::time::Duration;

use condition_watcher::{ConditionStatus, ConditionWatcher, WatchConfig, WatchError};
use idling_resource::{wrap, CountingIdlingResource};
use proptest::prelude::*;

fn fast_watcher(timeout_ms: u64) -> ConditionWatcher {
    ConditionWatcher::with_config(
        WatchConfig::new()
            .with_timeout_limit(Duration::from_millis(timeout_ms))
            .with_watch_interval(Duration::from_millis(2)),
    )
}

#[test]
fn test_wait_for_background_workers() {
    let resource = CountingIdlingResource::new("workers");

    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let worker = resource.clone();
            let busy = worker.busy();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(5 * (i + 1)));
                drop(busy);
            })
        })
        .collect();

    assert!(!resource.is_idle_now());
    let report = fast_watcher(2000)
        .wait_for_condition(&mut resource.idle_instruction())
        .unwrap();
    assert_eq!(report.status, ConditionStatus::Met);
    assert!(resource.is_idle_now());

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_stuck_resource_times_out() {
    let resource = CountingIdlingResource::new("stuck");
    let _busy = resource.busy();

    let err = fast_watcher(20)
        .wait_for_condition(&mut resource.idle_instruction())
        .unwrap_err();
    assert!(matches!(err, WatchError::Timeout { .. }));
    assert!(err.to_string().contains("'stuck'"));
    assert!(err.to_string().ends_with("took more than 0 seconds. Test stopped."));
}

#[test]
fn test_stuck_resource_suppressed() {
    let resource = CountingIdlingResource::new("optional");
    let _busy = resource.busy();

    let mut instruction = resource.idle_instruction().disable_throwing_exceptions();
    let report = fast_watcher(10).wait_for_condition(&mut instruction).unwrap();
    assert_eq!(report.status, ConditionStatus::TimedOut);
}

#[test]
fn test_wrap_in_worker_thread() {
    let resource = CountingIdlingResource::new("wrapped");
    let worker = resource.clone();
    let started = resource.busy();

    let handle = thread::spawn(move || {
        wrap(&worker, || {
            drop(started);
            thread::sleep(Duration::from_millis(10));
            3usize
        })
    });

    fast_watcher(2000)
        .wait_for_condition(&mut resource.idle_instruction())
        .unwrap();
    assert_eq!(handle.join().unwrap(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any sequence of increments and decrements leaves the count at
    /// `max(0, running balance)` and never underflows.
    #[test]
    fn prop_count_never_underflows(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
        let resource = CountingIdlingResource::new("prop");
        let mut expected = 0usize;

        for increment in ops {
            if increment {
                expected += 1;
                prop_assert_eq!(resource.increment(), expected);
            } else {
                expected = expected.saturating_sub(1);
                prop_assert_eq!(resource.decrement(), expected);
            }
            prop_assert_eq!(resource.is_idle_now(), expected == 0);
        }
    }
}
