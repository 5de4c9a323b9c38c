//! Sliding-window failure history for a single identity.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::clock::Clock;
use crate::config::LimiterConfig;

/// Failure timestamps for one identity, oldest first.
///
/// Every operation prunes entries that fell out of the window before it
/// returns, so the deque never holds more than the in-window failures plus
/// whatever arrived since the last access.
pub struct FailureTracker {
    identity: String,
    config: LimiterConfig,
    clock: Arc<dyn Clock>,
    failures: Mutex<VecDeque<Instant>>,
}

impl FailureTracker {
    pub fn new(identity: impl Into<String>, config: LimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity: identity.into(),
            config,
            clock,
            failures: Mutex::new(VecDeque::new()),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Records a failure at the current instant and discards expired ones.
    pub fn record_failure(&self) {
        // Read the clock under the lock so pushes stay in time order.
        let mut failures = self.lock();
        let now = self.clock.now();
        failures.push_back(now);
        self.prune(&mut failures, now);
        tracing::debug!(
            "{} recorded login failure(s) for {}",
            failures.len(),
            self.identity
        );
    }

    /// Returns `true` once the in-window failure count reaches the threshold.
    ///
    /// A failure exactly at `now - window` still counts.
    pub fn is_severe_failure_rate(&self) -> bool {
        let count = self.failure_count();
        tracing::debug!(
            "Failure rate for {}: {} of {} in {}s",
            self.identity,
            count,
            self.config.max_attempts,
            self.config.window_seconds
        );
        count >= self.config.max_attempts as usize
    }

    /// Number of failures inside the window.
    pub fn failure_count(&self) -> usize {
        let mut failures = self.lock();
        let now = self.clock.now();
        self.prune(&mut failures, now);
        failures.len()
    }

    /// `true` when every recorded failure has expired.
    pub fn is_idle(&self) -> bool {
        self.failure_count() == 0
    }

    // The deque is consistent after every push or pop, so a panic elsewhere
    // while holding the lock leaves nothing half-written.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prune(&self, failures: &mut VecDeque<Instant>, now: Instant) {
        // Process younger than the window: nothing can have expired yet.
        let Some(cutoff) = now.checked_sub(self.config.window()) else {
            return;
        };
        while failures.front().is_some_and(|&t| t < cutoff) {
            failures.pop_front();
        }
    }
}

impl std::fmt::Debug for FailureTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureTracker")
            .field("identity", &self.identity)
            .field("config", &self.config)
            .field("recorded", &self.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// First read stalls and returns `base`; every later read is `base + 11s`.
    struct StallingClock {
        base: Instant,
        first: AtomicBool,
    }

    impl Clock for StallingClock {
        fn now(&self) -> Instant {
            if self.first.swap(false, Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(200));
                self.base
            } else {
                self.base + Duration::from_secs(11)
            }
        }
    }

    fn tracker(window: u64, max: u32) -> (FailureTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let config = LimiterConfig::new(window, max).unwrap();
        (FailureTracker::new("alice", config, clock.clone()), clock)
    }

    #[test]
    fn new_tracker_is_idle() {
        let (tracker, _) = tracker(600, 3);
        assert_eq!(tracker.identity(), "alice");
        assert_eq!(tracker.failure_count(), 0);
        assert!(tracker.is_idle());
        assert!(!tracker.is_severe_failure_rate());
    }

    #[test]
    fn below_threshold_is_not_severe() {
        let (tracker, _) = tracker(600, 3);
        tracker.record_failure();
        tracker.record_failure();
        assert_eq!(tracker.failure_count(), 2);
        assert!(!tracker.is_severe_failure_rate());
    }

    #[test]
    fn reaching_threshold_is_severe() {
        let (tracker, _) = tracker(600, 3);
        for _ in 0..3 {
            tracker.record_failure();
        }
        assert!(tracker.is_severe_failure_rate());
    }

    #[test]
    fn failure_exactly_at_cutoff_still_counts() {
        let (tracker, clock) = tracker(600, 1);
        tracker.record_failure();
        clock.advance(Duration::from_secs(600));
        assert_eq!(tracker.failure_count(), 1);
        assert!(tracker.is_severe_failure_rate());
    }

    #[test]
    fn failure_just_past_cutoff_expires() {
        let (tracker, clock) = tracker(600, 1);
        tracker.record_failure();
        clock.advance(Duration::from_secs(600) + Duration::from_millis(1));
        assert_eq!(tracker.failure_count(), 0);
        assert!(!tracker.is_severe_failure_rate());
        assert!(tracker.is_idle());
    }

    #[test]
    fn repeated_checks_after_expiry_stay_clear() {
        let (tracker, clock) = tracker(600, 3);
        for _ in 0..3 {
            tracker.record_failure();
        }
        clock.advance(Duration::from_secs(601));
        for _ in 0..5 {
            assert!(!tracker.is_severe_failure_rate());
        }
    }

    #[test]
    fn recording_prunes_only_expired_prefix() {
        let (tracker, clock) = tracker(10, 5);
        tracker.record_failure();
        clock.advance(Duration::from_secs(6));
        tracker.record_failure();
        clock.advance(Duration::from_secs(6));
        // first failure is now 12s old, second 6s old
        tracker.record_failure();
        assert_eq!(tracker.failure_count(), 2);
    }

    #[test]
    fn retained_entries_bounded_by_window() {
        let (tracker, clock) = tracker(5, 3);
        for _ in 0..100 {
            tracker.record_failure();
            clock.advance(Duration::from_secs(1));
        }
        // failures at t-1 .. t-5 are in the window (inclusive lower bound)
        assert_eq!(tracker.failure_count(), 5);
    }

    #[test]
    fn concurrent_records_lose_nothing() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let config = LimiterConfig::new(600, 1000).unwrap();
        let tracker = Arc::new(FailureTracker::new("alice", config, clock));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        tracker.record_failure();
                        let _ = tracker.is_severe_failure_rate();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.failure_count(), 400);
    }

    #[test]
    fn slow_clock_read_cannot_reorder_failures() {
        let clock = Arc::new(StallingClock {
            base: Instant::now(),
            first: AtomicBool::new(true),
        });
        let config = LimiterConfig::new(10, 2).unwrap();
        let tracker = Arc::new(FailureTracker::new("alice", config, clock));

        let early = {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || tracker.record_failure())
        };
        // Let the other thread enter its stalled clock read first.
        std::thread::sleep(Duration::from_millis(50));
        tracker.record_failure();
        early.join().unwrap();

        // `base` is 11s old against a 10s window and must not count.
        assert_eq!(tracker.failure_count(), 1);
        assert!(!tracker.is_severe_failure_rate());
    }

    #[test]
    fn debug_shows_identity_and_count() {
        let (tracker, _) = tracker(600, 3);
        tracker.record_failure();
        let debug = format!("{tracker:?}");
        assert!(debug.contains("alice"));
        assert!(debug.contains("recorded: 1"));
    }
}
