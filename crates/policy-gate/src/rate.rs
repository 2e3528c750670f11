//! Sliding-window rate limiter over execution timestamps.
//!
//! Entries older than the window are pruned lazily whenever a check
//! runs. The log lives behind a single mutex; methods take explicit
//! instants so the window can be exercised synthetically in tests.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling log of recent write-capable execution attempts.
#[derive(Debug)]
pub struct RateLimiter {
    max_executions: usize,
    window: Duration,
    log: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_executions: usize, window: Duration) -> Self {
        Self {
            max_executions,
            window,
            log: Mutex::new(VecDeque::new()),
        }
    }

    /// Prune expired entries, then report whether another execution
    /// fits in the window. A failed check records nothing: the attempt
    /// was rejected, not executed.
    pub fn check_at(&self, now: Instant) -> bool {
        let mut log = self.log.lock();
        Self::prune(&mut log, now, self.window);
        log.len() < self.max_executions
    }

    /// Append an execution timestamp. Called after dispatch of a
    /// permitted action, success or failure.
    pub fn record_at(&self, now: Instant) {
        self.log.lock().push_back(now);
    }

    /// Entries currently inside the window.
    pub fn len_at(&self, now: Instant) -> usize {
        let mut log = self.log.lock();
        Self::prune(&mut log, now, self.window);
        log.len()
    }

    fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(oldest) = log.front() {
            if now.duration_since(*oldest) > window {
                log.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denies_when_budget_is_spent() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let t0 = Instant::now();
        for i in 0..3 {
            assert!(limiter.check_at(t0), "call {i} should fit");
            limiter.record_at(t0);
        }
        assert!(!limiter.check_at(t0));
        // The rejected attempt was not recorded.
        assert_eq!(limiter.len_at(t0), 3);
    }

    #[test]
    fn window_expiry_restores_budget() {
        let window = Duration::from_secs(60);
        let limiter = RateLimiter::new(2, window);
        let t0 = Instant::now();
        limiter.record_at(t0);
        limiter.record_at(t0);
        assert!(!limiter.check_at(t0));

        let later = t0 + window + Duration::from_millis(1);
        assert!(limiter.check_at(later));
        assert_eq!(limiter.len_at(later), 0);
    }

    #[test]
    fn pruning_is_lazy_and_partial() {
        let window = Duration::from_secs(10);
        let limiter = RateLimiter::new(5, window);
        let t0 = Instant::now();
        limiter.record_at(t0);
        limiter.record_at(t0 + Duration::from_secs(8));

        let probe = t0 + Duration::from_secs(12);
        assert_eq!(limiter.len_at(probe), 1);
    }
}
