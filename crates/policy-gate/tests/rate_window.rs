//! Sliding-window behavior at the default policy numbers.

use std::time::{Duration, Instant};

use policy_gate::{PolicyConfig, RateLimiter};

#[test]
fn sixteenth_call_in_the_window_is_denied() {
    let config = PolicyConfig::default();
    let limiter = RateLimiter::new(config.rate.max_executions, config.rate.window());
    let t0 = Instant::now();

    for i in 0..15 {
        let at = t0 + Duration::from_secs(i);
        assert!(limiter.check_at(at), "execution {i} fits the budget");
        limiter.record_at(at);
    }

    let sixteenth = t0 + Duration::from_secs(30);
    assert!(!limiter.check_at(sixteenth));
}

#[test]
fn budget_returns_once_the_first_call_leaves_the_window() {
    let config = PolicyConfig::default();
    let window = config.rate.window();
    let limiter = RateLimiter::new(config.rate.max_executions, window);
    let t0 = Instant::now();

    for _ in 0..15 {
        limiter.record_at(t0);
    }
    assert!(!limiter.check_at(t0 + Duration::from_secs(1)));

    let past_window = t0 + window + Duration::from_millis(1);
    assert!(limiter.check_at(past_window));
}
