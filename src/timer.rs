//! Cooperative deadline shared by the solver and generator workers.
//!
//! Every bounded-work loop polls `time_is_up` between iterations; nothing
//! is ever interrupted mid-step. `terminate` lets the first successful
//! worker cancel its siblings through the same flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Largest accepted budget, in milliseconds.
pub const MAX_TIME_LIMIT_MS: u64 = 100_000_000;

pub struct Timer {
    time_limit: Duration,
    started: Instant,
    time_is_up: AtomicBool,
}

impl Timer {
    /// Start a timer with a millisecond budget in `1..=100_000_000`.
    pub fn new(time_limit_ms: u64) -> Self {
        assert!((1..=MAX_TIME_LIMIT_MS).contains(&time_limit_ms));
        Self {
            time_limit: Duration::from_millis(time_limit_ms),
            started: Instant::now(),
            time_is_up: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Set the expiry flag unconditionally. Safe from any thread.
    pub fn terminate(&self) {
        self.time_is_up.store(true, Ordering::Relaxed);
    }

    /// True once the flag is set or the budget has elapsed.
    /// Elapsing latches the flag, so later calls stay cheap.
    pub fn time_is_up(&self) -> bool {
        if self.time_is_up.load(Ordering::Relaxed) {
            return true;
        }
        if self.started.elapsed() >= self.time_limit {
            self.terminate();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fresh_timer_not_expired() {
        let timer = Timer::new(10_000);
        assert!(!timer.time_is_up());
    }

    #[test]
    fn test_budget_elapses() {
        let timer = Timer::new(20);
        thread::sleep(Duration::from_millis(40));
        assert!(timer.time_is_up());
        // latched
        assert!(timer.time_is_up());
    }

    #[test]
    fn test_terminate_latches() {
        let timer = Timer::new(10_000);
        timer.terminate();
        assert!(timer.time_is_up());
    }

    #[test]
    fn test_terminate_from_other_thread() {
        let timer = Timer::new(10_000);
        thread::scope(|scope| {
            scope.spawn(|| timer.terminate());
        });
        assert!(timer.time_is_up());
    }
}
