//! Fixed-window admission control for the redirect path.
//!
//! Requests are counted in discrete, non-overlapping windows. The counter
//! resets the first time a request arrives at least `window_size` after the
//! current window opened, so a burst straddling a boundary can see up to
//! `2 * max_requests` admissions in quick succession.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use crate::utils::{Clock, SystemClock};

/// Mutable window state, only touched under the limiter's lock
#[derive(Debug)]
struct RateWindow {
    window_start: Instant,
    count: u32,
}

/// Outcome of a single admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Admissions left in the current window after this one
    pub remaining: u32,
    /// Time until the current window can be reset
    pub retry_after: Duration,
}

#[derive(Debug)]
pub struct RateLimiter {
    window: Mutex<RateWindow>,
    window_size: Duration,
    max_requests: u32,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(window_size: Duration, max_requests: u32) -> Self {
        Self::with_clock(window_size, max_requests, Arc::new(SystemClock))
    }

    pub fn with_clock(window_size: Duration, max_requests: u32, clock: Arc<dyn Clock>) -> Self {
        let window = RateWindow {
            window_start: clock.now(),
            count: 0,
        };

        Self {
            window: Mutex::new(window),
            window_size,
            max_requests,
            clock,
        }
    }

    /// Admits or rejects one request
    pub fn allow(&self) -> bool {
        self.check().allowed
    }

    /// Admits or rejects one request, reporting the window's remaining budget
    pub fn check(&self) -> RateDecision {
        // Both fields are written together, so a poisoned guard is still consistent
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if now.duration_since(window.window_start) >= self.window_size {
            window.window_start = now;
            window.count = 0;
        }

        let retry_after = self
            .window_size
            .saturating_sub(now.duration_since(window.window_start));

        if window.count >= self.max_requests {
            debug!(
                "Rate limit reached ({}/{}), window resets in {:?}",
                window.count, self.max_requests, retry_after
            );
            return RateDecision {
                allowed: false,
                remaining: 0,
                retry_after,
            };
        }

        window.count += 1;
        RateDecision {
            allowed: true,
            remaining: self.max_requests - window.count,
            retry_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::utils::clock::ManualClock;

    fn limiter(max_requests: u32) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(Duration::from_secs(1), max_requests, clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_three_rapid_calls_with_budget_of_two() {
        let (limiter, _) = limiter(2);
        let results: Vec<bool> = (0..3).map(|_| limiter.allow()).collect();
        assert_eq!(results, vec![true, true, false]);
    }

    #[test]
    fn test_eleventh_call_in_window_is_denied() {
        let (limiter, clock) = limiter(10);

        for _ in 0..10 {
            assert!(limiter.allow());
            clock.advance(Duration::from_millis(50));
        }
        assert!(!limiter.allow());
    }

    #[test]
    fn test_window_elapsing_restores_budget() {
        let (limiter, clock) = limiter(10);

        for _ in 0..10 {
            assert!(limiter.allow());
        }
        assert!(!limiter.allow());
        assert!(!limiter.allow());

        clock.advance(Duration::from_secs(1));
        assert!(limiter.allow());
    }

    #[test]
    fn test_window_does_not_reset_early() {
        let (limiter, clock) = limiter(1);

        assert!(limiter.allow());
        clock.advance(Duration::from_millis(999));
        assert!(!limiter.allow());
        clock.advance(Duration::from_millis(1));
        assert!(limiter.allow());
    }

    #[test]
    fn test_burst_across_boundary_admits_twice_the_budget() {
        let (limiter, clock) = limiter(3);

        clock.advance(Duration::from_millis(900));
        // The window opened at construction, so these land at its tail end.
        assert!((0..3).all(|_| limiter.allow()));
        clock.advance(Duration::from_millis(100));
        assert!((0..3).all(|_| limiter.allow()));
        assert!(!limiter.allow());
    }

    #[test]
    fn test_check_reports_remaining_and_retry_after() {
        let (limiter, clock) = limiter(2);

        let first = limiter.check();
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert_eq!(first.retry_after, Duration::from_secs(1));

        clock.advance(Duration::from_millis(300));
        let second = limiter.check();
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let denied = limiter.check();
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after, Duration::from_millis(700));
    }

    #[test]
    fn test_zero_budget_denies_everything() {
        let (limiter, clock) = limiter(0);
        assert!(!limiter.allow());
        clock.advance(Duration::from_secs(5));
        assert!(!limiter.allow());
    }

    #[test]
    fn test_concurrent_callers_never_exceed_budget() {
        let (limiter, _) = limiter(50);

        let admitted: usize = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| (0..20).filter(|_| limiter.allow()).count()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(admitted, 50);
    }
}
