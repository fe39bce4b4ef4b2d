use std::collections::VecDeque;
use std::time::Duration;

use crate::shared::clock::{Clock, SystemClock};

/// Sliding-window limiter: at most `max_calls` acquisitions in any rolling
/// `period`.
///
/// An acquisition at time `t` is granted when fewer than `max_calls`
/// acquisitions happened in `(t - period, t]`. Otherwise [`acquire`]
/// sleeps until the oldest one leaves the window. There is no timeout.
///
/// [`acquire`]: SlidingWindowRateLimiter::acquire
pub struct SlidingWindowRateLimiter {
    max_calls: usize,
    period: Duration,
    granted: VecDeque<Duration>,
    clock: Box<dyn Clock>,
}

impl SlidingWindowRateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Result<Self, &'static str> {
        Self::with_clock(max_calls, period, Box::new(SystemClock::new()))
    }

    pub fn with_clock(
        max_calls: usize,
        period: Duration,
        clock: Box<dyn Clock>,
    ) -> Result<Self, &'static str> {
        if max_calls < 1 {
            return Err("max_calls must be >= 1");
        }
        if period.is_zero() {
            return Err("period must be non-zero");
        }
        Ok(Self {
            max_calls,
            period,
            granted: VecDeque::with_capacity(max_calls),
            clock,
        })
    }

    /// Blocks until the window has room, then records the acquisition.
    pub fn acquire(&mut self) {
        loop {
            let now = self.clock.now();
            self.evict(now);
            if self.granted.len() < self.max_calls {
                self.granted.push_back(now);
                return;
            }
            let oldest = self.granted[0];
            let wait = (oldest + self.period).saturating_sub(now);
            log::info!(
                "Rate limit of {} calls per {:.0}s reached; waiting {:.1}s",
                self.max_calls,
                self.period.as_secs_f64(),
                wait.as_secs_f64()
            );
            self.clock.sleep(wait);
        }
    }

    /// Sleeps on the limiter's clock without taking a slot.
    pub fn pause(&mut self, delay: Duration) {
        self.clock.sleep(delay);
    }

    fn evict(&mut self, now: Duration) {
        while let Some(&t) = self.granted.front() {
            if now.saturating_sub(t) >= self.period {
                self.granted.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::ManualClock;

    fn limiter(max_calls: usize, period_secs: u64, clock: &ManualClock) -> SlidingWindowRateLimiter {
        SlidingWindowRateLimiter::with_clock(
            max_calls,
            Duration::from_secs(period_secs),
            Box::new(clock.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_pause_does_not_take_a_slot() {
        let clock = ManualClock::default();
        let mut rl = limiter(1, 10, &clock);

        rl.pause(Duration::from_secs(3));
        rl.acquire();

        assert_eq!(clock.now(), Duration::from_secs(3));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(3)]);
    }

    #[test]
    fn test_rejects_zero_calls() {
        assert!(SlidingWindowRateLimiter::new(0, Duration::from_secs(60)).is_err());
    }

    #[test]
    fn test_rejects_zero_period() {
        assert!(SlidingWindowRateLimiter::new(10, Duration::ZERO).is_err());
    }

    #[test]
    fn test_burst_up_to_limit_without_waiting() {
        let clock = ManualClock::default();
        let mut rl = limiter(10, 60, &clock);

        for _ in 0..10 {
            rl.acquire();
        }

        assert!(clock.sleeps().is_empty());
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_eleventh_call_waits_for_window() {
        let clock = ManualClock::default();
        let mut rl = limiter(10, 60, &clock);

        for _ in 0..11 {
            rl.acquire();
        }

        assert_eq!(clock.sleeps(), vec![Duration::from_secs(60)]);
        assert_eq!(clock.now(), Duration::from_secs(60));
    }

    #[test]
    fn test_wait_accounts_for_elapsed_time() {
        let clock = ManualClock::default();
        let mut rl = limiter(2, 60, &clock);

        rl.acquire();
        clock.advance(Duration::from_secs(45));
        rl.acquire();
        rl.acquire();

        // Oldest grant (t=0) leaves the window at t=60.
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(15)]);
    }

    #[test]
    fn test_spaced_calls_never_wait() {
        let clock = ManualClock::default();
        let mut rl = limiter(1, 10, &clock);

        for _ in 0..5 {
            rl.acquire();
            clock.advance(Duration::from_secs(10));
        }

        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_no_rolling_window_exceeds_limit() {
        let clock = ManualClock::default();
        let mut rl = limiter(10, 60, &clock);
        let mut stamps = Vec::new();

        for i in 0..35 {
            rl.acquire();
            stamps.push(clock.now());
            // Uneven work between calls.
            clock.advance(Duration::from_millis(700 * (i % 4)));
        }

        let window = Duration::from_secs(60);
        for (i, &start) in stamps.iter().enumerate() {
            let in_window = stamps[i..].iter().filter(|&&t| t - start < window).count();
            assert!(in_window <= 10, "window starting at {start:?} holds {in_window}");
        }
    }
}
