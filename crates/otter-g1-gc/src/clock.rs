//! Monotonic time sources

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic clock read at phase boundaries
pub trait Clock: Send + Sync {
    /// Current time in nanoseconds
    fn now_ns(&self) -> u64;

    /// Current time in microseconds
    fn now_us(&self) -> i64 {
        (self.now_ns() / 1000) as i64
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ns(&self) -> u64 {
        (**self).now_ns()
    }
}

/// Clock backed by `Instant`, counting from its creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock starting at zero now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ns(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ns: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `start_ns`
    pub fn new(start_ns: u64) -> Self {
        Self {
            now_ns: AtomicU64::new(start_ns),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.now_ns
            .fetch_add(by.as_nanos() as u64, Ordering::AcqRel);
    }

    /// Move the clock forward by `us` microseconds
    pub fn advance_us(&self, us: u64) {
        self.advance(Duration::from_micros(us));
    }

    /// Jump to an absolute time, which must not be in the past
    pub fn set_ns(&self, now_ns: u64) {
        let previous = self.now_ns.swap(now_ns, Ordering::AcqRel);
        debug_assert!(previous <= now_ns, "manual clock moved backwards");
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now_ns.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(5_000);
        assert_eq!(clock.now_us(), 5);
        clock.advance_us(20);
        assert_eq!(clock.now_ns(), 25_000);
        clock.set_ns(1_000_000);
        assert_eq!(clock.now_us(), 1_000);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let first = clock.now_ns();
        let second = clock.now_ns();
        assert!(second >= first);
    }

    #[test]
    fn test_shared_clock() {
        let clock = Arc::new(ManualClock::new(0));
        let shared: Arc<ManualClock> = Arc::clone(&clock);
        clock.advance_us(3);
        assert_eq!(Clock::now_us(&shared), 3);
    }
}
