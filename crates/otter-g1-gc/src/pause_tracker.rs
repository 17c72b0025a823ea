//! Sliding-window pause accounting
//!
//! Tracks the pauses the collector took during the last `interval` and answers
//! two questions:
//!
//! - did the pause that just finished push the window over its budget?
//! - how long must the collector wait before it may take a pause of a given length?
//!
//! All times are in microseconds unless the method name says otherwise.

use std::collections::VecDeque;

const MILLIS_TO_MICROS: i64 = 1000;
const MICROS_TO_NANOS: i64 = 1000;

/// A single recorded GC pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseEntry {
    start_time_us: i64,
    end_time_us: i64,
}

impl PauseEntry {
    /// Create a pause spanning `[start_time_us, end_time_us]`
    pub fn new(start_time_us: i64, end_time_us: i64) -> Self {
        Self {
            start_time_us,
            end_time_us,
        }
    }

    /// Pause start
    pub fn start_time_us(&self) -> i64 {
        self.start_time_us
    }

    /// Pause end
    pub fn end_time_us(&self) -> i64 {
        self.end_time_us
    }

    /// Part of the pause that lies after `oldest_interval_time`
    fn duration_after(&self, oldest_interval_time: i64) -> i64 {
        let start = self.start_time_us.max(oldest_interval_time);
        (self.end_time_us - start).max(0)
    }
}

/// Ledger of recent pauses inside a sliding window
#[derive(Debug, Clone)]
pub struct PauseTracker {
    pauses: VecDeque<PauseEntry>,
    interval_us: i64,
    max_gc_time_us: i64,
}

impl PauseTracker {
    /// Create a tracker allowing `max_gc_time_ms` of pauses per `interval_ms`
    pub fn new(interval_ms: i64, max_gc_time_ms: i64) -> Self {
        Self::from_micros(
            interval_ms * MILLIS_TO_MICROS,
            max_gc_time_ms * MILLIS_TO_MICROS,
        )
    }

    /// Create a tracker with window and budget given in microseconds
    ///
    /// A negative budget is treated as zero, every pause then exceeds it.
    pub fn from_micros(interval_us: i64, max_gc_time_us: i64) -> Self {
        debug_assert!(interval_us > 0);
        Self {
            pauses: VecDeque::new(),
            interval_us,
            max_gc_time_us: max_gc_time_us.max(0),
        }
    }

    /// Window length
    pub fn interval_us(&self) -> i64 {
        self.interval_us
    }

    /// Pause budget per window
    pub fn max_gc_time_us(&self) -> i64 {
        self.max_gc_time_us
    }

    /// Pauses currently retained, oldest first
    pub fn pauses(&self) -> impl Iterator<Item = &PauseEntry> {
        self.pauses.iter()
    }

    /// Record a pause given in nanoseconds
    pub fn add_pause_in_nanos(&mut self, start_time_ns: i64, end_time_ns: i64) -> bool {
        self.add_pause(start_time_ns / MICROS_TO_NANOS, end_time_ns / MICROS_TO_NANOS)
    }

    /// Record a pause and check the window budget
    ///
    /// Returns `false` if the pauses inside the window ending at `end_time_us`
    /// exceed the budget. The pause is recorded either way.
    pub fn add_pause(&mut self, start_time_us: i64, end_time_us: i64) -> bool {
        debug_assert!(start_time_us <= end_time_us);
        debug_assert!(
            self.pauses
                .back()
                .is_none_or(|last| last.end_time_us <= end_time_us),
            "pauses must be added in end time order"
        );
        self.remove_out_of_interval_entries(end_time_us);
        self.pauses
            .push_back(PauseEntry::new(start_time_us, end_time_us));
        let gc_time = self.interval_pause_in_micros(end_time_us);
        if gc_time > self.max_gc_time_us {
            tracing::debug!(
                target: "otter::gc",
                gc_time_us = gc_time,
                max_gc_time_us = self.max_gc_time_us,
                interval_us = self.interval_us,
                "Target GC pause was exceeded"
            );
            return false;
        }
        true
    }

    /// Cumulative pause time inside the window ending at `now_us`
    pub fn interval_pause_in_micros(&self, now_us: i64) -> i64 {
        let oldest_interval_time = now_us - self.interval_us;
        self.pauses
            .iter()
            .filter(|pause| pause.end_time_us > oldest_interval_time)
            .map(|pause| {
                (pause.end_time_us.min(now_us) - pause.start_time_us.max(oldest_interval_time))
                    .max(0)
            })
            .sum()
    }

    /// Minimum wait before a pause of `pause_time_us` fits into the budget
    ///
    /// The pause is clamped to the budget. The result is measured from `now_us`.
    pub fn min_delay_before_pause_in_micros(&self, now_us: i64, pause_time_us: i64) -> i64 {
        let pause_time_us = pause_time_us.clamp(0, self.max_gc_time_us);
        let mut gc_budget = self.max_gc_time_us - pause_time_us;
        let new_interval_time = now_us + pause_time_us;
        let oldest_interval_time = new_interval_time - self.interval_us;

        for pause in self.pauses.iter().rev() {
            if pause.end_time_us <= oldest_interval_time {
                break;
            }
            let duration = pause.duration_after(oldest_interval_time);
            if duration > gc_budget {
                let new_oldest_interval_time = pause.end_time_us - gc_budget;
                debug_assert!(new_oldest_interval_time >= oldest_interval_time);
                return new_oldest_interval_time - oldest_interval_time;
            }
            gc_budget -= duration;
        }
        0
    }

    /// Minimum wait before a pause as long as the whole budget
    pub fn min_delay_before_max_pause_in_micros(&self, now_us: i64) -> i64 {
        self.min_delay_before_pause_in_micros(now_us, self.max_gc_time_us)
    }

    fn remove_out_of_interval_entries(&mut self, now_us: i64) {
        let oldest_interval_time = now_us - self.interval_us;
        while let Some(oldest) = self.pauses.front() {
            if oldest.end_time_us > oldest_interval_time {
                break;
            }
            self.pauses.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker() {
        let tracker = PauseTracker::new(20, 10);
        assert_eq!(tracker.min_delay_before_max_pause_in_micros(0), 0);
        assert_eq!(tracker.min_delay_before_pause_in_micros(500, 3000), 0);
        assert_eq!(tracker.interval_pause_in_micros(0), 0);
    }

    #[test]
    fn test_first_pause_fits() {
        let mut tracker = PauseTracker::new(20, 10);
        assert!(tracker.add_pause(0, 1000));
        assert_eq!(tracker.pauses().count(), 1);
    }

    #[test]
    fn test_entry_on_window_edge_is_evicted() {
        let mut tracker = PauseTracker::from_micros(100, 50);
        assert!(tracker.add_pause(0, 10));
        // Window for the next pause starts exactly at 10
        assert!(tracker.add_pause(100, 110));
        let retained: Vec<_> = tracker.pauses().copied().collect();
        assert_eq!(retained, vec![PauseEntry::new(100, 110)]);
    }

    #[test]
    fn test_partial_overlap_is_clipped() {
        let mut tracker = PauseTracker::from_micros(100, 50);
        tracker.add_pause(0, 40);
        tracker.add_pause(120, 130);
        // Window is [30, 130]: 10us of the first pause plus the second one
        assert_eq!(tracker.interval_pause_in_micros(130), 20);
    }

    #[test]
    fn test_budget_exceeded_still_recorded() {
        let mut tracker = PauseTracker::from_micros(100, 50);
        assert!(!tracker.add_pause(0, 60));
        assert_eq!(tracker.pauses().count(), 1);
    }

    #[test]
    fn test_pause_longer_than_budget_is_clamped() {
        let tracker = PauseTracker::new(20, 10);
        assert_eq!(
            tracker.min_delay_before_pause_in_micros(0, 50_000),
            tracker.min_delay_before_max_pause_in_micros(0)
        );
    }

    #[test]
    fn test_negative_budget_is_zero() {
        let mut tracker = PauseTracker::from_micros(100, -5);
        assert_eq!(tracker.max_gc_time_us(), 0);
        assert!(!tracker.add_pause(0, 10));
        // The pause only stops counting once it has left the window
        assert_eq!(tracker.min_delay_before_pause_in_micros(10, 30), 100);
        assert_eq!(tracker.min_delay_before_max_pause_in_micros(200), 0);
    }
}
