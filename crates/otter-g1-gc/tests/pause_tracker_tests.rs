//! Pause window accounting tests
//!
//! Timelines are in microseconds on a tracker allowing 10ms of pauses per
//! 20ms window unless stated otherwise.

use otter_g1_gc::PauseTracker;
use proptest::prelude::*;

fn tracker() -> PauseTracker {
    PauseTracker::new(20, 10)
}

/// Apply alternating pause and gap lengths starting at `start`, returns the
/// verdict of every pause and the final time
fn replay(tracker: &mut PauseTracker, start: i64, steps: &[(i64, i64)]) -> (Vec<bool>, i64) {
    let mut now = start;
    let mut verdicts = Vec::new();
    for &(pause, gap) in steps {
        verdicts.push(tracker.add_pause(now, now + pause));
        now += pause + gap;
    }
    (verdicts, now)
}

#[test]
fn test_single_pause_then_max_delay() {
    let mut tracker = tracker();
    assert!(tracker.add_pause(0, 1000));
    // The whole 10ms budget is only free again once the first pause leaves the window
    assert_eq!(tracker.min_delay_before_pause_in_micros(1000, 10_000), 10_000);
    assert_eq!(tracker.min_delay_before_max_pause_in_micros(1000), 10_000);
}

#[test]
fn test_delay_depends_on_requested_pause() {
    let mut tracker = tracker();
    let (verdicts, now) = replay(
        &mut tracker,
        0,
        &[(1000, 2000), (2000, 5000), (1000, 5000), (3000, 1000)],
    );
    assert_eq!(verdicts, vec![true; 4]);
    assert_eq!(now, 20_000);

    assert_eq!(tracker.min_delay_before_pause_in_micros(now, 6000), 0);
    assert_eq!(tracker.min_delay_before_pause_in_micros(now, 7000), 4000);
}

#[test]
fn test_budget_boundary_at_one_microsecond() {
    let steps = [(3000, 3000), (3000, 3000), (4000, 0)];

    let mut tracker = tracker();
    let (verdicts, now) = replay(&mut tracker, 0, &steps);
    assert_eq!(verdicts, vec![true; 3]);
    assert_eq!(now, 16_000);
    assert!(!tracker.add_pause(now + 3999, now + 4000));

    let mut tracker = self::tracker();
    let (_, now) = replay(&mut tracker, 0, &steps);
    assert!(tracker.add_pause(now + 4000, now + 4001));
}

#[test]
fn test_exceeding_pause_is_still_recorded() {
    let mut tracker = tracker();
    assert!(!tracker.add_pause(0, 12_000));
    assert_eq!(tracker.pauses().count(), 1);
    assert_eq!(tracker.interval_pause_in_micros(12_000), 12_000);
    // Nothing fits until the overflowing pause has mostly left the window
    assert!(tracker.min_delay_before_max_pause_in_micros(12_000) > 0);
}

#[test]
fn test_old_pauses_leave_the_window() {
    let mut tracker = tracker();
    assert!(tracker.add_pause(0, 5000));
    assert!(tracker.add_pause(30_000, 31_000));
    assert_eq!(tracker.pauses().count(), 1);
    assert_eq!(tracker.interval_pause_in_micros(31_000), 1000);
}

#[test]
fn test_nanosecond_wrapper() {
    let mut tracker = tracker();
    assert!(tracker.add_pause_in_nanos(0, 1_000_999));
    let pause = tracker.pauses().next().copied().unwrap();
    assert_eq!(pause.start_time_us(), 0);
    assert_eq!(pause.end_time_us(), 1000);
}

fn pause_steps() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..6000, 0i64..8000), 1..40)
}

proptest! {
    #[test]
    fn prop_retained_pauses_end_inside_window(steps in pause_steps()) {
        let mut tracker = tracker();
        let mut now = 0;
        for (pause, gap) in steps {
            let end = now + pause;
            tracker.add_pause(now, end);
            for entry in tracker.pauses() {
                prop_assert!(entry.end_time_us() > end - tracker.interval_us());
            }
            now = end + gap;
        }
    }

    #[test]
    fn prop_adjacent_pause_after_exceedance_also_exceeds(
        steps in pause_steps(),
        next_pause in 1i64..5000,
    ) {
        let mut tracker = tracker();
        let mut now = 0;
        for (pause, gap) in steps {
            let end = now + pause;
            if !tracker.add_pause(now, end) {
                prop_assert!(!tracker.add_pause(end, end + next_pause));
                return Ok(());
            }
            now = end + gap;
        }
    }

    #[test]
    fn prop_delay_query_is_pure(
        steps in pause_steps(),
        offset in 0i64..30_000,
        pause in 0i64..15_000,
    ) {
        let mut tracker = tracker();
        let (_, now) = replay(&mut tracker, 0, &steps);
        let before: Vec<_> = tracker.pauses().copied().collect();
        let first = tracker.min_delay_before_pause_in_micros(now + offset, pause);
        let second = tracker.min_delay_before_pause_in_micros(now + offset, pause);
        prop_assert_eq!(first, second);
        prop_assert!(first >= 0);
        let after: Vec<_> = tracker.pauses().copied().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_nanos_match_micros(steps in prop::collection::vec((0i64..6_000_000, 0i64..8_000_000), 1..30)) {
        let mut nanos = tracker();
        let mut micros = tracker();
        let mut now = 0;
        for (pause, gap) in steps {
            let end = now + pause;
            prop_assert_eq!(
                nanos.add_pause_in_nanos(now, end),
                micros.add_pause(now / 1000, end / 1000)
            );
            now = end + gap;
        }
    }
}
