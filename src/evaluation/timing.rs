//! Service start rules for single and synchronized double services.
//!
//! These functions are the timing core of insertion evaluation: given the
//! times at which the involved vehicles can reach a node, they decide when
//! each service starts.

use crate::models::{Separation, TimeWindow};

/// Numerical slack allowed on the separation window after correction.
pub const SEPARATION_TOLERANCE: f64 = 0.5;

/// Earliest service start of a vehicle leaving its last stop at `leave` and
/// travelling `travel` to a node with window `tw`.
pub fn arrival_start(tw: &TimeWindow, leave: f64, travel: f64) -> f64 {
    tw.earliest_start(leave + travel)
}

/// Common start of a simultaneous service: both vehicles wait for the later one.
pub fn simultaneous_starts(arrival0: f64, arrival1: f64) -> (f64, f64) {
    let start = arrival0.max(arrival1);
    (start, start)
}

/// Starts of a precedence service.
///
/// Vehicle 0 starts at its arrival; vehicle 1 starts no earlier than its own
/// arrival and no earlier than `sep.min` after vehicle 0. If the gap then
/// exceeds `sep.max`, vehicle 0 is delayed by exactly the excess.
///
/// # Examples
///
/// ```
/// use u_homecare::evaluation::timing::precedence_starts;
/// use u_homecare::models::Separation;
///
/// let sep = Separation::new(5.0, 10.0).unwrap();
/// assert_eq!(precedence_starts(0.0, 2.0, &sep), (0.0, 5.0));
/// assert_eq!(precedence_starts(0.0, 30.0, &sep), (20.0, 30.0));
/// ```
pub fn precedence_starts(arrival0: f64, arrival1: f64, sep: &Separation) -> (f64, f64) {
    let start1 = arrival1.max(arrival0 + sep.min);
    let excess = ((start1 - arrival0) - sep.max).max(0.0);
    let start0 = arrival0 + excess;

    debug_assert!(
        (start1 - start0) + SEPARATION_TOLERANCE >= sep.min,
        "minimum separation violated on precedence service"
    );
    debug_assert!(
        (start1 - start0) - SEPARATION_TOLERANCE <= sep.max,
        "maximum separation violated on precedence service"
    );

    (start0, start1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_arrival_start_waits_for_window() {
        let tw = TimeWindow::new(20.0, 50.0).expect("valid");
        assert_eq!(arrival_start(&tw, 5.0, 10.0), 20.0);
        assert_eq!(arrival_start(&tw, 15.0, 10.0), 25.0);
        // Late arrivals start immediately and are tardy.
        assert_eq!(arrival_start(&tw, 55.0, 10.0), 65.0);
    }

    #[test]
    fn test_simultaneous_waits_for_later_vehicle() {
        assert_eq!(simultaneous_starts(8.0, 12.0), (12.0, 12.0));
        assert_eq!(simultaneous_starts(12.0, 8.0), (12.0, 12.0));
    }

    #[test]
    fn test_precedence_min_gap_delays_second() {
        let sep = Separation::new(10.0, 20.0).expect("valid");
        assert_eq!(precedence_starts(5.0, 6.0, &sep), (5.0, 15.0));
    }

    #[test]
    fn test_precedence_within_window_untouched() {
        let sep = Separation::new(10.0, 20.0).expect("valid");
        assert_eq!(precedence_starts(5.0, 22.0, &sep), (5.0, 22.0));
    }

    #[test]
    fn test_precedence_max_gap_delays_first() {
        let sep = Separation::new(10.0, 20.0).expect("valid");
        // Gap 40 exceeds max by 20: vehicle 0 is pushed from 0 to 20.
        assert_eq!(precedence_starts(0.0, 40.0, &sep), (20.0, 40.0));
    }

    #[test]
    fn test_precedence_second_before_first() {
        let sep = Separation::new(0.0, 5.0).expect("valid");
        assert_eq!(precedence_starts(30.0, 10.0, &sep), (30.0, 30.0));
    }

    proptest! {
        #[test]
        fn prop_precedence_respects_separation(
            arrival0 in 0.0f64..1000.0,
            arrival1 in 0.0f64..1000.0,
            min in 0.0f64..100.0,
            width in 0.0f64..100.0,
        ) {
            let sep = Separation::new(min, min + width).expect("valid");
            let (s0, s1) = precedence_starts(arrival0, arrival1, &sep);
            let gap = s1 - s0;
            prop_assert!(gap + SEPARATION_TOLERANCE >= sep.min);
            prop_assert!(gap - SEPARATION_TOLERANCE <= sep.max);
            prop_assert!(s0 >= arrival0);
            prop_assert!(s1 >= arrival1);
        }

        #[test]
        fn prop_simultaneous_starts_equal(a in 0.0f64..1000.0, b in 0.0f64..1000.0) {
            let (s0, s1) = simultaneous_starts(a, b);
            prop_assert_eq!(s0, s1);
            prop_assert_eq!(s0, a.max(b));
        }
    }
}
