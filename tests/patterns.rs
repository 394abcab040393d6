//! Integration tests for morning/evening star detection.

use candlebot::prelude::*;
use proptest::prelude::*;

fn morning_star() -> Vec<Bar> {
    vec![Bar::new(10.0, 7.5), Bar::new(7.6, 8.0), Bar::new(8.1, 10.5)]
}

fn evening_star() -> Vec<Bar> {
    vec![Bar::new(7.5, 10.0), Bar::new(10.4, 10.0), Bar::new(9.9, 7.4)]
}

/// Generate sideways bars that never form a star
fn make_sideways(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = 100.0 + (i % 3) as f64 * 0.1;
            Bar::new(base, base + 0.3)
        })
        .collect()
}

// ============================================================
// MORNING STAR
// ============================================================

#[test]
fn test_morning_star_literal_sequence() {
    assert!(is_morning_star(&morning_star()));
    assert!(!is_evening_star(&morning_star()));
}

#[test]
fn test_morning_star_rise_boundary_is_strict() {
    let mut bars = morning_star();
    // rise3 exactly 2.0
    bars[2] = Bar::new(8.5, 10.5);
    assert!(!is_morning_star(&bars));
}

#[test]
fn test_morning_star_drop_boundary_is_strict() {
    let mut bars = morning_star();
    // drop1 exactly 2.0, midpoint 9.0 still below close 10.5
    bars[0] = Bar::new(10.0, 8.0);
    assert!(!is_morning_star(&bars));
}

#[test]
fn test_morning_star_body_boundary_is_strict() {
    let mut bars = morning_star();
    bars[1] = Bar::new(7.0, 8.0);
    assert!(!is_morning_star(&bars));
}

#[test]
fn test_morning_star_after_long_history() {
    let mut bars = make_sideways(20);
    bars.extend(morning_star());
    assert!(is_morning_star(&bars));

    bars.push(Bar::new(10.5, 10.6));
    assert!(!is_morning_star(&bars));
}

// ============================================================
// EVENING STAR
// ============================================================

#[test]
fn test_evening_star_literal_sequence() {
    assert!(is_evening_star(&evening_star()));
    assert!(!is_morning_star(&evening_star()));
}

#[test]
fn test_evening_star_drop_boundary_is_strict() {
    let mut bars = evening_star();
    // drop3 exactly 2.0
    bars[2] = Bar::new(9.5, 7.5);
    assert!(!is_evening_star(&bars));
}

#[test]
fn test_evening_star_rise_boundary_is_strict() {
    let mut bars = evening_star();
    bars[0] = Bar::new(8.0, 10.0);
    assert!(!is_evening_star(&bars));
}

#[test]
fn test_evening_star_needs_close_below_midpoint() {
    let mut bars = evening_star();
    // drop3 = 2.5 but close 8.8 is above the 8.75 midpoint
    bars[2] = Bar::new(11.3, 8.8);
    assert!(!is_evening_star(&bars));
}

// ============================================================
// SCANNING
// ============================================================

#[test]
fn test_scan_finds_both_patterns() {
    let mut bars = make_sideways(5);
    bars.extend(morning_star());
    bars.extend(make_sideways(5));
    bars.extend(evening_star());

    let found = scan(&bars);
    let ids: Vec<_> = found.iter().map(|m| m.pattern_id).collect();
    assert_eq!(ids, vec![MORNING_STAR, EVENING_STAR]);
    assert_eq!(found[0].end_index, 7);
    assert_eq!(found[1].end_index, bars.len() - 1);
    assert_eq!(found[1].direction, Direction::Bearish);
}

#[test]
fn test_sideways_market_has_no_patterns() {
    assert!(scan(&make_sideways(200)).is_empty());
}

// ============================================================
// PROPERTIES
// ============================================================

fn any_bar() -> impl Strategy<Value = Bar> {
    (1.0f64..500.0, -10.0f64..10.0).prop_map(|(open, delta)| Bar::new(open, open + delta))
}

proptest! {
    #[test]
    fn prop_short_history_never_signals(bars in prop::collection::vec(any_bar(), 0..3)) {
        prop_assert!(!is_morning_star(&bars));
        prop_assert!(!is_evening_star(&bars));
    }

    #[test]
    fn prop_stars_are_mutually_exclusive(bars in prop::collection::vec(any_bar(), 3..12)) {
        prop_assert!(!(is_morning_star(&bars) && is_evening_star(&bars)));
    }

    #[test]
    fn prop_only_last_three_bars_matter(
        prefix in prop::collection::vec(any_bar(), 0..10),
        tail in prop::collection::vec(any_bar(), 3..=3),
    ) {
        let mut bars = prefix;
        bars.extend(tail.iter().copied());
        prop_assert_eq!(is_morning_star(&bars), is_morning_star(&tail));
        prop_assert_eq!(is_evening_star(&bars), is_evening_star(&tail));
    }
}
