//! Morning Star / Evening Star detectors
//!
//! Both read exactly three bars and use fixed absolute thresholds with strict
//! comparisons, so a bar sitting on a threshold never qualifies.

use crate::{Candle, CandleExt};

use super::{
  helpers::{is_long_move, is_small_body, last_three},
  Direction, PatternDetector, PatternId, PatternMatch,
};

pub const MORNING_STAR: PatternId = PatternId("MORNING_STAR");
pub const EVENING_STAR: PatternId = PatternId("EVENING_STAR");

// ============================================================
// MORNING STAR
// ============================================================

/// Long bearish bar, small body, long bullish bar closing above bar 1's midpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorningStarDetector;

impl PatternDetector for MorningStarDetector {
  fn id(&self) -> PatternId {
    MORNING_STAR
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: Candle>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
    let (first, second, third) = last_three(bars, index)?;

    if !is_long_move(first.fall()) {
      return None;
    }
    if !is_small_body(second.body()) {
      return None;
    }
    if !is_long_move(third.rise()) || third.close() <= first.midpoint() {
      return None;
    }

    Some(PatternMatch {
      pattern_id:  self.id(),
      direction:   Direction::Bullish,
      start_index: index - 2,
      end_index:   index,
    })
  }
}

// ============================================================
// EVENING STAR
// ============================================================

/// Long bullish bar, small body, long bearish bar closing below bar 1's midpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct EveningStarDetector;

impl PatternDetector for EveningStarDetector {
  fn id(&self) -> PatternId {
    EVENING_STAR
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: Candle>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
    let (first, second, third) = last_three(bars, index)?;

    if !is_long_move(first.rise()) {
      return None;
    }
    if !is_small_body(second.body()) {
      return None;
    }
    if !is_long_move(third.fall()) || third.close() >= first.midpoint() {
      return None;
    }

    Some(PatternMatch {
      pattern_id:  self.id(),
      direction:   Direction::Bearish,
      start_index: index - 2,
      end_index:   index,
    })
  }
}

// ============================================================
// PREDICATES
// ============================================================

/// Morning star ending at the newest bar. False for fewer than three bars.
#[inline]
pub fn is_morning_star<T: Candle>(history: &[T]) -> bool {
  MorningStarDetector.detect_latest(history).is_some()
}

/// Evening star ending at the newest bar. False for fewer than three bars.
#[inline]
pub fn is_evening_star<T: Candle>(history: &[T]) -> bool {
  EveningStarDetector.detect_latest(history).is_some()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Bar;

  #[test]
  fn test_morning_star_detected() {
    let bars = [Bar::new(10.0, 7.5), Bar::new(7.6, 8.0), Bar::new(8.1, 10.5)];
    let m = MorningStarDetector.detect(&bars, 2).unwrap();
    assert_eq!(m.direction, Direction::Bullish);
    assert_eq!((m.start_index, m.end_index), (0, 2));
  }

  #[test]
  fn test_morning_star_needs_close_above_midpoint() {
    // rise3 = 2.5 but close 8.7 sits below the 8.75 midpoint
    let bars = [Bar::new(10.0, 7.5), Bar::new(7.6, 8.0), Bar::new(6.2, 8.7)];
    assert!(!is_morning_star(&bars));
  }

  #[test]
  fn test_morning_star_rejects_bullish_first_bar() {
    let bars = [Bar::new(7.5, 10.0), Bar::new(7.6, 8.0), Bar::new(8.1, 10.5)];
    assert!(!is_morning_star(&bars));
  }

  #[test]
  fn test_evening_star_detected() {
    let bars = [Bar::new(7.5, 10.0), Bar::new(10.4, 10.0), Bar::new(9.9, 7.4)];
    let m = EveningStarDetector.detect(&bars, 2).unwrap();
    assert_eq!(m.direction, Direction::Bearish);
    assert!(!is_morning_star(&bars));
  }

  #[test]
  fn test_only_last_three_are_read() {
    let bars = [
      Bar::new(7.5, 10.0),
      Bar::new(10.4, 10.0),
      Bar::new(9.9, 7.4),
      Bar::new(7.4, 7.5),
    ];
    assert!(EveningStarDetector.detect(&bars, 2).is_some());
    assert!(!is_evening_star(&bars));
  }

  #[test]
  fn test_index_out_of_bounds() {
    let bars = [Bar::new(10.0, 7.5), Bar::new(7.6, 8.0), Bar::new(8.1, 10.5)];
    assert!(MorningStarDetector.detect(&bars, 3).is_none());
    assert!(MorningStarDetector.detect(&bars, 1).is_none());
  }
}
