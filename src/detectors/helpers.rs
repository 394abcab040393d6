//! Common helper functions for star pattern detection
//!
//! Thresholds are absolute price units, not ratios of an average body.

// ============================================================
// THRESHOLDS
// ============================================================

/// A body is long when its directional move is strictly greater than this.
pub const LONG_BODY: f64 = 2.0;
/// A body is small when its absolute size is strictly less than this.
pub const SHORT_BODY: f64 = 1.0;

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Directional move qualifies as a long body (strict)
#[inline]
pub fn is_long_move(moved: f64) -> bool {
  moved > LONG_BODY
}

/// Absolute body qualifies as small (strict)
#[inline]
pub fn is_small_body(body: f64) -> bool {
  body < SHORT_BODY
}

/// The three bars ending at `index`, oldest first.
#[inline]
pub fn last_three<T>(bars: &[T], index: usize) -> Option<(&T, &T, &T)> {
  if index < 2 {
    return None;
  }
  Some((bars.get(index - 2)?, bars.get(index - 1)?, bars.get(index)?))
}
