//! Candlestick pattern detectors
//!
//! Three-bar reversal patterns that drive the position engine:
//!
//! - **Morning Star**: long bearish bar, small body, long bullish bar closing
//!   above the first bar's midpoint. Buy signal.
//! - **Evening Star**: the mirror image. Sell/short signal.

pub mod helpers;
pub mod star;

use rayon::prelude::*;

use crate::Candle;

pub use helpers::*;
pub use star::*;

// ============================================================
// PATTERN MATCH
// ============================================================

/// Unique identifier for a pattern type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternId(pub &'static str);

impl PatternId {
  #[inline]
  pub fn as_str(&self) -> &'static str {
    self.0
  }
}

/// Direction/bias of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
  Bullish,
  Bearish,
}

/// Result of pattern detection - Copy, no allocations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch {
  pub pattern_id: PatternId,
  pub direction: Direction,
  pub start_index: usize,
  pub end_index: usize,
}

/// Stateless pattern detector evaluated at a single bar index.
pub trait PatternDetector: Send + Sync {
  fn id(&self) -> PatternId;
  fn min_bars(&self) -> usize;

  /// Detect a pattern ending at `index`. Reads only `bars[index + 1 - min_bars..=index]`.
  fn detect<T: Candle>(&self, bars: &[T], index: usize) -> Option<PatternMatch>;

  /// Detect a pattern ending at the newest bar.
  fn detect_latest<T: Candle>(&self, bars: &[T]) -> Option<PatternMatch> {
    let last = bars.len().checked_sub(1)?;
    self.detect(bars, last)
  }
}

// ============================================================
// SIGNALS
// ============================================================

/// Both pattern verdicts for the newest bar of a history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
  pub morning_star: bool,
  pub evening_star: bool,
}

impl Signals {
  pub fn evaluate<T: Candle>(history: &[T]) -> Self {
    Self {
      morning_star: is_morning_star(history),
      evening_star: is_evening_star(history),
    }
  }

  #[inline]
  pub fn any(&self) -> bool {
    self.morning_star || self.evening_star
  }
}

// ============================================================
// SCANNING
// ============================================================

/// Find every morning and evening star in a history, in bar order.
pub fn scan<T: Candle>(bars: &[T]) -> Vec<PatternMatch> {
  let morning = MorningStarDetector;
  let evening = EveningStarDetector;

  (0..bars.len())
    .flat_map(|i| [morning.detect(bars, i), evening.detect(bars, i)])
    .flatten()
    .collect()
}

/// Scan results for one recorded history
#[derive(Debug, Clone)]
pub struct ScanResult {
  pub name: String,
  pub patterns: Vec<PatternMatch>,
}

impl ScanResult {
  pub fn count(&self, id: PatternId) -> usize {
    self.patterns.iter().filter(|p| p.pattern_id == id).count()
  }
}

/// Scan several named histories in parallel.
pub fn scan_parallel<'a, T, I>(histories: I) -> Vec<ScanResult>
where
  T: Candle + Sync + 'a,
  I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
  histories
    .into_par_iter()
    .map(|(name, bars)| ScanResult { name: name.to_string(), patterns: scan(bars) })
    .collect()
}
