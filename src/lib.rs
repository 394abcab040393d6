//! # Candlebot - morning/evening star paper trader
//!
//! Samples one instrument's latest intraday bar, detects the morning star and
//! evening star reversal patterns, and drives a single-unit long/short position
//! with 10% profit-taking exits.
//!
//! ## Quick Start
//!
//! ```rust
//! use candlebot::prelude::*;
//!
//! let mut session = Session::new(PositionEngine::default(), MemoryLedger::default());
//!
//! for bar in [
//!     Bar::new(10.0, 7.5),
//!     Bar::new(7.6, 8.0),
//!     Bar::new(8.1, 10.5),
//! ] {
//!     session.on_bar(bar);
//! }
//!
//! assert_eq!(session.engine().state().long_units, 1);
//! assert_eq!(session.ledger().records().len(), 1);
//! ```

pub mod config;
pub mod detectors;
pub mod engine;
pub mod extract;
pub mod feed;
pub mod ledger;
pub mod poller;
pub mod replay;
pub mod schedule;
pub mod session;

pub mod prelude {
    pub use crate::{
        // Settings
        config::{read_api_key, Settings},
        // Detectors
        detectors::*,
        // Engine
        engine::{
            transition, Notice, PositionEngine, PositionState, Rules, Step, TradeAction,
            TradeRecord, Trigger,
        },
        // Extraction
        extract::{extract_bar, BarExtractor, StampedBar},
        // Collaborators
        feed::{AlphaVantageFeed, MarketData},
        ledger::{FileLedger, MemoryLedger, TradeLedger},
        poller::{CycleOutcome, Poller},
        replay::{read_bars, replay},
        schedule::{CancelToken, FixedInterval, Limited, Ticker, Ticks},
        session::{BarReport, Session},
        // Types
        Bar,
        Candle,
        CandleExt,
        // Errors
        ConfigError,
        Error,
        ExtractError,
        FetchError,
        LedgerError,
        Result,
    };
}

use std::path::PathBuf;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to locate or parse the latest bar in a provider payload.
///
/// Each variant names the scan step that failed, so callers can narrate
/// exactly where a malformed payload broke down.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("no time series object in payload")]
    NoTimeSeries,

    #[error("no timestamp key after time series marker")]
    NoTimestamp,

    #[error("no field block after latest timestamp")]
    NoBlock,

    #[error("malformed open field: {reason}")]
    BadOpenFormat { reason: &'static str },

    #[error("invalid open value '{text}'")]
    BadOpenValue { text: String },

    #[error("malformed close field: {reason}")]
    BadCloseFormat { reason: &'static str },

    #[error("invalid close value '{text}'")]
    BadCloseValue { text: String },
}

/// Startup configuration failures. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no API key in {path}")]
    EmptyKey { path: PathBuf },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Trade ledger failures. Opening is fatal, a failed write is not.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("cannot open ledger {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Network failures while polling the provider. Recoverable.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(u16),
}

/// Umbrella error for the crate's fallible entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("cannot read recorded bars: {0}")]
    Recorded(#[from] csv::Error),
}

// ============================================================
// BAR
// ============================================================

/// One sampled open/close price pair. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    pub open: f64,
    pub close: f64,
}

impl Bar {
    #[inline]
    pub const fn new(open: f64, close: f64) -> Self {
        Self { open, close }
    }

    /// True for the all-zero read some providers return instead of an error.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.open == 0.0 && self.close == 0.0
    }
}

// ============================================================
// CANDLE TRAITS
// ============================================================

/// Core open/close data trait
pub trait Candle {
    fn open(&self) -> f64;
    fn close(&self) -> f64;
}

impl Candle for Bar {
    #[inline]
    fn open(&self) -> f64 {
        self.open
    }

    #[inline]
    fn close(&self) -> f64 {
        self.close
    }
}

impl<T: Candle + ?Sized> Candle for &T {
    #[inline]
    fn open(&self) -> f64 {
        (**self).open()
    }

    #[inline]
    fn close(&self) -> f64 {
        (**self).close()
    }
}

/// Extension trait with computed properties for candle data
pub trait CandleExt: Candle {
    /// Absolute size of the real body
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    /// Signed upward move, negative for bearish candles
    #[inline]
    fn rise(&self) -> f64 {
        self.close() - self.open()
    }

    /// Signed downward move, negative for bullish candles
    #[inline]
    fn fall(&self) -> f64 {
        self.open() - self.close()
    }

    /// Midpoint of the real body
    #[inline]
    fn midpoint(&self) -> f64 {
        self.open() + self.rise() / 2.0
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }
}

impl<T: Candle + ?Sized> CandleExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_and_midpoint() {
        let bearish = Bar::new(10.0, 7.5);
        assert_eq!(bearish.body(), 2.5);
        assert_eq!(bearish.fall(), 2.5);
        assert_eq!(bearish.midpoint(), 8.75);
        assert!(bearish.is_bearish());

        let bullish = Bar::new(7.5, 10.0);
        assert_eq!(bullish.rise(), 2.5);
        assert_eq!(bullish.midpoint(), 8.75);
        assert!(bullish.is_bullish());
    }

    #[test]
    fn test_zero_bar() {
        assert!(Bar::new(0.0, 0.0).is_zero());
        assert!(!Bar::new(0.0, 1.0).is_zero());
    }

    #[test]
    fn test_candle_through_reference() {
        let bar = Bar::new(1.0, 2.0);
        let r = &bar;
        assert_eq!(Candle::close(&r), 2.0);
        assert!(r.is_bullish());
    }
}
