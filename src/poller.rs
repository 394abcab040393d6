//! Poll loop: fetch, extract, hand the bar to the session, wait, repeat.
//!
//! Fetch outcomes are explicit. Network and extraction failures skip the cycle
//! and leave history and position untouched; the next attempt happens after
//! the usual pause.

use tracing::{info, warn};

use crate::{
    extract::BarExtractor,
    feed::MarketData,
    ledger::TradeLedger,
    schedule::Ticker,
    session::{BarReport, Session},
    Bar, ExtractError, FetchError,
};

/// Result of one poll cycle
#[derive(Debug)]
pub enum CycleOutcome {
    FetchFailed(FetchError),
    ExtractFailed(ExtractError),
    /// All-zero bar discarded by policy
    DegenerateBar,
    Processed { timestamp: String, bar: Bar, report: BarReport },
}

impl CycleOutcome {
    #[inline]
    pub fn is_processed(&self) -> bool {
        matches!(self, CycleOutcome::Processed { .. })
    }
}

pub struct Poller<F: MarketData, L: TradeLedger> {
    feed: F,
    extractor: BarExtractor,
    session: Session<L>,
    skip_zero_bars: bool,
}

impl<F: MarketData, L: TradeLedger> Poller<F, L> {
    pub fn new(feed: F, extractor: BarExtractor, session: Session<L>) -> Self {
        Self {
            feed,
            extractor,
            session,
            skip_zero_bars: true,
        }
    }

    /// Whether an all-zero bar is treated as a failed read.
    pub fn skip_zero_bars(mut self, skip: bool) -> Self {
        self.skip_zero_bars = skip;
        self
    }

    /// Run exactly one cycle.
    pub fn poll_once(&mut self) -> CycleOutcome {
        let raw = match self.feed.fetch() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "fetch failed, retrying next cycle");
                return CycleOutcome::FetchFailed(e);
            }
        };

        let stamped = match self.extractor.extract_stamped(&raw) {
            Ok(stamped) => stamped,
            Err(e) => {
                warn!(error = %e, payload = %raw, "unusable payload, retrying next cycle");
                return CycleOutcome::ExtractFailed(e);
            }
        };

        let bar = stamped.bar;
        if self.skip_zero_bars && bar.is_zero() {
            warn!(timestamp = %stamped.timestamp, "all-zero bar discarded");
            return CycleOutcome::DegenerateBar;
        }

        info!(timestamp = %stamped.timestamp, open = bar.open, close = bar.close, "latest bar");
        let report = self.session.on_bar(bar);
        CycleOutcome::Processed {
            timestamp: stamped.timestamp,
            bar,
            report,
        }
    }

    /// Poll until `ticker` says stop. Returns the number of cycles run.
    pub fn run<T: Ticker>(&mut self, ticker: &mut T) -> usize {
        let mut cycles = 0;
        loop {
            self.poll_once();
            cycles += 1;
            if !ticker.wait() {
                break;
            }
        }
        cycles
    }

    pub fn session(&self) -> &Session<L> {
        &self.session
    }

    pub fn into_session(self) -> Session<L> {
        self.session
    }
}
