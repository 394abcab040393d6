//! Bar-by-bar trading session: history, pattern evaluation, state transition
//! and ledger writes, with no clock or network involved.

use tracing::{debug, info, warn};

use crate::{
    detectors::Signals,
    engine::{Notice, PositionEngine, Step},
    ledger::TradeLedger,
    Bar,
};

/// Bars required before patterns are evaluated
pub const MIN_HISTORY: usize = 3;

/// What processing one bar produced
#[derive(Debug, Clone, PartialEq)]
pub enum BarReport {
    /// History is still too short for pattern evaluation
    Warmup { bars: usize },
    Evaluated { signals: Signals, step: Step },
}

impl BarReport {
    pub fn step(&self) -> Option<&Step> {
        match self {
            BarReport::Evaluated { step, .. } => Some(step),
            BarReport::Warmup { .. } => None,
        }
    }
}

/// Owner of the bar history, the position engine and the trade ledger.
#[derive(Debug)]
pub struct Session<L: TradeLedger> {
    history: Vec<Bar>,
    engine: PositionEngine,
    ledger: L,
}

impl<L: TradeLedger> Session<L> {
    pub fn new(engine: PositionEngine, ledger: L) -> Self {
        Self {
            history: Vec::new(),
            engine,
            ledger,
        }
    }

    /// Append `bar` to the history and, once enough bars exist, run one
    /// transition on its close. Ledger write failures are logged, not returned.
    pub fn on_bar(&mut self, bar: Bar) -> BarReport {
        self.history.push(bar);
        if self.history.len() < MIN_HISTORY {
            debug!(bars = self.history.len(), "warming up");
            return BarReport::Warmup { bars: self.history.len() };
        }

        let signals = Signals::evaluate(&self.history);
        if signals.morning_star {
            info!("Morning Star detected");
        } else if signals.evening_star {
            info!("Evening Star detected");
        }

        let step = self.engine.on_bar(bar.close, signals);
        for record in &step.trades {
            info!(
                action = ?record.action,
                trigger = ?record.trigger,
                price = record.price,
                "{record}"
            );
            if let Err(e) = self.ledger.append(record) {
                warn!(error = %e, "trade not recorded");
            }
        }
        for notice in &step.notices {
            match notice {
                Notice::InsufficientFunds { cash, price } => {
                    warn!(cash, price, "not enough cash to buy")
                }
                Notice::AlreadyLong => info!("already long"),
                Notice::AlreadyShort => info!("already short"),
                Notice::NoPattern => debug!("no pattern"),
            }
        }

        let state = self.engine.state();
        info!(
            cash = state.cash,
            long = state.long_units,
            short = state.short_units,
            "position"
        );

        BarReport::Evaluated { signals, step }
    }

    pub fn history(&self) -> &[Bar] {
        &self.history
    }

    pub fn engine(&self) -> &PositionEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }
}
