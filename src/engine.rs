//! Position/cash state machine driven by star signals and price moves.
//!
//! One call to [`transition`] per processed bar, in a fixed order:
//!
//! 1. long profit-exit
//! 2. short profit-exit
//! 3. signal dispatch (morning star first, evening star only when it is not)
//!
//! Exits and dispatch are independent, so a single bar can close a position
//! on its profit target and then open a new one on a signal.

use std::fmt;

use crate::detectors::Signals;

pub const DEFAULT_STARTING_CASH: f64 = 1000.0;
pub const DEFAULT_PROFIT_TARGET: f64 = 0.10;
pub const DEFAULT_SYMBOL: &str = "SPY";

/// Every trade moves exactly one unit.
pub const UNIT: u32 = 1;

/// Relative slack on profit-target comparisons, in units of entry price.
const TARGET_EPSILON: f64 = 1e-9;

// ============================================================
// STATE
// ============================================================

/// Cash and unit-sized positions.
///
/// An entry price is only meaningful while its side holds units; it is reset
/// to 0 when the side goes flat. Cash may go negative: opening a short adds
/// the notional to cash and covering removes it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionState {
    pub cash: f64,
    pub long_units: u32,
    pub short_units: u32,
    pub long_entry_price: f64,
    pub short_entry_price: f64,
}

impl PositionState {
    pub fn with_cash(cash: f64) -> Self {
        Self {
            cash,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_long(&self) -> bool {
        self.long_units > 0
    }

    #[inline]
    pub fn is_short(&self) -> bool {
        self.short_units > 0
    }
}

/// Fixed trading rules
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub symbol: String,
    /// Favourable move, as a fraction of entry price, that closes a position
    pub profit_target: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            profit_target: DEFAULT_PROFIT_TARGET,
        }
    }
}

impl Rules {
    /// Long side reached its target. A move that lands on the target to the
    /// cent counts as reached despite f64 rounding.
    #[inline]
    pub fn long_target_hit(&self, entry: f64, price: f64) -> bool {
        price - entry >= self.target_gain(entry)
    }

    #[inline]
    pub fn short_target_hit(&self, entry: f64, price: f64) -> bool {
        entry - price >= self.target_gain(entry)
    }

    #[inline]
    fn target_gain(&self, entry: f64) -> f64 {
        entry * self.profit_target - entry.abs() * TARGET_EPSILON
    }
}

// ============================================================
// TRADE RECORDS
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeAction {
    Buy,
    Sell,
    Short,
    Cover,
}

/// What caused a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    ProfitTarget,
    MorningStar,
    EveningStar,
}

/// One executed action. Displays as the trade ledger line.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub action: TradeAction,
    pub trigger: Trigger,
    pub symbol: String,
    pub quantity: u32,
    pub price: f64,
    /// Entry price of the position being closed (exits only)
    pub entry_price: Option<f64>,
    /// Realized profit per unit (exits only)
    pub profit: Option<f64>,
}

impl TradeRecord {
    fn open(action: TradeAction, trigger: Trigger, rules: &Rules, price: f64) -> Self {
        Self {
            action,
            trigger,
            symbol: rules.symbol.clone(),
            quantity: UNIT,
            price,
            entry_price: None,
            profit: None,
        }
    }

    fn exit(
        action: TradeAction,
        trigger: Trigger,
        rules: &Rules,
        price: f64,
        entry: f64,
        profit: f64,
    ) -> Self {
        Self {
            entry_price: Some(entry),
            profit: Some(profit),
            ..Self::open(action, trigger, rules, price)
        }
    }

    /// Profit as a percentage of the entry price
    pub fn profit_pct(&self) -> Option<f64> {
        match (self.profit, self.entry_price) {
            (Some(profit), Some(entry)) => Some(profit / entry * 100.0),
            _ => None,
        }
    }

    #[inline]
    pub fn is_exit(&self) -> bool {
        self.entry_price.is_some()
    }
}

/// Ledger number: six significant digits, trailing zeros dropped.
struct Sig6(f64);

impl fmt::Display for Sig6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.0;
        if !x.is_finite() {
            return write!(f, "{x}");
        }
        if x.abs() < 1e-9 {
            return f.write_str("0");
        }

        let magnitude = x.abs().log10().floor() as i32;
        let decimals = (5 - magnitude).max(0) as usize;
        let text = format!("{x:.decimals$}");
        let text = if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.')
        } else {
            text.as_str()
        };
        f.write_str(text)
    }
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { quantity: qty, symbol, .. } = self;
        let price = Sig6(self.price);
        match self.action {
            TradeAction::Buy => write!(f, "Bought {qty} {symbol} at ${price}")?,
            TradeAction::Short => write!(f, "Shorted {qty} {symbol} at ${price}")?,
            TradeAction::Sell => write!(f, "Sold {qty} {symbol} at ${price}")?,
            TradeAction::Cover => write!(f, "Covered {qty} {symbol} short at ${price}")?,
        }

        if let (Some(entry), Some(profit), Some(pct)) =
            (self.entry_price, self.profit, self.profit_pct())
        {
            let opened = match self.action {
                TradeAction::Cover => "Shorted",
                _ => "Bought",
            };
            let (entry, profit, pct) = (Sig6(entry), Sig6(profit), Sig6(pct));
            write!(f, " ({opened} ${entry}, Profit: ${profit}, {pct}%)")?;
        }
        Ok(())
    }
}

// ============================================================
// TRANSITION
// ============================================================

/// Non-trade outcomes of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notice {
    /// Morning star fired but cash could not cover one unit
    InsufficientFunds { cash: f64, price: f64 },
    /// Morning star fired while a long unit was already open
    AlreadyLong,
    /// Evening star fired while a short unit was already open
    AlreadyShort,
    /// Neither signal fired
    NoPattern,
}

/// Everything one transition did, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub trades: Vec<TradeRecord>,
    pub notices: Vec<Notice>,
}

/// Advance `state` by one bar closing at `price`.
pub fn transition(state: &mut PositionState, price: f64, signals: Signals, rules: &Rules) -> Step {
    let mut step = Step::default();

    if state.is_long() && rules.long_target_hit(state.long_entry_price, price) {
        step.trades.push(close_long(state, price, Trigger::ProfitTarget, rules));
    }
    if state.is_short() && rules.short_target_hit(state.short_entry_price, price) {
        step.trades.push(cover_short(state, price, Trigger::ProfitTarget, rules));
    }

    if signals.morning_star {
        if state.is_long() {
            step.notices.push(Notice::AlreadyLong);
        } else if state.cash >= price {
            state.cash -= price;
            state.long_units += UNIT;
            state.long_entry_price = price;
            let buy = TradeRecord::open(TradeAction::Buy, Trigger::MorningStar, rules, price);
            step.trades.push(buy);
        } else {
            step.notices.push(Notice::InsufficientFunds { cash: state.cash, price });
        }
        if state.is_short() {
            step.trades.push(cover_short(state, price, Trigger::MorningStar, rules));
        }
    } else if signals.evening_star {
        if state.is_long() {
            step.trades.push(close_long(state, price, Trigger::EveningStar, rules));
        }
        if state.is_short() {
            step.notices.push(Notice::AlreadyShort);
        } else {
            state.cash += price;
            state.short_units += UNIT;
            state.short_entry_price = price;
            let short = TradeRecord::open(TradeAction::Short, Trigger::EveningStar, rules, price);
            step.trades.push(short);
        }
    } else {
        step.notices.push(Notice::NoPattern);
    }

    step
}

fn close_long(
    state: &mut PositionState,
    price: f64,
    trigger: Trigger,
    rules: &Rules,
) -> TradeRecord {
    let entry = state.long_entry_price;
    state.cash += price;
    state.long_units -= UNIT;
    if state.long_units == 0 {
        state.long_entry_price = 0.0;
    }
    TradeRecord::exit(TradeAction::Sell, trigger, rules, price, entry, price - entry)
}

fn cover_short(
    state: &mut PositionState,
    price: f64,
    trigger: Trigger,
    rules: &Rules,
) -> TradeRecord {
    let entry = state.short_entry_price;
    state.cash -= price;
    state.short_units -= UNIT;
    if state.short_units == 0 {
        state.short_entry_price = 0.0;
    }
    TradeRecord::exit(TradeAction::Cover, trigger, rules, price, entry, entry - price)
}

// ============================================================
// ENGINE
// ============================================================

/// Owner of the single mutable [`PositionState`].
#[derive(Debug, Clone)]
pub struct PositionEngine {
    state: PositionState,
    rules: Rules,
}

impl Default for PositionEngine {
    fn default() -> Self {
        Self::new(PositionState::with_cash(DEFAULT_STARTING_CASH), Rules::default())
    }
}

impl PositionEngine {
    pub fn new(state: PositionState, rules: Rules) -> Self {
        Self { state, rules }
    }

    pub fn on_bar(&mut self, price: f64, signals: Signals) -> Step {
        transition(&mut self.state, price, signals, &self.rules)
    }

    pub fn state(&self) -> &PositionState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}
