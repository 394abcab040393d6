//! Tick sources for the poll loop.
//!
//! The loop asks its [`Ticker`] to wait after every cycle; a `false` answer
//! ends the loop. Tests drive the loop with [`Ticks`] and never sleep.

use std::{
    sync::{Arc, Condvar, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Pause between cycles.
pub trait Ticker {
    /// Block until the next cycle is due. Returns `false` to stop the loop.
    fn wait(&mut self) -> bool;
}

/// Shared cancellation flag that wakes sleeping tickers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `period` or until cancelled. Returns `true` if cancelled.
    ///
    /// A period too long to represent as a deadline sleeps until cancelled.
    pub fn sleep(&self, period: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now().checked_add(period);
        let mut cancelled = lock.lock().unwrap_or_else(PoisonError::into_inner);

        while !*cancelled {
            cancelled = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    cvar.wait_timeout(cancelled, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => cvar.wait(cancelled).unwrap_or_else(PoisonError::into_inner),
            };
        }
        *cancelled
    }
}

/// Fixed pause measured from the end of one cycle to the start of the next.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    period: Duration,
    token: CancelToken,
}

impl FixedInterval {
    pub fn new(period: Duration, token: CancelToken) -> Self {
        Self { period, token }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Ticker for FixedInterval {
    fn wait(&mut self) -> bool {
        !self.token.sleep(self.period)
    }
}

/// Allows a fixed number of further cycles without sleeping.
#[derive(Debug, Clone, Copy)]
pub struct Ticks(pub usize);

impl Ticker for Ticks {
    fn wait(&mut self) -> bool {
        match self.0.checked_sub(1) {
            Some(left) => {
                self.0 = left;
                true
            }
            None => false,
        }
    }
}

/// Caps another ticker at a number of further cycles.
#[derive(Debug, Clone)]
pub struct Limited<T> {
    inner: T,
    remaining: usize,
}

impl<T: Ticker> Limited<T> {
    pub fn new(inner: T, remaining: usize) -> Self {
        Self { inner, remaining }
    }
}

impl<T: Ticker> Ticker for Limited<T> {
    fn wait(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.inner.wait()
    }
}
