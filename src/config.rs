//! Runtime settings and the API key source.
//!
//! Settings come from an optional TOML file; every field has a default, so an
//! empty or absent file yields the stock setup (SPY, 1min bars, 13s polls).
//!
//! ```toml
//! api_key_file = "config.txt"
//! ledger_path = "trades.txt"
//! symbol = "SPY"
//! poll_interval_secs = 13
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{
    engine::{Rules, DEFAULT_PROFIT_TARGET, DEFAULT_STARTING_CASH, DEFAULT_SYMBOL},
    ConfigError,
};

pub const DEFAULT_ENDPOINT: &str = "https://www.alphavantage.co/query";

/// Upper bound for `poll_interval_secs` and `request_timeout_secs` (one day)
pub const MAX_INTERVAL_SECS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// File whose first line is the provider API key
    pub api_key_file: PathBuf,
    /// Append-only trade ledger
    pub ledger_path: PathBuf,
    pub symbol: String,
    /// Provider bar interval, e.g. `1min`
    pub interval: String,
    pub endpoint: String,
    /// Pause between the end of one cycle and the start of the next
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub starting_cash: f64,
    pub profit_target: f64,
    /// Discard bars whose open and close are both exactly 0.0
    pub skip_zero_bars: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key_file: PathBuf::from("config.txt"),
            ledger_path: PathBuf::from("trades.txt"),
            symbol: DEFAULT_SYMBOL.to_string(),
            interval: "1min".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval_secs: 13,
            request_timeout_secs: 10,
            starting_cash: DEFAULT_STARTING_CASH,
            profit_target: DEFAULT_PROFIT_TARGET,
            skip_zero_bars: true,
        }
    }
}

impl Settings {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if self.interval.trim().is_empty() {
            return Err(ConfigError::Invalid("interval must not be empty".into()));
        }
        for (name, secs) in [
            ("poll_interval_secs", self.poll_interval_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if !(1..=MAX_INTERVAL_SECS).contains(&secs) {
                return Err(ConfigError::Invalid(format!(
                    "{name} = {secs} must be between 1 and {MAX_INTERVAL_SECS}"
                )));
            }
        }
        if !self.starting_cash.is_finite() {
            return Err(ConfigError::Invalid("starting_cash must be finite".into()));
        }
        if !(self.profit_target.is_finite() && self.profit_target > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "profit_target = {} must be > 0",
                self.profit_target
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn rules(&self) -> Rules {
        Rules {
            symbol: self.symbol.clone(),
            profit_target: self.profit_target,
        }
    }
}

/// Read the API key from the first line of `path`.
pub fn read_api_key(path: &Path) -> Result<String, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let key = text.lines().next().map(str::trim).unwrap_or_default();
    if key.is_empty() {
        return Err(ConfigError::EmptyKey {
            path: path.to_path_buf(),
        });
    }
    Ok(key.to_string())
}
