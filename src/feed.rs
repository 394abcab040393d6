//! Market data provider access.

use std::{fmt, time::Duration};

use tracing::debug;

use crate::{config::Settings, FetchError};

/// Source of raw intraday payloads, one per poll.
pub trait MarketData {
    fn fetch(&mut self) -> Result<String, FetchError>;
}

/// Alpha Vantage `TIME_SERIES_INTRADAY` endpoint for one symbol and interval.
pub struct AlphaVantageFeed {
    client: reqwest::blocking::Client,
    endpoint: String,
    symbol: String,
    interval: String,
    api_key: String,
}

impl AlphaVantageFeed {
    pub fn new(
        endpoint: impl Into<String>,
        symbol: impl Into<String>,
        interval: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            symbol: symbol.into(),
            interval: interval.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(
        settings: &Settings,
        api_key: impl Into<String>,
    ) -> Result<Self, FetchError> {
        Self::new(
            settings.endpoint.as_str(),
            settings.symbol.as_str(),
            settings.interval.as_str(),
            api_key,
            settings.request_timeout(),
        )
    }

    fn query(&self) -> [(&'static str, &str); 4] {
        [
            ("function", "TIME_SERIES_INTRADAY"),
            ("symbol", self.symbol.as_str()),
            ("interval", self.interval.as_str()),
            ("apikey", self.api_key.as_str()),
        ]
    }
}

impl fmt::Debug for AlphaVantageFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageFeed")
            .field("endpoint", &self.endpoint)
            .field("symbol", &self.symbol)
            .field("interval", &self.interval)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl MarketData for AlphaVantageFeed {
    fn fetch(&mut self) -> Result<String, FetchError> {
        debug!(
            endpoint = %self.endpoint,
            symbol = %self.symbol,
            interval = %self.interval,
            "fetching"
        );

        let response = self.client.get(&self.endpoint).query(&self.query()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let feed = AlphaVantageFeed::from_settings(&Settings::default(), "SECRET").unwrap();
        let shown = format!("{feed:?}");
        assert!(!shown.contains("SECRET"));
        assert!(shown.contains("SPY"));
    }

    #[test]
    fn test_query_parameters() {
        let feed = AlphaVantageFeed::from_settings(&Settings::default(), "KEY").unwrap();
        let query = feed.query();
        assert_eq!(query[0], ("function", "TIME_SERIES_INTRADAY"));
        assert_eq!(query[2], ("interval", "1min"));
        assert_eq!(query[3], ("apikey", "KEY"));
    }
}
