//! Latest-bar extraction from a raw intraday time-series payload.
//!
//! The payload is scanned, not parsed: it is not guaranteed to be well-formed,
//! and correctness relies on the provider emitting the newest timestamp key
//! first. Each step of the scan has its own failure variant.
//!
//! ```rust
//! use candlebot::extract::extract_bar;
//!
//! let raw = r#"{"Time Series (1min)": {
//!     "2024-05-01 15:59:00": {"1. open": "501.20", "4. close": "501.75"}
//! }}"#;
//! let bar = extract_bar(raw).unwrap();
//! assert_eq!((bar.open, bar.close), (501.20, 501.75));
//! ```

use crate::{Bar, ExtractError};

const OPEN_KEY: &str = "\"1. open\":";
const CLOSE_KEY: &str = "\"4. close\":";

/// Latest bar together with the timestamp key it was filed under
#[derive(Debug, Clone, PartialEq)]
pub struct StampedBar {
    pub timestamp: String,
    pub bar: Bar,
}

/// Scanner for one provider interval's time-series payload.
#[derive(Debug, Clone)]
pub struct BarExtractor {
    marker: String,
}

impl Default for BarExtractor {
    fn default() -> Self {
        Self::new("1min")
    }
}

impl BarExtractor {
    /// Extractor for payloads keyed by `"Time Series (<interval>)"`.
    pub fn new(interval: &str) -> Self {
        Self {
            marker: format!("\"Time Series ({interval})\""),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn extract(&self, raw: &str) -> Result<Bar, ExtractError> {
        self.extract_stamped(raw).map(|stamped| stamped.bar)
    }

    pub fn extract_stamped(&self, raw: &str) -> Result<StampedBar, ExtractError> {
        let series = raw
            .find(&self.marker)
            .map(|pos| &raw[pos + self.marker.len()..])
            .ok_or(ExtractError::NoTimeSeries)?;

        // First key after the marker is the newest timestamp
        let (timestamp, rest) = quoted(series).ok_or(ExtractError::NoTimestamp)?;
        let block = block_after(rest).ok_or(ExtractError::NoBlock)?;

        let open = Field::Open.read(block)?;
        let close = Field::Close.read(block)?;

        Ok(StampedBar {
            timestamp: timestamp.to_string(),
            bar: Bar::new(open, close),
        })
    }
}

/// Extract with the default `1min` marker.
pub fn extract_bar(raw: &str) -> Result<Bar, ExtractError> {
    BarExtractor::default().extract(raw)
}

// ============================================================
// SCAN STEPS
// ============================================================

/// First quoted string in `s` and the text following its closing quote.
fn quoted(s: &str) -> Option<(&str, &str)> {
    let start = s.find('"')? + 1;
    let len = s[start..].find('"')?;
    Some((&s[start..start + len], &s[start + len + 1..]))
}

/// Text strictly between the first `{` and the first `}` after it.
fn block_after(s: &str) -> Option<&str> {
    let start = s.find('{')? + 1;
    let len = s[start..].find('}')?;
    Some(&s[start..start + len])
}

#[inline]
fn is_gap(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Open,
    Close,
}

impl Field {
    fn key(self) -> &'static str {
        match self {
            Field::Open => OPEN_KEY,
            Field::Close => CLOSE_KEY,
        }
    }

    fn format_error(self, reason: &'static str) -> ExtractError {
        match self {
            Field::Open => ExtractError::BadOpenFormat { reason },
            Field::Close => ExtractError::BadCloseFormat { reason },
        }
    }

    fn value_error(self, text: &str) -> ExtractError {
        let text = text.to_string();
        match self {
            Field::Open => ExtractError::BadOpenValue { text },
            Field::Close => ExtractError::BadCloseValue { text },
        }
    }

    /// Read this field's price from the block. Every field searches from the
    /// start of the block, so key order does not matter.
    fn read(self, block: &str) -> Result<f64, ExtractError> {
        let key = self.key();
        let pos = block
            .find(key)
            .ok_or_else(|| self.format_error("key not found"))?;

        let value = block[pos + key.len()..].trim_start_matches(is_gap);
        let value = value
            .strip_prefix('"')
            .ok_or_else(|| self.format_error("expected opening quote"))?;

        let end = value
            .find('"')
            .ok_or_else(|| self.format_error("missing closing quote"))?;
        if end == 0 {
            return Err(self.format_error("empty value"));
        }

        let text = &value[..end];
        match text.trim().parse::<f64>() {
            Ok(price) if price.is_finite() => Ok(price),
            _ => Err(self.value_error(text)),
        }
    }
}
