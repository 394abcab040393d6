//! Integration tests for latest-bar extraction against provider-shaped payloads.

use candlebot::prelude::*;
use proptest::prelude::*;

const INTRADAY: &str = r#"{
    "Meta Data": {
        "1. Information": "Intraday (1min) open, high, low, close prices and volume",
        "2. Symbol": "SPY",
        "3. Last Refreshed": "2024-05-01 19:59:00",
        "4. Interval": "1min",
        "5. Output Size": "Compact",
        "6. Time Zone": "US/Eastern"
    },
    "Time Series (1min)": {
        "2024-05-01 19:59:00": {
            "1. open": "501.2100",
            "2. high": "501.3000",
            "3. low": "501.1500",
            "4. close": "501.2800",
            "5. volume": "5213"
        },
        "2024-05-01 19:58:00": {
            "1. open": "501.0000",
            "2. high": "501.2500",
            "3. low": "500.9900",
            "4. close": "501.2100",
            "5. volume": "1870"
        }
    }
}"#;

#[test]
fn test_provider_payload() {
    let stamped = BarExtractor::default().extract_stamped(INTRADAY).unwrap();
    assert_eq!(stamped.timestamp, "2024-05-01 19:59:00");
    assert_eq!(stamped.bar, Bar::new(501.21, 501.28));
}

#[test]
fn test_compact_payload_without_whitespace() {
    let compact: String = INTRADAY.chars().filter(|c| !c.is_whitespace()).collect();
    // Keys lose their inner spaces too, so only the marker form matters here
    assert_eq!(extract_bar(&compact), Err(ExtractError::NoTimeSeries));

    let minified = r#"{"Time Series (1min)":{"2024-05-01 19:59:00":{"1. open":"1.5","4. close":"2.5"}}}"#;
    assert_eq!(extract_bar(minified), Ok(Bar::new(1.5, 2.5)));
}

#[test]
fn test_rate_limit_note() {
    let raw = r#"{
        "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
    }"#;
    assert_eq!(extract_bar(raw), Err(ExtractError::NoTimeSeries));
}

#[test]
fn test_error_message_payload() {
    let raw = r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#;
    let err = extract_bar(raw).unwrap_err();
    assert_eq!(err.to_string(), "no time series object in payload");
}

#[test]
fn test_truncated_payload() {
    let cut = &INTRADAY[..INTRADAY.find("\"4. close\"").unwrap() + 14];
    assert!(matches!(extract_bar(cut), Err(ExtractError::NoBlock)));
}

#[test]
fn test_missing_close_quote_in_open() {
    let raw = r#""Time Series (1min)": {"2024-05-01 19:59:00": {"1. open": "12.5}"#;
    assert!(matches!(extract_bar(raw), Err(ExtractError::BadOpenFormat { .. })));
}

#[test]
fn test_leading_space_in_open_text() {
    let raw = r#""Time Series (1min)": {"t": {"1. open": " 12.5", "4. close": "12.75"}}"#;
    assert_eq!(extract_bar(raw).unwrap().open, 12.5);
}

proptest! {
    #[test]
    fn prop_prices_survive_extraction(open in 0.01f64..10_000.0, close in 0.01f64..10_000.0) {
        let raw = format!(
            r#"{{"Time Series (1min)": {{"t": {{"1. open": "{open}", "4. close": "{close}"}}}}}}"#
        );
        prop_assert_eq!(extract_bar(&raw), Ok(Bar::new(open, close)));
    }

    #[test]
    fn prop_arbitrary_text_never_panics(raw in ".{0,200}") {
        let _ = extract_bar(&raw);
    }
}
