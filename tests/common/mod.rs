#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use pricelens::domain::error::PricelensError;
use pricelens::domain::fetch_config::FetchConfig;
pub use pricelens::domain::ohlcv::{RawRow, RawValue};
use pricelens::ports::price_feed::PriceFeed;
use std::cell::RefCell;

pub struct MockPriceFeed {
    pub rows: Vec<RawRow>,
    pub error: Option<String>,
    pub requests: RefCell<Vec<FetchConfig>>,
}

impl MockPriceFeed {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            error: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_rows(mut self, rows: Vec<RawRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl PriceFeed for MockPriceFeed {
    fn fetch_rows(&self, fetch: &FetchConfig) -> Result<Vec<RawRow>, PricelensError> {
        self.requests.borrow_mut().push(fetch.clone());
        if let Some(reason) = &self.error {
            return Err(PricelensError::Fetch {
                reason: reason.clone(),
            });
        }
        Ok(self.rows.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn raw_row(date: &str, close: f64) -> RawRow {
    RawRow {
        date: date.to_string(),
        open: RawValue::Number(close),
        high: RawValue::Number(close + 1.0),
        low: RawValue::Number(close - 1.0),
        close: RawValue::Number(close),
        volume: RawValue::Number(1000.0),
    }
}

/// One row per calendar day starting 2024-01-01, newest first as a feed
/// would deliver them.
pub fn generate_raw_rows(closes: &[f64]) -> Vec<RawRow> {
    let start = date(2024, 1, 1);
    let mut rows: Vec<RawRow> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let d = start + Duration::days(i as i64);
            raw_row(&d.format("%Y-%m-%d").to_string(), c)
        })
        .collect();
    rows.reverse();
    rows
}

pub fn rising_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

pub fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.4).sin() * 8.0 + i as f64 * 0.1)
        .collect()
}

pub fn sample_fetch() -> FetchConfig {
    FetchConfig {
        symbol: "AAPL".to_string(),
        api_key: "test-key".to_string(),
        from_date: date(2024, 1, 1),
        to_date: date(2024, 12, 31),
    }
}

pub fn prices_csv(closes: &[f64]) -> String {
    let start = date(2024, 1, 1);
    let mut out = String::from("date,open,high,low,close,volume\n");
    for (i, c) in closes.iter().enumerate() {
        let d = start + Duration::days(i as i64);
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            d.format("%Y-%m-%d"),
            c,
            c + 1.0,
            c - 1.0,
            c,
            1000 + i
        ));
    }
    out
}
