//! Daily price rows, raw and normalized.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

/// A field value as delivered by a feed, before interpretation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One row as a feed hands it over: arbitrary order, unvalidated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub open: RawValue,
    pub high: RawValue,
    pub low: RawValue,
    pub close: RawValue,
    pub volume: RawValue,
}

/// One calendar day of validated OHLCV data.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price rows strictly ascending by date with no duplicates.
///
/// Only [`crate::domain::normalize::normalize`] builds a `Series`, so every
/// value of this type satisfies the ordering every indicator relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    rows: Vec<PriceRow>,
}

impl Series {
    pub(crate) fn from_sorted(rows: Vec<PriceRow>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}
