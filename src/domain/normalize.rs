//! Series normalizer: raw feed rows into an ordered [`Series`].
//!
//! Dates accept `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339; only the
//! calendar date is kept. Prices must be finite and positive, volume a
//! non-negative integer. Duplicate dates are rejected.

use crate::domain::error::PricelensError;
use crate::domain::ohlcv::{PriceRow, RawRow, RawValue, Series};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub fn normalize(raw: &[RawRow]) -> Result<Series, PricelensError> {
    if raw.is_empty() {
        return Err(PricelensError::EmptyInput);
    }

    let mut indexed: Vec<(usize, PriceRow)> = raw
        .iter()
        .enumerate()
        .map(|(i, r)| parse_row(i, r).map(|row| (i, row)))
        .collect::<Result<_, _>>()?;

    // Stable: equal dates keep input order, so the duplicate report names the
    // later occurrence.
    indexed.sort_by_key(|(_, row)| row.date);

    if let Some(w) = indexed.windows(2).find(|w| w[0].1.date == w[1].1.date) {
        return Err(PricelensError::malformed(
            w[1].0,
            "date",
            format!("duplicate date {}", w[1].1.date),
        ));
    }

    Ok(Series::from_sorted(
        indexed.into_iter().map(|(_, row)| row).collect(),
    ))
}

fn parse_row(index: usize, raw: &RawRow) -> Result<PriceRow, PricelensError> {
    Ok(PriceRow {
        date: parse_date(index, &raw.date)?,
        open: parse_price(index, "open", &raw.open)?,
        high: parse_price(index, "high", &raw.high)?,
        low: parse_price(index, "low", &raw.low)?,
        close: parse_price(index, "close", &raw.close)?,
        volume: parse_volume(index, &raw.volume)?,
    })
}

fn parse_date(index: usize, value: &str) -> Result<NaiveDate, PricelensError> {
    let s = value.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| PricelensError::malformed(index, "date", format!("unparsable date {:?}", s)))
}

fn parse_number(index: usize, field: &str, value: &RawValue) -> Result<f64, PricelensError> {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            PricelensError::malformed(index, field, format!("not a number: {}", value))
        })?,
    };
    if !n.is_finite() {
        return Err(PricelensError::malformed(
            index,
            field,
            format!("not finite: {}", value),
        ));
    }
    Ok(n)
}

fn parse_price(index: usize, field: &str, value: &RawValue) -> Result<f64, PricelensError> {
    let n = parse_number(index, field, value)?;
    if n <= 0.0 {
        return Err(PricelensError::malformed(
            index,
            field,
            format!("price must be positive, got {}", n),
        ));
    }
    Ok(n)
}

fn parse_volume(index: usize, value: &RawValue) -> Result<u64, PricelensError> {
    if let RawValue::Text(s) = value {
        if let Ok(v) = s.trim().parse::<u64>() {
            return Ok(v);
        }
    }
    let n = parse_number(index, "volume", value)?;
    if n < 0.0 || n.fract() != 0.0 || n > u64::MAX as f64 {
        return Err(PricelensError::malformed(
            index,
            "volume",
            format!("volume must be a non-negative integer, got {}", value),
        ));
    }
    Ok(n as u64)
}
