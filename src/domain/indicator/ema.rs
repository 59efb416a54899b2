//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = X[i]*k + EMA[i-1]*(1-k).
//! No warmup: every row is valid from index 0.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceRow;

pub fn calculate_ema(rows: &[PriceRow], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
    let values = rows
        .iter()
        .zip(ema_values(&closes, period))
        .map(|(row, ema)| IndicatorPoint {
            date: row.date,
            valid: true,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// Recursive EMA over arbitrary values, seeded with `values[0]`.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &x in values {
        let ema = match prev {
            None => x,
            Some(p) => x * k + p * (1.0 - k),
        };
        out.push(ema);
        prev = Some(ema);
    }

    out
}
