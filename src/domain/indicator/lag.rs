//! Lagged close: LAG(k)[i] = C[i-k]. First k rows are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceRow;

pub fn calculate_lag(rows: &[PriceRow], periods: usize) -> IndicatorSeries {
    let values = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let lagged = i.checked_sub(periods).map(|j| rows[j].close);
            IndicatorPoint {
                date: row.date,
                valid: lagged.is_some(),
                value: IndicatorValue::Simple(lagged.unwrap_or(0.0)),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Lag(periods),
        values,
    }
}
