//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) rows are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceRow;

pub fn calculate_sma(rows: &[PriceRow], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(rows.len());
    let warmup = period.saturating_sub(1);

    for (i, row) in rows.iter().enumerate() {
        let valid = period > 0 && i >= warmup;
        let value = if valid {
            let window = &rows[i + 1 - period..=i];
            window.iter().map(|r| r.close).sum::<f64>() / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: row.date,
            valid,
            value: IndicatorValue::Simple(value),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_rows;

    #[test]
    fn sma_warmup() {
        let rows = make_rows(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&rows, 3);

        assert_eq!(series.values.len(), 5);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn sma_trailing_mean() {
        let rows = make_rows(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&rows, 3);

        assert_eq!(series.simple_at(2), Some(20.0));
        assert_eq!(series.simple_at(3), Some(30.0));
        assert_eq!(series.simple_at(4), Some(40.0));
    }

    #[test]
    fn sma_constant_prices() {
        let rows = make_rows(&[7.5; 25]);
        let series = calculate_sma(&rows, 20);

        assert_eq!(series.warmup(), 19);
        for i in 19..25 {
            assert_eq!(series.simple_at(i), Some(7.5));
        }
    }

    #[test]
    fn sma_shorter_than_period() {
        let rows = make_rows(&[1.0, 2.0]);
        let series = calculate_sma(&rows, 5);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn sma_period_0() {
        let rows = make_rows(&[1.0, 2.0]);
        let series = calculate_sma(&rows, 0);
        assert!(series.values.iter().all(|p| !p.valid));
        assert_eq!(series.indicator_type, IndicatorType::Sma(0));
    }
}
