//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: the SMA(n) series, passed in so it is computed once
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation over the trailing n closes
//! (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) rows are invalid, matching the middle band.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceRow;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    rows: &[PriceRow],
    middle: &IndicatorSeries,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let period = match middle.indicator_type {
        IndicatorType::Sma(p) => p,
        _ => 0,
    };
    let mult = stddev_mult_x100 as f64 / 100.0;
    let mut values = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let bands = match middle.simple_at(i) {
            Some(mid) if period >= 2 => {
                let window = &rows[i + 1 - period..=i];
                let stddev = sample_stddev(window.iter().map(|r| r.close), mid, period);
                Some((mid + mult * stddev, mid, mid - mult * stddev))
            }
            _ => None,
        };

        let (upper, mid, lower) = bands.unwrap_or((0.0, 0.0, 0.0));
        values.push(IndicatorPoint {
            date: row.date,
            valid: bands.is_some(),
            value: IndicatorValue::Bollinger {
                upper,
                middle: mid,
                lower,
            },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

fn sample_stddev(window: impl Iterator<Item = f64>, mean: f64, n: usize) -> f64 {
    let sum_sq: f64 = window
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum();
    (sum_sq / (n - 1) as f64).sqrt()
}
