//! RSI (Relative Strength Index).
//!
//! delta[i] = C[i] - C[i-1]; gains and losses are the positive and negative
//! parts of delta. Average gain/loss are simple means over the trailing n
//! deltas (not Wilder smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100 (rs is infinite)
//! If both are 0: RSI = 50
//!
//! Warmup: first n rows are invalid (row 0 has no delta).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceRow;

/// RSI reported when the window holds neither gains nor losses.
pub const FLAT_WINDOW_RSI: f64 = 50.0;

pub fn calculate_rsi(rows: &[PriceRow], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(rows.len());

    let deltas: Vec<f64> = rows.windows(2).map(|w| w[1].close - w[0].close).collect();

    for (i, row) in rows.iter().enumerate() {
        let valid = period > 0 && i >= period;
        let rsi = if valid {
            // deltas[j] belongs to row j + 1
            let window = &deltas[i - period..i];
            let avg_gain = window.iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
            let avg_loss = window.iter().map(|d| (-d).max(0.0)).sum::<f64>() / period as f64;
            rsi_from_averages(avg_gain, avg_loss)
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            date: row.date,
            valid,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return FLAT_WINDOW_RSI;
        }
        return 100.0;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
