//! Indicator engine: enriches a [`Series`] with the fixed indicator set and
//! trims rows that lack the history for any of them.

use crate::domain::error::PricelensError;
use crate::domain::indicator::{
    IndicatorSeries, IndicatorValue, bollinger, calculate_bollinger, calculate_ema, calculate_lag,
    calculate_macd, calculate_rsi, calculate_sma, macd,
};
use crate::domain::ohlcv::{PriceRow, Series};
use chrono::NaiveDate;
use tracing::{debug, warn};

pub const SMA_PERIOD: usize = 20;
pub const EMA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const MAX_LAG: usize = 2;

/// A price row with every indicator attached. `None` marks a value that does
/// not yet have enough history; rows returned by [`compute_indicators`] have
/// no `None` fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub row: PriceRow,
    pub sma20: Option<f64>,
    pub ema20: Option<f64>,
    pub rsi14: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub lagged_close1: Option<f64>,
    pub lagged_close2: Option<f64>,
}

impl IndicatorRow {
    pub fn indicator_fields(&self) -> [Option<f64>; 10] {
        [
            self.sma20,
            self.ema20,
            self.rsi14,
            self.bb_middle,
            self.bb_upper,
            self.bb_lower,
            self.macd,
            self.signal_line,
            self.lagged_close1,
            self.lagged_close2,
        ]
    }

    /// True when every indicator is defined and finite.
    pub fn is_complete(&self) -> bool {
        self.indicator_fields()
            .iter()
            .all(|v| v.is_some_and(f64::is_finite))
    }
}

/// Number of leading rows the fixed windows leave undefined.
pub fn warmup_rows() -> usize {
    [SMA_PERIOD - 1, bollinger::DEFAULT_PERIOD - 1, RSI_PERIOD, MAX_LAG]
        .into_iter()
        .max()
        .unwrap_or(0)
}

/// Computes every indicator over `series` and drops each row where any
/// indicator is undefined.
///
/// Fails with `InsufficientHistory` rather than returning an empty table.
pub fn compute_indicators(series: &Series) -> Result<Vec<IndicatorRow>, PricelensError> {
    if series.is_empty() {
        return Err(PricelensError::EmptyInput);
    }

    let mut rows = enrich(series.rows());
    let computed = rows.len();

    let gaps = interior_gaps(&rows);
    if let (Some(first), Some(last)) = (gaps.first(), gaps.last()) {
        warn!(
            count = gaps.len(),
            first = %first,
            last = %last,
            "dropping rows after warm-up with undefined indicators"
        );
    }
    rows.retain(IndicatorRow::is_complete);

    debug!(
        computed,
        retained = rows.len(),
        trimmed = computed - rows.len(),
        "indicator rows trimmed"
    );

    if rows.is_empty() {
        return Err(PricelensError::InsufficientHistory {
            rows: computed,
            warmup: warmup_rows(),
        });
    }
    Ok(rows)
}

/// Dates of incomplete rows that follow the first complete one. Empty for
/// finite input, where only the warm-up is incomplete.
fn interior_gaps(rows: &[IndicatorRow]) -> Vec<NaiveDate> {
    let Some(start) = rows.iter().position(IndicatorRow::is_complete) else {
        return Vec::new();
    };
    rows[start..]
        .iter()
        .filter(|r| !r.is_complete())
        .map(|r| r.row.date)
        .collect()
}

/// Attaches all indicators to each row without trimming.
pub fn enrich(rows: &[PriceRow]) -> Vec<IndicatorRow> {
    let sma = calculate_sma(rows, SMA_PERIOD);
    let ema = calculate_ema(rows, EMA_PERIOD);
    let rsi = calculate_rsi(rows, RSI_PERIOD);
    let bands = calculate_bollinger(rows, &sma, bollinger::DEFAULT_STDDEV_MULT_X100);
    let macd_series = calculate_macd(
        rows,
        macd::DEFAULT_FAST,
        macd::DEFAULT_SLOW,
        macd::DEFAULT_SIGNAL,
    );
    let lag1 = calculate_lag(rows, 1);
    let lag2 = calculate_lag(rows, MAX_LAG);

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let (bb_upper, bb_middle, bb_lower) = bollinger_at(&bands, i);
            let (macd_line, signal_line) = macd_at(&macd_series, i);
            IndicatorRow {
                row: row.clone(),
                sma20: sma.simple_at(i),
                ema20: ema.simple_at(i),
                rsi14: rsi.simple_at(i),
                bb_middle,
                bb_upper,
                bb_lower,
                macd: macd_line,
                signal_line,
                lagged_close1: lag1.simple_at(i),
                lagged_close2: lag2.simple_at(i),
            }
        })
        .collect()
}

fn bollinger_at(series: &IndicatorSeries, i: usize) -> (Option<f64>, Option<f64>, Option<f64>) {
    match series.values.get(i) {
        Some(p) if p.valid => match p.value {
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => (Some(upper), Some(middle), Some(lower)),
            _ => (None, None, None),
        },
        _ => (None, None, None),
    }
}

fn macd_at(series: &IndicatorSeries, i: usize) -> (Option<f64>, Option<f64>) {
    match series.values.get(i) {
        Some(p) if p.valid => match p.value {
            IndicatorValue::Macd { line, signal } => (Some(line), Some(signal)),
            _ => (None, None),
        },
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_rows;
    use approx::assert_relative_eq;

    fn series_of(prices: &[f64]) -> Series {
        Series::from_sorted(make_rows(prices))
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 50.0 + i as f64).collect()
    }

    #[test]
    fn warmup_is_longest_window() {
        assert_eq!(warmup_rows(), 19);
    }

    #[test]
    fn enrich_keeps_every_row() {
        let rows = make_rows(&rising(25));
        let enriched = enrich(&rows);

        assert_eq!(enriched.len(), 25);
        assert!(enriched[0].sma20.is_none());
        assert!(enriched[0].ema20.is_some());
        assert!(enriched[0].macd.is_some());
        assert!(enriched[13].rsi14.is_none());
        assert!(enriched[14].rsi14.is_some());
        assert!(enriched[18].bb_upper.is_none());
        assert!(enriched[19].bb_upper.is_some());
        assert!(enriched[1].lagged_close2.is_none());
        assert!(enriched[2].lagged_close2.is_some());
    }

    #[test]
    fn trims_leading_warmup() {
        let series = series_of(&rising(30));
        let out = compute_indicators(&series).unwrap();

        assert_eq!(out.len(), 30 - warmup_rows());
        assert_eq!(out[0].row.date, series.rows()[19].date);
        assert!(out.iter().all(IndicatorRow::is_complete));
    }

    #[test]
    fn constant_series() {
        let series = series_of(&[10.0; 25]);
        let out = compute_indicators(&series).unwrap();

        assert_eq!(out.len(), 6);
        for r in &out {
            assert_eq!(r.sma20, Some(10.0));
            assert_relative_eq!(r.ema20.unwrap(), 10.0, epsilon = 1e-12);
            assert_eq!(r.bb_middle, Some(10.0));
            assert_eq!(r.bb_upper, Some(10.0));
            assert_eq!(r.bb_lower, Some(10.0));
            assert_relative_eq!(r.macd.unwrap(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(r.signal_line.unwrap(), 0.0, epsilon = 1e-12);
            // no gains and no losses: neutral
            assert_eq!(r.rsi14, Some(50.0));
        }
    }

    #[test]
    fn rising_series_rsi_is_100() {
        let series = series_of(&rising(40));
        let out = compute_indicators(&series).unwrap();
        assert!(out.iter().all(|r| r.rsi14 == Some(100.0)));
    }

    #[test]
    fn lagged_closes_are_exact() {
        let prices: Vec<f64> = (0..35).map(|i| 20.0 + (i as f64 * 0.37).sin()).collect();
        let series = series_of(&prices);
        let out = compute_indicators(&series).unwrap();

        let offset = series.len() - out.len();
        for (j, r) in out.iter().enumerate() {
            let i = j + offset;
            assert_eq!(r.lagged_close1, Some(prices[i - 1]));
            assert_eq!(r.lagged_close2, Some(prices[i - 2]));
            assert_eq!(r.row.close, prices[i]);
        }
    }

    #[test]
    fn finite_input_has_no_interior_gaps() {
        let rows = enrich(&make_rows(&rising(40)));
        assert!(interior_gaps(&rows).is_empty());
    }

    #[test]
    fn overflowing_band_leaves_interior_gap() {
        let mut prices = rising(30);
        prices[25] = 1e160;
        let rows = enrich(&make_rows(&prices));

        let gaps = interior_gaps(&rows);
        assert!(!gaps.is_empty());
        assert_eq!(gaps[0], rows[25].row.date);

        let out = compute_indicators(&series_of(&prices)).unwrap();
        assert_eq!(out.len(), 30 - warmup_rows() - gaps.len());
        assert!(out.iter().all(IndicatorRow::is_complete));
    }

    #[test]
    fn fifteen_rows_is_insufficient() {
        let series = series_of(&rising(15));
        let err = compute_indicators(&series).unwrap_err();
        assert!(matches!(
            err,
            PricelensError::InsufficientHistory {
                rows: 15,
                warmup: 19
            }
        ));
    }

    #[test]
    fn exactly_warmup_rows_is_insufficient() {
        let series = series_of(&rising(19));
        assert!(compute_indicators(&series).is_err());

        let series = series_of(&rising(20));
        assert_eq!(compute_indicators(&series).unwrap().len(), 1);
    }

    #[test]
    fn incomplete_row_detection() {
        let rows = make_rows(&rising(3));
        let enriched = enrich(&rows);
        assert!(!enriched[2].is_complete());

        let mut row = enriched[2].clone();
        row.sma20 = Some(1.0);
        row.rsi14 = Some(f64::NAN);
        row.bb_middle = Some(1.0);
        row.bb_upper = Some(1.0);
        row.bb_lower = Some(1.0);
        assert!(!row.is_complete());
        row.rsi14 = Some(50.0);
        assert!(row.is_complete());
    }
}
