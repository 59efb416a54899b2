//! Indicator table persistence port trait.

use crate::domain::engine::IndicatorRow;
use crate::domain::error::PricelensError;
use std::path::Path;

/// Column order shared by every table writer.
pub const COLUMNS: [&str; 16] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "sma20",
    "ema20",
    "rsi14",
    "bbMiddle",
    "bbUpper",
    "bbLower",
    "macd",
    "signalLine",
    "laggedClose1",
    "laggedClose2",
];

pub trait TableWriter {
    fn write(&self, rows: &[IndicatorRow], output_path: &Path) -> Result<(), PricelensError>;
}
