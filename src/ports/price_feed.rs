//! Price feed port trait.

use crate::domain::error::PricelensError;
use crate::domain::fetch_config::FetchConfig;
use crate::domain::ohlcv::RawRow;

/// Source of raw daily rows for one instrument over the configured window.
///
/// Rows may arrive in any order; interpretation is left to the normalizer.
pub trait PriceFeed {
    fn fetch_rows(&self, fetch: &FetchConfig) -> Result<Vec<RawRow>, PricelensError>;
}
