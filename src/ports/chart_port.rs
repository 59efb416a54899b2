//! Chart rendering port trait.

use crate::domain::engine::IndicatorRow;
use crate::domain::error::PricelensError;
use std::path::Path;

pub trait ChartPort {
    fn render(
        &self,
        symbol: &str,
        rows: &[IndicatorRow],
        output_path: &Path,
    ) -> Result<(), PricelensError>;
}
