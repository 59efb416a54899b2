//! CSV price input and CSV indicator table writer.

use crate::domain::engine::IndicatorRow;
use crate::domain::error::PricelensError;
use crate::domain::ohlcv::RawRow;
use crate::ports::table_writer::{COLUMNS, TableWriter};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Reads every row of a `date,open,high,low,close,volume` price CSV without
/// interpreting the values.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, PricelensError> {
    let content = fs::read_to_string(path).map_err(|e| PricelensError::Fetch {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    let rows = parse_rows(&content)?;
    debug!(path = %path.display(), rows = rows.len(), "read csv price rows");
    Ok(rows)
}

pub fn parse_rows(content: &str) -> Result<Vec<RawRow>, PricelensError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> Result<usize, PricelensError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| PricelensError::Fetch {
                reason: format!("missing {} column", name),
            })
    };
    let idx = [
        column("date")?,
        column("open")?,
        column("high")?,
        column("low")?,
        column("close")?,
        column("volume")?,
    ];

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |k: usize| -> Result<String, PricelensError> {
            record
                .get(idx[k])
                .map(str::to_string)
                .ok_or_else(|| PricelensError::malformed(i, COLUMNS[k], "missing value"))
        };

        rows.push(RawRow {
            date: field(0)?,
            open: field(1)?.as_str().into(),
            high: field(2)?.as_str().into(),
            low: field(3)?.as_str().into(),
            close: field(4)?.as_str().into(),
            volume: field(5)?.as_str().into(),
        });
    }

    Ok(rows)
}

/// Writes the indicator table as CSV in [`COLUMNS`] order.
#[derive(Debug, Default)]
pub struct CsvTableWriter;

impl CsvTableWriter {
    pub fn write_to<W: io::Write>(
        &self,
        rows: &[IndicatorRow],
        out: W,
    ) -> Result<(), PricelensError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(COLUMNS)?;

        for r in rows {
            let mut record = vec![
                r.row.date.format("%Y-%m-%d").to_string(),
                r.row.open.to_string(),
                r.row.high.to_string(),
                r.row.low.to_string(),
                r.row.close.to_string(),
                r.row.volume.to_string(),
            ];
            record.extend(r.indicator_fields().iter().map(|v| format_optional(*v)));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl TableWriter for CsvTableWriter {
    fn write(&self, rows: &[IndicatorRow], output_path: &Path) -> Result<(), PricelensError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(output_path)?;
        self.write_to(rows, io::BufWriter::new(file))
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
