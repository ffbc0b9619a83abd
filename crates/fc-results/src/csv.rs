//! CSV export.
//!
//! One header row of series names, then one row per sample index. A series
//! shorter than the longest one renders empty fields for the missing rows.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::ResultsResult;
use crate::types::TimeSeries;

/// Render the time series as CSV text.
pub fn to_csv_string(ts: &TimeSeries) -> String {
    let mut csv = ts.names().collect::<Vec<_>>().join(",");
    csv.push('\n');

    for row in 0..ts.len() {
        let mut first = true;
        for (_, values) in ts.iter() {
            if !first {
                csv.push(',');
            }
            first = false;
            if let Some(v) = values.get(row) {
                let _ = write!(csv, "{v}");
            }
        }
        csv.push('\n');
    }
    csv
}

/// Write the time series as CSV to `writer`.
pub fn write_csv<W: Write>(ts: &TimeSeries, mut writer: W) -> ResultsResult<()> {
    writer.write_all(to_csv_string(ts).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write the time series as CSV to `path`.
pub fn save_csv(ts: &TimeSeries, path: &Path) -> ResultsResult<()> {
    write_csv(ts, BufWriter::new(File::create(path)?))
}
