//! Per-series summary statistics.

use serde::Serialize;

use crate::types::TimeSeries;

/// Extremes and final value of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub name: String,
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub last: f64,
    /// Number of NaN or infinite samples.
    pub non_finite: usize,
}

/// Summarize every series, in series order.
///
/// `min`/`max` ignore non-finite samples and are NaN when a series has no
/// finite sample at all.
pub fn summarize(ts: &TimeSeries) -> Vec<SeriesSummary> {
    ts.iter()
        .map(|(name, values)| {
            let finite = values.iter().copied().filter(|v| v.is_finite());
            let (min, max) = finite.fold((f64::NAN, f64::NAN), |(lo, hi), v| {
                (if lo.is_nan() { v } else { lo.min(v) }, if hi.is_nan() { v } else { hi.max(v) })
            });
            SeriesSummary {
                name: name.to_string(),
                samples: values.len(),
                min,
                max,
                last: values.last().copied().unwrap_or(f64::NAN),
                non_finite: values.iter().filter(|v| !v.is_finite()).count(),
            }
        })
        .collect()
}
