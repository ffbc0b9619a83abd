//! Result data types.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{ResultsError, ResultsResult};

/// Ordered mapping from series name to samples.
///
/// Series keep the order in which they were declared. Rows appended through
/// [`TimeSeries::push_row`] keep every series the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty series with the given names, in order.
    pub fn with_series<S: AsRef<str>>(names: &[S]) -> ResultsResult<Self> {
        let mut ts = Self::new();
        for name in names {
            ts.add_series(name.as_ref(), Vec::new())?;
        }
        Ok(ts)
    }

    /// Append a whole series.
    pub fn add_series(&mut self, name: &str, values: Vec<f64>) -> ResultsResult<()> {
        if self.names.iter().any(|n| n == name) {
            return Err(ResultsError::DuplicateSeries {
                name: name.to_string(),
            });
        }
        self.names.push(name.to_string());
        self.columns.push(values);
        Ok(())
    }

    /// Append one sample to every series, in declaration order.
    pub fn push_row(&mut self, row: &[f64]) -> ResultsResult<()> {
        if row.len() != self.columns.len() {
            return Err(ResultsError::RowLength {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(*value);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(n, c)| (n.as_str(), c.as_slice()))
    }

    /// Number of series.
    pub fn series_count(&self) -> usize {
        self.names.len()
    }

    /// Length of the longest series.
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when all series have the same length.
    pub fn is_rectangular(&self) -> bool {
        let len = self.len();
        self.columns.iter().all(|c| c.len() == len)
    }
}

impl Serialize for TimeSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (name, values) in self.iter() {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}
