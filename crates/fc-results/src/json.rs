//! JSON export.

use std::fs;
use std::path::Path;

use crate::ResultsResult;
use crate::types::TimeSeries;

/// Render the time series as a pretty-printed JSON object, series in order.
pub fn to_json_string(ts: &TimeSeries) -> ResultsResult<String> {
    Ok(serde_json::to_string_pretty(ts)?)
}

pub fn save_json(ts: &TimeSeries, path: &Path) -> ResultsResult<()> {
    fs::write(path, to_json_string(ts)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_order_is_preserved() {
        let mut ts = TimeSeries::new();
        ts.add_series("time", vec![0.0, 0.5]).unwrap();
        ts.add_series("density", vec![1.0, 1.25]).unwrap();
        ts.add_series("alpha", vec![2.0, 3.0]).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(
            json,
            r#"{"time":[0.0,0.5],"density":[1.0,1.25],"alpha":[2.0,3.0]}"#
        );
        let pretty = to_json_string(&ts).unwrap();
        assert!(pretty.find("time").unwrap() < pretty.find("alpha").unwrap());
    }
}
