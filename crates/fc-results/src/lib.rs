//! fc-results: time series storage, export and plotting.

pub mod csv;
pub mod json;
pub mod plot;
pub mod summary;
pub mod types;

pub use csv::{save_csv, to_csv_string, write_csv};
pub use json::{save_json, to_json_string};
pub use plot::{PlotConfig, TIME_KEYS, default_plot_path, plot_series, time_key};
pub use summary::{SeriesSummary, summarize};
pub use types::TimeSeries;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Series already exists: {name}")]
    DuplicateSeries { name: String },

    #[error("Row has {actual} values but the series has {expected} columns")]
    RowLength { expected: usize, actual: usize },

    #[error("Plot error: {0}")]
    Plot(String),
}
