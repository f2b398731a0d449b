/// Errors that can occur while building or exporting a chart
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A requested x-axis or trace column is not in the dataset
    #[error("Column not found in dataset: {0}")]
    UnknownColumn(String),

    /// More trace slots were requested than the style table defines
    #[error("Too many traces: {requested} requested, at most {max} supported")]
    TooManyTraces {
        /// Number of slots requested
        requested: usize,
        /// Number of slots in the style table
        max: usize,
    },

    /// A `Time` cell did not match the configured timestamp format
    #[error("Row {row}: cannot parse time '{value}' with format '{format}'")]
    TimeParse {
        /// Zero-based dataset row
        row: usize,
        /// Offending cell
        value: String,
        /// Expected chrono format
        format: String,
    },

    /// Export needs plotly.js but no local copy is configured
    #[error("plotly.js is not configured: set [chart.plotly] path (or --plotly-js), or opt into source = \"cdn\"")]
    PlotlyNotConfigured,

    /// The configured plotly.js file could not be read
    #[error("Failed to read plotly.js from {}: {source}", path.display())]
    PlotlyRead {
        /// Configured file
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The chart style table is inconsistent
    #[error("Invalid chart style: {0}")]
    InvalidStyle(String),

    /// Figure could not be serialized
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error while writing an exported document
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
