use std::path::PathBuf;

/// Errors that can occur while validating or merging CSV logs
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file selection was empty (e.g. the picker was cancelled)
    #[error("No CSV files selected")]
    NoFiles,

    /// A file's header row differs from the first file's header row
    #[error("Header of {} does not match header of {}", path.display(), reference.display())]
    SchemaMismatch {
        /// File whose header differs
        path: PathBuf,
        /// First file of the selection, whose header is the reference
        reference: PathBuf,
    },

    /// The shared header has no `Time` column
    #[error("Selected files have no \"Time\" column")]
    MissingTimeColumn,

    /// I/O or CSV parse error on an individual file
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailure {
        /// File that could not be read
        path: PathBuf,
        /// Underlying CSV or I/O error
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub(crate) fn read_failure(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source: source.into(),
        }
    }
}
