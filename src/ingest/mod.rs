//! # CSV Ingestion & Validation
//!
//! Reads the CSV logs an operator selected, checks that they share one schema,
//! and merges them into a single [`Dataset`].
//!
//! ## Merge Pipeline
//!
//! 1. **Header check**: only the header row of each file is read and compared
//!    (order-sensitive, exact match) against the first file's header.
//! 2. **Time column check**: the shared header must contain `Time`.
//! 3. **Concatenation**: rows are appended in selection order, file by file.
//!
//! Steps 1 and 2 run before any data row is read so a bad selection fails
//! fast. Any read error during step 3 aborts the whole merge; a partially
//! merged dataset is never returned.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logview::ingest::{load_and_merge, total_size_mb};
//! use logview::dataset::{normalize_columns, RenameTable};
//!
//! let files = ["stand_a.csv", "stand_b.csv"];
//! println!("Selected {:.2} MB", total_size_mb(&files)?);
//!
//! let dataset = load_and_merge(&files)?;
//! let dataset = normalize_columns(dataset, &RenameTable::default());
//! println!("{} rows", dataset.row_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use log::{debug, info};

use crate::dataset::{Dataset, DatasetBuilder, TIME_COLUMN};

mod error;
mod report;


pub use error::LoadError;
pub use report::{check_files, FileCheck, HeaderStatus, SelectionReport};

/// Outcome of [`validate_headers`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCheck {
    /// Whether every file was readable and shared the same header
    pub ok: bool,
    /// The shared header sequence when `ok` is true
    pub headers: Option<Vec<String>>,
}

/// Read the header row of a single CSV file.
pub fn read_headers(path: &Path) -> Result<Vec<String>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| LoadError::read_failure(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| LoadError::read_failure(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    Ok(headers)
}

/// Compare the header rows of all files against the first file.
///
/// Returns the shared header, or the first error encountered in selection order.
pub fn shared_headers<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>, LoadError> {
    let (first, rest) = paths.split_first().ok_or(LoadError::NoFiles)?;
    let reference = first.as_ref();
    let headers = read_headers(reference)?;
    debug!("{}: {} columns", reference.display(), headers.len());

    for path in rest {
        let path = path.as_ref();
        let other = read_headers(path)?;
        if other != headers {
            debug!(
                "{}: header {:?} differs from reference {:?}",
                path.display(),
                other,
                headers
            );
            return Err(LoadError::SchemaMismatch {
                path: path.to_path_buf(),
                reference: reference.to_path_buf(),
            });
        }
    }

    Ok(headers)
}

/// Check that every selected file is readable and shares one header sequence.
///
/// An empty selection is reported as not ok.
pub fn validate_headers<P: AsRef<Path>>(paths: &[P]) -> HeaderCheck {
    match shared_headers(paths) {
        Ok(headers) => HeaderCheck {
            ok: true,
            headers: Some(headers),
        },
        Err(e) => {
            debug!("Header validation failed: {}", e);
            HeaderCheck {
                ok: false,
                headers: None,
            }
        }
    }
}

/// Whether the literal `Time` column is present in a header sequence.
pub fn require_time_column(headers: &[String]) -> bool {
    headers.iter().any(|h| h == TIME_COLUMN)
}

/// Validate and concatenate CSV logs into one dataset.
///
/// Rows keep their order within each file and files keep their selection
/// order. Row numbering is sequential across the merged result.
///
/// # Errors
///
/// - [`LoadError::NoFiles`] for an empty selection
/// - [`LoadError::SchemaMismatch`] if any header differs from the first file's
/// - [`LoadError::MissingTimeColumn`] if the shared header lacks `Time`
/// - [`LoadError::ReadFailure`] on any I/O or CSV error; nothing is merged
pub fn load_and_merge<P: AsRef<Path>>(paths: &[P]) -> Result<Dataset, LoadError> {
    let headers = shared_headers(paths)?;
    if !require_time_column(&headers) {
        return Err(LoadError::MissingTimeColumn);
    }

    let mut builder = DatasetBuilder::new(headers);

    for path in paths {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| LoadError::read_failure(path, e))?;

        builder.begin_file(path);
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| LoadError::read_failure(path, e))?;
            builder.push_row(record.iter());
            rows += 1;
        }
        debug!("{}: {} rows", path.display(), rows);
    }

    let dataset = builder.finish();
    info!(
        "Merged {} file(s): {} rows x {} columns",
        paths.len(),
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(dataset)
}

/// Total on-disk size of the selected files in megabytes (bytes / 1024²).
pub fn total_size_mb<P: AsRef<Path>>(paths: &[P]) -> std::io::Result<f64> {
    let mut bytes = 0u64;
    for path in paths {
        bytes += std::fs::metadata(path.as_ref())?.len();
    }
    Ok(bytes as f64 / 1024.0 / 1024.0)
}
