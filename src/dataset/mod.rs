//! # Tabular Dataset
//!
//! The in-memory result of merging one or more instrument CSV logs: an ordered
//! collection of named, equal-length columns.
//!
//! ```text
//! Dataset
//! ├── columns   [Time, Beam Voltage (V), Extractor Current (mA), ...]
//! ├── row_count sum of data rows across every merged file
//! └── segments  file_a.csv -> rows 0..120, file_b.csv -> rows 120..300
//! ```
//!
//! Rows are numbered sequentially across files in selection order, so there
//! are no index collisions between merged files. A dataset is only ever
//! produced whole by [`crate::ingest::load_and_merge`]; there is no
//! incremental append.
//!
//! Column types are inferred once, after all files are merged: a column is
//! numeric when every non-empty cell parses as a number, otherwise it keeps the
//! raw text (the `Time` column of a test-stand log is always text).

use std::ops::Range;
use std::path::{Path, PathBuf};

mod column;
mod rename;

#[cfg(test)]
mod tests;

pub use column::{Column, ColumnData, ColumnKind};
pub use rename::{normalize_columns, RenameTable, RenameTableError};

/// Header label of the column every log must carry
pub const TIME_COLUMN: &str = "Time";

/// Rows contributed by one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSegment {
    /// Path of the CSV file the rows came from
    pub path: PathBuf,
    /// Row range inside the merged dataset
    pub rows: Range<usize>,
}

impl SourceSegment {
    /// Number of rows contributed by this file
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Merged tabular dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
    segments: Vec<SourceSegment>,
}

impl Dataset {
    /// All columns in header order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by exact header label
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a column with this exact label exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Header labels in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Header labels in order, owned
    pub fn headers(&self) -> Vec<String> {
        self.column_names().map(str::to_string).collect()
    }

    /// Number of merged rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Per-file row ranges, in merge order
    pub fn segments(&self) -> &[SourceSegment] {
        &self.segments
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }
}

/// Accumulates raw rows from successive files, then infers column types.
///
/// Used by the ingestion layer; nothing is exposed until [`finish`](Self::finish)
/// so a failed merge never yields a partial dataset.
#[derive(Debug)]
pub(crate) struct DatasetBuilder {
    headers: Vec<String>,
    cells: Vec<Vec<String>>,
    row_count: usize,
    segments: Vec<SourceSegment>,
    segment_start: Option<(PathBuf, usize)>,
}

impl DatasetBuilder {
    pub(crate) fn new(headers: Vec<String>) -> Self {
        let cells = vec![Vec::new(); headers.len()];
        Self {
            headers,
            cells,
            row_count: 0,
            segments: Vec::new(),
            segment_start: None,
        }
    }

    pub(crate) fn begin_file(&mut self, path: &Path) {
        self.end_file();
        self.segment_start = Some((path.to_path_buf(), self.row_count));
    }

    pub(crate) fn end_file(&mut self) {
        if let Some((path, start)) = self.segment_start.take() {
            self.segments.push(SourceSegment {
                path,
                rows: start..self.row_count,
            });
        }
    }

    /// Append one data row. The caller guarantees the row width matches the headers.
    pub(crate) fn push_row<'a, I>(&mut self, row: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for (column, value) in self.cells.iter_mut().zip(row) {
            column.push(value.to_string());
        }
        self.row_count += 1;
    }

    pub(crate) fn finish(mut self) -> Dataset {
        self.end_file();
        let columns = self
            .headers
            .into_iter()
            .zip(self.cells)
            .map(|(name, cells)| Column::new(name, ColumnData::infer(cells)))
            .collect();

        Dataset {
            columns,
            row_count: self.row_count,
            segments: self.segments,
        }
    }
}
