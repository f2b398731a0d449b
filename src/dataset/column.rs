use serde::Serialize;

/// Storage kind of a column after type inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-empty cell parsed as a floating point number
    Numeric,
    /// At least one cell was not numeric (timestamps, status strings)
    Text,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// Typed cell values of a single column.
///
/// Empty numeric cells are kept as `None` so a plotted trace shows a gap
/// instead of a spurious zero.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric samples
    Numeric(Vec<Option<f64>>),
    /// Raw text cells, verbatim from the file
    Text(Vec<String>),
}

impl ColumnData {
    /// Infer the column type from raw cells.
    ///
    /// A column is numeric when every non-empty cell parses as `f64`.
    pub(crate) fn infer(cells: Vec<String>) -> Self {
        let numeric = cells.iter().all(|cell| {
            let cell = cell.trim();
            cell.is_empty() || cell.parse::<f64>().is_ok()
        });

        if !numeric {
            return ColumnData::Text(cells);
        }

        ColumnData::Numeric(
            cells
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    if cell.is_empty() {
                        None
                    } else {
                        cell.parse::<f64>().ok()
                    }
                })
                .collect(),
        )
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    /// Whether the column holds no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage kind
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    /// Render one cell as text (numeric cells use their shortest `f64` form).
    pub fn cell_text(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Numeric(values) => values
                .get(row)
                .map(|value| value.map(|v| v.to_string()).unwrap_or_default()),
            ColumnData::Text(values) => values.get(row).cloned(),
        }
    }
}

/// A named column of the merged dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) data: ColumnData,
}

impl Column {
    /// Create a column from a name and typed data
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Column header label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed values
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Storage kind
    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column holds no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
