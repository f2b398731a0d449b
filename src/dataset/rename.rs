use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::Dataset;

/// Errors in a rename table definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameTableError {
    /// A legacy or canonical label is empty
    #[error("rename table contains an empty label")]
    EmptyLabel,

    /// A canonical label is itself a legacy key, so a second pass would rename again
    #[error("rename target '{target}' of '{source_label}' is also a rename key")]
    Chained {
        /// Legacy label being renamed
        source_label: String,
        /// Canonical label that also appears as a key
        target: String,
    },
}

/// Mapping from legacy or inconsistent column labels to canonical labels.
///
/// Matching is exact string equality. Labels that are not keys are left
/// untouched, and a key that is absent from a dataset is simply skipped.
///
/// ```
/// use logview::dataset::RenameTable;
///
/// let table = RenameTable::default();
/// assert_eq!(table.get("Beam Voltage [V]"), Some("Beam Voltage (V)"));
/// assert_eq!(table.get("Beam Voltage (V)"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameTable {
    entries: BTreeMap<String, String>,
}

impl Default for RenameTable {
    /// Label variants emitted by older test-stand firmware revisions
    fn default() -> Self {
        Self::from_pairs([
            ("Beam Voltage(V)", "Beam Voltage (V)"),
            ("Beam Voltage [V]", "Beam Voltage (V)"),
            ("Beam Voltage (v)", "Beam Voltage (V)"),
            ("Extractor Current(mA)", "Extractor Current (mA)"),
            ("Extractor Current [mA]", "Extractor Current (mA)"),
            ("Extractor Current (ma)", "Extractor Current (mA)"),
            ("Source Pressure(mBar)", "Source Pressure (mBar)"),
            ("Source Pressure (mbar)", "Source Pressure (mBar)"),
            ("Source Pressure [mBar]", "Source Pressure (mBar)"),
        ])
    }
}

impl RenameTable {
    /// Create an empty table
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a table from `(legacy, canonical)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add or replace a single mapping
    pub fn insert(&mut self, legacy: impl Into<String>, canonical: impl Into<String>) {
        self.entries.insert(legacy.into(), canonical.into());
    }

    /// Canonical label for a legacy label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no mappings
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(legacy, canonical)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check that the table is well formed.
    ///
    /// Rejects empty labels and chains (`a -> b`, `b -> c`), which would make
    /// renaming depend on how many times it is applied.
    pub fn validate(&self) -> Result<(), RenameTableError> {
        for (legacy, canonical) in &self.entries {
            if legacy.is_empty() || canonical.is_empty() {
                return Err(RenameTableError::EmptyLabel);
            }
            if self.entries.contains_key(canonical) {
                return Err(RenameTableError::Chained {
                    source_label: legacy.clone(),
                    target: canonical.clone(),
                });
            }
        }
        Ok(())
    }

    /// Apply the table to a header sequence.
    ///
    /// Only keys present in both the table and the headers are renamed. A
    /// rename whose canonical label is already taken is skipped so the result
    /// never holds duplicate labels.
    pub fn apply(&self, headers: &[String]) -> Vec<String> {
        let mut taken: HashSet<String> = headers.iter().cloned().collect();
        let mut renamed = Vec::with_capacity(headers.len());

        for header in headers {
            match self.get(header) {
                Some(canonical) if taken.contains(canonical) => {
                    warn!(
                        "Not renaming column '{}': '{}' already exists",
                        header, canonical
                    );
                    renamed.push(header.clone());
                }
                Some(canonical) => {
                    debug!("Renaming column '{}' -> '{}'", header, canonical);
                    taken.remove(header);
                    taken.insert(canonical.to_string());
                    renamed.push(canonical.to_string());
                }
                None => renamed.push(header.clone()),
            }
        }

        renamed
    }
}

/// Rename known legacy column labels of a dataset to their canonical labels.
///
/// Never fails: unmatched labels are kept verbatim and table keys missing from
/// the dataset are ignored.
pub fn normalize_columns(mut dataset: Dataset, table: &RenameTable) -> Dataset {
    let renamed = table.apply(&dataset.headers());
    for (column, name) in dataset.columns_mut().iter_mut().zip(renamed) {
        column.name = name;
    }
    dataset
}
