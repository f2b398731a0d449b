use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use super::{read_headers, require_time_column};

/// How one file's header compares with the selection's reference header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderStatus {
    /// First readable file; every other header must equal this one
    Reference,
    /// Same labels, same order, same count as the reference
    Matches,
    /// Header differs; the text names the first difference
    Differs(String),
    /// The header row could not be read
    Unreadable(String),
}

/// Header check of one selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    /// Selected file
    pub path: PathBuf,
    /// Number of header labels (0 when unreadable)
    pub columns: usize,
    /// Comparison with the reference header
    pub header: HeaderStatus,
    /// Labels that occur more than once in this header
    pub duplicate_labels: Vec<String>,
}

impl FileCheck {
    /// Whether this file alone would make the selection fail to load
    pub fn is_rejected(&self) -> bool {
        matches!(
            self.header,
            HeaderStatus::Differs(_) | HeaderStatus::Unreadable(_)
        )
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Outcome of checking a whole selection without loading it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionReport {
    /// One entry per selected file, in selection order
    pub files: Vec<FileCheck>,
    /// Whether the reference header has `Time`; `None` when no header was readable
    pub time_column: Option<bool>,
}

#[derive(Clone, Copy)]
enum Tone {
    Good,
    Warn,
    Bad,
}

impl SelectionReport {
    /// Why [`super::load_and_merge`] would refuse this selection; empty when it would load
    pub fn rejection_reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.files.is_empty() {
            reasons.push("no files selected".to_string());
        }
        let rejected = self.files.iter().filter(|f| f.is_rejected()).count();
        if rejected > 0 {
            reasons.push(format!(
                "{} file(s) unreadable or with a different header",
                rejected
            ));
        }
        if self.time_column == Some(false) {
            reasons.push("no \"Time\" column".to_string());
        }
        reasons
    }

    /// Whether the selection would fail to load
    pub fn is_rejected(&self) -> bool {
        !self.rejection_reasons().is_empty()
    }

    /// Whether any file carries duplicated labels
    pub fn has_warnings(&self) -> bool {
        self.files.iter().any(|f| !f.duplicate_labels.is_empty())
    }

    /// Render with terminal colors (plain text without the `colorized_output` feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::style;

            self.render(|tone, text| match tone {
                Tone::Good => style(text).green().to_string(),
                Tone::Warn => style(text).yellow().to_string(),
                Tone::Bad => style(text).red().bold().to_string(),
            })
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }

    fn render(&self, paint: impl Fn(Tone, &str) -> String) -> String {
        let mut out = String::new();
        if self.files.is_empty() {
            out.push_str("Selection: no files\n");
        } else {
            out.push_str(&format!("Selection: {} file(s)\n", self.files.len()));
        }

        let width = self
            .files
            .iter()
            .map(|f| f.file_name().chars().count())
            .max()
            .unwrap_or(0);

        for file in &self.files {
            let (tone, status) = match &file.header {
                HeaderStatus::Reference => (Tone::Good, format!("reference, {} columns", file.columns)),
                HeaderStatus::Matches => (Tone::Good, "header matches".to_string()),
                HeaderStatus::Differs(difference) => {
                    (Tone::Bad, format!("header differs: {}", difference))
                }
                HeaderStatus::Unreadable(error) => (Tone::Bad, format!("unreadable: {}", error)),
            };
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                file.file_name(),
                paint(tone, &status),
                width = width
            ));

            if !file.duplicate_labels.is_empty() {
                let warning = format!("duplicated: {}", file.duplicate_labels.join(", "));
                out.push_str(&format!(
                    "  {:<width$}  {}\n",
                    "",
                    paint(Tone::Warn, &warning),
                    width = width
                ));
            }
        }

        let time = match self.time_column {
            Some(true) => paint(Tone::Good, "present"),
            Some(false) => paint(Tone::Bad, "missing"),
            None => paint(Tone::Warn, "unknown"),
        };
        out.push_str(&format!("\"Time\" column: {}\n\n", time));

        let reasons = self.rejection_reasons();
        if reasons.is_empty() {
            out.push_str(&paint(Tone::Good, "ACCEPTED"));
        } else {
            out.push_str(&paint(Tone::Bad, &format!("REJECTED: {}", reasons.join("; "))));
        }
        out.push('\n');
        out
    }
}

impl fmt::Display for SelectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_, text| text.to_string()))
    }
}

/// Describe the first position where two header sequences differ
fn describe_difference(reference: &[String], other: &[String]) -> String {
    if reference.len() != other.len() {
        return format!(
            "expected {} columns, found {}",
            reference.len(),
            other.len()
        );
    }
    reference
        .iter()
        .zip(other)
        .enumerate()
        .find(|(_, (a, b))| a != b)
        .map(|(i, (a, b))| format!("column {} is '{}', expected '{}'", i + 1, b, a))
        .unwrap_or_default()
}

fn duplicate_labels(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for header in headers {
        if !seen.insert(header.as_str()) && !duplicates.contains(header) {
            duplicates.push(header.clone());
        }
    }
    duplicates
}

/// Check every file of a selection without reading any data rows.
///
/// Unlike [`super::load_and_merge`], this does not stop at the first problem;
/// each file gets its own entry so an operator can see which log is off.
pub fn check_files<P: AsRef<Path>>(paths: &[P]) -> SelectionReport {
    let mut report = SelectionReport::default();
    let mut reference: Option<Vec<String>> = None;

    for path in paths {
        let path = path.as_ref();
        let check = match read_headers(path) {
            Ok(headers) => {
                let header = match &reference {
                    None => HeaderStatus::Reference,
                    Some(expected) if *expected == headers => HeaderStatus::Matches,
                    Some(expected) => HeaderStatus::Differs(describe_difference(expected, &headers)),
                };
                let check = FileCheck {
                    path: path.to_path_buf(),
                    columns: headers.len(),
                    header,
                    duplicate_labels: duplicate_labels(&headers),
                };
                if reference.is_none() {
                    reference = Some(headers);
                }
                check
            }
            Err(e) => FileCheck {
                path: path.to_path_buf(),
                columns: 0,
                header: HeaderStatus::Unreadable(e.to_string()),
                duplicate_labels: Vec::new(),
            },
        };
        report.files.push(check);
    }

    report.time_column = reference.as_deref().map(require_time_column);
    report
}
