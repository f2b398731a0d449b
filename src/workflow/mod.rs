//! # Load / Plot / Export Workflow
//!
//! [`Session`] is the calling workflow between the ingestion layer and the
//! chart builder. It owns the one current [`Dataset`] explicitly and hands a
//! shared, read-only reference to each plot or export job.
//!
//! - A load replaces the previous dataset wholesale. A failed load leaves the
//!   session with no dataset at all. Loads run either on the calling thread
//!   ([`Session::load`]) or on the worker ([`Session::spawn_load`] followed by
//!   [`Session::install`]).
//! - Every request is padded with unselected slots up to the style's slot
//!   count, so a figure always has the same traces and axes.
//! - A plot or export request is checked before the chart builder runs:
//!   no dataset yields [`WorkflowError::NoDataset`], and a request whose trace
//!   slots are all unselected yields [`WorkflowError::NoSelection`].
//!
//! ```rust,no_run
//! use logview::chart::PlotlyScript;
//! use logview::config::Config;
//! use logview::worker::Dispatcher;
//! use logview::workflow::{PlotRequest, Session};
//!
//! let mut config = Config::default();
//! config.chart.plotly = PlotlyScript::Embed {
//!     path: Some("/opt/logview/plotly.min.js".into()),
//! };
//! let mut session = Session::new(config)?;
//! let dispatcher = Dispatcher::new();
//!
//! let loaded = session.spawn_load(&dispatcher, &["stand_a.csv", "stand_b.csv"])?.wait()?;
//! let summary = session.install(loaded);
//! println!("{} rows from {} files", summary.rows, summary.files);
//!
//! let request = PlotRequest::new("SN-0042").with_traces(["Beam Voltage (V)", "None"]);
//! let job = session.spawn_export(&dispatcher, request, "sn-0042.html".into())?;
//! println!("Wrote {}", job.wait()?.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

use crate::chart::{build_figure, html, ChartError, ChartStyle, Figure, TraceSelection};
use crate::config::{Config, ConfigError};
use crate::dataset::{normalize_columns, Dataset, RenameTable, TIME_COLUMN};
use crate::ingest::{load_and_merge, total_size_mb, LoadError};
use crate::worker::{Dispatcher, JobHandle};


/// Errors surfaced to the operator by the workflow
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Plot or export requested before any successful load
    #[error("No data loaded; select CSV files first")]
    NoDataset,

    /// Plot or export requested with every trace slot unselected
    #[error("No columns selected")]
    NoSelection,

    /// Loading the selected files failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Building or exporting the chart failed
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// A plot or export is already running
    #[error("A plot or export is already in progress")]
    Busy,

    /// The worker thread could not be started
    #[error("Failed to start worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The worker thread panicked before delivering a result
    #[error("Background worker panicked")]
    WorkerPanicked,
}

/// A "plot" or "save" action: title, x-axis column, and trace slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRequest {
    /// Figure title (the unit serial number on the test stand)
    pub title: String,
    /// X-axis column, `Time` unless overridden
    pub x_axis: String,
    /// Trace slots in order
    pub traces: Vec<TraceSelection>,
}

impl PlotRequest {
    /// Request with the given title, a `Time` x-axis, and no traces
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_axis: TIME_COLUMN.to_string(),
            traces: Vec::new(),
        }
    }

    /// Use a different x-axis column
    pub fn with_x_axis(mut self, column: impl Into<String>) -> Self {
        self.x_axis = column.into();
        self
    }

    /// Set the trace slots from user choices (sentinel labels become unselected slots)
    pub fn with_traces<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.traces = choices
            .into_iter()
            .map(|c| TraceSelection::parse(c.as_ref()))
            .collect();
        self
    }

    /// Whether at least one slot holds a column
    pub fn has_selection(&self) -> bool {
        self.traces.iter().any(TraceSelection::is_selected)
    }

    /// Trace slots padded with unselected slots up to `count`.
    ///
    /// Longer requests are returned as-is so the chart builder can reject them.
    pub fn slots(&self, count: usize) -> Vec<TraceSelection> {
        let mut slots = self.traces.clone();
        if slots.len() < count {
            slots.resize(count, TraceSelection::Unselected);
        }
        slots
    }
}

/// Outcome of a successful load, for display
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    /// Number of merged files
    pub files: usize,
    /// Merged row count
    pub rows: usize,
    /// Column count
    pub columns: usize,
    /// Combined on-disk size in MB
    pub size_mb: f64,
}

/// A merged and normalized selection, not yet installed in a [`Session`]
#[derive(Debug)]
pub struct LoadedSelection {
    files: Vec<PathBuf>,
    dataset: Dataset,
    summary: LoadSummary,
}

impl LoadedSelection {
    /// What was loaded
    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }
}

fn read_selection(files: Vec<PathBuf>, rename: &RenameTable) -> Result<LoadedSelection, WorkflowError> {
    let dataset = load_and_merge(&files)?;
    let dataset = normalize_columns(dataset, rename);

    let size_mb = total_size_mb(&files).unwrap_or_else(|e| {
        warn!("Could not determine selection size: {}", e);
        0.0
    });

    let summary = LoadSummary {
        files: files.len(),
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        size_mb,
    };
    info!(
        "Loaded {} file(s), {:.2} MB, {} rows",
        summary.files, summary.size_mb, summary.rows
    );

    Ok(LoadedSelection {
        files,
        dataset,
        summary,
    })
}

/// Owns the current dataset and runs plot/export requests against it
#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    files: Vec<PathBuf>,
    dataset: Option<Arc<Dataset>>,
}

impl Session {
    /// Create a session with no dataset.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of [`Config::validate`]; a chained rename
    /// table or an unusable chart style is refused here rather than at plot time.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            files: Vec::new(),
            dataset: None,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Chart style in use
    pub fn style(&self) -> &ChartStyle {
        &self.config.chart
    }

    /// Files behind the current dataset
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Current dataset, if a load succeeded
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    fn clear(&mut self) {
        self.dataset = None;
        self.files.clear();
    }

    /// Load and merge a file selection, replacing any previous dataset.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<LoadSummary, WorkflowError> {
        self.clear();
        let files = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let loaded = read_selection(files, &self.config.ingest.rename)?;
        Ok(self.install(loaded))
    }

    /// Load and merge a file selection on the worker thread.
    ///
    /// The previous dataset is dropped once the job has started; hand the
    /// job's result to [`Session::install`] to make it current.
    pub fn spawn_load<P: AsRef<Path>>(
        &mut self,
        dispatcher: &Dispatcher,
        paths: &[P],
    ) -> Result<JobHandle<LoadedSelection>, WorkflowError> {
        let files: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let rename = self.config.ingest.rename.clone();
        let handle = dispatcher.submit(move || read_selection(files, &rename))?;
        self.clear();
        Ok(handle)
    }

    /// Make a loaded selection the current dataset.
    pub fn install(&mut self, loaded: LoadedSelection) -> LoadSummary {
        self.files = loaded.files;
        self.dataset = Some(Arc::new(loaded.dataset));
        loaded.summary
    }

    /// Choices offered for each trace slot: the sentinel followed by every
    /// column except `Time`.
    pub fn trace_options(&self) -> Result<Vec<String>, WorkflowError> {
        let dataset = self.dataset.as_ref().ok_or(WorkflowError::NoDataset)?;
        let mut options = vec![TraceSelection::SENTINEL.to_string()];
        options.extend(
            dataset
                .column_names()
                .filter(|name| *name != TIME_COLUMN)
                .map(str::to_string),
        );
        Ok(options)
    }

    /// Run the request guards and return the dataset and padded slots to plot.
    fn prepare(
        &self,
        request: &PlotRequest,
    ) -> Result<(Arc<Dataset>, Vec<TraceSelection>), WorkflowError> {
        let dataset = self.dataset.clone().ok_or(WorkflowError::NoDataset)?;
        if !request.has_selection() {
            return Err(WorkflowError::NoSelection);
        }
        Ok((dataset, request.slots(self.style().max_traces())))
    }

    /// Build a figure on the calling thread.
    pub fn figure(&self, request: &PlotRequest) -> Result<Figure, WorkflowError> {
        let (dataset, slots) = self.prepare(request)?;
        Ok(build_figure(
            &request.title,
            &request.x_axis,
            &slots,
            &dataset,
            self.style(),
        )?)
    }

    /// Build a figure on the worker thread.
    pub fn spawn_plot(
        &self,
        dispatcher: &Dispatcher,
        request: PlotRequest,
    ) -> Result<JobHandle<Figure>, WorkflowError> {
        let (dataset, slots) = self.prepare(&request)?;
        let style = self.style().clone();

        dispatcher.submit(move || {
            Ok(build_figure(
                &request.title,
                &request.x_axis,
                &slots,
                &dataset,
                &style,
            )?)
        })
    }

    /// Build a figure and write it as HTML on the worker thread.
    ///
    /// The job's result is the path written, with `.html` appended when the
    /// requested path lacks it.
    pub fn spawn_export(
        &self,
        dispatcher: &Dispatcher,
        request: PlotRequest,
        path: PathBuf,
    ) -> Result<JobHandle<PathBuf>, WorkflowError> {
        let (dataset, slots) = self.prepare(&request)?;
        let style = self.style().clone();

        dispatcher.submit(move || {
            let figure = build_figure(
                &request.title,
                &request.x_axis,
                &slots,
                &dataset,
                &style,
            )?;
            Ok(html::write_html(&figure, &path, &style)?)
        })
    }
}
