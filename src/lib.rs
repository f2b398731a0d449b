//! # logview - Test-Stand Log Viewer
//!
//! `logview` merges the CSV logs written by an instrument test stand into one
//! tabular dataset and renders selected columns as an interactive multi-axis
//! time-series chart, exported as a standalone HTML file.
//!
//! ## Key Features
//!
//! - **All-or-nothing merge**: every file in a selection must carry the exact
//!   same header row (names, order, count) and a `Time` column, or nothing is
//!   loaded.
//!
//! - **Label normalization**: legacy column labels from older firmware are
//!   renamed to their canonical form through a configurable rename table.
//!
//! - **Four-axis charts**: up to four traces share one x-axis, each with its
//!   own colored y-axis placed left or right of the plot area.
//!
//! - **Background jobs**: loading, plotting and export can run on a worker
//!   thread; the interactive thread only submits and collects results.
//!
//! - **Offline documents**: exported HTML inlines plotly.js from a local copy,
//!   so charts open on machines without network access.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logview::prelude::*;
//!
//! let mut session = Session::new(Config::default())?;
//! session.load(&["stand_a.csv", "stand_b.csv"])?;
//!
//! let request = PlotRequest::new("SN-0042")
//!     .with_traces(["Beam Voltage (V)", "Source Pressure (mBar)"]);
//! let figure = session.figure(&request)?;
//! println!("{}", figure.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`dataset`]: in-memory merged table, column kinds, label normalization
//! - [`ingest`]: header validation, CSV merge, selection reports
//! - [`chart`]: figure model, axis layout, HTML export
//! - [`workflow`]: load / plot / export session with request guards
//! - [`worker`]: single-job background dispatcher
//! - [`config`]: TOML configuration

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod chart;
pub mod config;
pub mod dataset;
pub mod ingest;
pub mod worker;
pub mod workflow;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chart::{
        build_figure, html::write_html, ChartError, ChartStyle, Figure, PlotlyScript,
        TraceSelection,
    };
    pub use crate::config::{Config, ConfigError};
    pub use crate::dataset::{normalize_columns, Column, ColumnKind, Dataset, RenameTable};
    pub use crate::ingest::{check_files, load_and_merge, validate_headers, LoadError, SelectionReport};
    pub use crate::worker::{Dispatcher, JobHandle};
    pub use crate::workflow::{LoadSummary, LoadedSelection, PlotRequest, Session, WorkflowError};
}
