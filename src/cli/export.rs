use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use logview::worker::Dispatcher;
use logview::workflow::Session;

use super::ChartArgs;

/// Build a chart and save it as HTML on the worker thread
pub fn run(files: Vec<PathBuf>, chart: ChartArgs, output: PathBuf) -> Result<()> {
    let config = chart.load_config()?;
    let mut session = Session::new(config).context("Invalid configuration")?;
    let dispatcher = Dispatcher::new();

    info!("logview Export");
    info!("==============");
    info!("Output: {}", output.display());

    let loaded = session
        .spawn_load(&dispatcher, &files)?
        .wait()
        .context("Failed to load CSV files")?;
    let summary = session.install(loaded);
    info!(
        "Merged {} file(s): {} rows, {} columns",
        summary.files, summary.rows, summary.columns
    );

    let written = session
        .spawn_export(&dispatcher, chart.request(), output)?
        .wait()
        .context("Failed to export chart")?;

    println!("Chart saved to {}", written.display());
    Ok(())
}
