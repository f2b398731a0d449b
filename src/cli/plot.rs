use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::PathBuf;

use logview::chart::html::render_html;
use logview::worker::Dispatcher;
use logview::workflow::Session;

use super::ChartArgs;

/// Build a chart on the worker thread and hand it to the operator
pub fn run(files: Vec<PathBuf>, chart: ChartArgs, json: bool) -> Result<()> {
    let config = chart.load_config()?;
    let mut session = Session::new(config).context("Invalid configuration")?;
    let dispatcher = Dispatcher::new();

    let loaded = session
        .spawn_load(&dispatcher, &files)?
        .wait()
        .context("Failed to load CSV files")?;
    session.install(loaded);

    let request = chart.request();
    info!("Plotting {} against {}", request.title, request.x_axis);

    let figure = session
        .spawn_plot(&dispatcher, request)?
        .wait()
        .context("Failed to build chart")?;

    if json {
        println!("{}", figure.to_json_pretty()?);
        return Ok(());
    }

    let document = render_html(&figure, session.style())?;
    let mut file = tempfile::Builder::new()
        .prefix("logview-")
        .suffix(".html")
        .tempfile()
        .context("Failed to create temporary HTML file")?;
    file.write_all(document.as_bytes())
        .context("Failed to write temporary HTML file")?;
    let (_, path) = file.keep().context("Failed to keep temporary HTML file")?;

    println!("Chart written to {}", path.display());
    println!("Open it in a browser to view.");

    Ok(())
}
