use anyhow::{Context, Result};
use std::path::PathBuf;

use logview::workflow::Session;

/// Load a selection and print what was merged
pub fn run(files: Vec<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = super::config::load(config.as_deref())?;
    let mut session = Session::new(config).context("Invalid configuration")?;

    let summary = session.load(&files).context("Failed to load CSV files")?;
    let dataset = session
        .dataset()
        .context("Dataset missing after a successful load")?;

    println!("logview Dataset Information");
    println!("===========================");
    println!();

    println!("Files:");
    for segment in dataset.segments() {
        println!(
            "  {} (rows {}..{}, {} rows)",
            segment.path.display(),
            segment.rows.start,
            segment.rows.end,
            segment.row_count()
        );
    }
    println!();

    println!("Statistics:");
    println!("  Total size: {:.2} MB", summary.size_mb);
    println!("  Total rows: {}", summary.rows);
    println!("  Columns: {}", summary.columns);
    println!();

    println!("Columns:");
    for (i, column) in dataset.columns().iter().enumerate() {
        println!("  {:3}. {} ({})", i + 1, column.name(), column.kind());
    }

    Ok(())
}
