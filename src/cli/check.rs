use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Validate a file selection and print the per-file report
pub fn run(files: Vec<PathBuf>) -> Result<()> {
    use logview::ingest::check_files;

    info!("logview Selection Check");
    info!("=======================");
    for file in &files {
        info!("File: {}", file.display());
    }
    info!("");

    let report = check_files(&files);

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    // Exit with error code if the selection would be rejected
    if report.is_rejected() {
        std::process::exit(1);
    }

    Ok(())
}
