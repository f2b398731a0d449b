//! # logview
//!
//! Command-line front-end for merging test-stand CSV logs and charting them.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a selection
//! logview check run_a.csv run_b.csv
//!
//! # Summarize the merged dataset
//! logview inspect run_a.csv run_b.csv
//!
//! # Plot two traces into a temporary HTML file
//! logview plot run_a.csv run_b.csv -t SN-0042 \
//!     --trace "Beam Voltage (V)" --trace "Source Pressure (mBar)"
//!
//! # Save the chart next to the logs
//! logview export run_a.csv -t SN-0042 --trace "Extractor Current (mA)" -o sn-0042
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
