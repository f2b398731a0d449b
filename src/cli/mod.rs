use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod config;
mod export;
mod inspect;
mod plot;

/// logview - Test-Stand CSV Log Viewer
#[derive(Parser)]
#[command(name = "logview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a file selection without loading it
    Check {
        /// CSV log files, in merge order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// Load a file selection and summarize the merged dataset
    Inspect {
        /// CSV log files, in merge order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// TOML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Build a chart and write it to a temporary HTML file
    Plot {
        /// CSV log files, in merge order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        chart: ChartArgs,

        /// Print the figure JSON to stdout instead of writing HTML
        #[arg(long)]
        json: bool,
    },

    /// Build a chart and save it as a standalone HTML file
    Export {
        /// CSV log files, in merge order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        chart: ChartArgs,

        /// Output path (".html" is appended when missing)
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,
    },
}

/// Chart options shared by `plot` and `export`
#[derive(clap::Args)]
pub(crate) struct ChartArgs {
    /// Chart title, usually the unit serial number
    #[arg(short, long, default_value = "")]
    title: String,

    /// Column plotted on the x-axis
    #[arg(short = 'x', long, default_value = logview::dataset::TIME_COLUMN)]
    x_axis: String,

    /// Trace column for the next slot ("None" leaves the slot empty); repeat up to four times
    #[arg(long = "trace", value_name = "COLUMN")]
    traces: Vec<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Local plotly.js to inline into the HTML (overrides [chart.plotly] path)
    #[arg(long = "plotly-js", value_name = "FILE")]
    plotly_js: Option<PathBuf>,
}

impl ChartArgs {
    pub(crate) fn load_config(&self) -> Result<logview::config::Config> {
        let config = config::load(self.config.as_deref())?;
        Ok(config::with_plotly(config, self.plotly_js.as_deref()))
    }

    pub(crate) fn request(&self) -> logview::workflow::PlotRequest {
        logview::workflow::PlotRequest::new(self.title.clone())
            .with_x_axis(self.x_axis.clone())
            .with_traces(&self.traces)
    }
}

impl Cli {
    /// Returns the verbosity level from -v flags.
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Initialize logging based on verbosity level.
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Dispatch CLI commands to their handlers.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check { files } => check::run(files),
        Commands::Inspect { files, config } => inspect::run(files, config),
        Commands::Plot { files, chart, json } => plot::run(files, chart, json),
        Commands::Export {
            files,
            chart,
            output,
        } => export::run(files, chart, output),
    }
}
