//! Config file resolution for the CLI.
//!
//! `--config FILE` wins; otherwise a `logview.toml` in the working directory
//! is picked up; otherwise the built-in defaults apply.
//!
//! The plotly.js copy inlined into exported HTML comes from `--plotly-js`,
//! then `LOGVIEW_PLOTLY_JS`, then `[chart.plotly] path`.

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use logview::chart::PlotlyScript;
use logview::config::Config;

const DEFAULT_CONFIG_FILE: &str = "logview.toml";
const PLOTLY_ENV: &str = "LOGVIEW_PLOTLY_JS";

/// Load the effective configuration.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
    };

    match path {
        Some(path) => {
            info!("Using config file: {}", path.display());
            Config::from_file(&path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

/// Point the chart at a local plotly.js from the command line or environment.
///
/// A config that opted into `source = "cdn"` keeps its CDN link unless
/// `--plotly-js` is given explicitly.
pub fn with_plotly(mut config: Config, explicit: Option<&Path>) -> Config {
    let chosen = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => match &config.chart.plotly {
            PlotlyScript::Embed { path: None } => std::env::var_os(PLOTLY_ENV).map(PathBuf::from),
            _ => None,
        },
    };

    if let Some(path) = chosen {
        info!("Inlining plotly.js from {}", path.display());
        config.chart.plotly = PlotlyScript::Embed { path: Some(path) };
    }
    config
}
