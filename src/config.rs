//! TOML configuration.
//!
//! Every setting has a default that reproduces the stock test-stand layout, so
//! a config file only needs the parts it changes:
//!
//! ```toml
//! # logview.toml
//! [ingest.rename]
//! "Beam Voltage [V]" = "Beam Voltage (V)"
//! "HV Current" = "Extractor Current (mA)"
//!
//! [chart]
//! title_font_size = 28
//!
//! [chart.plotly]
//! source = "embed"
//! path = "/opt/logview/plotly.min.js"
//!
//! [[chart.slot]]
//! color = "red"
//! side = "right"
//! anchor = "x"
//! position = 0.9
//!
//! [[chart.slot]]
//! color = "cyan"
//! side = "left"
//! anchor = "x"
//! position = 0.1
//!
//! [[chart.tick_format]]
//! column = "Source Pressure (mBar)"
//! format = ".2e"
//! ```
//!
//! An `[ingest.rename]` table replaces the built-in rename table entirely, and
//! a `[[chart.slot]]` list replaces the built-in four slots. Exported HTML
//! inlines the plotly.js file named by `[chart.plotly]`; linking a CDN instead
//! needs `source = "cdn"` and a `url`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartError, ChartStyle};
use crate::dataset::{RenameTable, RenameTableError};

/// Errors loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Rename table is inconsistent
    #[error("Invalid rename table: {0}")]
    RenameTable(#[from] RenameTableError),

    /// Chart style is inconsistent
    #[error(transparent)]
    ChartStyle(#[from] ChartError),
}

/// Root configuration structure for logview.toml files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Chart style
    #[serde(default)]
    pub chart: ChartStyle,
}

/// Configuration for CSV ingestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Legacy label -> canonical label
    #[serde(default)]
    pub rename: RenameTable,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the rename table and chart style for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ingest.rename.validate()?;
        self.chart.validate()?;
        Ok(())
    }
}
