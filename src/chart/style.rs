use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ChartError;

/// Plot edge a trace axis is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    /// Left edge of the plot area
    Left,
    /// Right edge of the plot area
    Right,
}

impl AxisSide {
    /// Plotly `side` value
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisSide::Left => "left",
            AxisSide::Right => "right",
        }
    }
}

/// How a trace axis is attached to the x-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisAnchor {
    /// Anchored to the primary x-axis, sharing its tick alignment
    X,
    /// Floating at its own position along the edge
    Free,
}

impl AxisAnchor {
    /// Plotly `anchor` value
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisAnchor::X => "x",
            AxisAnchor::Free => "free",
        }
    }
}

/// Style attributes of one trace slot.
///
/// A slot's style depends only on its index, never on the column placed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStyle {
    /// Line and axis color (any CSS color)
    pub color: String,
    /// Plot edge of the slot's axis
    pub side: AxisSide,
    /// Axis anchoring
    pub anchor: AxisAnchor,
    /// Fractional position of the axis along the horizontal edge (0.0 - 1.0)
    pub position: f64,
}

impl SlotStyle {
    fn new(color: &str, side: AxisSide, anchor: AxisAnchor, position: f64) -> Self {
        Self {
            color: color.to_string(),
            side,
            anchor,
            position,
        }
    }
}

/// Tick label formatting for a specific column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFormatRule {
    /// Exact column label the rule applies to
    pub column: String,
    /// d3-format string passed to the axis `tickformat`
    pub format: String,
}

/// Where an exported document gets plotly.js from.
///
/// ```toml
/// [chart.plotly]
/// source = "embed"
/// path = "/opt/logview/plotly-2.35.2.min.js"
/// ```
///
/// Embedding is the default, so a saved chart opens on a machine without
/// network access. Linking the CDN copy has to be chosen explicitly with
/// `source = "cdn"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum PlotlyScript {
    /// Inline the library from a local copy of `plotly.min.js`
    Embed {
        /// Local file; export fails until one is configured
        #[serde(default)]
        path: Option<PathBuf>,
    },
    /// Reference the library by URL; viewing the document needs network access
    Cdn {
        /// Script URL
        url: String,
    },
}

impl Default for PlotlyScript {
    fn default() -> Self {
        PlotlyScript::Embed { path: None }
    }
}

/// Declarative chart configuration: slot table, formatting rules, and the
/// fixed cosmetic defaults of the figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Per-slot styles; the number of entries is the maximum trace count
    #[serde(rename = "slot")]
    pub slots: Vec<SlotStyle>,

    /// Column-specific tick formats
    #[serde(rename = "tick_format")]
    pub tick_formats: Vec<TickFormatRule>,

    /// chrono format of the `Time` column
    pub time_format: String,

    /// Horizontal extent of the plotting area, leaving room for stacked axes
    pub x_domain: [f64; 2],

    /// Title font size in points
    pub title_font_size: u32,

    /// Plotly layout template
    pub template: String,

    /// Page and plot background color
    pub background: String,

    /// plotly.js source for exported documents
    pub plotly: PlotlyScript,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            slots: vec![
                SlotStyle::new("red", AxisSide::Right, AxisAnchor::X, 0.90),
                SlotStyle::new("white", AxisSide::Right, AxisAnchor::Free, 1.00),
                SlotStyle::new("lime", AxisSide::Left, AxisAnchor::X, 0.10),
                SlotStyle::new("yellow", AxisSide::Left, AxisAnchor::Free, 0.00),
            ],
            tick_formats: vec![TickFormatRule {
                column: "Source Pressure (mBar)".to_string(),
                format: ".2e".to_string(),
            }],
            time_format: "%m/%d/%Y %I:%M:%S %p".to_string(),
            x_domain: [0.10, 0.90],
            title_font_size: 24,
            template: "plotly_dark".to_string(),
            background: "#111111".to_string(),
            plotly: PlotlyScript::default(),
        }
    }
}

impl ChartStyle {
    /// Maximum number of trace slots
    pub fn max_traces(&self) -> usize {
        self.slots.len()
    }

    /// Tick format configured for a column, if any
    pub fn tick_format_for(&self, column: &str) -> Option<&str> {
        self.tick_formats
            .iter()
            .find(|rule| rule.column == column)
            .map(|rule| rule.format.as_str())
    }

    /// Check that the style table is usable.
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.slots.is_empty() {
            return Err(ChartError::InvalidStyle(
                "at least one trace slot is required".to_string(),
            ));
        }

        for (i, slot) in self.slots.iter().enumerate() {
            if !(0.0..=1.0).contains(&slot.position) {
                return Err(ChartError::InvalidStyle(format!(
                    "slot {} position {} is outside 0.0..=1.0",
                    i, slot.position
                )));
            }
            if slot.color.trim().is_empty() {
                return Err(ChartError::InvalidStyle(format!("slot {} has no color", i)));
            }
        }

        let [lo, hi] = self.x_domain;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
            return Err(ChartError::InvalidStyle(format!(
                "x_domain [{}, {}] must be increasing within 0.0..=1.0",
                lo, hi
            )));
        }

        if let Some(rule) = self.tick_formats.iter().find(|r| r.format.is_empty()) {
            return Err(ChartError::InvalidStyle(format!(
                "tick format for '{}' is empty",
                rule.column
            )));
        }

        if self.time_format.is_empty() {
            return Err(ChartError::InvalidStyle("time_format is empty".to_string()));
        }

        if let PlotlyScript::Cdn { url } = &self.plotly {
            if url.trim().is_empty() {
                return Err(ChartError::InvalidStyle("plotly url is empty".to_string()));
            }
        }

        Ok(())
    }
}
