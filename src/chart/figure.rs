//! Plotly-compatible figure model.
//!
//! Serializes to the `{"data": [...], "layout": {...}}` object accepted by
//! `Plotly.newPlot`, so an exported document only has to embed the JSON.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::ColumnData;

/// Values along one axis of a trace
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValues {
    /// Numeric samples; `None` serializes as `null` and renders as a gap
    Numbers(Vec<Option<f64>>),
    /// Text values (categories or ISO timestamps)
    Text(Vec<String>),
}

impl AxisValues {
    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Numbers(v) => v.len(),
            AxisValues::Text(v) => v.len(),
        }
    }

    /// Whether there are no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&ColumnData> for AxisValues {
    fn from(data: &ColumnData) -> Self {
        match data {
            ColumnData::Numeric(values) => AxisValues::Numbers(values.clone()),
            ColumnData::Text(values) => AxisValues::Text(values.clone()),
        }
    }
}

/// Line styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// CSS color
    pub color: String,
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Plotly trace type (`scatter`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Drawing mode (`lines`)
    pub mode: String,
    /// Legend label
    pub name: String,
    /// X values
    pub x: AxisValues,
    /// Y values
    pub y: AxisValues,
    /// X axis reference
    pub xaxis: String,
    /// Y axis reference (`y`, `y2`, ...)
    pub yaxis: String,
    /// Line style
    pub line: Line,
    /// Hidden placeholder traces are `false`
    pub visible: bool,
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    /// Size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// CSS color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Figure title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Title text
    pub text: String,
    /// Horizontal position in paper coordinates
    pub x: f64,
    /// Horizontal anchor
    pub xanchor: String,
    /// Title font
    pub font: Font,
}

/// Axis title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    /// Title text
    pub text: String,
    /// Title font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

/// Legend placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    /// `h` for a horizontal legend
    pub orientation: String,
    /// Horizontal position in paper coordinates
    pub x: f64,
    /// Horizontal anchor
    pub xanchor: String,
    /// Vertical position in paper coordinates
    pub y: f64,
    /// Vertical anchor
    pub yanchor: String,
}

/// Horizontal axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    /// Axis title, omitted for time axes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    /// Axis type (`date` for parsed timestamps)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Horizontal extent of the plotting area
    pub domain: [f64; 2],
}

/// Vertical axis of one trace slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    /// Axis title (the column label)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    /// Axis, tick, and label color
    pub color: String,
    /// Plot edge
    pub side: String,
    /// `x` or `free`
    pub anchor: String,
    /// Axis whose coordinate space this axis overlays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    /// Position along the edge in paper coordinates
    pub position: f64,
    /// d3-format tick format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    /// Grid lines (only the primary axis draws them)
    pub showgrid: bool,
    /// Placeholder slots have invisible axes
    pub visible: bool,
}

/// Figure-wide layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Centered, enlarged title
    pub title: Title,
    /// Plotly template
    pub template: String,
    /// Page background
    pub paper_bgcolor: String,
    /// Plot area background
    pub plot_bgcolor: String,
    /// Legend placement
    pub legend: Legend,
    /// Horizontal axis
    pub xaxis: XAxis,
    /// Vertical axes keyed by layout name (`yaxis`, `yaxis2`, ...)
    #[serde(flatten)]
    pub yaxes: BTreeMap<String, YAxis>,
}

/// Renderable chart: series plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// One trace per slot, in slot order
    pub data: Vec<Trace>,
    /// Layout
    pub layout: Layout,
}

impl Figure {
    /// Traces that will be drawn
    pub fn visible_traces(&self) -> impl Iterator<Item = &Trace> {
        self.data.iter().filter(|t| t.visible)
    }

    /// Layout of the y-axis a trace refers to
    pub fn axis_of(&self, trace: &Trace) -> Option<&YAxis> {
        self.layout.yaxes.get(&layout_axis_key(&trace.yaxis))
    }

    /// Serialize to Plotly JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented Plotly JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Trace-side axis reference for a slot: `y`, `y2`, `y3`, ...
pub(crate) fn axis_ref(slot: usize) -> String {
    if slot == 0 {
        "y".to_string()
    } else {
        format!("y{}", slot + 1)
    }
}

/// Layout key for a trace-side axis reference: `y` -> `yaxis`, `y2` -> `yaxis2`
pub(crate) fn layout_axis_key(axis_ref: &str) -> String {
    format!("yaxis{}", axis_ref.trim_start_matches('y'))
}
