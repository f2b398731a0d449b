//! # Multi-Axis Chart Builder
//!
//! Turns a merged [`Dataset`] plus an x-axis column and up to four trace
//! selections into a Plotly-compatible [`Figure`].
//!
//! ## Slot Layout
//!
//! Each trace occupies a *slot*. The slot index alone decides the trace's
//! color, axis side, anchoring, and axis position:
//!
//! | Slot | Color  | Side  | Anchor | Position |
//! |------|--------|-------|--------|----------|
//! | 0    | red    | right | x      | 0.90     |
//! | 1    | white  | right | free   | 1.00     |
//! | 2    | lime   | left  | x      | 0.10     |
//! | 3    | yellow | left  | free   | 0.00     |
//!
//! Every slot has its own y-axis. Slot 0 owns the primary axis (`y`); every
//! other slot overlays it (`overlaying: "y"`), so each trace is scaled
//! independently within one shared plotting area. An unselected slot still
//! contributes a hidden trace and a hidden axis, keeping axis numbering stable
//! however many traces are chosen.
//!
//! The table lives in [`ChartStyle`] and can be replaced from configuration.
//!
//! ## Time Axis
//!
//! When the x-axis column is `Time`, cells are parsed with
//! [`ChartStyle::time_format`] (`MM/DD/YYYY hh:mm:ss AM/PM` by default) into a
//! date axis without a title. Any other x column is plotted raw and titled with
//! its label.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logview::chart::{build_figure, ChartStyle, TraceSelection};
//! use logview::ingest::load_and_merge;
//!
//! let dataset = load_and_merge(&["run.csv"])?;
//! let traces = [
//!     TraceSelection::column("Beam Voltage (V)"),
//!     TraceSelection::Unselected,
//!     TraceSelection::column("Source Pressure (mBar)"),
//! ];
//! let figure = build_figure("SN-0042", "Time", &traces, &dataset, &ChartStyle::default())?;
//! println!("{}", figure.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use log::debug;

use crate::dataset::{Column, Dataset, TIME_COLUMN};

mod error;
mod figure;
pub mod html;
mod style;

#[cfg(test)]
mod tests;

pub use error::ChartError;
pub use figure::{
    AxisTitle, AxisValues, Figure, Font, Layout, Legend, Line, Title, Trace, XAxis, YAxis,
};
pub use style::{AxisAnchor, AxisSide, ChartStyle, PlotlyScript, SlotStyle, TickFormatRule};

use figure::{axis_ref, layout_axis_key};

/// Timestamp format of parsed `Time` values handed to the date axis
const ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column choice for one trace slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraceSelection {
    /// No trace in this slot
    Unselected,
    /// Plot this column
    Column(String),
}

impl TraceSelection {
    /// Label shown for an empty slot
    pub const SENTINEL: &'static str = "None";

    /// Select a column
    pub fn column(name: impl Into<String>) -> Self {
        TraceSelection::Column(name.into())
    }

    /// Parse a user choice; `None`, `unselected`, and the empty string mean no trace.
    pub fn parse(choice: &str) -> Self {
        let trimmed = choice.trim();
        if trimmed.is_empty()
            || trimmed == Self::SENTINEL
            || trimmed.eq_ignore_ascii_case("unselected")
        {
            TraceSelection::Unselected
        } else {
            TraceSelection::Column(choice.to_string())
        }
    }

    /// Whether a column is chosen
    pub fn is_selected(&self) -> bool {
        matches!(self, TraceSelection::Column(_))
    }

    /// Chosen column label
    pub fn column_name(&self) -> Option<&str> {
        match self {
            TraceSelection::Column(name) => Some(name),
            TraceSelection::Unselected => None,
        }
    }
}

impl From<&str> for TraceSelection {
    fn from(choice: &str) -> Self {
        TraceSelection::parse(choice)
    }
}

impl fmt::Display for TraceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceSelection::Unselected => f.write_str(Self::SENTINEL),
            TraceSelection::Column(name) => f.write_str(name),
        }
    }
}

/// Build a multi-axis figure from a dataset.
///
/// `traces` holds at most [`ChartStyle::max_traces`] slots. Guarding against a
/// selection where every slot is [`TraceSelection::Unselected`] is left to the
/// caller (see [`crate::workflow`]); the builder renders such a figure with
/// hidden traces only.
///
/// # Errors
///
/// - [`ChartError::TooManyTraces`] if more slots are requested than styled
/// - [`ChartError::UnknownColumn`] if the x-axis or a trace column is absent
/// - [`ChartError::TimeParse`] if a `Time` cell does not match the time format
pub fn build_figure(
    title: &str,
    x_axis_column: &str,
    traces: &[TraceSelection],
    dataset: &Dataset,
    style: &ChartStyle,
) -> Result<Figure, ChartError> {
    if traces.len() > style.max_traces() {
        return Err(ChartError::TooManyTraces {
            requested: traces.len(),
            max: style.max_traces(),
        });
    }

    let x_column = dataset
        .column(x_axis_column)
        .ok_or_else(|| ChartError::UnknownColumn(x_axis_column.to_string()))?;

    let is_time_axis = x_axis_column == TIME_COLUMN;
    let x_values = if is_time_axis {
        AxisValues::Text(parse_time_column(x_column, &style.time_format)?)
    } else {
        AxisValues::from(x_column.data())
    };

    let mut data = Vec::with_capacity(traces.len());
    let mut yaxes = BTreeMap::new();

    for (slot, (selection, slot_style)) in traces.iter().zip(&style.slots).enumerate() {
        let axis = axis_ref(slot);

        let (trace, y_axis) = match selection {
            TraceSelection::Column(name) => {
                let column = dataset
                    .column(name)
                    .ok_or_else(|| ChartError::UnknownColumn(name.clone()))?;
                debug!("Slot {}: '{}' on axis {}", slot, name, axis);
                (
                    Trace {
                        kind: "scatter".to_string(),
                        mode: "lines".to_string(),
                        name: name.clone(),
                        x: x_values.clone(),
                        y: AxisValues::from(column.data()),
                        xaxis: "x".to_string(),
                        yaxis: axis.clone(),
                        line: Line {
                            color: slot_style.color.clone(),
                        },
                        visible: true,
                    },
                    slot_axis(slot, slot_style, Some(name.as_str()), style.tick_format_for(name)),
                )
            }
            TraceSelection::Unselected => (
                Trace {
                    kind: "scatter".to_string(),
                    mode: "lines".to_string(),
                    name: TraceSelection::SENTINEL.to_string(),
                    x: AxisValues::Numbers(Vec::new()),
                    y: AxisValues::Numbers(Vec::new()),
                    xaxis: "x".to_string(),
                    yaxis: axis.clone(),
                    line: Line {
                        color: slot_style.color.clone(),
                    },
                    visible: false,
                },
                slot_axis(slot, slot_style, None, None),
            ),
        };

        data.push(trace);
        yaxes.insert(layout_axis_key(&axis), y_axis);
    }

    let xaxis = XAxis {
        title: (!is_time_axis).then(|| AxisTitle {
            text: x_axis_column.to_string(),
            font: None,
        }),
        kind: is_time_axis.then(|| "date".to_string()),
        domain: style.x_domain,
    };

    Ok(Figure {
        data,
        layout: Layout {
            title: Title {
                text: title.to_string(),
                x: 0.5,
                xanchor: "center".to_string(),
                font: Font {
                    size: Some(style.title_font_size),
                    color: None,
                },
            },
            template: style.template.clone(),
            paper_bgcolor: style.background.clone(),
            plot_bgcolor: style.background.clone(),
            legend: Legend {
                orientation: "h".to_string(),
                x: 0.5,
                xanchor: "center".to_string(),
                y: 1.02,
                yanchor: "bottom".to_string(),
            },
            xaxis,
            yaxes,
        },
    })
}

/// Y-axis layout for a slot; `column` is `None` for a placeholder slot
fn slot_axis(
    slot: usize,
    style: &SlotStyle,
    column: Option<&str>,
    tick_format: Option<&str>,
) -> YAxis {
    YAxis {
        title: column.map(|name| AxisTitle {
            text: name.to_string(),
            font: Some(Font {
                size: None,
                color: Some(style.color.clone()),
            }),
        }),
        color: style.color.clone(),
        side: style.side.as_str().to_string(),
        anchor: style.anchor.as_str().to_string(),
        overlaying: (slot != 0).then(|| axis_ref(0)),
        position: style.position,
        tickformat: tick_format.map(str::to_string),
        showgrid: slot == 0,
        visible: column.is_some(),
    }
}

/// Parse every cell of a time column into ISO timestamps.
fn parse_time_column(column: &Column, format: &str) -> Result<Vec<String>, ChartError> {
    let data = column.data();
    (0..data.len())
        .map(|row| {
            let cell = data.cell_text(row).unwrap_or_default();
            parse_time(&cell, format).ok_or_else(|| ChartError::TimeParse {
                row,
                value: cell.clone(),
                format: format.to_string(),
            })
        })
        .collect()
}

/// Parse one timestamp cell, returning its ISO form.
pub fn parse_time(value: &str, format: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(value.trim(), format)
        .ok()
        .map(|t| t.format(ISO_FORMAT).to_string())
}
