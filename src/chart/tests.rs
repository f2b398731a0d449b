use super::html::{html_path, render_html, write_html};
use super::*;
use crate::dataset::DatasetBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn dataset() -> Dataset {
    let headers = ["Time", "Voltage", "Source Pressure (mBar)", "Step"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut builder = DatasetBuilder::new(headers);
    builder.begin_file(Path::new("run.csv"));
    builder.push_row(["01/15/2024 02:30:00 PM", "10.0", "1.2e-6", "1"]);
    builder.push_row(["01/15/2024 02:30:01 PM", "10.5", "1.1e-6", "2"]);
    builder.push_row(["01/15/2024 11:59:59 AM", "11.0", "9.8e-7", "3"]);
    builder.finish()
}

fn selection(choices: &[&str]) -> Vec<TraceSelection> {
    choices.iter().map(|c| TraceSelection::parse(c)).collect()
}

// ==================== Selection Tests ====================

#[test]
fn test_trace_selection_parse() {
    assert_eq!(TraceSelection::parse("None"), TraceSelection::Unselected);
    assert_eq!(TraceSelection::parse("unselected"), TraceSelection::Unselected);
    assert_eq!(TraceSelection::parse("  "), TraceSelection::Unselected);
    assert_eq!(
        TraceSelection::parse("Voltage"),
        TraceSelection::column("Voltage")
    );
    assert_eq!(TraceSelection::Unselected.to_string(), "None");
    assert_eq!(TraceSelection::column("Voltage").column_name(), Some("Voltage"));
}

// ==================== Slot Layout Tests ====================

#[test]
fn test_single_trace_in_slot_zero() {
    let traces = selection(&["Voltage", "unselected", "unselected", "unselected"]);
    let figure = build_figure("SN-1", "Time", &traces, &dataset(), &ChartStyle::default()).unwrap();

    assert_eq!(figure.data.len(), 4);
    let visible: Vec<_> = figure.visible_traces().collect();
    assert_eq!(visible.len(), 1);

    let trace = visible[0];
    assert_eq!(trace.name, "Voltage");
    assert_eq!(trace.line.color, "red");
    assert_eq!(trace.yaxis, "y");

    let axis = figure.axis_of(trace).unwrap();
    assert_eq!(axis.position, 0.90);
    assert_eq!(axis.color, "red");
    assert_eq!(axis.side, "right");
    assert_eq!(axis.anchor, "x");
    assert!(axis.overlaying.is_none());
    assert!(axis.visible);

    for hidden in &figure.data[1..] {
        assert!(!hidden.visible);
        assert!(hidden.y.is_empty());
    }
}

#[test]
fn test_slot_styles_are_positional() {
    let traces = selection(&["Step", "Voltage", "Source Pressure (mBar)", "Step"]);
    let figure = build_figure("SN-1", "Time", &traces, &dataset(), &ChartStyle::default()).unwrap();

    let expected = [
        ("y", "yaxis", "red", "right", "x", 0.90),
        ("y2", "yaxis2", "white", "right", "free", 1.00),
        ("y3", "yaxis3", "lime", "left", "x", 0.10),
        ("y4", "yaxis4", "yellow", "left", "free", 0.00),
    ];

    for (slot, (axis_ref, key, color, side, anchor, position)) in expected.iter().enumerate() {
        let trace = &figure.data[slot];
        assert_eq!(trace.yaxis, *axis_ref);
        assert_eq!(trace.line.color, *color);

        let axis = &figure.layout.yaxes[*key];
        assert_eq!(axis.side, *side);
        assert_eq!(axis.anchor, *anchor);
        assert_eq!(axis.position, *position);
        if slot == 0 {
            assert!(axis.overlaying.is_none());
        } else {
            assert_eq!(axis.overlaying.as_deref(), Some("y"));
        }
    }

    // same column in two slots takes each slot's color
    assert_eq!(figure.data[0].name, figure.data[3].name);
    assert_ne!(figure.data[0].line.color, figure.data[3].line.color);
}

#[test]
fn test_unselected_first_slot_keeps_numbering() {
    let traces = selection(&["None", "Voltage"]);
    let figure = build_figure("SN-1", "Time", &traces, &dataset(), &ChartStyle::default()).unwrap();

    assert_eq!(figure.data.len(), 2);
    assert!(!figure.data[0].visible);
    assert!(!figure.layout.yaxes["yaxis"].visible);
    assert_eq!(figure.data[1].yaxis, "y2");
    assert_eq!(figure.layout.yaxes["yaxis2"].overlaying.as_deref(), Some("y"));
}

#[test]
fn test_pressure_axis_uses_scientific_ticks() {
    let traces = selection(&["Voltage", "Source Pressure (mBar)"]);
    let figure = build_figure("SN-1", "Time", &traces, &dataset(), &ChartStyle::default()).unwrap();

    assert!(figure.layout.yaxes["yaxis"].tickformat.is_none());
    assert_eq!(
        figure.layout.yaxes["yaxis2"].tickformat.as_deref(),
        Some(".2e")
    );
}

#[test]
fn test_custom_tick_rule() {
    let mut style = ChartStyle::default();
    style.tick_formats.push(TickFormatRule {
        column: "Voltage".to_string(),
        format: ".1f".to_string(),
    });
    let figure = build_figure("SN-1", "Time", &selection(&["Voltage"]), &dataset(), &style).unwrap();
    assert_eq!(figure.layout.yaxes["yaxis"].tickformat.as_deref(), Some(".1f"));
}

// ==================== X Axis Tests ====================

#[test]
fn test_time_axis_is_parsed_and_untitled() {
    let figure = build_figure(
        "SN-1",
        "Time",
        &selection(&["Voltage"]),
        &dataset(),
        &ChartStyle::default(),
    )
    .unwrap();

    assert!(figure.layout.xaxis.title.is_none());
    assert_eq!(figure.layout.xaxis.kind.as_deref(), Some("date"));
    assert_eq!(
        figure.data[0].x,
        AxisValues::Text(vec![
            "2024-01-15 14:30:00".to_string(),
            "2024-01-15 14:30:01".to_string(),
            "2024-01-15 11:59:59".to_string(),
        ])
    );
}

#[test]
fn test_parse_time_afternoon() {
    let format = ChartStyle::default().time_format;
    assert_eq!(
        parse_time("01/15/2024 02:30:00 PM", &format).as_deref(),
        Some("2024-01-15 14:30:00")
    );
    assert_eq!(parse_time("2024-01-15 14:30:00", &format), None);
}

#[test]
fn test_other_x_axis_is_raw_and_titled() {
    let figure = build_figure(
        "SN-1",
        "Step",
        &selection(&["Voltage"]),
        &dataset(),
        &ChartStyle::default(),
    )
    .unwrap();

    assert_eq!(figure.layout.xaxis.title.as_ref().unwrap().text, "Step");
    assert!(figure.layout.xaxis.kind.is_none());
    assert_eq!(
        figure.data[0].x,
        AxisValues::Numbers(vec![Some(1.0), Some(2.0), Some(3.0)])
    );
}

#[test]
fn test_bad_time_value_names_row() {
    let headers = vec!["Time".to_string(), "Voltage".to_string()];
    let mut builder = DatasetBuilder::new(headers);
    builder.push_row(["01/15/2024 02:30:00 PM", "1"]);
    builder.push_row(["garbage", "2"]);
    let dataset = builder.finish();

    let result = build_figure("t", "Time", &selection(&["Voltage"]), &dataset, &ChartStyle::default());
    match result {
        Err(ChartError::TimeParse { row, value, .. }) => {
            assert_eq!(row, 1);
            assert_eq!(value, "garbage");
        }
        other => panic!("expected TimeParse, got {:?}", other),
    }
}

// ==================== Error Tests ====================

#[test]
fn test_unknown_trace_column() {
    let result = build_figure(
        "t",
        "Time",
        &selection(&["Current"]),
        &dataset(),
        &ChartStyle::default(),
    );
    assert!(matches!(result, Err(ChartError::UnknownColumn(c)) if c == "Current"));
}

#[test]
fn test_unknown_x_column() {
    let result = build_figure(
        "t",
        "Elapsed",
        &selection(&["Voltage"]),
        &dataset(),
        &ChartStyle::default(),
    );
    assert!(matches!(result, Err(ChartError::UnknownColumn(c)) if c == "Elapsed"));
}

#[test]
fn test_too_many_traces() {
    let traces = selection(&["Voltage"; 5]);
    let result = build_figure("t", "Time", &traces, &dataset(), &ChartStyle::default());
    assert!(matches!(
        result,
        Err(ChartError::TooManyTraces { requested: 5, max: 4 })
    ));
}

// ==================== Layout Tests ====================

#[test]
fn test_layout_defaults() {
    let figure = build_figure(
        "SN-1",
        "Time",
        &selection(&["Voltage"]),
        &dataset(),
        &ChartStyle::default(),
    )
    .unwrap();
    let layout = &figure.layout;

    assert_eq!(layout.title.text, "SN-1");
    assert_eq!(layout.title.x, 0.5);
    assert_eq!(layout.title.font.size, Some(24));
    assert_eq!(layout.template, "plotly_dark");
    assert_eq!(layout.legend.orientation, "h");
    assert_eq!(layout.legend.xanchor, "center");
    assert_eq!(layout.xaxis.domain, [0.10, 0.90]);
}

#[test]
fn test_figure_json_shape() {
    let figure = build_figure(
        "SN-1",
        "Time",
        &selection(&["Voltage", "None"]),
        &dataset(),
        &ChartStyle::default(),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();

    assert_eq!(value["data"][0]["type"], "scatter");
    assert_eq!(value["data"][1]["visible"], false);
    assert_eq!(value["layout"]["yaxis"]["side"], "right");
    assert_eq!(value["layout"]["yaxis2"]["overlaying"], "y");
    assert!(value["layout"]["xaxis"].get("title").is_none());
}

#[test]
fn test_style_validation() {
    ChartStyle::default().validate().unwrap();

    let mut style = ChartStyle::default();
    style.slots[1].position = 1.5;
    assert!(matches!(style.validate(), Err(ChartError::InvalidStyle(_))));

    let mut style = ChartStyle::default();
    style.slots.clear();
    assert!(style.validate().is_err());

    let mut style = ChartStyle::default();
    style.x_domain = [0.9, 0.1];
    assert!(style.validate().is_err());
}

// ==================== HTML Tests ====================

const PLOTLY_STUB: &str = "window.Plotly={newPlot:function(){}};/*plotly stub*/";

/// Default style embedding a stand-in plotly.js written to `dir`
fn offline_style(dir: &TempDir) -> ChartStyle {
    let path = dir.path().join("plotly.min.js");
    fs::write(&path, PLOTLY_STUB).unwrap();
    ChartStyle {
        plotly: PlotlyScript::Embed { path: Some(path) },
        ..ChartStyle::default()
    }
}

#[test]
fn test_render_html_embeds_figure() {
    let dir = tempdir().unwrap();
    let style = offline_style(&dir);
    let figure = build_figure(
        "SN <1>",
        "Time",
        &selection(&["Voltage"]),
        &dataset(),
        &style,
    )
    .unwrap();

    let html = render_html(&figure, &style).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>SN &lt;1&gt;</title>"));
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains("\"Voltage\""));
}

#[test]
fn test_render_html_is_self_contained() {
    let dir = tempdir().unwrap();
    let style = offline_style(&dir);
    let figure = build_figure("t", "Time", &selection(&["Voltage"]), &dataset(), &style).unwrap();

    let html = render_html(&figure, &style).unwrap();
    assert!(html.contains(PLOTLY_STUB));
    assert!(!html.contains("src="));
    assert!(!html.contains("http://"));
    assert!(!html.contains("https://"));
}

#[test]
fn test_render_html_requires_local_plotly_by_default() {
    let style = ChartStyle::default();
    let figure = build_figure("t", "Time", &selection(&["Voltage"]), &dataset(), &style).unwrap();

    assert!(matches!(
        render_html(&figure, &style),
        Err(ChartError::PlotlyNotConfigured)
    ));
}

#[test]
fn test_render_html_reports_unreadable_plotly() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.js");
    let style = ChartStyle {
        plotly: PlotlyScript::Embed {
            path: Some(missing.clone()),
        },
        ..ChartStyle::default()
    };
    let figure = build_figure("t", "Time", &selection(&["Voltage"]), &dataset(), &style).unwrap();

    match render_html(&figure, &style) {
        Err(ChartError::PlotlyRead { path, .. }) => assert_eq!(path, missing),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_render_html_links_cdn_when_chosen() {
    let style = ChartStyle {
        plotly: PlotlyScript::Cdn {
            url: "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string(),
        },
        ..ChartStyle::default()
    };
    let figure = build_figure("t", "Time", &selection(&["Voltage"]), &dataset(), &style).unwrap();

    let html = render_html(&figure, &style).unwrap();
    assert!(html.contains("<script src=\"https://cdn.plot.ly/plotly-2.35.2.min.js\""));
}

#[test]
fn test_render_html_escapes_script_close() {
    let dir = tempdir().unwrap();
    let headers = vec!["Time".to_string(), "</script>".to_string()];
    let mut builder = DatasetBuilder::new(headers);
    builder.push_row(["01/15/2024 02:30:00 PM", "1"]);
    let dataset = builder.finish();
    let style = offline_style(&dir);

    let figure = build_figure("t", "Time", &selection(&["</script>"]), &dataset, &style).unwrap();
    let html = render_html(&figure, &style).unwrap();
    // plotly.js element and figure element only
    assert_eq!(html.matches("</script>").count(), 2);
}

#[test]
fn test_render_html_escapes_comment_open_in_labels() {
    let dir = tempdir().unwrap();
    let headers = vec!["Time".to_string(), "<!--<script>".to_string()];
    let mut builder = DatasetBuilder::new(headers);
    builder.push_row(["01/15/2024 02:30:00 PM", "1"]);
    let dataset = builder.finish();
    let style = offline_style(&dir);

    let figure =
        build_figure("t", "Time", &selection(&["<!--<script>"]), &dataset, &style).unwrap();
    let html = render_html(&figure, &style).unwrap();

    let figure_line = html
        .lines()
        .find(|line| line.contains("const figure ="))
        .unwrap();
    assert!(!figure_line.contains('<'));
    assert!(figure_line.contains("\\u003c!--\\u003cscript>"));
    assert!(!html.contains("<!--"));

    // still valid JSON carrying the original label
    let json = figure_line
        .trim()
        .trim_start_matches("const figure = ")
        .trim_end_matches(';');
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(value["data"][1]["name"], "<!--<script>");
}

#[test]
fn test_inline_plotly_cannot_close_its_element() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plotly.min.js");
    fs::write(&path, "var s='</SCRIPT>';var t='a</b';").unwrap();
    let style = ChartStyle {
        plotly: PlotlyScript::Embed { path: Some(path) },
        ..ChartStyle::default()
    };
    let figure = build_figure("t", "Time", &selection(&["Voltage"]), &dataset(), &style).unwrap();

    let html = render_html(&figure, &style).unwrap();
    assert!(html.contains("var s='<\\/SCRIPT>';var t='a</b';"));
    assert_eq!(html.to_ascii_lowercase().matches("</script>").count(), 2);
}

#[test]
fn test_html_path_extension() {
    assert_eq!(html_path(Path::new("out/plot.html")), PathBuf::from("out/plot.html"));
    assert_eq!(html_path(Path::new("plot.HTM")), PathBuf::from("plot.HTM"));
    assert_eq!(html_path(Path::new("plot")), PathBuf::from("plot.html"));
    assert_eq!(html_path(Path::new("plot.v2")), PathBuf::from("plot.v2.html"));
}

#[test]
fn test_write_html_creates_file() {
    let dir = tempdir().unwrap();
    let style = offline_style(&dir);
    let figure = build_figure("SN-1", "Time", &selection(&["Voltage"]), &dataset(), &style).unwrap();

    let written = write_html(&figure, &dir.path().join("report"), &style).unwrap();
    assert_eq!(written, dir.path().join("report.html"));
    let contents = std::fs::read_to_string(&written).unwrap();
    assert!(contents.contains("SN-1"));
}
