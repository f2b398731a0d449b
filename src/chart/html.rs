//! Static HTML export of a [`Figure`].
//!
//! The figure JSON and, by default, the plotly.js library itself are inlined,
//! so the document opens in any browser without a server or network access.
//! See [`PlotlyScript`] for linking the library from a CDN instead.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{ChartError, ChartStyle, Figure, PlotlyScript};

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>__TITLE__</title>
    __PLOTLY_SCRIPT__
    <style>
        html, body { margin: 0; height: 100%; background: __BACKGROUND__; }
        #chart { width: 100%; height: 100%; }
    </style>
</head>
<body>
    <div id="chart"></div>
    <script>
        const figure = __FIGURE__;
        Plotly.newPlot("chart", figure.data, figure.layout, { responsive: true });
    </script>
</body>
</html>
"##;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Break up every `</script` (any case) so inlined code cannot close its element.
fn escape_inline_script(code: &str) -> String {
    const CLOSE: &str = "</script";
    let mut out = String::with_capacity(code.len());
    let mut rest = code;
    while let Some(at) = rest.find("</") {
        let tail = &rest[at..];
        let closes = tail
            .get(..CLOSE.len())
            .map_or(false, |t| t.eq_ignore_ascii_case(CLOSE));
        out.push_str(&rest[..at]);
        out.push_str(if closes { "<\\/" } else { "</" });
        rest = &tail[2..];
    }
    out.push_str(rest);
    out
}

/// The `<script>` element that provides plotly.js
fn plotly_element(plotly: &PlotlyScript) -> Result<String, ChartError> {
    match plotly {
        PlotlyScript::Embed { path: None } => Err(ChartError::PlotlyNotConfigured),
        PlotlyScript::Embed { path: Some(path) } => {
            let code = fs::read_to_string(path).map_err(|source| ChartError::PlotlyRead {
                path: path.clone(),
                source,
            })?;
            debug!("Embedding plotly.js from {} ({} bytes)", path.display(), code.len());
            Ok(format!(
                "<script type=\"text/javascript\">{}</script>",
                escape_inline_script(&code)
            ))
        }
        PlotlyScript::Cdn { url } => Ok(format!(
            "<script src=\"{}\" charset=\"utf-8\"></script>",
            escape_html(url)
        )),
    }
}

/// Render a figure as a standalone HTML document.
///
/// # Errors
///
/// - [`ChartError::PlotlyNotConfigured`] when embedding without a local plotly.js
/// - [`ChartError::PlotlyRead`] when the configured plotly.js cannot be read
pub fn render_html(figure: &Figure, style: &ChartStyle) -> Result<String, ChartError> {
    let plotly = plotly_element(&style.plotly)?;
    // '<' only occurs inside JSON strings, where \u003c is the same character
    let json = figure.to_json()?.replace('<', "\\u003c");

    Ok(fill(
        TEMPLATE,
        &[
            ("__TITLE__", escape_html(&figure.layout.title.text).as_str()),
            ("__PLOTLY_SCRIPT__", plotly.as_str()),
            ("__BACKGROUND__", escape_html(&style.background).as_str()),
            ("__FIGURE__", json.as_str()),
        ],
    ))
}

/// Substitute each marker once, in template order, so substituted text is never rescanned.
fn fill(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    for (marker, value) in substitutions {
        if let Some(at) = rest.find(marker) {
            out.push_str(&rest[..at]);
            out.push_str(value);
            rest = &rest[at + marker.len()..];
        }
    }
    out.push_str(rest);
    out
}

/// Destination path with an `.html` extension.
///
/// Paths already ending in `.html` or `.htm` are kept; anything else gets
/// `.html` appended (`plot` -> `plot.html`, `plot.v2` -> `plot.v2.html`).
pub fn html_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
            path.to_path_buf()
        }
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".html");
            PathBuf::from(name)
        }
    }
}

/// Write a figure to an HTML file and return the path actually written.
pub fn write_html(figure: &Figure, path: &Path, style: &ChartStyle) -> Result<PathBuf, ChartError> {
    let path = html_path(path);
    let document = render_html(figure, style)?;
    fs::write(&path, &document)?;
    info!(
        "Wrote {} ({:.1} KB)",
        path.display(),
        document.len() as f64 / 1024.0
    );
    Ok(path)
}
