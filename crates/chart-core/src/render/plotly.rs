// File: crates/chart-core/src/render/plotly.rs
// Summary: Plotly trace/layout model and the structured payload backend.

use anyhow::Result;
use serde::Serialize;

use super::{Artifact, ChartBackend, RenderTarget};
use crate::chart::RenderOptions;
use crate::config::{NormalizedDirectives, Orientation, PlotKind};
use crate::dataset::Value;
use crate::series::Series;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorSpec {
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    pub name: String,
    pub x: Vec<Value>,
    pub y: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<ColorSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AxisLayout {
    pub title: Title,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: AxisLayout,
    pub yaxis: AxisLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
}

/// Structured chart description. Serialized as `{"data": [...], "layout": {...}}`,
/// the shape Plotly front ends take directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartPayload {
    #[serde(rename = "data")]
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl ChartPayload {
    pub fn build(series: &[Series], directives: &NormalizedDirectives) -> Self {
        let horizontal = directives.plot_type == PlotKind::Bar && directives.orientation == Orientation::Horizontal;
        let traces = series.iter().map(|s| trace(s, directives)).collect();

        // Horizontal bars put the category column on the y axis; its label follows it.
        let (x_title, y_title) = if horizontal {
            (&directives.y_label, &directives.x_label)
        } else {
            (&directives.x_label, &directives.y_label)
        };
        let layout = Layout {
            title: Title { text: directives.title.clone() },
            xaxis: AxisLayout { title: Title { text: x_title.clone() } },
            yaxis: AxisLayout { title: Title { text: y_title.clone() } },
            barmode: (directives.plot_type == PlotKind::Bar).then(|| directives.bar_mode.as_str()),
        };
        Self { traces, layout }
    }

    pub fn is_empty(&self) -> bool { self.traces.is_empty() }
}

fn trace(s: &Series, directives: &NormalizedDirectives) -> Trace {
    let color = s.color().map(|c| ColorSpec { color: c.to_string() });
    let (x, y) = (s.x().to_vec(), s.y().to_vec());
    match directives.plot_type {
        PlotKind::Bar => {
            let horizontal = directives.orientation == Orientation::Horizontal;
            let (x, y) = if horizontal { (y, x) } else { (x, y) };
            Trace {
                kind: "bar",
                mode: None,
                name: s.label().to_string(),
                x,
                y,
                orientation: Some(directives.orientation.as_str()),
                line: None,
                marker: color,
            }
        }
        PlotKind::Scatter => Trace {
            kind: "scatter",
            mode: Some("markers"),
            name: s.label().to_string(),
            x,
            y,
            orientation: None,
            line: None,
            marker: color,
        },
        PlotKind::Line | PlotKind::Unsupported(_) => Trace {
            kind: "scatter",
            mode: Some("lines"),
            name: s.label().to_string(),
            x,
            y,
            orientation: None,
            line: color,
            marker: None,
        },
    }
}

pub struct PayloadBackend;

impl ChartBackend for PayloadBackend {
    fn target(&self) -> RenderTarget { RenderTarget::InteractivePayload }

    fn render(&self, series: &[Series], directives: &NormalizedDirectives, _opts: &RenderOptions) -> Result<Artifact> {
        Ok(Artifact::Payload(ChartPayload::build(series, directives)))
    }
}
