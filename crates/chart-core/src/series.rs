// File: crates/chart-core/src/series.rs
// Summary: Series model and the expander that pairs configured x/y columns against a dataset.
// Notes:
// - line/scatter take the full cross product of y and x columns (m*n series, y-major order).
//   Several x columns therefore overlay several series per y column; this is kept as-is.
// - bar only ever uses the first x column.

use log::warn;

use crate::config::{NormalizedDirectives, PlotKind};
use crate::dataset::{Dataset, Value};

/// One drawable line / marker set / bar group. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    label: String,
    x: Vec<Value>,
    y: Vec<Value>,
    color: Option<String>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<Value>, y: Vec<Value>, color: Option<String>) -> Self {
        Self { label: label.into(), x, y, color }
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn x(&self) -> &[Value] { &self.x }
    pub fn y(&self) -> &[Value] { &self.y }
    pub fn color(&self) -> Option<&str> { self.color.as_deref() }

    /// Number of (x, y) points; columns of one dataset always agree.
    pub fn len(&self) -> usize { self.x.len().min(self.y.len()) }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Result of expansion: the plottable series plus a note for every skipped pairing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expansion {
    pub series: Vec<Series>,
    pub warnings: Vec<String>,
}

impl Expansion {
    pub fn into_parts(self) -> (Vec<Series>, Vec<String>) { (self.series, self.warnings) }

    fn skip(&mut self, msg: String) {
        warn!("{msg}");
        self.warnings.push(msg);
    }
}

pub fn expand(directives: &NormalizedDirectives, dataset: &Dataset) -> Expansion {
    let mut out = Expansion::default();

    if let PlotKind::Unsupported(kind) = &directives.plot_type {
        out.skip(format!("unsupported plot type: {kind}"));
        return out;
    }
    if directives.x_columns.is_empty() {
        out.skip("no x columns configured".to_string());
    }
    if directives.y_columns.is_empty() {
        out.skip("no y columns configured".to_string());
    }

    let kind = directives.plot_type.as_str();
    match directives.plot_type {
        PlotKind::Line | PlotKind::Scatter => {
            for y in &directives.y_columns {
                for x in &directives.x_columns {
                    match (dataset.column(x), dataset.column(y)) {
                        (Some(xc), Some(yc)) => out.series.push(Series::new(
                            format!("{y}_vs_{x}"),
                            xc.values().to_vec(),
                            yc.values().to_vec(),
                            directives.color_for(y).map(str::to_string),
                        )),
                        _ => out.skip(format!("missing columns for {kind} plot: x={x}, y={y}")),
                    }
                }
            }
        }
        PlotKind::Bar => {
            let first_x = directives.x_columns.first();
            for y in &directives.y_columns {
                match (first_x.and_then(|x| dataset.column(x)), dataset.column(y)) {
                    (Some(xc), Some(yc)) => out.series.push(Series::new(
                        y.clone(),
                        xc.values().to_vec(),
                        yc.values().to_vec(),
                        directives.color_for(y).map(str::to_string),
                    )),
                    _ => out.skip(format!(
                        "missing columns for {kind} plot: x={}, y={y}",
                        first_x.map(String::as_str).unwrap_or("<none>")
                    )),
                }
            }
        }
        PlotKind::Unsupported(_) => {}
    }
    out
}
