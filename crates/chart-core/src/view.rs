// File: crates/chart-core/src/view.rs
// Data extents for the static backend: visible ranges, x-axis kind and point positions.

use chrono::DateTime;

use crate::dataset::Value;
use crate::grid::{format_tick, linspace, thin_indices};
use crate::series::Series;

/// How x values map onto the horizontal axis.
#[derive(Clone, Debug, PartialEq)]
pub enum XScale {
    Numeric,
    /// Seconds since the epoch; ticks are printed as dates.
    Time,
    /// Row positions 0..n with the original values as tick labels.
    Category(Vec<String>),
}

impl XScale {
    /// Any text cell makes the axis categorical; all-temporal makes it a time axis.
    pub fn detect(series: &[Series]) -> Self {
        let all_x = || series.iter().flat_map(|s| s.x().iter());
        if all_x().any(|v| matches!(v, Value::Text(_))) {
            let labels = series
                .first()
                .map(|s| s.x().iter().map(Value::to_string).collect())
                .unwrap_or_default();
            return XScale::Category(labels);
        }
        let mut non_null = all_x().filter(|v| !v.is_null()).peekable();
        if non_null.peek().is_some() && non_null.all(|v| matches!(v, Value::Time(_))) {
            return XScale::Time;
        }
        XScale::Numeric
    }

    /// Horizontal position of the `i`-th x value; NaN when it has none.
    pub fn position(&self, i: usize, v: &Value) -> f64 {
        match self {
            XScale::Category(_) => i as f64,
            _ => v.as_f64().unwrap_or(f64::NAN),
        }
    }

    /// Tick positions and labels across `[min, max]`.
    pub fn ticks(&self, min: f64, max: f64) -> Vec<(f64, String)> {
        match self {
            XScale::Numeric => linspace(min, max, 6).into_iter().map(|v| (v, format_tick(v))).collect(),
            XScale::Time => linspace(min, max, 5)
                .into_iter()
                .map(|v| {
                    let label = DateTime::from_timestamp(v as i64, 0)
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    (v, label)
                })
                .collect(),
            XScale::Category(labels) => thin_indices(labels.len(), 12)
                .into_iter()
                .map(|i| (i as f64, labels[i].clone()))
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extents {
    /// Bounding box of all finite points with a 2% y margin; `[0,1]^2` when there are none.
    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Self {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for (x, y) in points {
            if !x.is_finite() || !y.is_finite() { continue; }
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
            return Self { x_min: 0.0, x_max: 1.0, y_min: 0.0, y_max: 1.0 };
        }
        if (x_max - x_min).abs() < 1e-9 { x_min -= 0.5; x_max += 0.5; }
        if (y_max - y_min).abs() < 1e-9 { y_min -= 0.5; y_max += 0.5; }
        let ym = (y_max - y_min) * 0.02;
        Self { x_min, x_max, y_min: y_min - ym, y_max: y_max + ym }
    }

    /// Widen x by `pad` on both sides.
    pub fn pad_x(mut self, pad: f64) -> Self {
        self.x_min -= pad;
        self.x_max += pad;
        self
    }

    /// Make sure `y` is within the vertical range.
    pub fn include_y(mut self, y: f64) -> Self {
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
        self
    }
}
