// File: crates/chart-core/src/chart.rs
// Summary: Render options and the prepared Chart (directives + expanded series) handed to a backend.

use anyhow::Result;
use log::debug;
use serde_json::Value as Json;

use crate::config::{resolve, NormalizedDirectives};
use crate::dataset::Dataset;
use crate::render::{self, Artifact, RenderTarget};
use crate::series::{expand, Series};
use crate::theme::{self, Theme};
use crate::types::{Insets, DPI, FIGURE_HEIGHT_IN, FIGURE_WIDTH_IN, UNITS_PER_INCH};

/// Plotly runtime the markup backend links to.
pub const DEFAULT_PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    pub insets: Insets,
    pub theme: Theme,
    /// Text (title, ticks, legend labels) on the static image. Off in tests to avoid font variance.
    pub draw_labels: bool,
    pub plotly_cdn: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width_in: FIGURE_WIDTH_IN,
            height_in: FIGURE_HEIGHT_IN,
            dpi: DPI,
            insets: Insets::default(),
            theme: Theme::light(),
            draw_labels: true,
            plotly_cdn: DEFAULT_PLOTLY_CDN.to_string(),
        }
    }
}

impl RenderOptions {
    /// Defaults overridden by `SCIENTIFLOW_DPI`, `SCIENTIFLOW_THEME` and `SCIENTIFLOW_PLOTLY_CDN`.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Ok(raw) = std::env::var("SCIENTIFLOW_DPI") {
            match raw.trim().parse::<f32>() {
                Ok(dpi) if dpi > 0.0 => opts.dpi = dpi.clamp(10.0, 600.0),
                _ => debug!("ignoring SCIENTIFLOW_DPI={raw:?}"),
            }
        }
        if let Ok(name) = std::env::var("SCIENTIFLOW_THEME") {
            opts.theme = theme::find(&name);
        }
        if let Ok(url) = std::env::var("SCIENTIFLOW_PLOTLY_CDN") {
            if !url.trim().is_empty() {
                opts.plotly_cdn = url;
            }
        }
        opts
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Figure size in drawing units (1/100 inch).
    pub fn logical_size(&self) -> (f32, f32) {
        (self.width_in * UNITS_PER_INCH, self.height_in * UNITS_PER_INCH)
    }

    /// Canvas scale from drawing units to pixels.
    pub fn scale(&self) -> f32 { self.dpi / UNITS_PER_INCH }

    pub fn pixel_size(&self) -> (i32, i32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as i32,
            (self.height_in * self.dpi).round().max(1.0) as i32,
        )
    }
}

/// A config resolved and expanded against one dataset, ready for any backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    directives: NormalizedDirectives,
    series: Vec<Series>,
    warnings: Vec<String>,
}

impl Chart {
    pub fn prepare(config: &Json, dataset: &Dataset) -> Self {
        let directives = resolve(config);
        let (series, warnings) = expand(&directives, dataset).into_parts();
        debug!("prepared {} series ({} warnings)", series.len(), warnings.len());
        Self { directives, series, warnings }
    }

    pub fn from_parts(directives: NormalizedDirectives, series: Vec<Series>) -> Self {
        Self { directives, series, warnings: Vec::new() }
    }

    pub fn render(&self, target: RenderTarget, opts: &RenderOptions) -> Result<Artifact> {
        render::render(target, &self.series, &self.directives, opts)
    }

    pub fn directives(&self) -> &NormalizedDirectives { &self.directives }
    pub fn series(&self) -> &[Series] { &self.series }
    pub fn warnings(&self) -> &[String] { &self.warnings }
    pub fn into_warnings(self) -> Vec<String> { self.warnings }
}
