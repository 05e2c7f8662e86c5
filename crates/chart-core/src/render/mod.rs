// File: crates/chart-core/src/render/mod.rs
// Summary: Render targets, artifacts and the backend trait shared by the three output modes.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;

use crate::chart::RenderOptions;
use crate::config::NormalizedDirectives;
use crate::request::RenderError;
use crate::series::Series;

pub mod markup;
pub mod plotly;
pub mod raster;

pub use markup::{MarkupBackend, NO_VALID_DATA_HTML};
pub use plotly::{ChartPayload, PayloadBackend};
pub use raster::StaticBackend;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// PNG raster.
    Static,
    /// Standalone HTML fragment driving Plotly.
    InteractiveMarkup,
    /// `{traces, layout}` for programmatic consumers.
    InteractivePayload,
}

impl RenderTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderTarget::Static => "static",
            RenderTarget::InteractiveMarkup => "interactive-markup",
            RenderTarget::InteractivePayload => "interactive-payload",
        }
    }
}

impl FromStr for RenderTarget {
    type Err = RenderError;

    /// Accepts the canonical names and the legacy `dynamic` / `dynamic-json` mode names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "static" => Ok(RenderTarget::Static),
            "dynamic" | "interactive-markup" => Ok(RenderTarget::InteractiveMarkup),
            "dynamic-json" | "interactive-payload" => Ok(RenderTarget::InteractivePayload),
            other => Err(RenderError::InvalidTarget(other.to_string())),
        }
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Artifact {
    Raster(Vec<u8>),
    Markup(String),
    Payload(ChartPayload),
}

impl Artifact {
    pub fn media_type(&self) -> &'static str {
        match self {
            Artifact::Raster(_) => "image/png",
            Artifact::Markup(_) => "text/html; charset=utf-8",
            Artifact::Payload(_) => "application/json",
        }
    }

    /// Conventional file extension for writing the artifact to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Artifact::Raster(_) => "png",
            Artifact::Markup(_) => "html",
            Artifact::Payload(_) => "json",
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Artifact::Raster(bytes) => Ok(bytes),
            Artifact::Markup(html) => Ok(html.into_bytes()),
            Artifact::Payload(payload) => serde_json::to_vec_pretty(&payload),
        }
    }
}

/// One output mode. Implementations hold no state between calls.
pub trait ChartBackend {
    fn target(&self) -> RenderTarget;
    fn render(&self, series: &[Series], directives: &NormalizedDirectives, opts: &RenderOptions) -> Result<Artifact>;
}

pub fn backend(target: RenderTarget) -> &'static dyn ChartBackend {
    match target {
        RenderTarget::Static => &StaticBackend,
        RenderTarget::InteractiveMarkup => &MarkupBackend,
        RenderTarget::InteractivePayload => &PayloadBackend,
    }
}

/// Render `series` in expander order. An empty list is never an error.
pub fn render(
    target: RenderTarget,
    series: &[Series],
    directives: &NormalizedDirectives,
    opts: &RenderOptions,
) -> Result<Artifact> {
    backend(target).render(series, directives, opts)
}
