// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; config normalization, series expansion and chart rendering.

pub mod chart;
pub mod config;
pub mod dataset;
pub mod geometry;
pub mod grid;
pub mod loader;
pub mod render;
pub mod request;
pub mod series;
pub mod text;
pub mod theme;
pub mod types;
pub mod view;

pub use chart::{Chart, RenderOptions};
pub use config::{resolve, BarMode, NormalizedDirectives, Orientation, PlotKind};
pub use dataset::{Column, Dataset, DatasetError, Value};
pub use loader::{load_path, load_reader, DataFormat, LoadError};
pub use render::{render, Artifact, ChartBackend, ChartPayload, RenderTarget, NO_VALID_DATA_HTML};
pub use request::{render_request, render_upload, RenderError, RenderOutcome};
pub use series::{expand, Expansion, Series};
pub use theme::Theme;
