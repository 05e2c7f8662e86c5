// File: crates/chart-core/src/request.rs
// Summary: Render request boundary: selector + raw config + dataset in, one artifact (or a classified error) out.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{error, info};
use serde_json::Value as Json;
use thiserror::Error;

use crate::chart::{Chart, RenderOptions};
use crate::dataset::Dataset;
use crate::loader::{load_reader, DataFormat, LoadError};
use crate::render::{Artifact, RenderTarget};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render target '{0}' (expected static, dynamic or dynamic-json)")]
    InvalidTarget(String),
    #[error("invalid chart config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("unreadable dataset: {0}")]
    UnreadableDataset(#[from] LoadError),
    #[error("render failed: {0}")]
    Backend(String),
}

impl RenderError {
    /// Input-shape problems are the caller's; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RenderError::Backend(_))
    }

    /// HTTP-equivalent status for the boundary.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutcome {
    pub artifact: Artifact,
    /// Skipped pairings and other resolution gaps; diagnostics only.
    pub warnings: Vec<String>,
}

/// Resolve, expand and render. Backend failures (errors or panics) come back as
/// `RenderError::Backend`; they never unwind past this function.
pub fn render_request(
    target: &str,
    config: &Json,
    dataset: &Dataset,
    opts: &RenderOptions,
) -> Result<RenderOutcome, RenderError> {
    let target: RenderTarget = target.parse()?;
    let chart = Chart::prepare(config, dataset);
    info!(
        "render {target}: plot_type={}, {} series, {} warnings",
        chart.directives().plot_type,
        chart.series().len(),
        chart.warnings().len()
    );

    let artifact = panic::catch_unwind(AssertUnwindSafe(|| chart.render(target, opts)))
        .map_err(|payload| RenderError::Backend(panic_message(payload)))?
        .map_err(|e| RenderError::Backend(format!("{e:#}")))
        .inspect_err(|e| error!("{target} render failed: {e}"))?;

    Ok(RenderOutcome { artifact, warnings: chart.into_warnings() })
}

/// Same as `render_request`, for raw upload parts: config as JSON text and the data file's bytes.
pub fn render_upload(
    target: &str,
    config_json: &str,
    file_name: &str,
    data: &[u8],
    opts: &RenderOptions,
) -> Result<RenderOutcome, RenderError> {
    let target = target.parse::<RenderTarget>()?;
    let config: Json = serde_json::from_str(config_json)?;
    let dataset = load_reader(data, DataFormat::from_file_name(file_name)?)?;
    render_request(target.as_str(), &config, &dataset, opts)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("backend panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("backend panicked: {s}")
    } else {
        "backend panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(RenderError::InvalidTarget("svg".into()).status_code(), 400);
        assert_eq!(RenderError::Backend("boom".into()).status_code(), 500);
        assert!(RenderError::UnreadableDataset(LoadError::Shape("x".into())).is_client_error());
    }

    #[test]
    fn panic_payloads_are_described() {
        assert_eq!(panic_message(Box::new("bad")), "backend panicked: bad");
        assert_eq!(panic_message(Box::new(String::from("worse"))), "backend panicked: worse");
        assert_eq!(panic_message(Box::new(3u8)), "backend panicked");
    }
}
