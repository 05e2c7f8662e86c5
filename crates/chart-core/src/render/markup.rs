// File: crates/chart-core/src/render/markup.rs
// Summary: Interactive markup backend; a standalone HTML fragment that loads Plotly and draws the payload.

use anyhow::{Context, Result};
use uuid::Uuid;

use super::plotly::ChartPayload;
use super::{Artifact, ChartBackend, RenderTarget};
use crate::chart::RenderOptions;
use crate::config::NormalizedDirectives;
use crate::series::Series;

/// Returned instead of a chart when nothing is plottable.
pub const NO_VALID_DATA_HTML: &str =
    r#"<div class="scientiflow-no-data" style="color:red">No valid data for plotting.</div>"#;

pub struct MarkupBackend;

impl ChartBackend for MarkupBackend {
    fn target(&self) -> RenderTarget { RenderTarget::InteractiveMarkup }

    fn render(&self, series: &[Series], directives: &NormalizedDirectives, opts: &RenderOptions) -> Result<Artifact> {
        if series.is_empty() {
            return Ok(Artifact::Markup(NO_VALID_DATA_HTML.to_string()));
        }
        let payload = ChartPayload::build(series, directives);
        Ok(Artifact::Markup(fragment(&payload, &opts.plotly_cdn)?))
    }
}

fn fragment(payload: &ChartPayload, cdn: &str) -> Result<String> {
    let id = Uuid::new_v4();
    let data = script_json(&payload.traces).context("serialize traces")?;
    let layout = script_json(&payload.layout).context("serialize layout")?;
    Ok(format!(
        r#"<div class="scientiflow-chart">
<script src="{cdn}" charset="utf-8"></script>
<div id="{id}" class="plotly-graph-div" style="height:100%; width:100%;"></div>
<script type="text/javascript">
window.PLOTLYENV = window.PLOTLYENV || {{}};
if (document.getElementById("{id}")) {{
  Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});
}}
</script>
</div>"#,
        cdn = html_attr(cdn),
    ))
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn html_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}
