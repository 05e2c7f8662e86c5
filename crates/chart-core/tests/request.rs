// File: crates/chart-core/tests/request.rs
// Purpose: Request boundary: target selection, error classification and upload parsing.

use chart_core::{render_request, render_upload, Artifact, Dataset, RenderError, RenderOptions, Value};
use serde_json::json;

fn dataset() -> Dataset {
    Dataset::from_columns([
        ("time", vec![Value::from(0.0), Value::from(1.0)]),
        ("rmsdA", vec![Value::from(0.1), Value::from(0.2)]),
    ])
    .expect("valid dataset")
}

#[test]
fn legacy_and_canonical_target_names() {
    let config = json!({"x_column_names": ["time"], "y_column_names": ["rmsdA"]});
    let ds = dataset();
    let opts = RenderOptions::default();
    for name in ["dynamic-json", "interactive-payload"] {
        let out = render_request(name, &config, &ds, &opts).expect("render");
        assert!(matches!(out.artifact, Artifact::Payload(_)), "{name}");
    }
    for name in ["dynamic", "interactive-markup"] {
        let out = render_request(name, &config, &ds, &opts).expect("render");
        assert!(matches!(out.artifact, Artifact::Markup(_)), "{name}");
    }
}

#[test]
fn unknown_target_is_a_client_error() {
    let err = render_request("svg", &json!({}), &dataset(), &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, RenderError::InvalidTarget(ref t) if t == "svg"));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn resolution_gaps_are_warnings_not_errors() {
    let config = json!({"x_column_names": ["time"], "y_column_names": ["rmsdA", "rmsdC"]});
    let out = render_request("dynamic-json", &config, &dataset(), &RenderOptions::default()).expect("render");
    assert_eq!(out.warnings, ["missing columns for line plot: x=time, y=rmsdC"]);
    let Artifact::Payload(p) = out.artifact else { panic!("expected payload") };
    assert_eq!(p.traces.len(), 1);
}

#[test]
fn upload_with_csv_bytes() {
    let csv = b"time,rmsdA,rmsdB\n0,0.1,0.3\n1,0.2,0.1\n2,0.25,0.4\n";
    let config = r#"{"plot_type":"scatter","plot_properties":{"x_column_names":["time"],"y_column_names":["rmsdA","rmsdB"]}}"#;
    let out = render_upload("dynamic-json", config, "rmsd.csv", csv, &RenderOptions::default()).expect("render");
    let Artifact::Payload(p) = out.artifact else { panic!("expected payload") };
    assert_eq!(p.traces.len(), 2);
    assert_eq!(p.traces[1].name, "rmsdB_vs_time");
    assert!(out.warnings.is_empty());
}

#[test]
fn malformed_uploads_are_client_errors() {
    let opts = RenderOptions::default();
    let err = render_upload("static", "{not json", "d.csv", b"a\n1\n", &opts).unwrap_err();
    assert!(matches!(err, RenderError::InvalidConfig(_)));
    assert_eq!(err.status_code(), 400);

    let err = render_upload("static", "{}", "d.xlsx", b"", &opts).unwrap_err();
    assert!(matches!(err, RenderError::UnreadableDataset(_)));
    assert!(err.is_client_error());

    let err = render_upload("static", "{}", "d.csv", b"a,b\n1,2,3\n", &opts).unwrap_err();
    assert!(matches!(err, RenderError::UnreadableDataset(_)));
}
