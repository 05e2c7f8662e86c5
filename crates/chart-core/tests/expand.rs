// File: crates/chart-core/tests/expand.rs
// Purpose: Series expansion: cross products, bar first-x rule, graceful skipping of missing columns.

use chart_core::{expand, resolve, Dataset, Value};
use serde_json::json;

fn rmsd_dataset() -> Dataset {
    Dataset::from_columns([
        ("time", vec![Value::from(0.0), Value::from(1.0), Value::from(2.0)]),
        ("rmsdA", vec![Value::from(0.1), Value::from(0.2), Value::from(0.25)]),
        ("rmsdB", vec![Value::from(0.3), Value::from(0.1), Value::from(0.4)]),
    ])
    .expect("valid dataset")
}

fn labels(series: &[chart_core::Series]) -> Vec<&str> {
    series.iter().map(|s| s.label()).collect()
}

#[test]
fn line_two_y_columns_against_time() {
    let ds = rmsd_dataset();
    let d = resolve(&json!({"plot_type": "line", "x_column_names": ["time"], "y_column_names": ["rmsdA", "rmsdB"]}));
    let out = expand(&d, &ds);
    assert_eq!(labels(&out.series), ["rmsdA_vs_time", "rmsdB_vs_time"]);
    for s in &out.series {
        assert_eq!(s.x(), ds.column("time").unwrap().values());
    }
    assert_eq!(out.series[1].y(), ds.column("rmsdB").unwrap().values());
    assert!(out.warnings.is_empty());
}

#[test]
fn missing_y_column_is_skipped_with_warning() {
    let ds = rmsd_dataset();
    let d = resolve(&json!({"x_column_names": ["time"], "y_column_names": ["rmsdA", "rmsdB", "rmsdC"]}));
    let out = expand(&d, &ds);
    assert_eq!(labels(&out.series), ["rmsdA_vs_time", "rmsdB_vs_time"]);
    assert_eq!(out.warnings, ["missing columns for line plot: x=time, y=rmsdC"]);
}

#[test]
fn cross_product_is_m_times_n() {
    let ds = Dataset::from_columns([
        ("x1", vec![Value::from(0.0)]),
        ("x2", vec![Value::from(1.0)]),
        ("y1", vec![Value::from(2.0)]),
        ("y2", vec![Value::from(3.0)]),
        ("y3", vec![Value::from(4.0)]),
    ])
    .unwrap();
    let d = resolve(&json!({"plot_type": "scatter", "x_column_names": ["x1", "x2"], "y_column_names": ["y1", "y2", "y3"]}));
    let out = expand(&d, &ds);
    assert_eq!(out.series.len(), 6);
    // y-major order
    assert_eq!(&labels(&out.series)[..3], ["y1_vs_x1", "y1_vs_x2", "y2_vs_x1"]);

    // one absent x removes one pairing per y column
    let d = resolve(&json!({"plot_type": "scatter", "x_column_names": ["x1", "nope"], "y_column_names": ["y1", "y2", "y3"]}));
    let out = expand(&d, &ds);
    assert_eq!(out.series.len(), 3);
    assert_eq!(out.warnings.len(), 3);
    assert_eq!(out.warnings[0], "missing columns for scatter plot: x=nope, y=y1");
}

#[test]
fn bar_uses_only_first_x_column() {
    let ds = Dataset::from_columns([
        ("cat1", vec![Value::from("a"), Value::from("b")]),
        ("v1", vec![Value::from(1.0), Value::from(2.0)]),
        ("v2", vec![Value::from(3.0), Value::from(4.0)]),
    ])
    .unwrap();
    let with_cat2 = resolve(&json!({"plot_type": "bar", "x_column_names": ["cat1", "cat2"], "y_column_names": ["v1", "v2"]}));
    let without = resolve(&json!({"plot_type": "bar", "x_column_names": ["cat1"], "y_column_names": ["v1", "v2"]}));
    let other_tail = resolve(&json!({"plot_type": "bar", "x_column_names": ["cat1", "v1", "zzz"], "y_column_names": ["v1", "v2"]}));

    let a = expand(&with_cat2, &ds);
    assert_eq!(labels(&a.series), ["v1", "v2"]);
    assert!(a.series.iter().all(|s| s.x() == ds.column("cat1").unwrap().values()));
    assert_eq!(a, expand(&without, &ds));
    assert_eq!(a, expand(&other_tail, &ds));
}

#[test]
fn bar_with_missing_first_x_skips_everything() {
    let ds = rmsd_dataset();
    let d = resolve(&json!({"plot_type": "bar", "x_column_names": ["cat"], "y_column_names": ["rmsdA"]}));
    let out = expand(&d, &ds);
    assert!(out.series.is_empty());
    assert_eq!(out.warnings, ["missing columns for bar plot: x=cat, y=rmsdA"]);

    let d = resolve(&json!({"plot_type": "bar", "y_column_names": ["rmsdA"]}));
    let out = expand(&d, &ds);
    assert!(out.series.is_empty());
    assert!(out.warnings.contains(&"missing columns for bar plot: x=<none>, y=rmsdA".to_string()));
}

#[test]
fn colors_follow_the_y_column() {
    let ds = rmsd_dataset();
    let d = resolve(&json!({
        "plot_properties": {"x_column_names": ["time"], "y_column_names": ["rmsdA", "rmsdB"], "color": {"rmsdB": "#ff0000"}}
    }));
    let out = expand(&d, &ds);
    assert_eq!(out.series[0].color(), None);
    assert_eq!(out.series[1].color(), Some("#ff0000"));
}

#[test]
fn unsupported_plot_type_and_empty_lists_degrade_to_warnings() {
    let ds = rmsd_dataset();
    let out = expand(&resolve(&json!({"plot_type": "pie", "x_column_names": ["time"], "y_column_names": ["rmsdA"]})), &ds);
    assert!(out.series.is_empty());
    assert_eq!(out.warnings, ["unsupported plot type: pie"]);

    let out = expand(&resolve(&json!({})), &ds);
    assert!(out.series.is_empty());
    assert_eq!(out.warnings, ["no x columns configured", "no y columns configured"]);
}
