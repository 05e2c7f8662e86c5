// File: crates/chart-core/tests/resolve.rs
// Purpose: Config shape compatibility: nested vs flat keys, per-field precedence and fallback.

use chart_core::{resolve, BarMode, Orientation, PlotKind};
use serde_json::json;

#[test]
fn flat_and_nested_shapes_resolve_identically() {
    let flat = json!({
        "plot_type": "scatter",
        "x_column_names": ["time"],
        "y_column_names": ["rmsdA", "rmsdB"],
        "color": {"rmsdA": "#1f77b4"},
        "title": "RMSD",
        "x_label": "t (ns)",
        "y_label": "RMSD (nm)"
    });
    let nested = json!({
        "plot_type": "scatter",
        "plot_properties": {
            "x_column_names": ["time"],
            "y_column_names": ["rmsdA", "rmsdB"],
            "color": {"rmsdA": "#1f77b4"}
        },
        "title": "RMSD",
        "x_label": "t (ns)",
        "y_label": "RMSD (nm)"
    });
    assert_eq!(resolve(&flat), resolve(&nested));
}

#[test]
fn nested_wins_per_field() {
    let config = json!({
        "plot_properties": {
            "x_column_names": ["nested_x"],
            "color": {"a": "red"}
        },
        "x_column_names": ["flat_x"],
        "y_column_names": ["flat_y"],
        "color": {"a": "blue", "b": "green"}
    });
    let d = resolve(&config);
    assert_eq!(d.x_columns, ["nested_x"]);
    // y only exists flat: falls back for this field alone
    assert_eq!(d.y_columns, ["flat_y"]);
    // the whole map comes from one source, no key-level merging
    assert_eq!(d.color_for("a"), Some("red"));
    assert_eq!(d.color_for("b"), None);
}

#[test]
fn empty_nested_values_fall_back_to_flat() {
    let config = json!({
        "plot_properties": {"x_column_names": [], "y_column_names": null, "color": {}},
        "x_column_names": ["x"],
        "y_column_names": ["y"],
        "color": {"y": "#00ff00"}
    });
    let d = resolve(&config);
    assert_eq!(d.x_columns, ["x"]);
    assert_eq!(d.y_columns, ["y"]);
    assert_eq!(d.color_for("y"), Some("#00ff00"));
}

#[test]
fn missing_everything_gives_defaults() {
    let d = resolve(&json!({"plot_properties": "not an object"}));
    assert_eq!(d.plot_type, PlotKind::Line);
    assert!(d.x_columns.is_empty() && d.y_columns.is_empty() && d.colors.is_empty());
    assert_eq!((d.title.as_str(), d.x_label.as_str(), d.y_label.as_str()), ("", "", ""));
    assert_eq!(d.orientation, Orientation::Vertical);
    assert_eq!(d.bar_mode, BarMode::Group);
}

#[test]
fn non_string_plot_type_is_unsupported_not_an_error() {
    let d = resolve(&json!({"plot_type": 3}));
    assert_eq!(d.plot_type, PlotKind::Unsupported("3".into()));
}

#[test]
fn resolution_is_deterministic() {
    let config = json!({"plot_type": "bar", "x_column_names": ["c"], "y_column_names": ["a", "b"], "bar_mode": "stack"});
    assert_eq!(resolve(&config), resolve(&config.clone()));
}
