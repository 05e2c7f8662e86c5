// File: crates/chart-core/src/config.rs
// Summary: Column resolver; turns a raw chart config in any historical shape into normalized directives.
// Notes:
// - Two shapes are in circulation: nested (`plot_properties.{x_column_names,y_column_names,color}`)
//   and flat (the same keys at top level). Each field resolves independently: nested first,
//   flat second, empty default last. A present-but-empty nested value counts as absent.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde_json::{Map, Value as Json};

/// Key of the nested property block.
pub const PLOT_PROPERTIES: &str = "plot_properties";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PlotKind {
    #[default]
    Line,
    Bar,
    Scatter,
    /// Carried through untouched; expands to no series.
    Unsupported(String),
}

impl PlotKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "line" => PlotKind::Line,
            "bar" => PlotKind::Bar,
            "scatter" => PlotKind::Scatter,
            other => PlotKind::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlotKind::Line => "line",
            PlotKind::Bar => "bar",
            PlotKind::Scatter => "scatter",
            PlotKind::Unsupported(s) => s,
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Vertical => "v",
            Orientation::Horizontal => "h",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarMode {
    #[default]
    Group,
    Stack,
    Overlay,
    Relative,
}

impl BarMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarMode::Group => "group",
            BarMode::Stack => "stack",
            BarMode::Overlay => "overlay",
            BarMode::Relative => "relative",
        }
    }
}

/// y-column name -> color, as written by the user.
pub type ColorMap = BTreeMap<String, String>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedDirectives {
    pub plot_type: PlotKind,
    pub x_columns: Vec<String>,
    pub y_columns: Vec<String>,
    pub colors: ColorMap,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub orientation: Orientation,
    pub bar_mode: BarMode,
}

impl NormalizedDirectives {
    pub fn color_for(&self, y_column: &str) -> Option<&str> {
        self.colors.get(y_column).map(String::as_str)
    }
}

/// Resolve a raw config. Never fails: anything unreadable falls back to defaults.
pub fn resolve(config: &Json) -> NormalizedDirectives {
    let empty = Map::new();
    let root = config.as_object().unwrap_or(&empty);
    let nested = root.get(PLOT_PROPERTIES).and_then(Json::as_object).unwrap_or(&empty);

    let x_columns = nested_then_flat(nested, root, "x_column_names", column_list);
    let y_columns = nested_then_flat(nested, root, "y_column_names", column_list);
    let colors = nested_then_flat(nested, root, "color", color_map);

    let plot_type = match root.get("plot_type") {
        None | Some(Json::Null) => PlotKind::Line,
        Some(Json::String(s)) => PlotKind::parse(s),
        Some(other) => PlotKind::Unsupported(other.to_string()),
    };

    let orientation = match text(root, "orientation").as_str() {
        "" | "v" => Orientation::Vertical,
        "h" => Orientation::Horizontal,
        other => {
            debug!("[config] unknown orientation '{other}', using vertical");
            Orientation::Vertical
        }
    };

    let bar_mode = match text(root, "bar_mode").as_str() {
        "" | "group" => BarMode::Group,
        "stack" => BarMode::Stack,
        "overlay" => BarMode::Overlay,
        "relative" => BarMode::Relative,
        other => {
            debug!("[config] unknown bar_mode '{other}', using group");
            BarMode::Group
        }
    };

    let directives = NormalizedDirectives {
        plot_type,
        x_columns,
        y_columns,
        colors,
        title: text(root, "title"),
        x_label: text(root, "x_label"),
        y_label: text(root, "y_label"),
        orientation,
        bar_mode,
    };
    debug!(
        "[config] plot_type={}, x_cols={:?}, y_cols={:?}, colors={:?}",
        directives.plot_type, directives.x_columns, directives.y_columns, directives.colors
    );
    directives
}

/// Two-source field read: nested block first, then top level, else `T::default()`.
/// `read` returns `None` for values that are missing, malformed or empty.
fn nested_then_flat<T: Default>(
    nested: &Map<String, Json>,
    flat: &Map<String, Json>,
    key: &str,
    read: fn(&Json) -> Option<T>,
) -> T {
    if let Some(v) = nested.get(key).and_then(read) {
        return v;
    }
    match flat.get(key).and_then(read) {
        Some(v) => {
            debug!("[config compatibility] using top-level {key}");
            v
        }
        None => T::default(),
    }
}

fn column_list(v: &Json) -> Option<Vec<String>> {
    let cols = match v {
        Json::String(s) if !s.is_empty() => vec![s.clone()],
        Json::Array(items) => items.iter().filter_map(|i| i.as_str().map(str::to_string)).collect(),
        _ => Vec::new(),
    };
    (!cols.is_empty()).then_some(cols)
}

fn color_map(v: &Json) -> Option<ColorMap> {
    let map: ColorMap = v
        .as_object()?
        .iter()
        .filter_map(|(k, c)| c.as_str().map(|c| (k.clone(), c.to_string())))
        .collect();
    (!map.is_empty()).then_some(map)
}

fn text(root: &Map<String, Json>, key: &str) -> String {
    root.get(key).and_then(Json::as_str).unwrap_or_default().to_string()
}
