// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (figure size, resolution, paddings).

/// Figure width in inches.
pub const FIGURE_WIDTH_IN: f32 = 10.0;
/// Figure height in inches.
pub const FIGURE_HEIGHT_IN: f32 = 6.0;
/// Default raster resolution for static output.
pub const DPI: f32 = 300.0;
/// Drawing happens in logical units of 1/100 inch; the canvas is scaled by `dpi / UNITS_PER_INCH`.
pub const UNITS_PER_INCH: f32 = 100.0;

/// Fixed fraction of a unit category width given to each bar in a group.
pub const BAR_WIDTH: f64 = 0.35;

/// Figure margins, in logical units.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(84, 28, 52, 68)
    }
}
