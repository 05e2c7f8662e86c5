// File: crates/chart-core/src/geometry.rs
// Summary: Plot area rectangle and data-to-pixel mapping.

use crate::types::Insets;
use crate::view::Extents;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotArea {
    /// Inner plotting rectangle of a `width` x `height` figure (logical units).
    pub fn within(width: f32, height: f32, insets: &Insets) -> Self {
        let left = insets.left as f32;
        let top = insets.top as f32;
        let right = (width - insets.right as f32).max(left + 1.0);
        let bottom = (height - insets.bottom as f32).max(top + 1.0);
        Self { left, top, right, bottom }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }

    #[inline]
    pub fn sx(&self, ext: &Extents, x: f64) -> f32 {
        let span = (ext.x_max - ext.x_min).max(1e-9);
        self.left + ((x - ext.x_min) / span) as f32 * self.width()
    }

    #[inline]
    pub fn sy(&self, ext: &Extents, y: f64) -> f32 {
        let span = (ext.y_max - ext.y_min).max(1e-9);
        self.bottom - ((y - ext.y_min) / span) as f32 * self.height()
    }
}
