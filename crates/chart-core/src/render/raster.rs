// File: crates/chart-core/src/render/raster.rs
// Summary: Static PNG backend using Skia CPU raster surfaces.
// Notes:
// - Every call builds its own DrawingContext (surface + text shaper) and drops it on return,
//   including early `?` returns, so concurrent renders never share drawing state.
// - Drawing happens in 1/100 inch units; the canvas is scaled to the requested DPI.
// - Bars are always grouped side by side and vertical here; orientation and bar_mode
//   are honored by the interactive backends only.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use skia_safe as skia;

use super::{Artifact, ChartBackend, RenderTarget};
use crate::chart::RenderOptions;
use crate::config::{NormalizedDirectives, PlotKind};
use crate::dataset::Value;
use crate::geometry::PlotArea;
use crate::grid::{format_tick, linspace, thin_indices};
use crate::series::Series;
use crate::text::{Anchor, TextShaper};
use crate::theme::{parse_color, Theme};
use crate::types::BAR_WIDTH;
use crate::view::{Extents, XScale};

pub struct StaticBackend;

impl ChartBackend for StaticBackend {
    fn target(&self) -> RenderTarget { RenderTarget::Static }

    fn render(&self, series: &[Series], directives: &NormalizedDirectives, opts: &RenderOptions) -> Result<Artifact> {
        Ok(Artifact::Raster(render_png(series, directives, opts)?))
    }
}

/// Render the chart to PNG bytes. Deterministic for equal inputs.
pub fn render_png(series: &[Series], directives: &NormalizedDirectives, opts: &RenderOptions) -> Result<Vec<u8>> {
    let frame = Frame::build(series, directives);
    let colors = series
        .iter()
        .enumerate()
        .map(|(i, s)| series_color(s, i, &opts.theme))
        .collect::<Vec<_>>();

    let mut ctx = DrawingContext::new(opts)?;
    ctx.draw(|canvas, text| {
        draw_figure(canvas, text, &frame, series, &colors, directives, opts);
    });
    ctx.encode_png()
}

// ---- drawing context ---------------------------------------------------------

/// Scoped per-call drawing state. The surface is released when the context is dropped.
struct DrawingContext {
    surface: skia::Surface,
    text: Option<TextShaper>,
}

impl DrawingContext {
    fn new(opts: &RenderOptions) -> Result<Self> {
        let (w, h) = opts.pixel_size();
        let mut surface = skia::surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| anyhow!("failed to create {w}x{h} raster surface"))?;
        let canvas = surface.canvas();
        canvas.clear(opts.theme.background);
        canvas.scale((opts.scale(), opts.scale()));
        debug!("static render: {w}x{h}px at {} dpi", opts.dpi);
        Ok(Self { surface, text: opts.draw_labels.then(TextShaper::new) })
    }

    fn draw<F: FnOnce(&skia::Canvas, Option<&TextShaper>)>(&mut self, f: F) {
        let canvas = self.surface.canvas();
        f(canvas, self.text.as_ref());
    }

    fn encode_png(mut self) -> Result<Vec<u8>> {
        let image = self.surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }
}

// ---- frame: data space -------------------------------------------------------

enum Marks {
    Line(Vec<(f64, f64)>),
    Points(Vec<(f64, f64)>),
    /// (bar center, height)
    Bars(Vec<(f64, f64)>),
}

struct Frame {
    extents: Extents,
    x_ticks: Vec<(f64, String)>,
    marks: Vec<Marks>,
}

impl Frame {
    fn build(series: &[Series], directives: &NormalizedDirectives) -> Self {
        match directives.plot_type {
            PlotKind::Bar => Self::bars(series),
            _ => Self::xy(series, &directives.plot_type),
        }
    }

    /// Bar groups: series k sits at `i + k * BAR_WIDTH` for category i.
    fn bars(series: &[Series]) -> Self {
        let labels: Vec<String> = series
            .first()
            .map(|s| s.x().iter().map(Value::to_string).collect())
            .unwrap_or_default();

        let marks: Vec<Marks> = series
            .iter()
            .enumerate()
            .map(|(k, s)| {
                let offset = k as f64 * BAR_WIDTH;
                Marks::Bars(
                    s.y().iter()
                        .enumerate()
                        .map(|(i, y)| (i as f64 + offset, y.as_f64().unwrap_or(f64::NAN)))
                        .collect(),
                )
            })
            .collect();

        let half = BAR_WIDTH / 2.0;
        let edges = marks.iter().flat_map(|m| match m {
            Marks::Bars(b) => b.iter().flat_map(|&(x, h)| [(x - half, h), (x + half, h)]).collect::<Vec<_>>(),
            _ => Vec::new(),
        });
        let extents = if series.is_empty() {
            Extents::from_points(std::iter::empty())
        } else {
            Extents::from_points(edges).include_y(0.0).pad_x(0.25)
        };

        let x_ticks = thin_indices(labels.len(), 12)
            .into_iter()
            .map(|i| (i as f64 + half, labels[i].clone()))
            .collect();
        Self { extents, x_ticks, marks }
    }

    fn xy(series: &[Series], kind: &PlotKind) -> Self {
        let scale = XScale::detect(series);
        let marks: Vec<Marks> = series
            .iter()
            .map(|s| {
                let pts = s
                    .x()
                    .iter()
                    .zip(s.y())
                    .enumerate()
                    .map(|(i, (x, y))| (scale.position(i, x), y.as_f64().unwrap_or(f64::NAN)))
                    .collect();
                match kind {
                    PlotKind::Scatter => Marks::Points(pts),
                    _ => Marks::Line(pts),
                }
            })
            .collect();

        let all = marks.iter().flat_map(|m| match m {
            Marks::Line(p) | Marks::Points(p) | Marks::Bars(p) => p.iter().copied(),
        });
        let mut extents = Extents::from_points(all);
        if matches!(scale, XScale::Category(_)) {
            extents = extents.pad_x(0.5);
        }
        let x_ticks = scale
            .ticks(extents.x_min, extents.x_max)
            .into_iter()
            .filter(|(x, _)| *x >= extents.x_min - 1e-9 && *x <= extents.x_max + 1e-9)
            .collect();
        Self { extents, x_ticks, marks }
    }
}

fn series_color(s: &Series, index: usize, theme: &Theme) -> skia::Color {
    match s.color() {
        None => theme.series_color(index),
        Some(raw) => parse_color(raw).unwrap_or_else(|| {
            warn!("unrecognized color '{raw}' for series '{}'; using palette", s.label());
            theme.series_color(index)
        }),
    }
}

// ---- helpers ----------------------------------------------------------------

const TITLE_SIZE: f32 = 16.0;
const LABEL_SIZE: f32 = 13.0;
const TICK_SIZE: f32 = 10.0;
const LEGEND_SIZE: f32 = 11.0;

fn draw_figure(
    canvas: &skia::Canvas,
    text: Option<&TextShaper>,
    frame: &Frame,
    series: &[Series],
    colors: &[skia::Color],
    directives: &NormalizedDirectives,
    opts: &RenderOptions,
) {
    let (w, h) = opts.logical_size();
    let area = PlotArea::within(w, h, &opts.insets);
    let ext = &frame.extents;
    let y_ticks = linspace(ext.y_min, ext.y_max, 6);
    let theme = &opts.theme;

    draw_grid(canvas, &area, ext, &frame.x_ticks, &y_ticks, theme);

    canvas.save();
    canvas.clip_rect(skia::Rect::from_ltrb(area.left, area.top, area.right, area.bottom), skia::ClipOp::Intersect, true);
    for (marks, &color) in frame.marks.iter().zip(colors) {
        match marks {
            Marks::Line(pts) => draw_line_series(canvas, &area, ext, pts, color),
            Marks::Points(pts) => draw_point_series(canvas, &area, ext, pts, color),
            Marks::Bars(bars) => draw_bar_series(canvas, &area, ext, bars, color),
        }
    }
    canvas.restore();

    draw_axes(canvas, &area, theme);

    if let Some(text) = text {
        for (x, label) in &frame.x_ticks {
            text.draw(canvas, label, area.sx(ext, *x), area.bottom + 18.0, TICK_SIZE, theme.tick, Anchor::Center, false);
        }
        for &y in &y_ticks {
            text.draw(canvas, &format_tick(y), area.left - 7.0, area.sy(ext, y) + 4.0, TICK_SIZE, theme.tick, Anchor::Right, false);
        }
        let mid_x = (area.left + area.right) * 0.5;
        let mid_y = (area.top + area.bottom) * 0.5;
        text.draw(canvas, &directives.title, mid_x, area.top - 18.0, TITLE_SIZE, theme.axis_label, Anchor::Center, true);
        text.draw(canvas, &directives.x_label, mid_x, h - 14.0, LABEL_SIZE, theme.axis_label, Anchor::Center, false);

        canvas.save();
        let y_label_pos = skia::Point::new(22.0, mid_y);
        canvas.rotate(-90.0, Some(y_label_pos));
        text.draw(canvas, &directives.y_label, y_label_pos.x, y_label_pos.y, LABEL_SIZE, theme.axis_label, Anchor::Center, false);
        canvas.restore();
    }

    if !series.is_empty() {
        draw_legend(canvas, text, &area, series, colors, &directives.plot_type, theme);
    }
}

fn draw_grid(
    canvas: &skia::Canvas,
    area: &PlotArea,
    ext: &Extents,
    x_ticks: &[(f64, String)],
    y_ticks: &[f64],
    theme: &Theme,
) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid);
    paint.set_anti_alias(true);
    paint.set_stroke_width(0.8);

    // verticals
    for (x, _) in x_ticks {
        let px = area.sx(ext, *x);
        canvas.draw_line((px, area.top), (px, area.bottom), &paint);
    }
    // horizontals
    for &y in y_ticks {
        let py = area.sy(ext, y);
        canvas.draw_line((area.left, py), (area.right, py), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, area: &PlotArea, theme: &Theme) {
    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(theme.axis_line);
    axis_paint.set_anti_alias(true);
    axis_paint.set_stroke_width(1.2);

    // X and Y axis lines
    canvas.draw_line((area.left, area.bottom), (area.right, area.bottom), &axis_paint);
    canvas.draw_line((area.left, area.top), (area.left, area.bottom), &axis_paint);
}

fn draw_line_series(canvas: &skia::Canvas, area: &PlotArea, ext: &Extents, pts: &[(f64, f64)], color: skia::Color) {
    let mut path = skia::Path::new();
    let mut pen_down = false;
    // Missing values break the line.
    for &(x, y) in pts {
        if !x.is_finite() || !y.is_finite() {
            pen_down = false;
            continue;
        }
        let p = (area.sx(ext, x), area.sy(ext, y));
        if pen_down {
            path.line_to(p);
        } else {
            path.move_to(p);
            pen_down = true;
        }
    }

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(1.5);
    stroke.set_color(color);

    canvas.draw_path(&path, &stroke);
}

fn draw_point_series(canvas: &skia::Canvas, area: &PlotArea, ext: &Extents, pts: &[(f64, f64)], color: skia::Color) {
    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_style(skia::paint::Style::Fill);
    fill.set_color(color);

    for &(x, y) in pts.iter().filter(|(x, y)| x.is_finite() && y.is_finite()) {
        canvas.draw_circle((area.sx(ext, x), area.sy(ext, y)), 3.0, &fill);
    }
}

fn draw_bar_series(canvas: &skia::Canvas, area: &PlotArea, ext: &Extents, bars: &[(f64, f64)], color: skia::Color) {
    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);
    body.set_color(color);

    let half = BAR_WIDTH / 2.0;
    let base = area.sy(ext, 0.0);
    for &(x, height) in bars.iter().filter(|(_, h)| h.is_finite()) {
        let top = area.sy(ext, height);
        let rect = skia::Rect::from_ltrb(
            area.sx(ext, x - half),
            top.min(base),
            area.sx(ext, x + half),
            top.max(base).max(top.min(base) + 0.5),
        );
        canvas.draw_rect(rect, &body);
    }
}

fn draw_legend(
    canvas: &skia::Canvas,
    text: Option<&TextShaper>,
    area: &PlotArea,
    series: &[Series],
    colors: &[skia::Color],
    kind: &PlotKind,
    theme: &Theme,
) {
    const ROW: f32 = 17.0;
    const SWATCH: f32 = 22.0;
    const PAD: f32 = 7.0;

    // Long legends are capped to what fits in the plot height.
    let max_rows = (((area.height() - 2.0 * PAD) / ROW).floor() as usize).max(1);
    let rows = thin_indices(series.len(), max_rows);

    let label_w = text
        .map(|t| rows.iter().map(|&i| t.measure_width(series[i].label(), LEGEND_SIZE)).fold(0.0f32, f32::max))
        .unwrap_or(0.0);
    let box_w = PAD * 2.0 + SWATCH + if label_w > 0.0 { 6.0 + label_w } else { 0.0 };
    let box_h = PAD * 2.0 + ROW * rows.len() as f32;
    let right = area.right - 8.0;
    let top = area.top + 8.0;
    let rect = skia::Rect::from_ltrb(right - box_w, top, right, top + box_h);

    let mut bg = skia::Paint::default();
    bg.set_style(skia::paint::Style::Fill);
    bg.set_color(theme.legend_background);
    canvas.draw_rect(rect, &bg);

    let mut border = skia::Paint::default();
    border.set_anti_alias(true);
    border.set_style(skia::paint::Style::Stroke);
    border.set_stroke_width(0.8);
    border.set_color(theme.legend_border);
    canvas.draw_rect(rect, &border);

    for (row, &i) in rows.iter().enumerate() {
        let cy = top + PAD + ROW * (row as f32 + 0.5);
        let x0 = rect.left + PAD;
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(colors[i]);
        match kind {
            PlotKind::Bar => {
                paint.set_style(skia::paint::Style::Fill);
                canvas.draw_rect(skia::Rect::from_ltrb(x0 + 4.0, cy - 5.0, x0 + SWATCH - 4.0, cy + 5.0), &paint);
            }
            PlotKind::Scatter => {
                paint.set_style(skia::paint::Style::Fill);
                canvas.draw_circle((x0 + SWATCH * 0.5, cy), 3.0, &paint);
            }
            _ => {
                paint.set_style(skia::paint::Style::Stroke);
                paint.set_stroke_width(1.5);
                canvas.draw_line((x0, cy), (x0 + SWATCH, cy), &paint);
            }
        }
        if let Some(t) = text {
            t.draw(canvas, series[i].label(), x0 + SWATCH + 6.0, cy + 4.0, LEGEND_SIZE, theme.axis_label, Anchor::Left, false);
        }
    }
}
