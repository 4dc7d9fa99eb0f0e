//! Drawing surface abstraction and a ratatui-backed rasterizer.

use lyon_algorithms::aabb::bounding_box;
use lyon_algorithms::hit_test::hit_test_path;
use lyon_path::builder::BorderRadii;
use lyon_path::math::{Box2D, Point, Transform, point};
use lyon_path::{FillRule, Path, Winding};
use ratatui::buffer::Buffer;
use ratatui::style::Color;

use crate::color;

/// Hit-test flattening tolerance, in device units.
const TOLERANCE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    /// `0.0` is fully transparent.
    pub alpha: f32,
}

impl Paint {
    pub const fn solid(color: Color) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    pub fn is_invisible(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Immediate-mode drawing target. Coordinates are local to the current
/// transform; `save`/`restore` bracket the transform, the clip and the layer
/// alpha.
pub trait Canvas {
    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    /// Fades everything drawn until the matching `restore`.
    fn multiply_alpha(&mut self, alpha: f32);

    /// Intersects the current clip with `path`.
    fn clip_path(&mut self, path: &Path);

    fn draw_path(&mut self, path: &Path, paint: &Paint);

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        let mut builder = Path::builder();
        builder.add_circle(point(cx, cy), radius, Winding::Positive);
        self.draw_path(&builder.build(), paint);
    }

    fn draw_round_rect(&mut self, rect: &Box2D, radius: f32, paint: &Paint) {
        self.draw_path(&round_rect_path(rect, radius), paint);
    }

    fn draw_rect(&mut self, rect: &Box2D, paint: &Paint) {
        self.draw_round_rect(rect, 0.0, paint);
    }
}

/// Rounded rectangle with the same radius on every corner.
pub fn round_rect_path(rect: &Box2D, radius: f32) -> Path {
    let mut builder = Path::builder();
    builder.add_rounded_rectangle(rect, &BorderRadii::new(radius.max(0.0)), Winding::Positive);
    builder.build()
}

#[derive(Clone)]
struct CanvasState {
    transform: Transform,
    /// Already in device space.
    clips: Vec<Path>,
    alpha: f32,
}

/// Rasterizes into a ratatui [`Buffer`]: each cell stands for a
/// `cell_width` × `cell_height` block of device units and is painted when its
/// center falls inside the path and every active clip.
///
/// Only the cell background is written; symbols are left alone.
pub struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
    cell_width: f32,
    cell_height: f32,
    state: CanvasState,
    saved: Vec<CanvasState>,
}

impl<'a> BufferCanvas<'a> {
    pub fn new(buf: &'a mut Buffer, cell_width: f32, cell_height: f32) -> Self {
        Self {
            buf,
            cell_width,
            cell_height,
            state: CanvasState {
                transform: Transform::identity(),
                clips: Vec::new(),
                alpha: 1.0,
            },
            saved: Vec::new(),
        }
    }

    fn sample_point(&self, col: u16, row: u16) -> Point {
        point(
            (col as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_height,
        )
    }

    fn covers(&self, path: &Path, sample: &Point) -> bool {
        hit_test_path(sample, path.iter(), FillRule::NonZero, TOLERANCE)
            && self
                .state
                .clips
                .iter()
                .all(|clip| hit_test_path(sample, clip.iter(), FillRule::NonZero, TOLERANCE))
    }
}

impl Canvas for BufferCanvas<'_> {
    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = Transform::translation(dx, dy).then(&self.state.transform);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = Transform::scale(sx, sy).then(&self.state.transform);
    }

    fn multiply_alpha(&mut self, alpha: f32) {
        self.state.alpha *= alpha.clamp(0.0, 1.0);
    }

    fn clip_path(&mut self, path: &Path) {
        let device = path.clone().transformed(&self.state.transform);
        self.state.clips.push(device);
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        let alpha = paint.alpha * self.state.alpha;

        if alpha <= 0.0 {
            return;
        }

        let device = path.clone().transformed(&self.state.transform);
        let bounds = bounding_box(device.iter());

        if bounds.is_empty() || !bounds.min.x.is_finite() || !bounds.max.y.is_finite() {
            return;
        }

        let area = self.buf.area;
        let first_col = (bounds.min.x / self.cell_width).floor().max(0.0) as u16;
        let first_row = (bounds.min.y / self.cell_height).floor().max(0.0) as u16;
        let last_col = ((bounds.max.x / self.cell_width).ceil().max(0.0) as u16).min(area.width);
        let last_row = ((bounds.max.y / self.cell_height).ceil().max(0.0) as u16).min(area.height);

        for row in first_row..last_row {
            for col in first_col..last_col {
                let sample = self.sample_point(col, row);

                if !self.covers(&device, &sample) {
                    continue;
                }

                let cell = &mut self.buf[(area.x + col, area.y + row)];
                let blended = color::composite(cell.bg, paint.color, alpha);
                cell.set_bg(blended);
            }
        }
    }
}
