//! Icon outline shapes.
//!
//! Every shape can append its outline to a path, draw itself for static
//! previews, and build the reveal that morphs an icon-sized start rectangle
//! into an arbitrary end rectangle. Circle and rounded square reveal through a
//! rounded-rect outline; teardrop and squircle rebuild an explicit path on
//! every frame.

use lyon_path::builder::BorderRadii;
use lyon_path::math::{Box2D, point};
use lyon_path::path::Builder;
use lyon_path::{Path, Winding};
use thiserror::Error;

use crate::canvas::{Canvas, Paint};
use crate::geometry::Rect;
use crate::reveal::{
    PathReveal, RevealAnimator, RevealStrategy, RoundedRectReveal, SquircleReveal, TearDropReveal,
};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ShapeError {
    #[error("radius ratio must be finite and in (0, 1], got {0}")]
    InvalidRadiusRatio(f32),
}

/// Corner or curvature ratio of a non-circular shape, always in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusRatio(f32);

impl RadiusRatio {
    pub fn new(ratio: f32) -> Result<Self, ShapeError> {
        if ratio.is_finite() && ratio > 0.0 && ratio <= 1.0 {
            Ok(Self(ratio))
        } else {
            Err(ShapeError::InvalidRadiusRatio(ratio))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IconShape {
    Circle,
    /// Corner radius is `ratio` times the half size.
    RoundedSquare(RadiusRatio),
    /// Three corners share the large radius; bottom-right uses `ratio` of it.
    TearDrop(RadiusRatio),
    /// Four cubic arcs; smaller ratios pull the sides further out.
    Squircle(RadiusRatio),
}

impl Default for IconShape {
    fn default() -> Self {
        IconShape::RoundedSquare(RadiusRatio(0.5))
    }
}

impl IconShape {
    pub fn rounded_square(ratio: f32) -> Result<Self, ShapeError> {
        RadiusRatio::new(ratio).map(IconShape::RoundedSquare)
    }

    pub fn tear_drop(ratio: f32) -> Result<Self, ShapeError> {
        RadiusRatio::new(ratio).map(IconShape::TearDrop)
    }

    pub fn squircle(ratio: f32) -> Result<Self, ShapeError> {
        RadiusRatio::new(ratio).map(IconShape::Squircle)
    }

    /// Only a circle can be recognised from an arbitrary icon's alpha mask.
    pub fn enable_shape_detection(&self) -> bool {
        matches!(self, IconShape::Circle)
    }

    /// Appends the outline inscribed in the `2 * radius` square whose
    /// top-left corner is `(offset_x, offset_y)`.
    pub fn add_to_path(&self, builder: &mut Builder, offset_x: f32, offset_y: f32, radius: f32) {
        let cx = radius + offset_x;
        let cy = radius + offset_y;
        let square = Box2D::new(point(cx - radius, cy - radius), point(cx + radius, cy + radius));

        match *self {
            IconShape::Circle => {
                builder.add_circle(point(cx, cy), radius, Winding::Positive);
            }
            IconShape::RoundedSquare(ratio) => {
                let corner = BorderRadii::new(radius * ratio.get());
                builder.add_rounded_rectangle(&square, &corner, Winding::Positive);
            }
            IconShape::TearDrop(ratio) => {
                let radii = tear_drop_radii(radius, radius * ratio.get());
                builder.add_rounded_rectangle(&square, &radii, Winding::Positive);
            }
            IconShape::Squircle(ratio) => {
                let control = radius - radius * ratio.get();
                add_squircle(builder, cx, cy, radius, control, 0.0, 0.0);
            }
        }
    }

    /// Fresh path holding only this shape's outline.
    pub fn outline_path(&self, offset_x: f32, offset_y: f32, radius: f32) -> Path {
        let mut builder = Path::builder();
        self.add_to_path(&mut builder, offset_x, offset_y, radius);
        builder.build()
    }

    pub fn draw_shape(
        &self,
        canvas: &mut dyn Canvas,
        offset_x: f32,
        offset_y: f32,
        radius: f32,
        paint: &Paint,
    ) {
        let cx = radius + offset_x;
        let cy = radius + offset_y;

        match *self {
            IconShape::Circle => canvas.draw_circle(cx, cy, radius, paint),
            IconShape::RoundedSquare(ratio) => {
                let square =
                    Box2D::new(point(cx - radius, cy - radius), point(cx + radius, cy + radius));
                canvas.draw_round_rect(&square, radius * ratio.get(), paint);
            }
            IconShape::TearDrop(_) | IconShape::Squircle(_) => {
                let path = self.outline_path(offset_x, offset_y, radius);
                canvas.draw_path(&path, paint);
            }
        }
    }

    /// Reveal from `start_rect` (icon outline) to `end_rect` with
    /// `end_radius` corners. A reversed reveal runs from the end back to the
    /// start as its fraction advances.
    pub fn create_reveal_animator(
        &self,
        start_rect: Rect,
        end_rect: Rect,
        end_radius: f32,
        is_reversed: bool,
    ) -> RevealAnimator {
        let half_width = start_rect.width() as f32 / 2.0;

        let strategy = match *self {
            IconShape::Circle => RevealStrategy::Outline(RoundedRectReveal::new(
                half_width, end_radius, start_rect, end_rect,
            )),
            IconShape::RoundedSquare(ratio) => RevealStrategy::Outline(RoundedRectReveal::new(
                half_width * ratio.get(),
                end_radius,
                start_rect,
                end_rect,
            )),
            IconShape::TearDrop(ratio) => RevealStrategy::Path(PathReveal::TearDrop(
                TearDropReveal::new(start_rect, end_rect, end_radius, ratio.get()),
            )),
            IconShape::Squircle(ratio) => RevealStrategy::Path(PathReveal::Squircle(
                SquircleReveal::new(start_rect, end_rect, end_radius, ratio.get()),
            )),
        };

        RevealAnimator::new(strategy, is_reversed)
    }
}

/// Per-corner radii, top-left clockwise: `r1, r1, r2, r1`.
pub(crate) fn tear_drop_radii(r1: f32, r2: f32) -> BorderRadii {
    BorderRadii {
        top_left: r1,
        top_right: r1,
        bottom_right: r2,
        bottom_left: r1,
    }
}

/// Squircle outline around `(cx, cy)`, stretched by `h_shift`/`v_shift`
/// straight runs between the four corner arcs.
pub(crate) fn add_squircle(
    builder: &mut Builder,
    cx: f32,
    cy: f32,
    r: f32,
    control: f32,
    h_shift: f32,
    v_shift: f32,
) {
    builder.begin(point(cx, cy - v_shift - r));
    builder.line_to(point(cx - h_shift, cy - v_shift - r));

    left_curve(builder, cx - h_shift, cy - v_shift, r, control);
    builder.line_to(point(cx - h_shift - r, cy + v_shift));

    right_curve(builder, cx - h_shift, cy + v_shift, r, control);
    builder.line_to(point(cx + h_shift, cy + v_shift + r));

    left_curve(builder, cx + h_shift, cy + v_shift, -r, -control);
    builder.line_to(point(cx + h_shift + r, cy - v_shift));

    right_curve(builder, cx + h_shift, cy - v_shift, -r, -control);
    builder.end(true);
}

fn left_curve(builder: &mut Builder, cx: f32, cy: f32, r: f32, control: f32) {
    builder.cubic_bezier_to(
        point(cx - control, cy - r),
        point(cx - r, cy - control),
        point(cx - r, cy),
    );
}

fn right_curve(builder: &mut Builder, cx: f32, cy: f32, r: f32, control: f32) {
    builder.cubic_bezier_to(
        point(cx - r, cy + control),
        point(cx - control, cy + r),
        point(cx, cy + r),
    );
}
