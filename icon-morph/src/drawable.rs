//! Icon layers and the content model handed to the controller.

use ratatui::style::Color;

use crate::canvas::{Canvas, Paint};
use crate::geometry::Rect;
use crate::shape::IconShape;

/// A positioned visual layer.
pub trait Drawable {
    fn bounds(&self) -> Rect;

    fn set_bounds(&mut self, bounds: Rect);

    /// `0` is invisible, `255` opaque.
    fn alpha(&self) -> u8;

    fn set_alpha(&mut self, alpha: u8);

    fn draw(&self, canvas: &mut dyn Canvas);
}

fn paint_for(color: Color, alpha: u8) -> Paint {
    Paint::solid(color).with_alpha(alpha as f32 / 255.0)
}

/// Fills its bounds with one color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorDrawable {
    color: Color,
    bounds: Rect,
    alpha: u8,
}

impl ColorDrawable {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            bounds: Rect::default(),
            alpha: u8::MAX,
        }
    }

    /// Stand-in for a missing layer.
    pub fn transparent() -> Self {
        Self {
            alpha: 0,
            ..Self::new(Color::Reset)
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Drawable for ColorDrawable {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn alpha(&self) -> u8 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.alpha == 0 || self.bounds.is_empty() {
            return;
        }

        canvas.draw_rect(&self.bounds.to_box2d(), &paint_for(self.color, self.alpha));
    }
}

/// An icon shape centered in its bounds, `inset` units in from the shorter
/// side.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDrawable {
    shape: IconShape,
    color: Color,
    inset: f32,
    bounds: Rect,
    alpha: u8,
}

impl ShapeDrawable {
    pub fn new(shape: IconShape, color: Color) -> Self {
        Self {
            shape,
            color,
            inset: 0.0,
            bounds: Rect::default(),
            alpha: u8::MAX,
        }
    }

    pub fn with_inset(self, inset: f32) -> Self {
        Self { inset, ..self }
    }
}

impl Drawable for ShapeDrawable {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn alpha(&self) -> u8 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let width = self.bounds.width() as f32;
        let height = self.bounds.height() as f32;
        let radius = width.min(height) / 2.0 - self.inset;

        if self.alpha == 0 || radius <= 0.0 {
            return;
        }

        let offset_x = self.bounds.left as f32 + width / 2.0 - radius;
        let offset_y = self.bounds.top as f32 + height / 2.0 - radius;
        self.shape
            .draw_shape(canvas, offset_x, offset_y, radius, &paint_for(self.color, self.alpha));
    }
}

/// What a controller is asked to animate.
pub enum IconContent {
    /// A single image; no reveal, no spring.
    Flat(Box<dyn Drawable>),
    /// Independent background and foreground layers that can be moved and
    /// clipped separately.
    Layered {
        background: Option<Box<dyn Drawable>>,
        foreground: Option<Box<dyn Drawable>>,
    },
}

impl IconContent {
    pub fn is_shape_morphable(&self) -> bool {
        matches!(self, IconContent::Layered { .. })
    }
}

#[cfg(test)]
mod tests {
    use lyon_path::Path;
    use lyon_path::math::Box2D;

    use super::*;

    #[derive(Default)]
    struct CountingCanvas {
        paths: usize,
        rects: Vec<Box2D>,
        alphas: Vec<f32>,
    }

    impl Canvas for CountingCanvas {
        fn save(&mut self) {}

        fn restore(&mut self) {}

        fn translate(&mut self, _: f32, _: f32) {}

        fn scale(&mut self, _: f32, _: f32) {}

        fn multiply_alpha(&mut self, _: f32) {}

        fn clip_path(&mut self, _: &Path) {}

        fn draw_path(&mut self, _: &Path, paint: &Paint) {
            self.paths += 1;
            self.alphas.push(paint.alpha);
        }

        fn draw_round_rect(&mut self, rect: &Box2D, _: f32, paint: &Paint) {
            self.rects.push(*rect);
            self.alphas.push(paint.alpha);
        }
    }

    #[test]
    fn transparent_layer_draws_nothing() {
        let mut layer = ColorDrawable::transparent();
        layer.set_bounds(Rect::new(0, 0, 10, 10));
        let mut canvas = CountingCanvas::default();
        layer.draw(&mut canvas);

        assert!(canvas.rects.is_empty());
        assert_eq!(canvas.paths, 0);
    }

    #[test]
    fn color_layer_fills_bounds_at_its_alpha() {
        let mut layer = ColorDrawable::new(Color::Blue);
        layer.set_bounds(Rect::new(2, 3, 12, 13));
        layer.set_alpha(51);
        let mut canvas = CountingCanvas::default();
        layer.draw(&mut canvas);

        assert_eq!(canvas.rects, vec![Rect::new(2, 3, 12, 13).to_box2d()]);
        assert!((canvas.alphas[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn shape_layer_uses_shape_primitive() {
        let mut rounded = ShapeDrawable::new(IconShape::default(), Color::White).with_inset(2.0);
        rounded.set_bounds(Rect::new(0, 0, 20, 30));
        let mut canvas = CountingCanvas::default();
        rounded.draw(&mut canvas);

        assert_eq!(canvas.rects.len(), 1);
        let rect = canvas.rects[0];
        assert_eq!(rect.width(), 16.0);
        assert_eq!(rect.center().y, 15.0);

        let mut squircle = ShapeDrawable::new(IconShape::squircle(0.3).unwrap(), Color::White);
        squircle.set_bounds(Rect::new(0, 0, 20, 20));
        squircle.draw(&mut canvas);
        assert_eq!(canvas.paths, 1);
    }

    #[test]
    fn only_layered_content_morphs() {
        let flat = IconContent::Flat(Box::new(ColorDrawable::new(Color::Red)));
        let layered = IconContent::Layered {
            background: None,
            foreground: None,
        };

        assert!(!flat.is_shape_morphable());
        assert!(layered.is_shape_morphable());
    }
}
