//! Range remapping, clamping and integer rectangle helpers.

use lyon_path::math::{Box2D, point};
use tracing::error;

/// Integer rectangle in view-local units. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Rounds toward the top-left on odd spans.
    pub const fn center_x(&self) -> i32 {
        (self.left + self.right) >> 1
    }

    pub const fn center_y(&self) -> i32 {
        (self.top + self.bottom) >> 1
    }

    pub fn exact_center_x(&self) -> f32 {
        (self.left + self.right) as f32 * 0.5
    }

    pub fn exact_center_y(&self) -> f32 {
        (self.top + self.bottom) as f32 * 0.5
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// Moves the top-left corner to `(left, top)`, keeping the size.
    pub fn offset_to(&mut self, left: i32, top: i32) {
        self.right += left - self.left;
        self.bottom += top - self.top;
        self.left = left;
        self.top = top;
    }

    /// Shrinks every edge inward. Negative values grow the rectangle.
    pub fn inset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.top += dy;
        self.right -= dx;
        self.bottom -= dy;
    }

    pub fn to_box2d(&self) -> Box2D {
        Box2D::new(
            point(self.left as f32, self.top as f32),
            point(self.right as f32, self.bottom as f32),
        )
    }
}

/// Maps `t` from `[from_min, from_max]` to `[to_min, to_max]` through
/// `interpolator`.
///
/// A zero-length range on either side is logged and yields `to_min`.
pub fn map_to_range(
    t: f32,
    from_min: f32,
    from_max: f32,
    to_min: f32,
    to_max: f32,
    interpolator: impl Fn(f32) -> f32,
) -> f32 {
    if from_min == from_max || to_min == to_max {
        error!(from_min, from_max, to_min, to_max, "map_to_range: range has 0 length");
        return to_min;
    }

    let progress = get_progress(t, from_min, from_max);
    map_range(interpolator(progress), to_min, to_max)
}

/// Distance of `current` from `min` as a fraction of the span.
pub fn get_progress(current: f32, min: f32, max: f32) -> f32 {
    (current - min).abs() / (max - min).abs()
}

pub fn map_range(value: f32, min: f32, max: f32) -> f32 {
    min + value * (max - min)
}

/// Clamps `value` into `[lower_bound, upper_bound]`.
///
/// Works for every ordered scalar the controller uses (`i32`, `i64`, `f32`).
pub fn bound_to_range<T: PartialOrd + Copy>(value: T, lower_bound: T, upper_bound: T) -> T {
    let capped = if value > upper_bound { upper_bound } else { value };

    if capped < lower_bound {
        lower_bound
    } else {
        capped
    }
}

/// Scales `rect` in place about its (integer) center.
pub fn scale_rect_about_center(rect: &mut Rect, scale: f32) {
    if scale != 1.0 {
        let cx = rect.center_x();
        let cy = rect.center_y();
        rect.offset(-cx, -cy);
        scale_rect(rect, scale);
        rect.offset(cx, cy);
    }
}

/// Scales every edge about the origin, rounding half up.
pub fn scale_rect(rect: &mut Rect, scale: f32) {
    if scale != 1.0 {
        let scale_edge = |v: i32| (v as f32 * scale + 0.5) as i32;
        rect.left = scale_edge(rect.left);
        rect.top = scale_edge(rect.top);
        rect.right = scale_edge(rect.right);
        rect.bottom = scale_edge(rect.bottom);
    }
}

/// Linear blend, `a` at 0 and `b` at 1.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing;

    #[test]
    fn map_to_range_hits_endpoints() {
        assert!((map_to_range(2.0, 2.0, 6.0, 10.0, 20.0, easing::linear) - 10.0).abs() < 1e-6);
        assert!((map_to_range(6.0, 2.0, 6.0, 10.0, 20.0, easing::linear) - 20.0).abs() < 1e-6);
        assert!((map_to_range(4.0, 2.0, 6.0, 10.0, 20.0, easing::linear) - 15.0).abs() < 1e-6);
    }

    #[test]
    fn map_to_range_stays_inside_target_range() {
        let ranges = [(0.0, 1.0, 0.0, 10.0), (0.9, 1.0, 0.0, 1.0), (1.0, 5.0, 3.0, -3.0)];

        for (from_min, from_max, to_min, to_max) in ranges {
            let lo = f32::min(to_min, to_max);
            let hi = f32::max(to_min, to_max);

            for i in 0..=20 {
                let t = from_min + (from_max - from_min) * i as f32 / 20.0;
                let mapped = map_to_range(t, from_min, from_max, to_min, to_max, easing::deaccel);
                assert!(mapped >= lo - 1e-4 && mapped <= hi + 1e-4, "{mapped} outside [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn map_to_range_degenerate_returns_lower_target() {
        assert_eq!(map_to_range(0.5, 1.0, 1.0, 3.0, 7.0, easing::linear), 3.0);
        assert_eq!(map_to_range(0.5, 0.0, 1.0, 4.0, 4.0, easing::linear), 4.0);
    }

    #[test]
    fn bound_to_range_clamps() {
        assert_eq!(bound_to_range(-3, 0, 10), 0);
        assert_eq!(bound_to_range(13, 0, 10), 10);
        assert_eq!(bound_to_range(7, 0, 10), 7);
        assert_eq!(bound_to_range(5_000_000_000i64, 0, 1_000), 1_000);
        assert_eq!(bound_to_range(0.25f32, 0.0, 1.0), 0.25);
        assert_eq!(bound_to_range(1.5f32, 0.0, 1.0), 1.0);
    }

    #[test]
    fn bound_to_range_is_idempotent() {
        for v in [-2.0f32, -0.1, 0.0, 0.4, 1.0, 9.0] {
            let once = bound_to_range(v, 0.0, 1.0);
            assert_eq!(bound_to_range(once, 0.0, 1.0), once);
        }
    }

    #[test]
    fn scale_by_one_is_identity() {
        let original = Rect::new(3, 7, 41, 90);
        let mut rect = original;
        scale_rect_about_center(&mut rect, 1.0);
        assert_eq!(rect, original);
    }

    #[test]
    fn scale_keeps_center() {
        for scale in [0.5, 0.92, 1.3, 2.0, 7.25] {
            let original = Rect::new(0, 0, 150, 150);
            let mut rect = original;
            scale_rect_about_center(&mut rect, scale);

            assert!((rect.exact_center_x() - original.exact_center_x()).abs() <= 0.5);
            assert!((rect.exact_center_y() - original.exact_center_y()).abs() <= 0.5);
        }
    }

    #[test]
    fn normalization_shrinks_icon_rect() {
        let mut rect = Rect::new(0, 0, 100, 100);
        scale_rect_about_center(&mut rect, 0.92);
        assert_eq!(rect, Rect::new(5, 5, 96, 96));
    }

    #[test]
    fn offset_to_keeps_size() {
        let mut rect = Rect::new(10, 20, 30, 60);
        rect.offset_to(0, 5);
        assert_eq!(rect, Rect::new(0, 5, 20, 45));
    }
}
