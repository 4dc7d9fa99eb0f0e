//! Interpolator curves for [`crate::geometry::map_to_range`].
//!
//! Every curve maps `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.

use std::f32::consts::PI;

/// A plain function curve. Closures built by [`cubic_bezier`] are accepted
/// anywhere an `impl Fn(f32) -> f32` is.
pub type Interpolator = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t
}

/// Quadratic acceleration from rest.
pub fn accel(t: f32) -> f32 {
    t * t
}

/// Quadratic deceleration to rest.
pub fn deaccel(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cosine ease, slow at both ends.
pub fn accel_deaccel(t: f32) -> f32 {
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Material standard curve, `cubic-bezier(0.4, 0, 0.2, 1)`.
pub fn fast_out_slow_in(t: f32) -> f32 {
    cubic_bezier(0.4, 0.0, 0.2, 1.0)(t)
}

/// CSS `cubic-bezier(x1, y1, x2, y2)` semantics.
pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> impl Fn(f32) -> f32 {
    move |t| {
        let bezier_t = solve_bezier_t(t, x1, x2);
        sample_bezier(bezier_t, y1, y2)
    }
}

/// Newton iterations on the x polynomial; falls back to the last estimate
/// when the slope flattens out.
fn solve_bezier_t(x: f32, x1: f32, x2: f32) -> f32 {
    let mut t = x;

    for _ in 0..8 {
        let residual = sample_bezier(t, x1, x2) - x;

        if residual.abs() < 1e-6 {
            return t;
        }

        let slope = bezier_slope(t, x1, x2);

        if slope.abs() < 1e-6 {
            break;
        }

        t -= residual / slope;
    }

    t.clamp(0.0, 1.0)
}

/// One axis of a cubic bezier anchored at 0 and 1.
fn sample_bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;

    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;

    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}
