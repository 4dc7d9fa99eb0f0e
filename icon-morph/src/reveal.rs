//! Reveal animations: morphing a clip outline between an icon shape and a
//! target rectangle.
//!
//! A [`RevealAnimator`] has no clock of its own. It is started (which arms it
//! paused at fraction 0) and then driven by [`RevealAnimator::set_current_fraction`]
//! once per frame, so the shape morph stays locked to the caller's progress.

use lyon_path::Path;
use lyon_path::math::{Box2D, point};
use lyon_path::{Winding, builder::BorderRadii};

use crate::canvas::round_rect_path;
use crate::easing;
use crate::geometry::{Rect, lerp};
use crate::shape::{add_squircle, tear_drop_radii};

/// Approximates a quarter circle with one cubic bezier.
/// <http://spencermortensen.com/articles/bezier-circle/>
pub const CIRCLE_BEZIER_CONTROL: f32 = 0.551915024494;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRect {
    pub rect: Box2D,
    pub radius: f32,
}

impl RoundRect {
    pub fn to_path(&self) -> Path {
        round_rect_path(&self.rect, self.radius)
    }
}

/// Where a view's outline comes from when it clips to its outline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutlineProvider {
    #[default]
    None,
    /// The owning view's clip outline rectangle and corner radius.
    ClipOutline,
    /// A fixed round rect, installed by an outline reveal.
    RoundRect(RoundRect),
}

/// The surface a reveal writes into.
pub trait ClipPathView {
    fn set_clip_path(&mut self, path: Option<Path>);

    fn outline_provider(&self) -> OutlineProvider;

    fn set_outline_provider(&mut self, provider: OutlineProvider);

    fn clip_to_outline(&self) -> bool;

    fn set_clip_to_outline(&mut self, clip: bool);

    fn elevation(&self) -> f32;

    fn set_translation_z(&mut self, translation_z: f32);
}

/// Rounded rect whose bounds and corner radius move linearly from start to
/// end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRectReveal {
    start_radius: f32,
    end_radius: f32,
    start_rect: Rect,
    end_rect: Rect,
}

impl RoundedRectReveal {
    pub fn new(start_radius: f32, end_radius: f32, start_rect: Rect, end_rect: Rect) -> Self {
        Self {
            start_radius,
            end_radius,
            start_rect,
            end_rect,
        }
    }

    /// Retargets the end rect; the radii stay as created.
    pub fn set_end_rect(&mut self, end_rect: Rect) {
        self.end_rect = end_rect;
    }

    pub fn end_rect(&self) -> Rect {
        self.end_rect
    }

    /// Shadows smear while the outline changes shape this quickly.
    pub fn should_remove_elevation_during_animation(&self) -> bool {
        true
    }

    pub fn outline_at(&self, progress: f32) -> RoundRect {
        let (s, e) = (self.start_rect, self.end_rect);

        RoundRect {
            rect: Box2D::new(
                point(
                    lerp(s.left as f32, e.left as f32, progress),
                    lerp(s.top as f32, e.top as f32, progress),
                ),
                point(
                    lerp(s.right as f32, e.right as f32, progress),
                    lerp(s.bottom as f32, e.bottom as f32, progress),
                ),
            ),
            radius: lerp(self.start_radius, self.end_radius, progress),
        }
    }
}

/// Six independently interpolated scalars: left, top, right, bottom, the
/// large corner radius and the small one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TearDropReveal {
    start: [f32; 6],
    end: [f32; 6],
}

impl TearDropReveal {
    pub fn new(start_rect: Rect, end_rect: Rect, end_radius: f32, radius_ratio: f32) -> Self {
        let r1 = start_rect.width() as f32 / 2.0;
        let r2 = r1 * radius_ratio;

        Self {
            start: [
                start_rect.left as f32,
                start_rect.top as f32,
                start_rect.right as f32,
                start_rect.bottom as f32,
                r1,
                r2,
            ],
            end: [
                end_rect.left as f32,
                end_rect.top as f32,
                end_rect.right as f32,
                end_rect.bottom as f32,
                end_radius,
                end_radius,
            ],
        }
    }

    pub fn values_at(&self, progress: f32) -> [f32; 6] {
        std::array::from_fn(|i| self.start[i] + progress * (self.end[i] - self.start[i]))
    }

    fn path_at(&self, progress: f32) -> Path {
        let [left, top, right, bottom, r1, r2] = self.values_at(progress);
        let bounds = Box2D::new(point(left, top), point(right, bottom));
        let radii: BorderRadii = tear_drop_radii(r1, r2);

        let mut builder = Path::builder();
        builder.add_rounded_rectangle(&bounds, &radii, Winding::Positive);
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SquircleFrame {
    cx: f32,
    cy: f32,
    r: f32,
    control: f32,
    h_shift: f32,
    v_shift: f32,
}

impl SquircleFrame {
    fn lerp(&self, end: &SquircleFrame, t: f32) -> SquircleFrame {
        SquircleFrame {
            cx: lerp(self.cx, end.cx, t),
            cy: lerp(self.cy, end.cy, t),
            r: lerp(self.r, end.r, t),
            control: lerp(self.control, end.control, t),
            h_shift: lerp(self.h_shift, end.h_shift, t),
            v_shift: lerp(self.v_shift, end.v_shift, t),
        }
    }
}

/// Squircle that opens up into a rounded rect: the start arcs use the shape's
/// control offset, the end arcs approximate circles, and straight runs grow
/// between them to reach the end rectangle's aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquircleReveal {
    start: SquircleFrame,
    end: SquircleFrame,
}

impl SquircleReveal {
    pub fn new(start_rect: Rect, end_rect: Rect, end_radius: f32, radius_ratio: f32) -> Self {
        let start_r = start_rect.width() as f32 / 2.0;

        Self {
            start: SquircleFrame {
                cx: start_rect.exact_center_x(),
                cy: start_rect.exact_center_y(),
                r: start_r,
                control: start_r - start_r * radius_ratio,
                h_shift: 0.0,
                v_shift: 0.0,
            },
            end: SquircleFrame {
                cx: end_rect.exact_center_x(),
                cy: end_rect.exact_center_y(),
                r: end_radius,
                control: end_radius * CIRCLE_BEZIER_CONTROL,
                h_shift: end_rect.width() as f32 / 2.0 - end_radius,
                v_shift: end_rect.height() as f32 / 2.0 - end_radius,
            },
        }
    }

    fn path_at(&self, progress: f32) -> Path {
        let f = self.start.lerp(&self.end, progress);

        let mut builder = Path::builder();
        add_squircle(&mut builder, f.cx, f.cy, f.r, f.control, f.h_shift, f.v_shift);
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathReveal {
    TearDrop(TearDropReveal),
    Squircle(SquircleReveal),
}

impl PathReveal {
    /// A fresh path for `progress`; nothing carries over between frames.
    pub fn path_at(&self, progress: f32) -> Path {
        match self {
            PathReveal::TearDrop(reveal) => reveal.path_at(progress),
            PathReveal::Squircle(reveal) => reveal.path_at(progress),
        }
    }
}

/// The two reveal families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealStrategy {
    /// Drives the view's outline provider with an interpolated round rect.
    Outline(RoundedRectReveal),
    /// Installs an explicit clip path rebuilt every frame.
    Path(PathReveal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Created,
    /// Started and paused, waiting for its first driven fraction.
    Armed,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy)]
struct SavedOutline {
    provider: OutlineProvider,
    clip_to_outline: bool,
}

pub struct RevealAnimator {
    strategy: RevealStrategy,
    is_reversed: bool,
    interpolator: easing::Interpolator,
    state: AnimatorState,
    fraction: f32,
    saved: Option<SavedOutline>,
}

impl RevealAnimator {
    pub fn new(strategy: RevealStrategy, is_reversed: bool) -> Self {
        Self {
            strategy,
            is_reversed,
            interpolator: easing::accel_deaccel,
            state: AnimatorState::Created,
            fraction: 0.0,
            saved: None,
        }
    }

    pub fn with_interpolator(self, interpolator: easing::Interpolator) -> Self {
        Self {
            interpolator,
            ..self
        }
    }

    pub fn strategy(&self) -> &RevealStrategy {
        &self.strategy
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn is_reversed(&self) -> bool {
        self.is_reversed
    }

    pub fn is_ended(&self) -> bool {
        self.state == AnimatorState::Ended
    }

    /// Shape progress at the current fraction: 0 is the start shape, 1 the
    /// end rect. Reversed reveals run from 1 down to 0.
    pub fn animated_value(&self) -> f32 {
        let eased = (self.interpolator)(self.fraction);

        if self.is_reversed { 1.0 - eased } else { eased }
    }

    /// Takes over the target's outline and applies fraction 0. Calling it
    /// again is a no-op.
    pub fn start(&mut self, target: &mut dyn ClipPathView) {
        if self.state != AnimatorState::Created {
            return;
        }

        self.saved = Some(SavedOutline {
            provider: target.outline_provider(),
            clip_to_outline: target.clip_to_outline(),
        });

        match &self.strategy {
            RevealStrategy::Outline(outline) => {
                target.set_clip_to_outline(true);
                if outline.should_remove_elevation_during_animation() {
                    target.set_translation_z(-target.elevation());
                }
            }
            RevealStrategy::Path(_) => {
                target.set_outline_provider(OutlineProvider::None);
                target.set_translation_z(-target.elevation());
            }
        }

        self.state = AnimatorState::Armed;
        self.fraction = 0.0;
        self.apply(target);
    }

    /// Points an outline reveal at the target's current outline rect. Path
    /// reveals keep the end they were built with.
    pub fn track_end_rect(&mut self, end_rect: Rect) {
        if let RevealStrategy::Outline(outline) = &mut self.strategy {
            outline.set_end_rect(end_rect);
        }
    }

    pub fn set_current_fraction(&mut self, fraction: f32, target: &mut dyn ClipPathView) {
        match self.state {
            AnimatorState::Created => self.start(target),
            AnimatorState::Ended => return,
            AnimatorState::Armed | AnimatorState::Active => {}
        }

        self.fraction = fraction.clamp(0.0, 1.0);
        self.state = AnimatorState::Active;
        self.apply(target);
    }

    /// Hands the outline back to the target. Ending twice is a no-op.
    pub fn end(&mut self, target: &mut dyn ClipPathView) {
        if matches!(self.state, AnimatorState::Created | AnimatorState::Ended) {
            self.state = AnimatorState::Ended;
            return;
        }

        let saved = self.saved.take();

        match &self.strategy {
            RevealStrategy::Outline(outline) => {
                if outline.should_remove_elevation_during_animation() {
                    target.set_translation_z(0.0);
                }
            }
            RevealStrategy::Path(_) => {
                target.set_translation_z(0.0);
                target.set_clip_path(None);
            }
        }

        if let Some(saved) = saved {
            target.set_outline_provider(saved.provider);
            target.set_clip_to_outline(saved.clip_to_outline);
        }

        self.state = AnimatorState::Ended;
    }

    fn apply(&self, target: &mut dyn ClipPathView) {
        let progress = self.animated_value();

        match &self.strategy {
            RevealStrategy::Outline(outline) => {
                target.set_outline_provider(OutlineProvider::RoundRect(outline.outline_at(progress)));
            }
            RevealStrategy::Path(path) => {
                target.set_clip_path(Some(path.path_at(progress)));
            }
        }
    }
}
