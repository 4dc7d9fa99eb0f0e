//! The floating icon: a view that tracks a moving target rect and morphs its
//! clip from the icon shape to the rect's rounded outline.
//!
//! The caller owns the clock. Each frame it passes the current rect and
//! progress to [`MorphController::update`], advances the foreground springs,
//! and draws.

use std::sync::Arc;

use lyon_path::Path;
use lyon_path::math::{Box2D, Vector, vector};
use tracing::{debug, trace};

use crate::canvas::Canvas;
use crate::drawable::{ColorDrawable, Drawable, IconContent};
use crate::easing;
use crate::geometry::{Rect, bound_to_range, map_to_range, scale_rect_about_center};
use crate::registry::ShapeRegistry;
use crate::reveal::{AnimatorState, ClipPathView, OutlineProvider, RevealAnimator, RoundRect};
use crate::spring::{ScalarSpring, SpringAnimation, SpringForce};

/// Share of the overall progress spent morphing the shape.
pub const SHAPE_PROGRESS_DURATION: f32 = 0.10;

pub struct MorphConfig {
    pub container_width: f32,
    pub container_height: f32,
    /// Layout height over width; the icon view is stretched to it. `1.0`
    /// leaves square icons alone.
    pub aspect_ratio: f32,
    /// How far the foreground trails, per container width of movement.
    pub fg_trans_x_factor: f32,
    /// How far the foreground trails, per container height of movement.
    pub fg_trans_y_factor: f32,
    pub blur_size_outline: i32,
    pub shape_progress_duration: f32,
    pub is_rtl: bool,
    pub is_vertical_bar_layout: bool,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            container_width: 1080.0,
            container_height: 1920.0,
            aspect_ratio: 1.0,
            fg_trans_x_factor: 60.0,
            fg_trans_y_factor: 75.0,
            blur_size_outline: 3,
            shape_progress_duration: SHAPE_PROGRESS_DURATION,
            is_rtl: false,
            is_vertical_bar_layout: false,
        }
    }
}

/// Size and margins the icon view was placed with in its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutParams {
    pub width: i32,
    pub height: i32,
    pub margin_start: i32,
    pub top_margin: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    /// A reveal owns the clip and follows the shape progress.
    Active,
}

#[derive(Default)]
struct ViewState {
    clip_path: Option<Path>,
    outline_provider: OutlineProvider,
    clip_to_outline: bool,
    elevation: f32,
    translation_z: f32,
    invalidations: u64,
}

impl ClipPathView for ViewState {
    fn set_clip_path(&mut self, path: Option<Path>) {
        self.clip_path = path;
        self.invalidations += 1;
    }

    fn outline_provider(&self) -> OutlineProvider {
        self.outline_provider
    }

    fn set_outline_provider(&mut self, provider: OutlineProvider) {
        self.outline_provider = provider;
    }

    fn clip_to_outline(&self) -> bool {
        self.clip_to_outline
    }

    fn set_clip_to_outline(&mut self, clip: bool) {
        self.clip_to_outline = clip;
    }

    fn elevation(&self) -> f32 {
        self.elevation
    }

    fn set_translation_z(&mut self, translation_z: f32) {
        self.translation_z = translation_z;
    }
}

struct Layers {
    background: Box<dyn Drawable>,
    foreground: Box<dyn Drawable>,
}

pub struct MorphController<S: ScalarSpring = SpringAnimation> {
    registry: Arc<ShapeRegistry>,
    config: MorphConfig,
    layout_params: LayoutParams,
    is_opening: bool,

    /// Position in the container, before translation.
    frame: Rect,
    alpha: f32,
    translation: Vector,
    scale: f32,
    view: ViewState,

    flat_background: Option<Box<dyn Drawable>>,
    layers: Option<Layers>,
    badge: Option<Box<dyn Drawable>>,

    start_reveal_rect: Rect,
    end_reveal_rect: Rect,
    outline: Rect,
    final_drawable_bounds: Rect,
    task_corner_radius: f32,
    shape_reveal_progress: f32,

    reveal: Option<RevealAnimator>,
    reveals_created: usize,

    fg_spring_x: S,
    fg_spring_y: S,
}

impl MorphController<SpringAnimation> {
    pub fn new(
        registry: Arc<ShapeRegistry>,
        config: MorphConfig,
        layout_params: LayoutParams,
        is_opening: bool,
    ) -> Self {
        Self::with_springs(
            registry,
            config,
            layout_params,
            is_opening,
            SpringAnimation::new(SpringForce::LOW_BOUNCY),
            SpringAnimation::new(SpringForce::LOW_BOUNCY),
        )
    }
}

impl<S: ScalarSpring> MorphController<S> {
    pub fn with_springs(
        registry: Arc<ShapeRegistry>,
        config: MorphConfig,
        layout_params: LayoutParams,
        is_opening: bool,
        fg_spring_x: S,
        fg_spring_y: S,
    ) -> Self {
        let mut controller = Self {
            registry,
            config,
            layout_params,
            is_opening,
            frame: Rect::default(),
            alpha: 1.0,
            translation: vector(0.0, 0.0),
            scale: 1.0,
            view: ViewState::default(),
            flat_background: None,
            layers: None,
            badge: None,
            start_reveal_rect: Rect::default(),
            end_reveal_rect: Rect::default(),
            outline: Rect::default(),
            final_drawable_bounds: Rect::default(),
            task_corner_radius: 0.0,
            shape_reveal_progress: 0.0,
            reveal: None,
            reveals_created: 0,
            fg_spring_x,
            fg_spring_y,
        };
        controller.layout();
        controller
    }

    /// Installs the icon to animate. `icon_offset` is how far the visible
    /// icon sits inside the original view's bounds.
    pub fn set_icon(
        &mut self,
        content: IconContent,
        badge: Option<Box<dyn Drawable>>,
        icon_offset: i32,
    ) {
        self.end_reveal();
        self.badge = badge;

        match content {
            IconContent::Layered {
                background,
                foreground,
            } => {
                debug!("layered icon, shape reveal enabled");

                let mut background =
                    background.unwrap_or_else(|| Box::new(ColorDrawable::transparent()));
                let mut foreground =
                    foreground.unwrap_or_else(|| Box::new(ColorDrawable::transparent()));

                let original_width = self.layout_params.width;
                let original_height = self.layout_params.height;

                let blur_margin = self.config.blur_size_outline / 2;
                self.final_drawable_bounds = Rect::new(0, 0, original_width, original_height);
                self.final_drawable_bounds
                    .inset(icon_offset - blur_margin, icon_offset - blur_margin);
                foreground.set_bounds(self.final_drawable_bounds);
                background.set_bounds(self.final_drawable_bounds);

                self.start_reveal_rect = Rect::new(0, 0, original_width, original_height);

                if let Some(badge) = &mut self.badge {
                    badge.set_bounds(self.start_reveal_rect);
                    if !self.is_opening {
                        badge.set_alpha(0);
                    }
                }

                scale_rect_about_center(
                    &mut self.start_reveal_rect,
                    self.registry.normalization_scale(),
                );

                let lp = &mut self.layout_params;
                if self.config.is_vertical_bar_layout {
                    lp.width = (lp.width as f32).max(lp.height as f32 * self.config.aspect_ratio) as i32;
                } else {
                    lp.height = (lp.height as f32).max(lp.width as f32 * self.config.aspect_ratio) as i32;
                }
                let lp = *lp;
                self.layout();

                let scale = (lp.height as f32 / original_height as f32)
                    .max(lp.width as f32 / original_width as f32);

                let background_start_scale = if self.is_opening {
                    self.outline = Rect::new(0, 0, original_width, original_height);
                    1.0
                } else {
                    self.outline = Rect::new(0, 0, lp.width, lp.height);
                    scale
                };

                self.flat_background = None;
                self.layers = Some(Layers {
                    background,
                    foreground,
                });
                self.set_background_drawable_bounds(background_start_scale);
                self.end_reveal_rect = Rect::new(0, 0, lp.width, lp.height);

                self.view.set_outline_provider(OutlineProvider::ClipOutline);
                self.view.set_clip_to_outline(true);
            }
            IconContent::Flat(mut drawable) => {
                debug!("flat icon, no shape reveal");

                drawable.set_bounds(Rect::new(0, 0, self.frame.width(), self.frame.height()));
                self.flat_background = Some(drawable);
                self.layers = None;
                self.view.set_clip_to_outline(false);
            }
        }

        self.invalidate();
    }

    /// Moves the view onto `rect` (container coordinates) at `progress` in
    /// [0, 1]. The shape reveal runs over `shape_progress_start..=1`, and
    /// `corner_radius` is the radius of `rect`.
    pub fn update(
        &mut self,
        rect: Box2D,
        alpha: f32,
        progress: f32,
        shape_progress_start: f32,
        corner_radius: f32,
        is_opening: bool,
    ) {
        self.alpha = alpha;

        let lp = self.layout_params;
        let dx = if self.config.is_rtl {
            rect.min.x - (self.config.container_width - lp.margin_start as f32 - lp.width as f32)
        } else {
            rect.min.x - lp.margin_start as f32
        };
        let dy = rect.min.y - lp.top_margin as f32;
        self.translation = vector(dx, dy);

        let min_size = lp.width.min(lp.height) as f32;
        let scale_x = rect.width() / min_size;
        let scale_y = rect.height() / min_size;
        let scale = scale_x.min(scale_y).max(1.0);
        self.scale = scale;

        // Reaches 1 at shape_progress_start + shape_progress_duration when opening.
        let to_max = if is_opening {
            1.0 / self.config.shape_progress_duration
        } else {
            1.0
        };
        self.shape_reveal_progress = bound_to_range(
            map_to_range(
                progress.max(shape_progress_start),
                shape_progress_start,
                1.0,
                0.0,
                to_max,
                easing::linear,
            ),
            0.0,
            1.0,
        );

        if self.config.is_vertical_bar_layout {
            self.outline.right = (rect.width() / scale) as i32;
        } else {
            self.outline.bottom = (rect.height() / scale) as i32;
        }

        self.task_corner_radius = corner_radius / scale;

        if self.layers.is_some() {
            if !is_opening && progress >= shape_progress_start {
                self.drive_reveal(is_opening);
            }

            let outline_span = if self.config.is_vertical_bar_layout {
                self.outline.width()
            } else {
                self.outline.height()
            };
            let drawable_scale = outline_span as f32 / min_size;
            self.set_background_drawable_bounds(drawable_scale);

            if is_opening {
                let height = self.final_drawable_bounds.height() as f32;
                let width = self.final_drawable_bounds.width() as f32;
                let (diff_x, diff_y) = if self.config.is_vertical_bar_layout {
                    (((width * drawable_scale - width) / 2.0) as i32, 0)
                } else {
                    (0, ((height * drawable_scale - height) / 2.0) as i32)
                };

                let mut bounds = self.final_drawable_bounds;
                bounds.offset(diff_x, diff_y);
                if let Some(layers) = &mut self.layers {
                    layers.foreground.set_bounds(bounds);
                }
            } else {
                let diff_x = (dx / self.config.container_width * self.config.fg_trans_x_factor) as i32;
                let diff_y =
                    (dy / self.config.container_height * self.config.fg_trans_y_factor) as i32;

                self.fg_spring_x.animate_to_final_position(diff_x as f32);
                self.fg_spring_y.animate_to_final_position(diff_y as f32);
            }
        }

        trace!(
            dx,
            dy,
            scale,
            progress,
            shape_reveal_progress = self.shape_reveal_progress,
            corner_radius = self.task_corner_radius,
            "icon update"
        );

        self.invalidate();
    }

    fn drive_reveal(&mut self, is_opening: bool) {
        if self.reveal.is_none() {
            let mut reveal = self.registry.shape().create_reveal_animator(
                self.start_reveal_rect,
                self.outline,
                self.task_corner_radius,
                !is_opening,
            );
            reveal.start(&mut self.view);
            self.reveal = Some(reveal);
            self.reveals_created += 1;

            debug!(
                shape = ?self.registry.shape(),
                start = ?self.start_reveal_rect,
                end = ?self.outline,
                "shape reveal created"
            );
        }

        if let Some(reveal) = &mut self.reveal {
            reveal.track_end_rect(self.outline);
            reveal.set_current_fraction(self.shape_reveal_progress, &mut self.view);
        }
    }

    /// Sizes the background layer to `scale` times its nominal bounds,
    /// pinned to the top edge (left edge in a vertical bar layout).
    pub fn set_background_drawable_bounds(&mut self, scale: f32) {
        let Some(layers) = &mut self.layers else {
            return;
        };

        let nominal = self.final_drawable_bounds;
        let mut bounds = nominal;
        scale_rect_about_center(&mut bounds, scale);

        if self.config.is_vertical_bar_layout {
            bounds.offset_to((nominal.left as f32 * scale) as i32, bounds.top);
        } else {
            bounds.offset_to(bounds.left, (nominal.top as f32 * scale) as i32);
        }

        layers.background.set_bounds(bounds);
    }

    pub fn set_clip_path(&mut self, clip_path: Option<Path>) {
        self.view.set_clip_path(clip_path);
    }

    /// Disposes of the live reveal, handing the outline back to the view.
    pub fn end_reveal(&mut self) {
        if let Some(mut reveal) = self.reveal.take() {
            reveal.end(&mut self.view);
            debug!("shape reveal ended");
            self.invalidate();
        }
    }

    /// Drops the icon and every bit of per-transition state.
    pub fn recycle(&mut self) {
        self.end_reveal();

        self.flat_background = None;
        self.layers = None;
        self.badge = None;
        self.view.set_clip_path(None);
        self.view.set_outline_provider(OutlineProvider::None);
        self.view.set_clip_to_outline(false);
        self.alpha = 1.0;
        self.translation = vector(0.0, 0.0);
        self.scale = 1.0;
        self.shape_reveal_progress = 0.0;
    }

    /// Draws the view's content in its own coordinates.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.alpha <= 0.0 {
            return;
        }

        canvas.save();

        if self.view.clip_to_outline {
            if let Some(outline) = self.current_outline() {
                canvas.clip_path(&outline.to_path());
            }
        }

        if let Some(clip_path) = &self.view.clip_path {
            canvas.clip_path(clip_path);
        }

        if let Some(background) = &self.flat_background {
            background.draw(canvas);
        }

        if let Some(layers) = &self.layers {
            layers.background.draw(canvas);

            canvas.save();
            let offset = self.foreground_offset();
            canvas.translate(offset.x, offset.y);
            layers.foreground.draw(canvas);
            canvas.restore();
        }

        if let Some(badge) = &self.badge {
            badge.draw(canvas);
        }

        canvas.restore();
    }

    /// Draws the view positioned, scaled and faded inside its container.
    pub fn draw_in_parent(&self, canvas: &mut dyn Canvas) {
        if self.alpha <= 0.0 {
            return;
        }

        canvas.save();
        canvas.translate(
            self.frame.left as f32 + self.translation.x,
            self.frame.top as f32 + self.translation.y,
        );
        canvas.scale(self.scale, self.scale);
        canvas.multiply_alpha(self.alpha);
        self.draw(canvas);
        canvas.restore();
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn translation(&self) -> Vector {
        self.translation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn shape_reveal_progress(&self) -> f32 {
        self.shape_reveal_progress
    }

    /// The outline rect with the current corner radius, in unscaled units.
    pub fn clip_outline(&self) -> RoundRect {
        RoundRect {
            rect: self.outline.to_box2d(),
            radius: self.task_corner_radius,
        }
    }

    pub fn clip_path(&self) -> Option<&Path> {
        self.view.clip_path.as_ref()
    }

    pub fn outline_provider(&self) -> OutlineProvider {
        self.view.outline_provider
    }

    pub fn clip_to_outline(&self) -> bool {
        self.view.clip_to_outline
    }

    pub fn foreground_offset(&self) -> Vector {
        vector(self.fg_spring_x.value(), self.fg_spring_y.value())
    }

    pub fn background_bounds(&self) -> Option<Rect> {
        self.layers.as_ref().map(|layers| layers.background.bounds())
    }

    pub fn foreground_bounds(&self) -> Option<Rect> {
        self.layers.as_ref().map(|layers| layers.foreground.bounds())
    }

    pub fn badge(&self) -> Option<&dyn Drawable> {
        self.badge.as_deref()
    }

    pub fn start_reveal_rect(&self) -> Rect {
        self.start_reveal_rect
    }

    pub fn end_reveal_rect(&self) -> Rect {
        self.end_reveal_rect
    }

    pub fn layout_params(&self) -> LayoutParams {
        self.layout_params
    }

    /// Where the view is laid out in its container.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn is_layered(&self) -> bool {
        self.layers.is_some()
    }

    pub fn is_opening(&self) -> bool {
        self.is_opening
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        match self.reveal.as_ref().map(RevealAnimator::state) {
            None | Some(AnimatorState::Ended) => RevealPhase::Idle,
            Some(_) => RevealPhase::Active,
        }
    }

    /// How many reveals this controller has started over its lifetime.
    pub fn reveals_created(&self) -> usize {
        self.reveals_created
    }

    /// Redraw requests so far.
    pub fn invalidations(&self) -> u64 {
        self.view.invalidations
    }

    /// The foreground springs, for the frame clock to advance.
    pub fn springs_mut(&mut self) -> (&mut S, &mut S) {
        (&mut self.fg_spring_x, &mut self.fg_spring_y)
    }

    fn current_outline(&self) -> Option<RoundRect> {
        match self.view.outline_provider {
            OutlineProvider::None => None,
            OutlineProvider::ClipOutline => Some(self.clip_outline()),
            OutlineProvider::RoundRect(round_rect) => Some(round_rect),
        }
    }

    fn layout(&mut self) {
        let lp = self.layout_params;
        let left = if self.config.is_rtl {
            self.config.container_width as i32 - lp.margin_start - lp.width
        } else {
            lp.margin_start
        };

        self.frame = Rect::new(left, lp.top_margin, left + lp.width, lp.top_margin + lp.height);
    }

    fn invalidate(&mut self) {
        self.view.invalidations += 1;
    }
}

#[cfg(test)]
mod tests {
    use lyon_path::math::point;
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;

    use super::*;
    use crate::canvas::BufferCanvas;
    use crate::shape::IconShape;

    #[derive(Default)]
    struct RecordingSpring {
        targets: Vec<f32>,
    }

    impl ScalarSpring for RecordingSpring {
        fn animate_to_final_position(&mut self, target: f32) {
            self.targets.push(target);
        }

        fn value(&self) -> f32 {
            self.targets.last().copied().unwrap_or(0.0)
        }
    }

    fn icon_params() -> LayoutParams {
        LayoutParams {
            width: 150,
            height: 150,
            margin_start: 0,
            top_margin: 0,
        }
    }

    fn controller(
        shape: IconShape,
        config: MorphConfig,
        is_opening: bool,
    ) -> MorphController<RecordingSpring> {
        MorphController::with_springs(
            Arc::new(ShapeRegistry::new(shape)),
            config,
            icon_params(),
            is_opening,
            RecordingSpring::default(),
            RecordingSpring::default(),
        )
    }

    fn layered() -> IconContent {
        IconContent::Layered {
            background: Some(Box::new(ColorDrawable::new(Color::Blue))),
            foreground: None,
        }
    }

    fn rect(left: f32, top: f32, right: f32, bottom: f32) -> Box2D {
        Box2D::new(point(left, top), point(right, bottom))
    }

    #[test]
    fn shape_progress_follows_window() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), true);
        icon.set_icon(layered(), None, 3);

        icon.update(rect(0.0, 0.0, 150.0, 150.0), 1.0, 0.0, 0.9, 0.0, true);
        assert_eq!(icon.shape_reveal_progress(), 0.0);

        icon.update(rect(0.0, 0.0, 150.0, 150.0), 1.0, 1.0, 0.9, 0.0, true);
        assert_eq!(icon.shape_reveal_progress(), 1.0);
        assert_eq!(icon.reveals_created(), 0);
    }

    #[test]
    fn flat_icon_moves_without_reveal() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), false);
        icon.set_icon(IconContent::Flat(Box::new(ColorDrawable::new(Color::Red))), None, 3);

        icon.update(rect(100.0, 200.0, 400.0, 500.0), 0.5, 1.0, 0.9, 20.0, false);

        assert_eq!(icon.reveals_created(), 0);
        assert_eq!(icon.reveal_phase(), RevealPhase::Idle);
        assert_eq!(icon.translation(), vector(100.0, 200.0));
        assert_eq!(icon.scale(), 2.0);
        assert_eq!(icon.alpha(), 0.5);
        assert!(!icon.clip_to_outline());
        assert_eq!(icon.foreground_offset(), vector(0.0, 0.0));
    }

    #[test]
    fn closing_updates_share_one_reveal() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), false);
        icon.set_icon(layered(), None, 3);

        icon.update(rect(0.0, 0.0, 300.0, 500.0), 1.0, 0.5, 0.9, 0.0, false);
        assert_eq!(icon.reveal_phase(), RevealPhase::Idle);

        icon.update(rect(0.0, 0.0, 200.0, 300.0), 1.0, 0.92, 0.9, 30.0, false);
        icon.update(rect(0.0, 0.0, 150.0, 200.0), 1.0, 0.96, 0.9, 50.0, false);

        assert_eq!(icon.reveals_created(), 1);
        assert_eq!(icon.reveal_phase(), RevealPhase::Active);
        assert!(matches!(icon.outline_provider(), OutlineProvider::RoundRect(_)));
    }

    #[test]
    fn path_shapes_reveal_through_clip_path() {
        let mut icon = controller(IconShape::tear_drop(0.3).unwrap(), MorphConfig::default(), false);
        icon.set_icon(layered(), None, 3);
        icon.update(rect(0.0, 0.0, 150.0, 200.0), 1.0, 0.95, 0.9, 40.0, false);

        assert!(icon.clip_path().is_some());
        assert_eq!(icon.outline_provider(), OutlineProvider::None);

        icon.end_reveal();
        assert!(icon.clip_path().is_none());
        assert_eq!(icon.outline_provider(), OutlineProvider::ClipOutline);
        assert!(icon.clip_to_outline());
    }

    #[test]
    fn ended_reveal_rearms_on_next_update() {
        let mut icon = controller(IconShape::Circle, MorphConfig::default(), false);
        icon.set_icon(layered(), None, 3);
        icon.update(rect(0.0, 0.0, 150.0, 200.0), 1.0, 0.95, 0.9, 40.0, false);

        icon.end_reveal();
        assert_eq!(icon.reveal_phase(), RevealPhase::Idle);

        icon.update(rect(0.0, 0.0, 150.0, 180.0), 1.0, 0.97, 0.9, 60.0, false);
        assert_eq!(icon.reveals_created(), 2);
        assert_eq!(icon.reveal_phase(), RevealPhase::Active);
    }

    fn tall_config() -> MorphConfig {
        MorphConfig {
            aspect_ratio: 1920.0 / 1080.0,
            ..MorphConfig::default()
        }
    }

    #[test]
    fn default_aspect_keeps_square_layout() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), false);
        icon.set_icon(layered(), None, 3);

        assert_eq!(icon.layout_params(), icon_params());
        assert_eq!(icon.end_reveal_rect(), Rect::new(0, 0, 150, 150));
    }

    #[test]
    fn layered_icon_layout() {
        let mut icon = controller(IconShape::default(), tall_config(), false);
        icon.set_icon(layered(), None, 3);

        assert_eq!(icon.start_reveal_rect(), Rect::new(7, 7, 144, 144));
        assert_eq!(icon.layout_params().height, 266);
        assert_eq!(icon.end_reveal_rect(), Rect::new(0, 0, 150, 266));
        assert_eq!(icon.clip_outline().rect, Rect::new(0, 0, 150, 266).to_box2d());
        assert_eq!(icon.foreground_bounds(), Some(Rect::new(2, 2, 148, 148)));
        assert_eq!(icon.outline_provider(), OutlineProvider::ClipOutline);
        assert!(icon.clip_to_outline());
    }

    #[test]
    fn opening_centers_foreground() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), true);
        icon.set_icon(layered(), None, 3);
        assert_eq!(icon.clip_outline().rect, Rect::new(0, 0, 150, 150).to_box2d());
        assert_eq!(icon.background_bounds(), Some(Rect::new(2, 2, 148, 148)));

        icon.update(rect(0.0, 0.0, 150.0, 300.0), 1.0, 0.5, 0.0, 0.0, true);

        assert_eq!(icon.foreground_bounds(), Some(Rect::new(2, 75, 148, 221)));
        assert_eq!(icon.background_bounds(), Some(Rect::new(-70, 4, 221, 295)));
    }

    #[test]
    fn outline_reveal_tracks_shrinking_outline() {
        let mut icon = controller(IconShape::default(), tall_config(), false);
        icon.set_icon(layered(), None, 3);

        icon.update(rect(0.0, 0.0, 150.0, 600.0), 1.0, 0.9, 0.9, 0.0, false);
        icon.update(rect(0.0, 0.0, 150.0, 300.0), 1.0, 0.9, 0.9, 0.0, false);

        assert_eq!(icon.clip_outline().rect.max.y, 300.0);
        match icon.outline_provider() {
            OutlineProvider::RoundRect(round_rect) => assert_eq!(round_rect.rect.max.y, 300.0),
            other => panic!("expected a reveal outline, got {other:?}"),
        }
        assert_eq!(icon.reveals_created(), 1);
    }

    #[test]
    fn scale_never_drops_below_one() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), false);
        icon.set_icon(IconContent::Flat(Box::new(ColorDrawable::new(Color::Red))), None, 0);

        icon.update(rect(10.0, 10.0, 70.0, 90.0), 1.0, 0.0, 0.9, 30.0, false);
        assert_eq!(icon.scale(), 1.0);
        assert_eq!(icon.clip_outline().radius, 30.0);
    }

    #[test]
    fn corner_radius_is_stored_unscaled() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), false);
        icon.set_icon(layered(), None, 3);

        icon.update(rect(0.0, 0.0, 300.0, 600.0), 1.0, 0.0, 0.9, 30.0, false);
        assert_eq!(icon.scale(), 2.0);
        assert_eq!(icon.clip_outline().radius, 15.0);
        assert_eq!(icon.clip_outline().rect.max.y, 300.0);
    }

    #[test]
    fn closing_springs_foreground() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), false);
        icon.set_icon(layered(), None, 3);

        icon.update(rect(540.0, 960.0, 690.0, 1110.0), 1.0, 0.1, 0.9, 0.0, false);
        icon.update(rect(270.0, 480.0, 420.0, 630.0), 1.0, 0.2, 0.9, 0.0, false);

        let (x, y) = icon.springs_mut();
        assert_eq!(x.targets, vec![30.0, 15.0]);
        assert_eq!(y.targets, vec![37.0, 18.0]);
        assert_eq!(icon.foreground_offset(), vector(15.0, 18.0));
    }

    #[test]
    fn badge_hidden_only_when_closing() {
        for (is_opening, expected) in [(false, 0), (true, 255)] {
            let mut icon = controller(IconShape::default(), MorphConfig::default(), is_opening);
            icon.set_icon(layered(), Some(Box::new(ColorDrawable::new(Color::Yellow))), 3);

            let badge = icon.badge().unwrap();
            assert_eq!(badge.alpha(), expected);
            assert_eq!(badge.bounds(), Rect::new(0, 0, 150, 150));
        }
    }

    #[test]
    fn rtl_translation_mirrors_margin() {
        let config = MorphConfig {
            is_rtl: true,
            ..MorphConfig::default()
        };
        let mut icon = controller(IconShape::default(), config, false);
        icon.set_icon(IconContent::Flat(Box::new(ColorDrawable::new(Color::Red))), None, 0);

        assert_eq!(icon.frame(), Rect::new(930, 0, 1080, 150));

        icon.update(rect(900.0, 10.0, 1050.0, 160.0), 1.0, 0.0, 0.9, 0.0, false);
        assert_eq!(icon.translation(), vector(-30.0, 10.0));
    }

    #[test]
    fn vertical_bar_layout_widens_view() {
        let config = MorphConfig {
            is_vertical_bar_layout: true,
            ..tall_config()
        };
        let mut icon = controller(IconShape::default(), config, true);
        icon.set_icon(layered(), None, 3);
        assert_eq!(icon.layout_params().width, 266);

        icon.update(rect(0.0, 0.0, 300.0, 150.0), 1.0, 0.0, 0.0, 0.0, true);
        assert_eq!(icon.clip_outline().rect.max.x, 300.0);
        assert_eq!(icon.foreground_bounds(), Some(Rect::new(75, 2, 221, 148)));
    }

    #[test]
    fn recycle_clears_everything() {
        let mut icon = controller(IconShape::squircle(0.2).unwrap(), MorphConfig::default(), false);
        icon.set_icon(layered(), Some(Box::new(ColorDrawable::new(Color::Yellow))), 3);
        icon.update(rect(0.0, 0.0, 150.0, 200.0), 1.0, 0.95, 0.9, 40.0, false);

        icon.recycle();

        assert_eq!(icon.reveal_phase(), RevealPhase::Idle);
        assert!(!icon.is_layered());
        assert!(icon.badge().is_none());
        assert!(icon.clip_path().is_none());
        assert_eq!(icon.outline_provider(), OutlineProvider::None);
    }

    #[test]
    fn draws_into_container_space() {
        let mut icon = MorphController::new(
            Arc::new(ShapeRegistry::default()),
            MorphConfig::default(),
            LayoutParams {
                width: 4,
                height: 4,
                ..LayoutParams::default()
            },
            false,
        );
        icon.set_icon(IconContent::Flat(Box::new(ColorDrawable::new(Color::Red))), None, 0);
        icon.update(rect(2.0, 0.0, 6.0, 4.0), 1.0, 0.0, 0.9, 0.0, false);

        let area = ratatui::layout::Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        icon.draw_in_parent(&mut BufferCanvas::new(&mut buf, 1.0, 1.0));
        assert_eq!(buf[(3, 1)].bg, Color::Red);
        assert_eq!(buf[(1, 1)].bg, Color::Reset);

        icon.update(rect(2.0, 0.0, 6.0, 4.0), 0.0, 0.0, 0.9, 0.0, false);
        let mut hidden = Buffer::empty(area);
        icon.draw_in_parent(&mut BufferCanvas::new(&mut hidden, 1.0, 1.0));
        assert_eq!(hidden[(3, 1)].bg, Color::Reset);
    }

    #[test]
    fn updates_request_redraw() {
        let mut icon = controller(IconShape::default(), MorphConfig::default(), false);
        let before = icon.invalidations();
        icon.update(rect(0.0, 0.0, 150.0, 150.0), 1.0, 0.0, 0.9, 0.0, false);

        assert!(icon.invalidations() > before);
    }
}
