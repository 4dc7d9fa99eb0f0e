//! Springs a rectangle from a start rect to a target rect.
//!
//! The center follows two position springs (so a fling velocity carries
//! through), while width and height follow a separate 0→1 progress spring.
//! Listeners receive every intermediate rect with that progress.

use std::time::Duration;

use lyon_path::math::{Box2D, Vector, point, size};

use crate::geometry::lerp;
use crate::spring::{ScalarSpring, SpringAnimation, SpringForce};

/// Progress changes below this are not worth a frame.
const MIN_VISIBLE_CHANGE_PROGRESS: f32 = 0.002;

pub trait OnUpdateListener {
    fn on_update(&mut self, current_rect: Box2D, progress: f32);

    fn on_cancel(&mut self) {}
}

impl<F: FnMut(Box2D, f32)> OnUpdateListener for F {
    fn on_update(&mut self, current_rect: Box2D, progress: f32) {
        self(current_rect, progress)
    }
}

pub struct RectSpringAnim {
    start_rect: Box2D,
    target_rect: Box2D,
    center_x: SpringAnimation,
    center_y: SpringAnimation,
    progress: SpringAnimation,
    listeners: Vec<Box<dyn OnUpdateListener>>,
    running: bool,
}

impl RectSpringAnim {
    pub fn new(start_rect: Box2D, target_rect: Box2D) -> Self {
        Self::with_forces(start_rect, target_rect, SpringForce::LOW_BOUNCY, SpringForce::NO_BOUNCY)
    }

    pub fn with_forces(
        start_rect: Box2D,
        target_rect: Box2D,
        position_force: SpringForce,
        size_force: SpringForce,
    ) -> Self {
        let start_center = start_rect.center();

        Self {
            start_rect,
            target_rect,
            center_x: SpringAnimation::new(position_force).with_start_value(start_center.x),
            center_y: SpringAnimation::new(position_force).with_start_value(start_center.y),
            progress: SpringAnimation::new(size_force)
                .with_min_visible_change(MIN_VISIBLE_CHANGE_PROGRESS)
                .with_start_value(0.0),
            listeners: Vec::new(),
            running: false,
        }
    }

    pub fn add_on_update_listener(&mut self, listener: impl OnUpdateListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Launches the center with `velocity` (units per second) and reports the
    /// start rect.
    pub fn start(&mut self, velocity: Vector) {
        let target_center = self.target_rect.center();

        self.center_x.set_start_velocity(velocity.x);
        self.center_y.set_start_velocity(velocity.y);
        self.center_x.animate_to_final_position(target_center.x);
        self.center_y.animate_to_final_position(target_center.y);
        self.progress.animate_to_final_position(1.0);
        self.running = true;

        self.notify();
    }

    /// Advances every spring by `dt`. Returns whether the rect still moves.
    pub fn do_frame(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }

        let x_running = self.center_x.do_frame(dt);
        let y_running = self.center_y.do_frame(dt);
        let progress_running = self.progress.do_frame(dt);
        self.running = x_running || y_running || progress_running;

        self.notify();

        self.running
    }

    /// Stops where it is and tells listeners.
    pub fn cancel(&mut self) {
        if !self.running {
            return;
        }

        self.running = false;

        for listener in &mut self.listeners {
            listener.on_cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn current_rect(&self) -> Box2D {
        let progress = self.progress.value();
        let width = lerp(self.start_rect.width(), self.target_rect.width(), progress);
        let height = lerp(self.start_rect.height(), self.target_rect.height(), progress);
        let center = point(self.center_x.value(), self.center_y.value());

        Box2D::from_origin_and_size(
            point(center.x - width / 2.0, center.y - height / 2.0),
            size(width, height),
        )
    }

    fn notify(&mut self) {
        let rect = self.current_rect();
        let progress = self.progress.value();

        for listener in &mut self.listeners {
            listener.on_update(rect, progress);
        }
    }
}
