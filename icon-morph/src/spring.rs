//! Damped spring driving a single scalar toward a movable target.
//!
//! Integration uses the closed-form solution of the damped harmonic
//! oscillator (unit mass), so large frame steps stay stable.

use std::time::Duration;

/// A scalar that eases toward whatever target it was last given.
pub trait ScalarSpring {
    /// Retargets without resetting position or velocity.
    fn animate_to_final_position(&mut self, target: f32);

    fn value(&self) -> f32;
}

/// Stiffness and damping of a spring, with the Android framework presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringForce {
    pub stiffness: f32,
    pub damping_ratio: f32,
}

impl SpringForce {
    pub const STIFFNESS_HIGH: f32 = 10_000.0;
    pub const STIFFNESS_MEDIUM: f32 = 1_500.0;
    pub const STIFFNESS_LOW: f32 = 200.0;
    pub const STIFFNESS_VERY_LOW: f32 = 50.0;

    pub const DAMPING_RATIO_HIGH_BOUNCY: f32 = 0.2;
    pub const DAMPING_RATIO_MEDIUM_BOUNCY: f32 = 0.5;
    pub const DAMPING_RATIO_LOW_BOUNCY: f32 = 0.75;
    pub const DAMPING_RATIO_NO_BOUNCY: f32 = 1.0;

    /// Soft and slightly bouncy, for layers that trail their container.
    pub const LOW_BOUNCY: Self = Self {
        stiffness: Self::STIFFNESS_LOW,
        damping_ratio: Self::DAMPING_RATIO_LOW_BOUNCY,
    };

    /// Settles without overshoot.
    pub const NO_BOUNCY: Self = Self {
        stiffness: Self::STIFFNESS_MEDIUM,
        damping_ratio: Self::DAMPING_RATIO_NO_BOUNCY,
    };

    /// Advances `(value, velocity)` by `dt` seconds toward `target`.
    pub fn step(&self, value: f32, velocity: f32, target: f32, dt: f32) -> (f32, f32) {
        let omega = self.stiffness.sqrt();
        let zeta = self.damping_ratio;
        let displacement = value - target;

        let (displacement, velocity) = if zeta > 1.0 {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let gamma_plus = -zeta * omega + root;
            let gamma_minus = -zeta * omega - root;
            let coeff_b = (gamma_minus * displacement - velocity) / (gamma_minus - gamma_plus);
            let coeff_a = displacement - coeff_b;

            let decay_minus = (gamma_minus * dt).exp();
            let decay_plus = (gamma_plus * dt).exp();

            (
                coeff_a * decay_minus + coeff_b * decay_plus,
                coeff_a * gamma_minus * decay_minus + coeff_b * gamma_plus * decay_plus,
            )
        } else if zeta == 1.0 {
            let coeff_a = displacement;
            let coeff_b = velocity + omega * displacement;
            let decay = (-omega * dt).exp();
            let displaced = (coeff_a + coeff_b * dt) * decay;

            (displaced, displaced * -omega + coeff_b * decay)
        } else {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let cos_coeff = displacement;
            let sin_coeff = (zeta * omega * displacement + velocity) / damped;
            let decay = (-zeta * omega * dt).exp();
            let (sin, cos) = (damped * dt).sin_cos();
            let displaced = decay * (cos_coeff * cos + sin_coeff * sin);

            (
                displaced,
                displaced * -omega * zeta + decay * (-damped * cos_coeff * sin + damped * sin_coeff * cos),
            )
        };

        (displacement + target, velocity)
    }
}

impl Default for SpringForce {
    fn default() -> Self {
        Self {
            stiffness: Self::STIFFNESS_MEDIUM,
            damping_ratio: Self::DAMPING_RATIO_MEDIUM_BOUNCY,
        }
    }
}

/// Velocity thresholds are this multiple of the value threshold.
const VELOCITY_THRESHOLD_MULTIPLIER: f32 = 1000.0 / 16.0;

/// Longest step a single frame may take; longer gaps are integrated in
/// slices.
const MAX_FRAME_STEP: f32 = 1.0 / 30.0;

/// A scalar spring advanced by an external frame clock.
#[derive(Debug, Clone)]
pub struct SpringAnimation {
    force: SpringForce,
    value: f32,
    velocity: f32,
    final_position: f32,
    running: bool,
    value_threshold: f32,
}

impl Default for SpringAnimation {
    fn default() -> Self {
        Self::new(SpringForce::default())
    }
}

impl SpringAnimation {
    pub fn new(force: SpringForce) -> Self {
        Self {
            force,
            value: 0.0,
            velocity: 0.0,
            final_position: 0.0,
            running: false,
            // Sub-pixel motion is invisible.
            value_threshold: 0.75,
        }
    }

    /// Smallest change worth animating, in the animated value's units.
    pub fn with_min_visible_change(self, min_visible_change: f32) -> Self {
        Self {
            value_threshold: min_visible_change * 0.75,
            ..self
        }
    }

    pub fn with_start_value(self, value: f32) -> Self {
        Self {
            value,
            final_position: value,
            ..self
        }
    }

    pub fn set_start_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn final_position(&self) -> f32 {
        self.final_position
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Jumps to the end state.
    pub fn skip_to_end(&mut self) {
        self.value = self.final_position;
        self.velocity = 0.0;
        self.running = false;
    }

    /// Advances by `dt`. Returns whether the spring is still moving.
    pub fn do_frame(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }

        let mut remaining = dt.as_secs_f32();

        while remaining > 0.0 {
            let step = remaining.min(MAX_FRAME_STEP);
            let (value, velocity) =
                self.force
                    .step(self.value, self.velocity, self.final_position, step);
            self.value = value;
            self.velocity = velocity;
            remaining -= step;
        }

        if self.is_at_equilibrium() {
            self.skip_to_end();
        }

        self.running
    }

    fn is_at_equilibrium(&self) -> bool {
        self.velocity.abs() < self.value_threshold * VELOCITY_THRESHOLD_MULTIPLIER
            && (self.value - self.final_position).abs() < self.value_threshold
    }
}

impl ScalarSpring for SpringAnimation {
    fn animate_to_final_position(&mut self, target: f32) {
        self.final_position = target;

        if !self.running && !self.is_at_equilibrium() {
            self.running = true;
        }
    }

    fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn settle(spring: &mut SpringAnimation) -> usize {
        let mut frames = 0;

        while spring.do_frame(FRAME) {
            frames += 1;
            assert!(frames < 10_000, "spring never settled");
        }

        frames
    }

    #[test]
    fn settles_on_target() {
        for force in [SpringForce::LOW_BOUNCY, SpringForce::NO_BOUNCY, SpringForce::default()] {
            let mut spring = SpringAnimation::new(force);
            spring.animate_to_final_position(40.0);
            settle(&mut spring);

            assert_eq!(spring.value(), 40.0);
            assert!(!spring.is_running());
        }
    }

    #[test]
    fn overdamped_spring_settles_without_overshoot() {
        let force = SpringForce {
            stiffness: SpringForce::STIFFNESS_LOW,
            damping_ratio: 2.0,
        };
        let mut spring = SpringAnimation::new(force);
        spring.animate_to_final_position(100.0);

        while spring.do_frame(FRAME) {
            assert!(spring.value() <= 100.0 + 1e-3, "overshot to {}", spring.value());
        }

        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn bouncy_spring_overshoots() {
        let mut spring = SpringAnimation::new(SpringForce {
            stiffness: SpringForce::STIFFNESS_LOW,
            damping_ratio: SpringForce::DAMPING_RATIO_HIGH_BOUNCY,
        });
        spring.animate_to_final_position(100.0);
        let mut peak: f32 = 0.0;

        while spring.do_frame(FRAME) {
            peak = peak.max(spring.value());
        }

        assert!(peak > 100.0, "peak {peak} never passed the target");
    }

    #[test]
    fn retargeting_keeps_momentum() {
        let mut spring = SpringAnimation::new(SpringForce::LOW_BOUNCY);
        spring.animate_to_final_position(100.0);

        for _ in 0..5 {
            spring.do_frame(FRAME);
        }

        let value = spring.value();
        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.animate_to_final_position(120.0);
        assert_eq!(spring.value(), value);
        assert_eq!(spring.velocity(), velocity);
        assert!(spring.is_running());
    }

    #[test]
    fn retarget_to_current_value_stays_idle() {
        let mut spring = SpringAnimation::default().with_start_value(8.0);
        spring.animate_to_final_position(8.0);

        assert!(!spring.is_running());
        assert!(!spring.do_frame(FRAME));
    }
}
