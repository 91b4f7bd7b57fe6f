//! Single swerve module
//!
//! A wheel mounted on the chassis, free to spin about its mount and to push
//! along its own heading. Because thrust can be negated, a module facing
//! exactly away from its target heading is just as well aligned as one
//! facing it. Each tick the controller steers toward whichever of the two
//! orientations is closer and flips the thrust sign when the reversed one
//! wins.

use nalgebra::Vector2;

use crate::angle::Angle;
use crate::config::SteeringConfig;
use crate::control::pid::Pid;
use crate::physics::PhysicsBody;

/// Wheel-forward axis is +90° from a heading of zero.
const WHEEL_FORWARD_OFFSET: Angle = Angle::from_degrees(90.0);

/// What a module commanded during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleOutput {
    /// Angular velocity written to the body (rad/s)
    pub angular_velocity: f64,
    /// Force applied at the body's position, zero while still aligning
    pub force: Vector2<f64>,
    /// Whether the module drove tail-first
    pub reversed: bool,
    /// Remaining distance between the chosen orientation and the target
    pub heading_error: Angle,
}

/// Closed-loop heading and drive control for one wheel
#[derive(Debug, Clone)]
pub struct SteeringModule {
    config: SteeringConfig,
    heading_pid: Pid,
    target_heading: Angle,
    target_speed: f64,
    reversed: bool,
}

impl SteeringModule {
    /// Create a module holding `initial_heading` with zero speed
    pub fn new(config: &SteeringConfig, initial_heading: Angle) -> Self {
        let target_heading = initial_heading.normalize();
        SteeringModule {
            config: *config,
            heading_pid: Pid::with_target(config.heading_pid, target_heading.degrees()),
            target_heading,
            target_speed: 0.0,
            reversed: false,
        }
    }

    /// Target heading in `[0, 360)`
    pub fn target_heading(&self) -> Angle {
        self.target_heading
    }

    /// Target drive speed, never negative
    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    /// Whether the last tick chose the reversed orientation
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Set the velocity this module should realize.
    ///
    /// A zero vector keeps the current target heading and stops driving.
    pub fn set_vector(&mut self, v: Vector2<f64>) {
        let speed = v.norm();
        if speed == 0.0 {
            self.target_speed = 0.0;
            return;
        }

        self.target_heading = (Angle::vector(v) - WHEEL_FORWARD_OFFSET).normalize();
        self.target_speed = speed;
    }

    /// Run one control step against the wheel's body.
    pub fn tick<B: PhysicsBody + ?Sized>(&mut self, body: &mut B) -> ModuleOutput {
        let body_angle = body.angle();
        let current = Angle::from_radians(body_angle).normalize();
        let target = self.target_heading;

        let forward = current.get_closest(target);
        let backward = current.rev().normalize().get_closest(target);

        let forward_error = forward.distance(target);
        let backward_error = backward.distance(target);
        let (candidate, heading_error, reversed) = if backward_error < forward_error {
            (backward, backward_error, true)
        } else {
            (forward, forward_error, false)
        };

        if reversed != self.reversed {
            log::debug!(
                "Module flipped to {} (heading {}, target {})",
                if reversed { "reversed" } else { "forward" },
                current,
                target
            );
        }
        self.reversed = reversed;

        self.heading_pid.set_target(target.degrees());
        let angular_velocity =
            self.heading_pid.update(candidate.degrees()) * self.config.angular_velocity_scale;
        body.set_angular_velocity(angular_velocity);

        let mut force: Vector2<f64> = Vector2::zeros();
        if heading_error.degrees() < self.config.force_engage_threshold_deg {
            let magnitude = if reversed { -self.target_speed } else { self.target_speed };
            // Wheel-forward is local +y rotated by the body's current angle.
            force = Vector2::new(-body_angle.sin(), body_angle.cos()) * magnitude;
            let at = body.position();
            body.apply_force(at, force);
        }

        log::trace!(
            "module heading={} target={} error={} w={:.4} force=({:.4}, {:.4})",
            current,
            target,
            heading_error,
            angular_velocity,
            force.x,
            force.y
        );

        ModuleOutput {
            angular_velocity,
            force,
            reversed,
            heading_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::MockPhysicsBody;

    fn body_at(degrees: f64) -> MockPhysicsBody {
        let mut body = MockPhysicsBody::new();
        body.expect_angle().return_const(degrees.to_radians());
        body.expect_position().return_const(Vector2::new(5.0, 5.0));
        body
    }

    /// A vector whose module heading is `degrees`.
    fn vector_for_heading(degrees: f64, speed: f64) -> Vector2<f64> {
        let direction = (degrees + 90.0).to_radians();
        Vector2::new(direction.cos(), direction.sin()) * speed
    }

    #[test]
    fn set_vector_offsets_heading_by_quarter_turn() {
        let mut module = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        module.set_vector(Vector2::new(0.0, 2.0));
        assert_eq!(module.target_heading().degrees(), 0.0);
        assert_eq!(module.target_speed(), 2.0);

        module.set_vector(Vector2::new(1.0, 0.0));
        assert!((module.target_heading().degrees() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_holds_heading() {
        let mut module = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        module.set_vector(Vector2::new(-3.0, 0.0));
        let heading = module.target_heading();

        module.set_vector(Vector2::zeros());
        assert_eq!(module.target_heading(), heading);
        assert_eq!(module.target_speed(), 0.0);
    }

    #[test]
    fn turns_toward_target_without_driving_while_misaligned() {
        let mut module = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        module.set_vector(Vector2::new(-1.0, 0.0));
        assert_eq!(module.target_heading().degrees(), 90.0);

        let mut body = body_at(0.0);
        body.expect_set_angular_velocity()
            .withf(|w| *w > 0.0)
            .times(1)
            .return_const(());
        body.expect_apply_force().times(0);

        let output = module.tick(&mut body);
        assert!(!output.reversed);
        assert!((output.heading_error.degrees() - 90.0).abs() < 1e-6);
        assert_eq!(output.force, Vector2::zeros());
    }

    #[test]
    fn drives_once_inside_threshold() {
        let mut module = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        module.set_vector(Vector2::new(-1.0, 0.0));

        let mut body = body_at(60.0);
        body.expect_set_angular_velocity()
            .withf(|w| *w > 0.0)
            .times(1)
            .return_const(());
        body.expect_apply_force()
            .withf(|at, force| *at == Vector2::new(5.0, 5.0) && (force.norm() - 1.0).abs() < 1e-9)
            .times(1)
            .return_const(());

        let output = module.tick(&mut body);
        assert!(!output.reversed);
        assert!(output.heading_error.degrees() < 35.0);
    }

    #[test]
    fn prefers_reversed_orientation_when_closer() {
        let mut module = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        module.set_vector(vector_for_heading(350.0, 2.0));

        let mut body = body_at(170.0);
        body.expect_set_angular_velocity().return_const(());
        body.expect_apply_force().times(1).return_const(());
        let reversed = module.tick(&mut body);

        assert!(reversed.reversed);
        assert!(module.is_reversed());
        assert!(reversed.heading_error.degrees() < 1e-6);

        let mut aligned = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        aligned.set_vector(vector_for_heading(170.0, 2.0));
        let mut body = body_at(170.0);
        body.expect_set_angular_velocity().return_const(());
        body.expect_apply_force().times(1).return_const(());
        let straight = aligned.tick(&mut body);

        assert!(!straight.reversed);
        assert!((reversed.force + straight.force).norm() < 1e-9);
        assert!((reversed.force.norm() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn tie_keeps_forward_orientation() {
        let mut module = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        // heading exactly 90°, so both orientations sit 90° away
        module.set_vector(Vector2::new(-1.0, 0.0));

        let mut body = body_at(0.0);
        body.expect_set_angular_velocity().return_const(());
        assert!(!module.tick(&mut body).reversed);
    }

    #[test]
    fn wraps_across_zero_instead_of_spinning_the_long_way() {
        let mut module = SteeringModule::new(&SteeringConfig::default(), Angle::default());
        module.set_vector(vector_for_heading(10.0, 1.0));

        // 350° is 20° short of 10°, so the command must be positive.
        let mut body = body_at(350.0);
        body.expect_set_angular_velocity()
            .withf(|w| *w > 0.0)
            .times(1)
            .return_const(());
        body.expect_apply_force().times(1).return_const(());

        let output = module.tick(&mut body);
        assert!((output.heading_error.degrees() - 20.0).abs() < 1e-6);
    }
}
