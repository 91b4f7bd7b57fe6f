//! Boundary to the rigid-body physics layer
//!
//! The core never owns a body. Each tick it borrows the chassis, wheel and
//! target bodies through this trait, reads their pose and writes commands.

use nalgebra::Vector2;

/// A simulated rigid body the core can read and command.
#[cfg_attr(test, mockall::automock)]
pub trait PhysicsBody {
    /// World position of the body's center
    fn position(&self) -> Vector2<f64>;

    /// Orientation in radians
    fn angle(&self) -> f64;

    /// Overwrite the body's angular velocity (rad/s)
    fn set_angular_velocity(&mut self, velocity: f64);

    /// Apply `force` at world point `position` for this step
    fn apply_force(&mut self, position: Vector2<f64>, force: Vector2<f64>);
}
