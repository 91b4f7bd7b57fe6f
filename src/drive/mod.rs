//! Swerve drivetrain and its steering modules
//!
//! - [`module`]: per-wheel heading control with the reversal optimization.
//! - [`drivetrain`]: holonomic kinematics spreading one chassis intent over
//!   four modules.

/// Per-wheel steering and drive control.
pub mod module;

/// Chassis-to-module kinematics.
pub mod drivetrain;

pub use drivetrain::{Corner, Drivetrain};
pub use module::{ModuleOutput, SteeringModule};
