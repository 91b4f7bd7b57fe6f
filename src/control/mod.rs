//! Feedback control
//!
//! - [`pid`]: fixed-period PID loop shared by the wheels and the chassis.
//! - [`chassis`]: position and bearing regulator with manual override.
//!
//! # How PID Works
//!
//! The output is the sum of three terms:
//!
//! - **P (Proportional)**: scaled error (distance from target).
//! - **I (Integral)**: scaled error accumulated over time.
//! - **D (Derivative)**: scaled rate of error change.
//!
//! `output = Kp*error + Ki*integral + Kd*derivative`

/// PID loop primitive.
pub mod pid;

/// Chassis station-keeping regulator.
pub mod chassis;

pub use chassis::{ChassisController, ControlMode};
pub use pid::{Pid, PidGains};
