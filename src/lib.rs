//! Swerve Core - closed-loop control for a simulated four-module swerve drive
//!
//! This library turns a desired chassis motion into per-wheel steering and
//! drive commands, and provides the regulator that holds the chassis on a
//! point while tracking the bearing to a target body. Physics, rendering and
//! device polling stay outside; the core talks to them through
//! [`PhysicsBody`] and [`DriveIntent`].
//!
//! One [`Robot::tick`] per simulation frame runs, synchronously:
//! [`ChassisController`] → [`Drivetrain`] → each [`SteeringModule`].

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod angle;
pub mod config;
pub mod control;
pub mod drive;
pub mod input;
pub mod physics;

// Re-export commonly used items for easier access
pub use angle::Angle;
pub use config::{ConfigError, RobotConfig};
pub use control::{ChassisController, ControlMode, Pid, PidGains};
pub use drive::{Corner, Drivetrain, ModuleOutput, SteeringModule};
pub use input::{DriveIntent, GamepadSample, InputMapper, Key};
pub use physics::PhysicsBody;

use nalgebra::Vector2;

/// What happened during one [`Robot::tick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Intent handed to the drivetrain
    pub intent: DriveIntent,
    /// Controller mode after the tick
    pub mode: ControlMode,
    /// Per-module commands, indexed like [`Corner::ALL`]
    pub modules: [ModuleOutput; 4],
}

/// Control core of one robot: chassis regulator plus drivetrain
#[derive(Debug, Clone)]
pub struct Robot {
    config: RobotConfig,
    chassis: ChassisController,
    drivetrain: Drivetrain,
}

impl Robot {
    /// Build the control core for a robot spawned at `spawn_position`
    pub fn new(config: RobotConfig, spawn_position: Vector2<f64>) -> Result<Self, ConfigError> {
        config.validate()?;

        let chassis = ChassisController::new(&config.chassis, spawn_position);
        let drivetrain = Drivetrain::new(&config.drivetrain, &config.steering);
        log::info!(
            "Robot core spawned at ({:.1}, {:.1})",
            spawn_position.x,
            spawn_position.y
        );

        Ok(Robot {
            config,
            chassis,
            drivetrain,
        })
    }

    /// Run one control pass.
    ///
    /// A missing `intent` sample counts as no input. `wheels` is indexed
    /// like [`Corner::ALL`]; `target` is the body whose position defines the
    /// bearing the chassis turns toward.
    pub fn tick<C, W, T>(
        &mut self,
        intent: Option<DriveIntent>,
        chassis: &C,
        wheels: &mut [W; 4],
        target: &T,
    ) -> TickReport
    where
        C: PhysicsBody + ?Sized,
        W: PhysicsBody,
        T: PhysicsBody + ?Sized,
    {
        let sample = intent.unwrap_or_default();
        let intent = self.chassis.tick(&sample, chassis, target);
        let modules = self.drivetrain.tick(&intent, wheels);

        TickReport {
            intent,
            mode: self.chassis.mode(),
            modules,
        }
    }

    /// Move the point the chassis holds when no one is driving
    pub fn set_target_position(&mut self, position: Vector2<f64>) {
        self.chassis.set_target_position(position);
    }

    /// Active configuration
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Chassis regulator
    pub fn chassis(&self) -> &ChassisController {
        &self.chassis
    }

    /// Drivetrain and its modules
    pub fn drivetrain(&self) -> &Drivetrain {
        &self.drivetrain
    }
}
