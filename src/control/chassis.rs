// control/chassis.rs

// Station-keeping regulator for the whole chassis. Holds the robot on a
// world position with two independent x/y loops while a third loop keeps
// the chassis pointed at a (possibly moving) target body. Any manual drive
// intent takes over for that tick; when the driver lets go, the position
// loops are re-anchored where the robot stopped.

use log::{debug, info, trace};
use nalgebra::Vector2;

use crate::angle::Angle;
use crate::config::ChassisConfig;
use crate::input::DriveIntent;
use crate::physics::PhysicsBody;

use super::pid::Pid;

/// Who is producing the drive intent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ControlMode {
    Idle,   // regulator owns the drivetrain
    Manual, // driver input passed straight through
}

/// Closed-loop position and heading regulator
#[derive(Debug, Clone)]
pub struct ChassisController {
    config: ChassisConfig,
    x_pid: Pid,
    y_pid: Pid,
    heading_pid: Pid,
    bearing: Angle,
    mode: ControlMode,
}

impl ChassisController {
    /// Regulator holding `anchor` and facing 0° until a bearing is known
    pub fn new(config: &ChassisConfig, anchor: Vector2<f64>) -> Self {
        ChassisController {
            config: *config,
            x_pid: Pid::with_target(config.position_pid, anchor.x),
            y_pid: Pid::with_target(config.position_pid, anchor.y),
            heading_pid: Pid::new(config.heading_pid),
            bearing: Angle::default(),
            mode: ControlMode::Idle,
        }
    }

    /// Current mode
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Position the x/y loops are holding
    pub fn target_position(&self) -> Vector2<f64> {
        Vector2::new(self.x_pid.target(), self.y_pid.target())
    }

    /// Bearing the heading loop tracked on its last update
    pub fn bearing(&self) -> Angle {
        self.bearing
    }

    /// x/y error seen by the last regulator tick
    pub fn position_error(&self) -> Vector2<f64> {
        Vector2::new(self.x_pid.last_error(), self.y_pid.last_error())
    }

    /// Move the station-keeping point
    pub fn set_target_position(&mut self, position: Vector2<f64>) {
        self.x_pid.set_target(position.x);
        self.y_pid.set_target(position.y);
        debug!("Chassis target set to ({:.1}, {:.1})", position.x, position.y);
    }

    /// Produce this tick's drive intent.
    ///
    /// `intent` is the manual sample; when it asks for any motion it is
    /// returned unchanged and the regulator does not run.
    pub fn tick<C, T>(&mut self, intent: &DriveIntent, chassis: &C, target: &T) -> DriveIntent
    where
        C: PhysicsBody + ?Sized,
        T: PhysicsBody + ?Sized,
    {
        let position = chassis.position();

        // Mode transition logic
        match (self.mode, intent.is_active()) {
            (ControlMode::Idle, true) => {
                self.mode = ControlMode::Manual;
                info!("Transitioned to Manual: drive input received");
                return *intent;
            }
            (ControlMode::Manual, true) => return *intent,
            (ControlMode::Manual, false) => {
                self.reanchor(position);
                self.mode = ControlMode::Idle;
                info!(
                    "Transitioned to Idle: holding ({:.1}, {:.1})",
                    position.x, position.y
                );
            }
            (ControlMode::Idle, false) => {}
        }

        self.regulate(position, chassis.angle(), target.position())
    }

    fn reanchor(&mut self, position: Vector2<f64>) {
        self.x_pid.set_target(position.x);
        self.y_pid.set_target(position.y);
        self.x_pid.reset();
        self.y_pid.reset();
        self.heading_pid.reset();
    }

    fn regulate(&mut self, position: Vector2<f64>, angle: f64, target: Vector2<f64>) -> DriveIntent {
        let delta = target - position;
        // Sitting exactly on the target gives no direction; keep the old one.
        if delta != Vector2::zeros() {
            self.bearing = Angle::vector(delta).normalize();
        }
        self.heading_pid.set_target(self.bearing.degrees());

        // Reduce the heading next to the bearing so the loop never
        // differentiates across the 0/360 seam.
        let heading = Angle::from_radians(angle).normalize().get_closest(self.bearing);
        let turn = self.heading_pid.update(heading.degrees()) * self.config.turn_scale;

        let forward = Vector2::new(self.x_pid.update(position.x), self.y_pid.update(position.y))
            * self.config.translation_scale;

        trace!(
            "chassis heading={} bearing={} forward=({:.4}, {:.4}) turn={:.4}",
            heading,
            self.bearing,
            forward.x,
            forward.y,
            turn
        );

        DriveIntent { forward, turn }
    }
}
