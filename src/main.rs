// src/main.rs
// Headless demo: drives the swerve core against a toy point-mass simulation.
//
// Usage: swerve_sim [config.yaml]
// Set RUST_LOG=info (or debug/trace) to watch the controller.

use std::error::Error;

use log::info;
use nalgebra::{Rotation2, Vector2};
use swerve_core::{Corner, InputMapper, Key, PhysicsBody, Robot, RobotConfig};

const TICKS: usize = 600;
const MANUAL_TICKS: usize = 90;
const REPORT_EVERY: usize = 60;
// Held for the first MANUAL_TICKS, then released.
const DRIVE_KEY: &str = "w";
// Station point shift along x once the driver lets go.
const STATION_SHIFT: f64 = -100.0;

/// Point mass with air drag, stepped once per tick.
#[derive(Debug, Clone)]
struct SimBody {
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    angle: f64,
    angular_velocity: f64,
    force: Vector2<f64>,
    mass: f64,
    friction_air: f64,
}

impl SimBody {
    fn new(position: Vector2<f64>, mass: f64) -> Self {
        SimBody {
            position,
            velocity: Vector2::zeros(),
            angle: 0.0,
            angular_velocity: 0.0,
            force: Vector2::zeros(),
            mass,
            friction_air: 0.5,
        }
    }

    fn step(&mut self) {
        self.velocity += self.force / self.mass;
        self.velocity *= 1.0 - self.friction_air;
        self.position += self.velocity;
        self.angle += self.angular_velocity;
        self.force = Vector2::zeros();
    }
}

impl PhysicsBody for SimBody {
    fn position(&self) -> Vector2<f64> {
        self.position
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn set_angular_velocity(&mut self, velocity: f64) {
        self.angular_velocity = velocity;
    }

    fn apply_force(&mut self, _position: Vector2<f64>, force: Vector2<f64>) {
        self.force += force;
    }
}

/// Chassis plus four wheels held together by re-pinning after each step.
struct Rig {
    chassis: SimBody,
    wheels: [SimBody; 4],
    offsets: [Vector2<f64>; 4],
}

impl Rig {
    fn new(robot: &Robot, spawn: Vector2<f64>) -> Self {
        let offsets = Corner::ALL.map(|corner| robot.drivetrain().offset(corner));
        Rig {
            chassis: SimBody::new(spawn, 4.0),
            wheels: offsets.map(|offset| SimBody::new(spawn + offset, 0.06)),
            offsets,
        }
    }

    fn step(&mut self) {
        for wheel in &mut self.wheels {
            wheel.step();
        }

        let center = self.wheels.iter().map(|w| w.position).sum::<Vector2<f64>>() / 4.0;
        let front = self.wheels[Corner::FrontRight.index()].position
            - self.wheels[Corner::FrontLeft.index()].position;
        let angle = front.y.atan2(front.x);

        self.chassis.position = center;
        self.chassis.angle = angle;
        let rotation = Rotation2::new(angle);
        for (wheel, offset) in self.wheels.iter_mut().zip(self.offsets) {
            wheel.position = center + rotation * offset;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for debugging
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => RobotConfig::from_file(path)?,
        None => RobotConfig::default(),
    };

    let spawn = Vector2::new(700.0, 700.0);
    let mut robot = Robot::new(config, spawn)?;
    let mut rig = Rig::new(&robot, spawn);
    let mut target = SimBody::new(Vector2::new(500.0, 500.0), 1.0);
    let mut input = InputMapper::new(&robot.config().input);
    let drive_key = Key::from_name(DRIVE_KEY).ok_or("unbound drive key")?;

    info!("Starting swerve demo for {} ticks", TICKS);
    input.key_down(drive_key);

    for tick in 0..TICKS {
        if tick == MANUAL_TICKS {
            input.key_up(drive_key);
            info!("Driver released controls at tick {}", tick);
        }
        if tick == MANUAL_TICKS + 1 {
            let station = rig.chassis.position + Vector2::new(STATION_SHIFT, 0.0);
            robot.set_target_position(station);
            info!("Station point moved to ({:.1}, {:.1})", station.x, station.y);
        }

        let phase = tick as f64 / 120.0;
        target.position = Vector2::new(500.0 + 150.0 * phase.cos(), 500.0 + 150.0 * phase.sin());

        let intent = Some(input.sample(None));
        let report = robot.tick(intent, &rig.chassis, &mut rig.wheels, &target);
        rig.step();

        if tick % REPORT_EVERY == 0 {
            let reversed = report.modules.iter().filter(|m| m.reversed).count();
            info!(
                "tick {:>3} {:?}: chassis=({:.1}, {:.1}) heading={} bearing={} reversed={}",
                tick,
                report.mode,
                rig.chassis.position.x,
                rig.chassis.position.y,
                swerve_core::Angle::from_radians(rig.chassis.angle).normalize(),
                robot.chassis().bearing(),
                reversed
            );
        }
    }

    info!("Swerve demo completed");
    Ok(())
}
