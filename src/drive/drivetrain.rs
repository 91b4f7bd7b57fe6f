//! Four-module swerve drivetrain
//!
//! Modules sit on the corners of a rectangle around the chassis center, in
//! screen coordinates where +y points toward the rear. For a module at
//! offset `r`, rotating the chassis at rate `turn` asks the module for a
//! velocity perpendicular to `r`; adding the chassis translation gives the
//! velocity the module has to realize to keep the footprint rigid:
//!
//! ```text
//! v = forward + turn * rotate90(normalize(r))
//! ```

use nalgebra::Vector2;

use crate::angle::Angle;
use crate::config::{DrivetrainConfig, SteeringConfig};
use crate::input::DriveIntent;
use crate::physics::PhysicsBody;

use super::module::{ModuleOutput, SteeringModule};

/// Module mounting positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Left side, toward -y
    FrontLeft,
    /// Right side, toward -y
    FrontRight,
    /// Left side, toward +y
    RearLeft,
    /// Right side, toward +y
    RearRight,
}

impl Corner {
    /// Every corner in module index order
    pub const ALL: [Corner; 4] = [
        Corner::FrontLeft,
        Corner::FrontRight,
        Corner::RearLeft,
        Corner::RearRight,
    ];

    /// Index of this corner's module and body
    pub fn index(self) -> usize {
        self as usize
    }

    /// Offset from the chassis center
    pub fn offset(self, config: &DrivetrainConfig) -> Vector2<f64> {
        let (x, y) = (config.half_width, config.half_length);
        match self {
            Corner::FrontLeft => Vector2::new(-x, -y),
            Corner::FrontRight => Vector2::new(x, -y),
            Corner::RearLeft => Vector2::new(-x, y),
            Corner::RearRight => Vector2::new(x, y),
        }
    }
}

/// Four swerve modules rigidly fixed to one chassis
#[derive(Debug, Clone)]
pub struct Drivetrain {
    modules: [SteeringModule; 4],
    offsets: [Vector2<f64>; 4],
    // unit tangents, precomputed from the fixed offsets
    tangents: [Vector2<f64>; 4],
}

impl Drivetrain {
    /// Create a drivetrain with every module holding a zero heading
    pub fn new(drivetrain: &DrivetrainConfig, steering: &SteeringConfig) -> Self {
        let offsets = Corner::ALL.map(|corner| corner.offset(drivetrain));
        let tangents = offsets.map(|offset| {
            let n = offset.normalize();
            Vector2::new(-n.y, n.x)
        });

        Drivetrain {
            modules: Corner::ALL.map(|_| SteeringModule::new(steering, Angle::default())),
            offsets,
            tangents,
        }
    }

    /// Module at a corner
    pub fn module(&self, corner: Corner) -> &SteeringModule {
        &self.modules[corner.index()]
    }

    /// Offset of a corner's module from the chassis center
    pub fn offset(&self, corner: Corner) -> Vector2<f64> {
        self.offsets[corner.index()]
    }

    /// Velocity each module must realize for `intent`, in corner order
    pub fn module_vectors(&self, intent: &DriveIntent) -> [Vector2<f64>; 4] {
        self.tangents.map(|tangent| intent.forward + tangent * intent.turn)
    }

    /// Distribute `intent` to the modules and run each one against its body.
    ///
    /// `bodies` is indexed like [`Corner::ALL`].
    pub fn tick<B: PhysicsBody>(
        &mut self,
        intent: &DriveIntent,
        bodies: &mut [B; 4],
    ) -> [ModuleOutput; 4] {
        let vectors = self.module_vectors(intent);

        std::array::from_fn(|i| {
            let module = &mut self.modules[i];
            module.set_vector(vectors[i]);
            module.tick(&mut bodies[i])
        })
    }
}
