//! Tuning configuration for the swerve core
//!
//! Every constant the control loops depend on lives here. The defaults are
//! tuned against the demo simulation's mass and inertia and can be replaced
//! wholesale from a YAML file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::pid::PidGains;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RobotConfig {
    /// Per-wheel heading control
    pub steering: SteeringConfig,
    /// Module placement
    pub drivetrain: DrivetrainConfig,
    /// Station-keeping regulator
    pub chassis: ChassisConfig,
    /// Drive intent mapping
    pub input: InputConfig,
}

/// Steering module configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Heading PID gains, in degrees of error
    pub heading_pid: PidGains,
    /// Factor from heading PID output to body angular velocity (rad/s)
    pub angular_velocity_scale: f64,
    /// Drive force is only applied below this heading error (degrees)
    pub force_engage_threshold_deg: f64,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        SteeringConfig {
            heading_pid: PidGains {
                kp: 0.15,
                ki: 0.0001,
                kd: 0.001,
                i_max: 0.0,
                dt: 1.0,
            },
            angular_velocity_scale: 1.0 / 15.0,
            force_engage_threshold_deg: 35.0,
        }
    }
}

/// Module placement around the chassis center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivetrainConfig {
    /// Lateral offset of each module from the center
    pub half_width: f64,
    /// Longitudinal offset of each module from the center
    pub half_length: f64,
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        DrivetrainConfig {
            half_width: 70.0,
            half_length: 70.0,
        }
    }
}

/// Chassis regulator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChassisConfig {
    /// Gains shared by the x and y position loops
    pub position_pid: PidGains,
    /// Gains of the bearing-tracking heading loop, in degrees of error
    pub heading_pid: PidGains,
    /// Factor applied to the x/y loop outputs before they become `forward`
    pub translation_scale: f64,
    /// Factor applied to the heading loop output before it becomes `turn`
    pub turn_scale: f64,
}

impl Default for ChassisConfig {
    fn default() -> Self {
        ChassisConfig {
            position_pid: PidGains {
                kp: 0.005,
                ki: 0.0,
                kd: 0.02,
                i_max: 0.0,
                dt: 1.0,
            },
            heading_pid: PidGains {
                kp: 0.004,
                ki: 0.0,
                kd: 0.01,
                i_max: 0.0,
                dt: 1.0,
            },
            translation_scale: 0.2,
            turn_scale: 1.0,
        }
    }
}

/// Drive intent mapping from input devices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Axis values with magnitude at or below this collapse to zero
    pub deadzone: f64,
    /// Gamepad translation axes are multiplied by this
    pub forward_scale: f64,
    /// Gamepad turn axis is multiplied by this
    pub turn_scale: f64,
    /// Forward component set by a held movement key
    pub key_forward_step: f64,
    /// Turn rate set by a held turn key
    pub key_turn_step: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            deadzone: 0.2,
            forward_scale: 0.2,
            turn_scale: 0.5,
            key_forward_step: 0.1,
            key_turn_step: 0.4,
        }
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML did not match the schema
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// A value is outside its allowed range
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl RobotConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: RobotConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        log::info!("Loaded robot config from {}", path.display());
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every value the control loops would choke on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.steering.heading_pid.validate("steering.heading_pid")?;
        self.chassis.position_pid.validate("chassis.position_pid")?;
        self.chassis.heading_pid.validate("chassis.heading_pid")?;

        let threshold = self.steering.force_engage_threshold_deg;
        if !(threshold > 0.0 && threshold <= 180.0) {
            return Err(invalid(
                "steering.force_engage_threshold_deg",
                format!("must be in (0, 180], got {threshold}"),
            ));
        }
        finite("steering.angular_velocity_scale", self.steering.angular_velocity_scale)?;

        positive("drivetrain.half_width", self.drivetrain.half_width)?;
        positive("drivetrain.half_length", self.drivetrain.half_length)?;

        finite("chassis.translation_scale", self.chassis.translation_scale)?;
        finite("chassis.turn_scale", self.chassis.turn_scale)?;

        let deadzone = self.input.deadzone;
        if !(0.0..1.0).contains(&deadzone) {
            return Err(invalid("input.deadzone", format!("must be in [0, 1), got {deadzone}")));
        }
        finite("input.forward_scale", self.input.forward_scale)?;
        finite("input.turn_scale", self.input.turn_scale)?;
        finite("input.key_forward_step", self.input.key_forward_step)?;
        finite("input.key_turn_step", self.input.key_turn_step)?;

        Ok(())
    }
}

pub(crate) fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RobotConfig::default().validate().unwrap();
    }

    #[test]
    fn shipped_default_file_matches_defaults() {
        let config = RobotConfig::from_yaml_str(include_str!("../config/default.yaml")).unwrap();
        assert_eq!(config, RobotConfig::default());
    }

    #[test]
    fn yaml_round_trip_keeps_values() {
        let mut config = RobotConfig::default();
        config.steering.force_engage_threshold_deg = 20.0;
        config.drivetrain.half_width = 55.0;

        let yaml = config.to_yaml_string().unwrap();
        let parsed = RobotConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let yaml = "steering:\n  force_engage_threshold_deg: 10.0\n";
        let config = RobotConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.steering.force_engage_threshold_deg, 10.0);
        assert_eq!(config.steering.heading_pid, SteeringConfig::default().heading_pid);
        assert_eq!(config.drivetrain, DrivetrainConfig::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = RobotConfig::from_yaml_str("drivetrain:\n  half_width: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "drivetrain.half_width", .. }));

        let err = RobotConfig::from_yaml_str("input:\n  deadzone: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "input.deadzone", .. }));

        let err = RobotConfig::from_yaml_str("chassis:\n  heading_pid:\n    dt: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "chassis.heading_pid", .. }));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = RobotConfig::from_yaml_str("steering: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RobotConfig::from_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
