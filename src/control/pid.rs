//! Fixed-period PID loop

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, finite, invalid};

/// Gains and timing for a [`Pid`] loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Integral clamp; zero leaves the integral unbounded.
    pub i_max: f64,
    /// Period between updates. The default of one makes the gains per tick.
    pub dt: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        PidGains {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            i_max: 0.0,
            dt: 1.0,
        }
    }
}

impl PidGains {
    pub(crate) fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        for value in [self.kp, self.ki, self.kd, self.i_max] {
            finite(field, value)?;
        }
        if self.i_max < 0.0 {
            return Err(invalid(field, format!("i_max must not be negative, got {}", self.i_max)));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(invalid(field, format!("dt must be positive, got {}", self.dt)));
        }
        Ok(())
    }
}

/// Fixed-period PID loop
///
/// `output = kp*error + ki*integral + kd*derivative` with
/// `error = target - current`. The derivative is taken against the error of
/// the previous update, which starts at zero.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    target: f64,
    sum_error: f64,
    last_error: f64,
}

impl Pid {
    /// Loop with a target of zero
    pub fn new(gains: PidGains) -> Self {
        Pid {
            gains,
            target: 0.0,
            sum_error: 0.0,
            last_error: 0.0,
        }
    }

    /// Loop already aimed at `target`
    pub fn with_target(gains: PidGains, target: f64) -> Self {
        let mut pid = Pid::new(gains);
        pid.target = target;
        pid
    }

    /// Change the setpoint; accumulated history is kept
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Current setpoint
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Error seen by the most recent update
    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    /// Feed the measured value, get the control output
    pub fn update(&mut self, current: f64) -> f64 {
        let dt = self.gains.dt;
        let error = self.target - current;

        self.sum_error += error * dt;
        let i_max = self.gains.i_max;
        if i_max > 0.0 {
            self.sum_error = self.sum_error.clamp(-i_max, i_max);
        }

        let d_error = (error - self.last_error) / dt;
        self.last_error = error;

        self.gains.kp * error + self.gains.ki * self.sum_error + self.gains.kd * d_error
    }

    /// Drop accumulated integral and derivative history. The target is kept.
    pub fn reset(&mut self) {
        self.sum_error = 0.0;
        self.last_error = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gains(kp: f64, ki: f64, kd: f64) -> PidGains {
        PidGains { kp, ki, kd, ..PidGains::default() }
    }

    #[test]
    fn proportional_only() {
        let mut pid = Pid::with_target(gains(0.5, 0.0, 0.0), 10.0);
        assert_eq!(pid.update(4.0), 3.0);
        assert_eq!(pid.last_error(), 6.0);
    }

    #[test]
    fn derivative_uses_previous_error() {
        let mut pid = Pid::with_target(gains(0.0, 0.0, 1.0), 10.0);
        // first update differentiates against a zero starting error
        assert_eq!(pid.update(0.0), 10.0);
        assert_eq!(pid.update(4.0), -4.0);
    }

    #[test]
    fn integral_is_clamped() {
        let mut pid = Pid::with_target(
            PidGains { ki: 1.0, i_max: 5.0, ..PidGains::default() },
            10.0,
        );
        pid.update(0.0);
        assert_eq!(pid.update(0.0), 5.0);
    }

    #[test]
    fn dt_scales_integral_and_derivative() {
        let mut pid = Pid::with_target(PidGains { ki: 1.0, kd: 1.0, dt: 0.5, ..PidGains::default() }, 2.0);
        // integral 2*0.5 = 1, derivative (2-0)/0.5 = 4
        assert_eq!(pid.update(0.0), 5.0);
    }

    #[test]
    fn reset_clears_history_but_keeps_target() {
        let mut pid = Pid::with_target(gains(1.0, 1.0, 1.0), 3.0);
        pid.update(0.0);
        pid.reset();

        assert_eq!(pid.target(), 3.0);
        assert_eq!(pid.last_error(), 0.0);
        assert_eq!(pid.update(3.0), 0.0);
    }

    #[test]
    fn gain_validation() {
        assert!(PidGains::default().validate("pid").is_ok());
        assert!(PidGains { dt: -1.0, ..PidGains::default() }.validate("pid").is_err());
        assert!(PidGains { i_max: -1.0, ..PidGains::default() }.validate("pid").is_err());
        assert!(PidGains { kp: f64::NAN, ..PidGains::default() }.validate("pid").is_err());
    }
}
