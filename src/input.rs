//! Drive intent from input devices
//!
//! Raw device polling stays outside the core. Callers hand over a gamepad
//! sample (if a pad is connected) and key press/release events; this module
//! turns them into the per-tick [`DriveIntent`] snapshot.

use nalgebra::Vector2;

use crate::config::InputConfig;

/// Desired chassis motion for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveIntent {
    /// Translation request in world coordinates
    pub forward: Vector2<f64>,
    /// Rotation request, positive increases the chassis angle
    pub turn: f64,
}

impl Default for DriveIntent {
    fn default() -> Self {
        DriveIntent::ZERO
    }
}

impl DriveIntent {
    /// No motion requested.
    pub const ZERO: DriveIntent = DriveIntent {
        forward: Vector2::new(0.0, 0.0),
        turn: 0.0,
    };

    /// Build an intent from its parts
    pub fn new(forward: Vector2<f64>, turn: f64) -> Self {
        DriveIntent { forward, turn }
    }

    /// Whether any axis asks for motion
    pub fn is_active(&self) -> bool {
        self.forward.x != 0.0 || self.forward.y != 0.0 || self.turn != 0.0
    }
}

/// Collapse `|value| <= threshold` to zero; a missing axis reads as zero.
pub fn deadzone(value: Option<f64>, threshold: f64) -> f64 {
    match value {
        Some(v) if v.abs() > threshold => v,
        _ => 0.0,
    }
}

/// One poll of a gamepad's analog axes
///
/// Axis 0 and 1 are the translation stick, axis 2 the turn axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadSample {
    /// Raw axis values in `[-1, 1]`
    pub axes: Vec<f64>,
}

impl GamepadSample {
    /// Wrap a list of axis values
    pub fn new(axes: Vec<f64>) -> Self {
        GamepadSample { axes }
    }

    fn axis(&self, index: usize) -> Option<f64> {
        self.axes.get(index).copied()
    }
}

/// Keys bound to driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Map a browser-style key name; unbound keys give `None`.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            _ => None,
        }
    }
}

/// Turns input events and samples into drive intents
#[derive(Debug, Clone)]
pub struct InputMapper {
    config: InputConfig,
    keyboard: DriveIntent,
}

impl InputMapper {
    /// Create a mapper with nothing held
    pub fn new(config: &InputConfig) -> Self {
        InputMapper {
            config: *config,
            keyboard: DriveIntent::ZERO,
        }
    }

    /// A key went down; the last pressed key on an axis wins.
    pub fn key_down(&mut self, key: Key) {
        let step = self.config.key_forward_step;
        let turn = self.config.key_turn_step;
        match key {
            Key::W => self.keyboard.forward.y = -step,
            Key::S => self.keyboard.forward.y = step,
            Key::A => self.keyboard.forward.x = -step,
            Key::D => self.keyboard.forward.x = step,
            Key::ArrowLeft => self.keyboard.turn = -turn,
            Key::ArrowRight => self.keyboard.turn = turn,
        }
    }

    /// A key came up; its whole axis drops to zero.
    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::W | Key::S => self.keyboard.forward.y = 0.0,
            Key::A | Key::D => self.keyboard.forward.x = 0.0,
            Key::ArrowLeft | Key::ArrowRight => self.keyboard.turn = 0.0,
        }
    }

    /// Map one gamepad sample, ignoring the keyboard
    pub fn from_gamepad(&self, sample: &GamepadSample) -> DriveIntent {
        let dz = self.config.deadzone;
        DriveIntent {
            forward: Vector2::new(
                deadzone(sample.axis(0), dz) * self.config.forward_scale,
                deadzone(sample.axis(1), dz) * self.config.forward_scale,
            ),
            turn: deadzone(sample.axis(2), dz) * self.config.turn_scale,
        }
    }

    /// Intent for this tick: a connected gamepad overrides the keyboard.
    pub fn sample(&self, gamepad: Option<&GamepadSample>) -> DriveIntent {
        match gamepad {
            Some(sample) => self.from_gamepad(sample),
            None => self.keyboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.2), 0.0)]
    #[case(Some(-0.2), 0.0)]
    #[case(Some(0.1), 0.0)]
    #[case(Some(0.21), 0.21)]
    #[case(Some(-0.9), -0.9)]
    #[case(None, 0.0)]
    fn deadzone_boundaries(#[case] value: Option<f64>, #[case] expected: f64) {
        assert_eq!(deadzone(value, 0.2), expected);
    }

    #[test]
    fn keyboard_press_and_release() {
        let mut mapper = InputMapper::new(&InputConfig::default());
        mapper.key_down(Key::W);
        mapper.key_down(Key::D);
        mapper.key_down(Key::ArrowRight);

        let intent = mapper.sample(None);
        assert_eq!(intent.forward, Vector2::new(0.1, -0.1));
        assert_eq!(intent.turn, 0.4);

        mapper.key_up(Key::S);
        mapper.key_up(Key::ArrowLeft);
        let intent = mapper.sample(None);
        assert_eq!(intent.forward, Vector2::new(0.1, 0.0));
        assert_eq!(intent.turn, 0.0);
        assert!(intent.is_active());

        mapper.key_up(Key::A);
        assert!(!mapper.sample(None).is_active());
    }

    #[test]
    fn gamepad_overrides_keyboard() {
        let mut mapper = InputMapper::new(&InputConfig::default());
        mapper.key_down(Key::W);

        let pad = GamepadSample::new(vec![0.5, 0.1, -1.0]);
        let intent = mapper.sample(Some(&pad));
        assert_eq!(intent.forward, Vector2::new(0.5 * 0.2, 0.0));
        assert_eq!(intent.turn, -0.5);
    }

    #[test]
    fn short_gamepad_sample_reads_missing_axes_as_zero() {
        let mapper = InputMapper::new(&InputConfig::default());
        let intent = mapper.sample(Some(&GamepadSample::new(vec![])));
        assert_eq!(intent, DriveIntent::ZERO);
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("q"), None);
    }
}
