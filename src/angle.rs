//! Wraparound-safe angle arithmetic
//!
//! Angles are stored in degrees and never normalized implicitly. Callers
//! normalize into `[0, 360)` at the points where a canonical heading is
//! needed, and use [`Angle::get_closest`] to pick the representation of an
//! angle that sits nearest to a target before differencing the two.

use std::fmt;
use std::ops::{Add, Sub};

use nalgebra::Vector2;

/// Angular value in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Angle {
    degrees: f64,
}

impl Angle {
    /// Half a turn.
    pub const HALF_TURN: Angle = Angle { degrees: 180.0 };
    /// One full turn.
    pub const FULL_TURN: Angle = Angle { degrees: 360.0 };

    /// Create an angle from degrees
    pub const fn from_degrees(degrees: f64) -> Self {
        Angle { degrees }
    }

    /// Create an angle from radians
    pub fn from_radians(radians: f64) -> Self {
        Angle {
            degrees: radians.to_degrees(),
        }
    }

    /// Direction of a 2D vector, normalized into `[0, 360)`.
    ///
    /// A vector with `x == 0` resolves straight from the sign of `y`:
    /// positive gives 90°, anything else (including the zero vector) 270°.
    pub fn vector(v: Vector2<f64>) -> Self {
        if v.x == 0.0 {
            return if v.y > 0.0 {
                Angle::from_degrees(90.0)
            } else {
                Angle::from_degrees(270.0)
            };
        }

        Angle::from_radians(v.y.atan2(v.x)).normalize()
    }

    /// Value in degrees
    pub fn degrees(self) -> f64 {
        self.degrees
    }

    /// Value in radians
    pub fn radians(self) -> f64 {
        self.degrees.to_radians()
    }

    /// Map into `[0, 360)` with a single floor division.
    pub fn normalize(self) -> Self {
        let turns = (self.degrees / 360.0).floor();
        let mut degrees = self.degrees - turns * 360.0;

        // Rounding can push tiny negatives up to exactly 360 or very large
        // magnitudes slightly below zero.
        if degrees >= 360.0 || degrees < 0.0 {
            degrees = 0.0;
        }

        Angle { degrees }
    }

    /// Absolute value
    pub fn abs(self) -> Self {
        Angle {
            degrees: self.degrees.abs(),
        }
    }

    /// Unsigned difference `|other - self|`.
    ///
    /// Only meaningful when both operands live in a comparable range, which
    /// is what [`Angle::get_closest`] arranges.
    pub fn distance(self, other: Angle) -> Self {
        (other - self).abs()
    }

    /// Pick whichever of `self - 360`, `self`, `self + 360` lies nearest to
    /// `target`. The un-shifted value is kept unless a shifted one is
    /// strictly closer than both alternatives.
    pub fn get_closest(self, target: Angle) -> Self {
        let below = self - Angle::FULL_TURN;
        let above = self + Angle::FULL_TURN;

        let here_distance = self.distance(target);
        let below_distance = below.distance(target);
        let above_distance = above.distance(target);

        if below_distance < here_distance && below_distance < above_distance {
            below
        } else if above_distance < here_distance && above_distance < below_distance {
            above
        } else {
            self
        }
    }

    /// The opposite direction, not normalized.
    pub fn rev(self) -> Self {
        self + Angle::HALF_TURN
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle {
            degrees: self.degrees + rhs.degrees,
        }
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle {
            degrees: self.degrees - rhs.degrees,
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Adding zero folds -0 into 0 so "-0°" never shows up.
        write!(f, "{}°", self.degrees.round() + 0.0)
    }
}
