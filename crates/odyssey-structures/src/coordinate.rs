// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Brain-space coordinates and the axis-aligned search cube.
*/

use crate::OdysseyDataError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A point in brain space (MNI or Talairach millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting NaN and infinite components.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, OdysseyDataError> {
        for (axis, value) in [("x", x), ("y", y), ("z", z)] {
            if !value.is_finite() {
                return Err(OdysseyDataError::NonFiniteCoordinate(format!(
                    "{} = {}",
                    axis, value
                )));
            }
        }
        Ok(Self { x, y, z })
    }

    /// Bit-exact key for equality lookups.
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::from(*self)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x: {}, y: {}, z: {}", self.x, self.y, self.z)
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from(value: (f64, f64, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
            z: value.2,
        }
    }
}

/// Hashable form of a [`Coordinate`] used by exact-match indices.
///
/// `-0.0` and `0.0` map to the same key so that `x == 0` matches both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey([u64; 3]);

impl From<Coordinate> for CoordinateKey {
    fn from(c: Coordinate) -> Self {
        fn bits(v: f64) -> u64 {
            if v == 0.0 {
                0.0f64.to_bits()
            } else {
                v.to_bits()
            }
        }
        CoordinateKey([bits(c.x), bits(c.y), bits(c.z)])
    }
}

/// Axis-aligned cube centred on a coordinate.
///
/// Membership is strict on all three axes: `center - r < p < center + r`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub center: Coordinate,
    pub radius: f64,
}

impl Cube {
    pub fn new(center: Coordinate, radius: f64) -> Result<Self, OdysseyDataError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(OdysseyDataError::BadParameters(format!(
                "cube radius must be positive and finite, got {}",
                radius
            )));
        }
        Ok(Self { center, radius })
    }

    pub fn contains(&self, p: &Coordinate) -> bool {
        let r = self.radius;
        let c = &self.center;
        (c.x - r < p.x && p.x < c.x + r)
            && (c.y - r < p.y && p.y < c.y + r)
            && (c.z - r < p.z && p.z < c.z + r)
    }

    /// Exclusive bounds along the x axis, used by sorted indices.
    pub fn x_bounds(&self) -> (f64, f64) {
        (self.center.x - self.radius, self.center.x + self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_is_strict_on_every_axis() {
        let cube = Cube::new(Coordinate::new(0.0, 0.0, 0.0).unwrap(), 3.0).unwrap();
        assert!(cube.contains(&Coordinate::new(2.9, -2.9, 0.0).unwrap()));
        assert!(!cube.contains(&Coordinate::new(3.0, 0.0, 0.0).unwrap()));
        assert!(!cube.contains(&Coordinate::new(0.0, -3.0, 0.0).unwrap()));
        assert!(!cube.contains(&Coordinate::new(0.0, 0.0, 3.0).unwrap()));
        // Corners of the cube are inside even though they are outside the sphere
        assert!(cube.contains(&Coordinate::new(2.5, 2.5, 2.5).unwrap()));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY, 0.0).is_err());
        let origin = Coordinate::new(0.0, 0.0, 0.0).unwrap();
        assert!(Cube::new(origin, 0.0).is_err());
        assert!(Cube::new(origin, -1.0).is_err());
    }

    #[test]
    fn test_negative_zero_shares_key() {
        let a = Coordinate::new(0.0, 1.0, 2.0).unwrap();
        let b = Coordinate::new(-0.0, 1.0, 2.0).unwrap();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_display_matches_root_label() {
        let c = Coordinate::new(40.0, -45.0, -25.0).unwrap();
        assert_eq!(c.to_string(), "x: 40, y: -45, z: -25");
    }
}
