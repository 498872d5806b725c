//! # Display Coordinates
//!
//! A [`DisplayPoint`] is a position in the normalized cartesian space shared
//! by all display transforms. The visible region nominally spans [-1, 1] on
//! each axis, but values are never clamped: a point far outside the map area
//! simply lands outside that range.
//!
//! ## Axis Convention
//!
//! - **X**: Horizontal, increasing to the right (east on a map, along the
//!   line on a transect)
//! - **Y**: Vertical, increasing upward (north on a map, altitude on a
//!   transect)
//! - **Z**: Depth, increasing toward the viewer
//!
//! ## Examples
//!
//! ```rust
//! use geonav::coordinates::DisplayPoint;
//!
//! let p = DisplayPoint::new(0.5, -0.25, 0.0);
//! let v = p.to_vector3();
//! assert_eq!(DisplayPoint::from_vector3(&v), p);
//!
//! assert!(DisplayPoint::nan().is_nan());
//! ```

use nalgebra::{Point3, Vector3};
use std::ops::{Add, Sub};

use crate::{GeoNavError, Result};

/// A position in normalized display space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
    /// Depth component
    pub z: f64,
}

impl DisplayPoint {
    /// Creates a new display point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        DisplayPoint { x, y, z }
    }

    /// A point with every component set to NaN
    pub fn nan() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }

    /// True when any component is NaN
    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// True when the horizontal position is undefined
    pub fn is_off_display(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Converts to a nalgebra Vector3
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from a nalgebra Vector3
    pub fn from_vector3(v: &Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Converts to a nalgebra Point3
    pub fn to_point3(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Creates from a nalgebra Point3
    pub fn from_point3(p: &Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }

    /// Euclidean distance from the origin
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl TryFrom<&[f64]> for DisplayPoint {
    type Error = GeoNavError;

    fn try_from(values: &[f64]) -> Result<Self> {
        match *values {
            [x, y, z] => Ok(Self::new(x, y, z)),
            _ => Err(GeoNavError::InvalidDimension {
                expected: "3",
                found: values.len(),
            }),
        }
    }
}

impl Add for DisplayPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        DisplayPoint::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for DisplayPoint {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        DisplayPoint::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}
