//! # Geographic Coordinates
//!
//! A [`GeographicPoint`] is a position on or above the Earth expressed as
//! latitude and longitude in degrees plus an altitude in meters.
//!
//! Longitude is stored exactly as given: a point may carry `190.0` or
//! `-540.0` and it is the transform that decides which longitude domain the
//! value is folded into (see [`LongitudeMode`](super::LongitudeMode)).
//!
//! ## Examples
//!
//! ```rust
//! use geonav::coordinates::GeographicPoint;
//!
//! let boulder = GeographicPoint::new(40.015, -105.27, 1655.0);
//! assert_eq!(boulder.latitude, 40.015);
//!
//! // Points built from two values sit on the surface
//! let surface = GeographicPoint::try_from(&[40.015, -105.27][..]).unwrap();
//! assert_eq!(surface.altitude, 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GeoNavError, Result};

/// A latitude/longitude/altitude triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicPoint {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east, unbounded
    pub longitude: f64,
    /// Altitude in meters above the reference surface
    #[serde(default)]
    pub altitude: f64,
}

impl GeographicPoint {
    /// Creates a new geographic point
    ///
    /// # Arguments
    ///
    /// * `latitude` - Latitude in degrees
    /// * `longitude` - Longitude in degrees
    /// * `altitude` - Altitude in meters
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        GeographicPoint {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Creates a point at zero altitude
    pub fn surface(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, 0.0)
    }

    /// A point with every component set to NaN
    pub fn nan() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }

    /// True when the horizontal position is unknown
    ///
    /// Altitude is not considered: a missing altitude still leaves a usable
    /// location on the map.
    pub fn is_missing(&self) -> bool {
        self.latitude.is_nan() || self.longitude.is_nan()
    }

    /// Returns a copy with the longitude replaced
    pub fn with_longitude(&self, longitude: f64) -> Self {
        Self { longitude, ..*self }
    }
}

impl TryFrom<&[f64]> for GeographicPoint {
    type Error = GeoNavError;

    /// Builds a point from `[lat, lon]` or `[lat, lon, alt]`
    fn try_from(values: &[f64]) -> Result<Self> {
        match *values {
            [latitude, longitude] => Ok(Self::surface(latitude, longitude)),
            [latitude, longitude, altitude] => Ok(Self::new(latitude, longitude, altitude)),
            _ => Err(GeoNavError::InvalidDimension {
                expected: "2 or 3",
                found: values.len(),
            }),
        }
    }
}

impl fmt::Display for GeographicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat {:.6}°, lon {:.6}°, alt {:.1} m",
            self.latitude, self.longitude, self.altitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_slice() {
        let p = GeographicPoint::try_from(&[10.0, 20.0, 30.0][..]).unwrap();
        assert_eq!(p, GeographicPoint::new(10.0, 20.0, 30.0));

        let p = GeographicPoint::try_from(&[10.0, 20.0][..]).unwrap();
        assert_eq!(p.altitude, 0.0);
    }

    #[test]
    fn test_try_from_rejects_wrong_dimension() {
        for values in [&[][..], &[1.0][..], &[1.0, 2.0, 3.0, 4.0][..]] {
            match GeographicPoint::try_from(values) {
                Err(GeoNavError::InvalidDimension { found, .. }) => {
                    assert_eq!(found, values.len())
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn test_is_missing_ignores_altitude() {
        assert!(GeographicPoint::surface(f64::NAN, 0.0).is_missing());
        assert!(GeographicPoint::surface(0.0, f64::NAN).is_missing());
        assert!(!GeographicPoint::new(0.0, 0.0, f64::NAN).is_missing());
        assert!(GeographicPoint::nan().is_missing());
    }

    #[test]
    fn test_deserialize_without_altitude() {
        let p: GeographicPoint =
            serde_json::from_str(r#"{"latitude": 39.5, "longitude": -108.0}"#).unwrap();
        assert_eq!(p, GeographicPoint::surface(39.5, -108.0));
    }
}
