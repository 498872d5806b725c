//! Spherical Mercator projection
//!
//! Planar coordinates are kilometers on a sphere of radius
//! [`EARTH_RADIUS_KM`]. Longitudes are measured from a central meridian and
//! folded into ±180° of it, so a projection centered on the dateline
//! handles both 170° and -170° without a seam.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

use super::{MapArea, Projection};
use crate::constants::{DEG2RAD, EARTH_RADIUS_KM, RAD2DEG};
use crate::coordinates::normalize_longitude;

/// Latitude at which the default map area is cut off
const MAX_DISPLAY_LATITUDE: f64 = 85.0;

/// Mercator projection around a central meridian
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MercatorProjection {
    central_meridian: f64,
}

impl MercatorProjection {
    /// Creates a projection centered on `central_meridian` (degrees)
    pub fn new(central_meridian: f64) -> Self {
        MercatorProjection { central_meridian }
    }

    /// Central meridian in degrees
    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    fn northing(lat: f64) -> f64 {
        EARTH_RADIUS_KM * (FRAC_PI_4 + lat * DEG2RAD / 2.0).tan().ln()
    }
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Projection for MercatorProjection {
    fn default_map_area(&self) -> MapArea {
        let half_width = EARTH_RADIUS_KM * std::f64::consts::PI;
        let half_height = Self::northing(MAX_DISPLAY_LATITUDE);
        MapArea {
            x: -half_width,
            y: -half_height,
            width: 2.0 * half_width,
            height: 2.0 * half_height,
        }
    }

    fn project(&self, lat: f64, lon: f64) -> [f64; 2] {
        if lat.is_nan() || lat.abs() >= 90.0 {
            return [f64::NAN, f64::NAN];
        }
        let dlon = normalize_longitude(lon - self.central_meridian);
        [EARTH_RADIUS_KM * dlon * DEG2RAD, Self::northing(lat)]
    }

    fn unproject(&self, planar: [f64; 2]) -> (f64, f64) {
        let [x, y] = planar;
        let lat = 2.0 * (y / EARTH_RADIUS_KM).exp().atan() - std::f64::consts::FRAC_PI_2;
        let lon = self.central_meridian + x / EARTH_RADIUS_KM * RAD2DEG;
        (lat * RAD2DEG, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_and_meridian() {
        let mercator = MercatorProjection::new(0.0);
        let [x, y] = mercator.project(0.0, 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(y, 0.0, epsilon = 1e-9);

        let [x, _] = mercator.project(0.0, 90.0);
        assert_relative_eq!(x, EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let mercator = MercatorProjection::new(-100.0);
        for &(lat, lon) in &[(40.0, -105.0), (-33.9, -70.0), (60.0, -170.0), (10.0, -30.0)] {
            let (lat2, lon2) = mercator.unproject(mercator.project(lat, lon));
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
            assert_relative_eq!(normalize_longitude(lon2), lon, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_dateline_centered_projection_is_continuous() {
        let pacific = MercatorProjection::new(180.0);
        let [west, _] = pacific.project(0.0, 179.0);
        let [east, _] = pacific.project(0.0, -179.0);
        assert!(west < 0.0 && east > 0.0);
        assert_relative_eq!(east - west, EARTH_RADIUS_KM * 2.0 * DEG2RAD, epsilon = 1e-6);
    }

    #[test]
    fn test_poles_are_nan() {
        let mercator = MercatorProjection::default();
        assert!(mercator.project(90.0, 0.0)[1].is_nan());
        assert!(mercator.project(-90.0, 0.0)[0].is_nan());
    }
}
