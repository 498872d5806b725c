//! Bearing and distance on the Earth's surface
//!
//! The transect projector only needs one primitive from geodesy: the initial
//! bearing and the surface distance from one point to another. [`Geodesic`]
//! names that primitive so a more precise ellipsoidal solution can replace
//! the spherical [`GreatCircle`] default.

use std::fmt;

use crate::constants::{DEG2RAD, EARTH_RADIUS_KM, RAD2DEG};

/// Direction and distance from one point to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bearing {
    /// Initial bearing in degrees clockwise from north, in [0, 360)
    pub azimuth: f64,
    /// Surface distance in kilometers
    pub distance: f64,
}

/// Source of bearings between geographic positions
pub trait Geodesic: fmt::Debug + Send + Sync {
    /// Bearing from `(from_lat, from_lon)` to `(to_lat, to_lon)`, all degrees
    fn bearing(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> Bearing;
}

/// Spherical great-circle geodesy
///
/// # Examples
///
/// ```rust
/// use geonav::geodesy::{Geodesic, GreatCircle};
///
/// let b = GreatCircle::default().bearing(0.0, 0.0, 0.0, 1.0);
/// assert!((b.azimuth - 90.0).abs() < 1e-9);
/// assert!((b.distance - 111.195).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatCircle {
    radius_km: f64,
}

impl GreatCircle {
    /// Great-circle geodesy on a sphere of the given radius
    pub fn with_radius(radius_km: f64) -> Self {
        GreatCircle { radius_km }
    }

    /// Sphere radius in kilometers
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

impl Default for GreatCircle {
    fn default() -> Self {
        Self::with_radius(EARTH_RADIUS_KM)
    }
}

impl Geodesic for GreatCircle {
    fn bearing(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> Bearing {
        let phi1 = from_lat * DEG2RAD;
        let phi2 = to_lat * DEG2RAD;
        let dphi = phi2 - phi1;
        let dlambda = (to_lon - from_lon) * DEG2RAD;

        // Haversine keeps precision for short segments
        let a = (dphi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        let central = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

        let y = dlambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
        let azimuth = (y.atan2(x) * RAD2DEG).rem_euclid(360.0);

        Bearing {
            azimuth,
            distance: self.radius_km * central,
        }
    }
}
