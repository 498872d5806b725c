//! # Globe Transform
//!
//! Globe displays place the Earth on a sphere centered at the display
//! origin. Latitude and longitude become a direction and altitude becomes a
//! radius through a [`VerticalScale`] whose display range starts at 1, so the
//! surface is the unit sphere:
//!
//! - `x = r · cos(lat) · cos(lon)`
//! - `y = r · cos(lat) · sin(lon)`
//! - `z = r · sin(lat)`
//!
//! ## Examples
//!
//! ```rust
//! use geonav::{GeographicPoint, GlobeAdapter};
//!
//! let globe = GlobeAdapter::default();
//! let north_pole = globe.to_display(&GeographicPoint::surface(90.0, 0.0));
//! assert!(north_pole.x.abs() < 1e-12);
//! assert!((north_pole.z - 1.0).abs() < 1e-12);
//! ```

use nalgebra::Vector3;

use crate::adapter::VerticalScale;
use crate::constants::{DEFAULT_MAX_ALTITUDE, DEFAULT_MIN_ALTITUDE, DEG2RAD, RAD2DEG};
use crate::coordinates::{DisplayPoint, GeographicPoint};
use crate::Result;

/// Radius of the top of the default altitude range
const DEFAULT_OUTER_RADIUS: f64 = 1.25;

/// Bidirectional transform between geographic and globe display coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeAdapter {
    vertical: VerticalScale,
}

impl GlobeAdapter {
    /// Creates a globe mapping `[min_altitude, max_altitude]` onto radii
    /// `[1, outer_radius]`
    pub fn new(min_altitude: f64, max_altitude: f64, outer_radius: f64) -> Result<Self> {
        Ok(GlobeAdapter {
            vertical: VerticalScale::with_display_range(
                min_altitude,
                max_altitude,
                1.0,
                outer_radius,
            )?,
        })
    }

    /// Display radius of an altitude
    pub fn radius_at(&self, altitude: f64) -> f64 {
        self.vertical.to_display(altitude)
    }

    /// Radius of the Earth's surface in display units
    pub fn surface_radius(&self) -> f64 {
        1.0
    }

    /// Converts a geographic point to globe display coordinates
    pub fn to_display(&self, point: &GeographicPoint) -> DisplayPoint {
        let radius = self.radius_at(point.altitude);
        let lat = point.latitude * DEG2RAD;
        let lon = point.longitude * DEG2RAD;
        let cos_lat = lat.cos();
        DisplayPoint::new(
            radius * cos_lat * lon.cos(),
            radius * cos_lat * lon.sin(),
            radius * lat.sin(),
        )
    }

    /// Converts a globe display point back to geographic coordinates
    ///
    /// The origin has no direction and maps to NaN latitude and longitude.
    pub fn to_geographic(&self, point: &DisplayPoint) -> GeographicPoint {
        let v: Vector3<f64> = point.to_vector3();
        let radius = v.norm();
        let altitude = self.vertical.to_altitude(radius);
        if radius == 0.0 || radius.is_nan() {
            return GeographicPoint::new(f64::NAN, f64::NAN, altitude);
        }
        let lat = (v.z / radius).clamp(-1.0, 1.0).asin();
        let lon = v.y.atan2(v.x);
        GeographicPoint::new(lat * RAD2DEG, lon * RAD2DEG, altitude)
    }

    pub fn to_display_batch(&self, points: &[GeographicPoint]) -> Vec<DisplayPoint> {
        points.iter().map(|p| self.to_display(p)).collect()
    }

    pub fn to_geographic_batch(&self, points: &[DisplayPoint]) -> Vec<GeographicPoint> {
        points.iter().map(|p| self.to_geographic(p)).collect()
    }
}

impl Default for GlobeAdapter {
    fn default() -> Self {
        GlobeAdapter {
            vertical: VerticalScale::with_display_range(
                DEFAULT_MIN_ALTITUDE,
                DEFAULT_MAX_ALTITUDE,
                1.0,
                DEFAULT_OUTER_RADIUS,
            )
            .unwrap_or_default(),
        }
    }
}

/// Nearest intersection of a ray with a sphere centered at the origin
///
/// Returns `None` when the ray misses the sphere or the sphere lies entirely
/// behind the ray origin.
pub fn intersect_sphere(
    origin: &Vector3<f64>,
    direction: &Vector3<f64>,
    radius: f64,
) -> Option<Vector3<f64>> {
    let a = direction.dot(direction);
    if a == 0.0 || !a.is_finite() {
        return None;
    }
    let b = 2.0 * origin.dot(direction);
    let c = origin.dot(origin) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant.is_nan() || discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = (-b - root) / (2.0 * a);
    let far = (-b + root) / (2.0 * a);
    let t = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };
    Some(origin + direction * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0, 0.0)]
    #[case(40.0, -105.0, 1600.0)]
    #[case(-33.9, 151.2, 12_000.0)]
    #[case(89.0, 179.0, 0.0)]
    fn test_round_trip(#[case] lat: f64, #[case] lon: f64, #[case] alt: f64) {
        let globe = GlobeAdapter::default();
        let back = globe.to_geographic(&globe.to_display(&GeographicPoint::new(lat, lon, alt)));
        assert_relative_eq!(back.latitude, lat, epsilon = 1e-9);
        assert_relative_eq!(back.longitude, lon, epsilon = 1e-9);
        assert_relative_eq!(back.altitude, alt, epsilon = 1e-6);
    }

    #[test]
    fn test_surface_is_unit_sphere() {
        let globe = GlobeAdapter::default();
        let p = globe.to_display(&GeographicPoint::surface(12.0, 34.0));
        assert_relative_eq!(p.magnitude(), 1.0, epsilon = 1e-12);

        let top = globe.to_display(&GeographicPoint::new(0.0, 0.0, 16_000.0));
        assert_relative_eq!(top.x, 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_origin_has_no_location() {
        let globe = GlobeAdapter::default();
        assert!(globe
            .to_geographic(&DisplayPoint::new(0.0, 0.0, 0.0))
            .is_missing());
        assert!(globe.to_geographic(&DisplayPoint::nan()).is_missing());
    }

    #[test]
    fn test_ray_hits_near_side() {
        let hit = intersect_sphere(&Vector3::new(0.0, 0.0, 5.0), &Vector3::new(0.0, 0.0, -1.0), 1.0)
            .unwrap();
        assert_relative_eq!(hit, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_ray_misses() {
        assert!(intersect_sphere(&Vector3::new(2.0, 0.0, 5.0), &Vector3::new(0.0, 0.0, -1.0), 1.0)
            .is_none());
        assert!(intersect_sphere(&Vector3::new(0.0, 0.0, 5.0), &Vector3::new(0.0, 0.0, 1.0), 1.0)
            .is_none());
        assert!(intersect_sphere(&Vector3::zeros(), &Vector3::zeros(), 1.0).is_none());
    }

    #[test]
    fn test_ray_from_inside() {
        let hit = intersect_sphere(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(hit.x, 1.0, epsilon = 1e-12);
    }
}
