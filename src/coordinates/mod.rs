//! Coordinate types shared by every display transform
//!
//! Geographic positions are stored as [`GeographicPoint`] (degrees, degrees,
//! meters) and normalized display positions as [`DisplayPoint`]. NaN in any
//! component marks a value that is undefined or off the display; it is carried
//! through every transform instead of being reported as an error.

pub mod display;
pub mod geographic;
pub mod longitude;

pub use display::DisplayPoint;
pub use geographic::GeographicPoint;
pub use longitude::{normalize_longitude, normalize_longitude_360, LongitudeMode};

/// Bitwise equality of two point slices
///
/// Unlike `==` on `f64`, NaN components compare equal to identical NaN
/// components, which makes the result usable as a cache key comparison.
pub fn same_points(a: &[GeographicPoint], b: &[GeographicPoint]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(p, q)| {
            p.latitude.to_bits() == q.latitude.to_bits()
                && p.longitude.to_bits() == q.longitude.to_bits()
                && p.altitude.to_bits() == q.altitude.to_bits()
        })
}
