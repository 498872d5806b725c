//! Equirectangular lat/lon projection

use serde::{Deserialize, Serialize};

use super::{MapArea, Projection};

/// Plain latitude/longitude grid: x is longitude, y is latitude
///
/// # Examples
///
/// ```rust
/// use geonav::projection::{LatLonProjection, Projection};
///
/// let world = LatLonProjection::world();
/// assert_eq!(world.project(40.0, -105.0), [-105.0, 40.0]);
/// assert!(world.project(95.0, 0.0)[1].is_nan());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonProjection {
    area: MapArea,
}

impl LatLonProjection {
    /// Creates a projection displayed over the given lat/lon rectangle
    pub fn new(area: MapArea) -> Self {
        LatLonProjection { area }
    }

    /// The whole globe, longitudes in [-180, 180]
    pub fn world() -> Self {
        Self::new(MapArea {
            x: -180.0,
            y: -90.0,
            width: 360.0,
            height: 180.0,
        })
    }
}

impl Default for LatLonProjection {
    fn default() -> Self {
        Self::world()
    }
}

impl Projection for LatLonProjection {
    fn default_map_area(&self) -> MapArea {
        self.area
    }

    fn is_lat_lon(&self) -> bool {
        true
    }

    fn longitude_range(&self) -> Option<(f64, f64)> {
        Some((self.area.x, self.area.max_x()))
    }

    fn project(&self, lat: f64, lon: f64) -> [f64; 2] {
        if lat.abs() > 90.0 {
            return [f64::NAN, f64::NAN];
        }
        [lon, lat]
    }

    fn unproject(&self, planar: [f64; 2]) -> (f64, f64) {
        let [x, y] = planar;
        if y.abs() > 90.0 {
            return (f64::NAN, f64::NAN);
        }
        (y, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longitude_range_follows_area() {
        let pacific = LatLonProjection::new(MapArea::new(100.0, -60.0, 160.0, 120.0).unwrap());
        assert_eq!(pacific.longitude_range(), Some((100.0, 260.0)));
        assert!(pacific.is_lat_lon());
        assert!(pacific.is_xy_order());
    }

    #[test]
    fn test_out_of_domain_is_nan() {
        let world = LatLonProjection::world();
        let [x, y] = world.project(-91.0, 0.0);
        assert!(x.is_nan() && y.is_nan());

        let (lat, lon) = world.unproject([0.0, 100.0]);
        assert!(lat.is_nan() && lon.is_nan());
    }
}
