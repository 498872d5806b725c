//! Map projections
//!
//! A [`Projection`] maps latitude/longitude onto a planar coordinate system
//! and back. The display layer only needs a handful of facts about it: its
//! default bounding rectangle, the order of its planar axes, whether it is a
//! plain lat/lon grid, and which longitudes it covers.

pub mod latlon;
pub mod mercator;

pub use latlon::LatLonProjection;
pub use mercator::MercatorProjection;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GeoNavError, Result};

/// Bounding rectangle of a projection's planar domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapArea {
    /// Left edge
    pub x: f64,
    /// Bottom edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl MapArea {
    /// Creates a map area, rejecting empty or non-finite rectangles
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let area = MapArea {
            x,
            y,
            width,
            height,
        };
        area.validate()?;
        Ok(area)
    }

    /// Checks that the rectangle has a finite, positive size
    pub fn validate(&self) -> Result<()> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(GeoNavError::InvalidMapArea(format!(
                "origin ({}, {}) is not finite",
                self.x, self.y
            )));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(GeoNavError::InvalidMapArea(format!(
                "width {} must be positive",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(GeoNavError::InvalidMapArea(format!(
                "height {} must be positive",
                self.height
            )));
        }
        Ok(())
    }

    /// Horizontal center of the rectangle
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center of the rectangle
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Right edge
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }
}

/// A forward/inverse mapping between latitude/longitude and a planar system
///
/// Implementations are immutable values. Points outside the projection's
/// domain map to NaN rather than to an error.
pub trait Projection: fmt::Debug + Send + Sync {
    /// The rectangle the projection is normally displayed over
    fn default_map_area(&self) -> MapArea;

    /// True when `project` returns `[x, y]`, false for `[y, x]`
    fn is_xy_order(&self) -> bool {
        true
    }

    /// True for plain equirectangular lat/lon grids
    fn is_lat_lon(&self) -> bool {
        false
    }

    /// Longitudes covered by the projection, if it declares them
    fn longitude_range(&self) -> Option<(f64, f64)> {
        None
    }

    /// Projects a latitude/longitude pair (degrees) onto the plane
    ///
    /// The result is in the projection's axis order.
    fn project(&self, lat: f64, lon: f64) -> [f64; 2];

    /// Inverse of [`project`](Projection::project), returning `(lat, lon)`
    fn unproject(&self, planar: [f64; 2]) -> (f64, f64);
}
