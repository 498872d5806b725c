//! # Map Coordinate Adapter
//!
//! [`CoordinateAdapter`] converts between geographic coordinates and the
//! normalized display space of a map view in three stages:
//!
//! 1. **Longitude folding** per the [`LongitudeMode`] picked for the projection
//! 2. **Projection** onto the projection's planar system
//! 3. **Normalization** so the projection's default map area spans [-1, 1]
//!
//! Altitude is mapped independently onto z by a [`VerticalScale`].
//!
//! ## Normalization
//!
//! For a map area `(x, y, width, height)`:
//!
//! - `scale_x = width / 2`, `offset_x = x + scale_x`
//! - `scale_y = height / 2`, `offset_y = y + scale_y`
//! - `display_x = (planar_x - offset_x) / scale_x`
//!
//! Offset and scale are fixed when the adapter is built. A new projection
//! needs a new adapter.
//!
//! ## Examples
//!
//! ```rust
//! use geonav::{CoordinateAdapter, GeographicPoint, LatLonProjection};
//!
//! let adapter = CoordinateAdapter::new(LatLonProjection::world()).unwrap();
//! let display = adapter.to_display(&GeographicPoint::surface(45.0, 90.0));
//! assert_eq!(display.x, 0.5);
//! assert_eq!(display.y, 0.5);
//!
//! let back = adapter.to_geographic(&display);
//! assert_eq!(back.latitude, 45.0);
//! assert_eq!(back.longitude, 90.0);
//! ```

pub mod vertical;

pub use vertical::VerticalScale;

use crate::coordinates::{DisplayPoint, GeographicPoint, LongitudeMode};
use crate::projection::Projection;
use crate::Result;

/// Bidirectional transform between geographic and map display coordinates
#[derive(Debug, Clone)]
pub struct CoordinateAdapter<P> {
    projection: P,
    offset_x: f64,
    offset_y: f64,
    scale_x: f64,
    scale_y: f64,
    x_index: usize,
    y_index: usize,
    longitude_mode: LongitudeMode,
    vertical: VerticalScale,
}

impl<P: Projection> CoordinateAdapter<P> {
    /// Creates an adapter for a projection
    ///
    /// # Arguments
    ///
    /// * `projection` - The map projection; its default map area becomes the
    ///   [-1, 1] display square
    ///
    /// # Errors
    ///
    /// Returns `InvalidMapArea` when the projection's default map area is
    /// empty or not finite.
    pub fn new(projection: P) -> Result<Self> {
        let area = projection.default_map_area();
        area.validate()?;

        let scale_x = area.width / 2.0;
        let scale_y = area.height / 2.0;
        let (x_index, y_index) = if projection.is_xy_order() {
            (0, 1)
        } else {
            (1, 0)
        };
        let longitude_mode = LongitudeMode::for_projection(&projection);
        log::debug!(
            "Coordinate adapter for {:?}: longitude mode {:?}",
            projection,
            longitude_mode
        );

        Ok(CoordinateAdapter {
            offset_x: area.x + scale_x,
            offset_y: area.y + scale_y,
            scale_x,
            scale_y,
            x_index,
            y_index,
            longitude_mode,
            vertical: VerticalScale::default(),
            projection,
        })
    }

    /// Replaces the altitude scaling
    pub fn with_vertical_scale(mut self, vertical: VerticalScale) -> Self {
        self.vertical = vertical;
        self
    }

    /// The wrapped projection
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Longitude folding chosen for the projection
    pub fn longitude_mode(&self) -> LongitudeMode {
        self.longitude_mode
    }

    /// `(scale_x, scale_y)` applied after projection
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// `(offset_x, offset_y)` applied after projection
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Altitude scaling in use
    pub fn vertical_scale(&self) -> &VerticalScale {
        &self.vertical
    }

    /// Converts a geographic point to display coordinates
    ///
    /// A point the projection cannot represent yields NaN x and y; z is the
    /// scaled altitude regardless.
    pub fn to_display(&self, point: &GeographicPoint) -> DisplayPoint {
        let lon = self.longitude_mode.apply(point.longitude);
        let planar = self.projection.project(point.latitude, lon);
        let px = planar[self.x_index];
        let py = planar[self.y_index];
        let z = self.vertical.to_display(point.altitude);

        if px.is_nan() || py.is_nan() {
            return DisplayPoint::new(f64::NAN, f64::NAN, z);
        }

        DisplayPoint::new(
            (px - self.offset_x) / self.scale_x,
            (py - self.offset_y) / self.scale_y,
            z,
        )
    }

    /// Converts a display point back to geographic coordinates
    ///
    /// The returned longitude is folded with the same mode used on the way in.
    pub fn to_geographic(&self, point: &DisplayPoint) -> GeographicPoint {
        let altitude = self.vertical.to_altitude(point.z);
        if point.is_off_display() {
            return GeographicPoint::new(f64::NAN, f64::NAN, altitude);
        }

        let mut planar = [0.0; 2];
        planar[self.x_index] = point.x * self.scale_x + self.offset_x;
        planar[self.y_index] = point.y * self.scale_y + self.offset_y;
        let (lat, lon) = self.projection.unproject(planar);

        GeographicPoint::new(lat, self.longitude_mode.apply(lon), altitude)
    }

    /// Converts a batch of geographic points
    pub fn to_display_batch(&self, points: &[GeographicPoint]) -> Vec<DisplayPoint> {
        points.iter().map(|p| self.to_display(p)).collect()
    }

    /// Converts a batch of display points
    pub fn to_geographic_batch(&self, points: &[DisplayPoint]) -> Vec<GeographicPoint> {
        points.iter().map(|p| self.to_geographic(p)).collect()
    }
}

impl<P: PartialEq> PartialEq for CoordinateAdapter<P> {
    /// Two adapters are equal when their projections are equal
    fn eq(&self, other: &Self) -> bool {
        self.projection == other.projection
    }
}
