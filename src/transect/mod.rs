//! # Transect Projection
//!
//! A transect is a vertical cross-section of the atmosphere along a polyline
//! of geographic points. Its display maps *distance along the line* to x and
//! altitude to y:
//!
//! - x = -1 at the first point, x = 1 at the last point
//! - y = altitude
//! - z = 0
//!
//! ## Projecting a Point
//!
//! An arbitrary point is attributed to the segment whose start point is
//! closest to it. With `d` the distance and `θ` the bearing from that start
//! point to the query, and `θs` the bearing of the segment:
//!
//! - cross-track distance = `d · sin(|θ − θs|)`
//! - along-track distance = `d · cos(|θ − θs|)`
//!
//! Points farther off the line than the caller's limit become NaN, which is
//! how a transect display culls data that does not belong on the plane.
//!
//! ## Examples
//!
//! ```rust
//! use geonav::{GeographicPoint, Transect, TransectProjector};
//!
//! let transect = Transect::from_lat_lon(&[(0.0, -100.0), (0.0, -90.0)]).unwrap();
//! let mut projector = TransectProjector::new(transect);
//!
//! let mid = projector.to_display(&GeographicPoint::new(0.0, -95.0, 3000.0), f64::NAN);
//! assert!(mid.x.abs() < 1e-9);
//! assert_eq!(mid.y, 3000.0);
//! ```

pub mod cache;

pub use cache::{CacheEntry, ResultCache};

use crate::config::TransectConfig;
use crate::constants::{
    DEG2RAD, TRANSECT_CACHE_CAPACITY, TRANSECT_CACHE_THRESHOLD, TRANSECT_DEFAULT_Z,
};
use crate::coordinates::{same_points, DisplayPoint, GeographicPoint};
use crate::geodesy::{Bearing, Geodesic, GreatCircle};
use crate::{GeoNavError, Result};

/// An ordered polyline of at least two geographic points
#[derive(Debug, Clone, PartialEq)]
pub struct Transect {
    points: Vec<GeographicPoint>,
}

impl Transect {
    /// Creates a transect
    ///
    /// # Errors
    ///
    /// Returns `TooFewTransectPoints` for fewer than two points.
    pub fn new(points: Vec<GeographicPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeoNavError::TooFewTransectPoints {
                found: points.len(),
            });
        }
        Ok(Transect { points })
    }

    /// Creates a transect from `(lat, lon)` pairs
    pub fn from_lat_lon(points: &[(f64, f64)]) -> Result<Self> {
        Self::new(
            points
                .iter()
                .map(|&(lat, lon)| GeographicPoint::surface(lat, lon))
                .collect(),
        )
    }

    pub fn points(&self) -> &[GeographicPoint] {
        &self.points
    }

    /// Mutable access to the points; the count cannot change through it
    pub fn points_mut(&mut self) -> &mut [GeographicPoint] {
        &mut self.points
    }

    /// Appends a point to the end of the line
    pub fn push(&mut self, point: GeographicPoint) {
        self.points.push(point);
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }
}

impl TryFrom<Vec<GeographicPoint>> for Transect {
    type Error = GeoNavError;

    fn try_from(points: Vec<GeographicPoint>) -> Result<Self> {
        Self::new(points)
    }
}

/// Per-segment data derived from a transect
#[derive(Debug, Clone, PartialEq)]
pub struct TransectGeometry {
    line: Vec<GeographicPoint>,
    bearings: Vec<f64>,
    distances: Vec<f64>,
    cumulative: Vec<f64>,
}

impl TransectGeometry {
    /// Computes bearings, segment lengths and cumulative lengths
    pub fn compute<G: Geodesic + ?Sized>(transect: &Transect, geodesic: &G) -> Self {
        let line = transect.points().to_vec();
        let mut bearings = Vec::with_capacity(line.len() - 1);
        let mut distances = Vec::with_capacity(line.len() - 1);
        let mut cumulative = Vec::with_capacity(line.len());
        cumulative.push(0.0);

        for pair in line.windows(2) {
            let b = geodesic.bearing(
                pair[0].latitude,
                pair[0].longitude,
                pair[1].latitude,
                pair[1].longitude,
            );
            bearings.push(b.azimuth);
            distances.push(b.distance);
            let previous = cumulative.last().copied().unwrap_or(0.0);
            cumulative.push(previous + b.distance);
        }

        TransectGeometry {
            line,
            bearings,
            distances,
            cumulative,
        }
    }

    /// Initial bearing of each segment in degrees
    pub fn segment_bearings(&self) -> &[f64] {
        &self.bearings
    }

    /// Length of each segment in kilometers
    pub fn segment_distances(&self) -> &[f64] {
        &self.distances
    }

    /// Distance from the first point to each point, in kilometers
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative
    }

    /// Length of the whole transect in kilometers
    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn describes(&self, transect: &Transect) -> bool {
        same_points(&self.line, transect.points())
    }

    /// Index of the segment containing `distance` along the line
    fn segment_at(&self, distance: f64) -> usize {
        let last = self.distances.len() - 1;
        if distance >= self.total_length() {
            last
        } else if distance > 0.0 {
            self.cumulative[1..]
                .iter()
                .position(|&end| end > distance)
                .unwrap_or(last)
        } else {
            0
        }
    }
}

/// Bidirectional transform between geographic and transect display coordinates
///
/// The projector watches its transect: every transform call compares the
/// current points against those the derived geometry was computed from and
/// recomputes (clearing the cache) when they differ.
#[derive(Debug, Clone)]
pub struct TransectProjector<G = GreatCircle> {
    transect: Transect,
    geometry: TransectGeometry,
    geodesic: G,
    cache: ResultCache,
    cache_threshold: usize,
    max_cross_track_km: f64,
}

impl TransectProjector<GreatCircle> {
    /// Creates a projector using spherical great-circle geodesy
    pub fn new(transect: Transect) -> Self {
        Self::with_geodesic(transect, GreatCircle::default())
    }
}

impl<G: Geodesic> TransectProjector<G> {
    /// Creates a projector using the given geodesy
    pub fn with_geodesic(transect: Transect, geodesic: G) -> Self {
        let geometry = TransectGeometry::compute(&transect, &geodesic);
        TransectProjector {
            transect,
            geometry,
            geodesic,
            cache: ResultCache::new(TRANSECT_CACHE_CAPACITY),
            cache_threshold: TRANSECT_CACHE_THRESHOLD,
            max_cross_track_km: f64::INFINITY,
        }
    }

    /// Applies cache sizing and the default cross-track limit
    pub fn with_config(mut self, config: &TransectConfig) -> Self {
        self.cache = ResultCache::new(config.cache_capacity);
        self.cache_threshold = config.cache_threshold;
        self.max_cross_track_km = config.max_cross_track_km.unwrap_or(f64::INFINITY);
        self
    }

    /// Sets the cross-track limit used when no explicit limit is given
    pub fn with_max_cross_track(mut self, km: f64) -> Self {
        self.max_cross_track_km = km;
        self
    }

    pub fn transect(&self) -> &Transect {
        &self.transect
    }

    /// Mutable access to the transect; changes are picked up on the next call
    pub fn transect_mut(&mut self) -> &mut Transect {
        &mut self.transect
    }

    /// Replaces the transect, returning whether it differed
    pub fn set_transect(&mut self, transect: Transect) -> bool {
        let changed = transect != self.transect;
        self.transect = transect;
        changed
    }

    /// Geometry of the current transect
    pub fn geometry(&mut self) -> &TransectGeometry {
        self.refresh();
        &self.geometry
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Cross-track limit applied by [`EarthTransform`](crate::EarthTransform) calls
    pub fn max_cross_track_km(&self) -> f64 {
        self.max_cross_track_km
    }

    pub fn default_z(&self) -> f64 {
        TRANSECT_DEFAULT_Z
    }

    fn refresh(&mut self) {
        if !self.geometry.describes(&self.transect) {
            log::debug!(
                "Transect changed ({} points), recomputing geometry",
                self.transect.point_count()
            );
            self.geometry = TransectGeometry::compute(&self.transect, &self.geodesic);
            self.cache.clear();
        }
    }

    /// Segment whose start point is nearest to `point`, with the bearing to it
    ///
    /// Ties go to the earliest segment. Returns `None` when no distance could
    /// be computed.
    pub fn closest_segment(&mut self, point: &GeographicPoint) -> Option<(usize, Bearing)> {
        self.refresh();
        self.nearest(point)
    }

    fn nearest(&self, point: &GeographicPoint) -> Option<(usize, Bearing)> {
        let starts = &self.geometry.line[..self.geometry.line.len() - 1];
        let mut best: Option<(usize, Bearing)> = None;
        for (index, start) in starts.iter().enumerate() {
            let bearing = self.geodesic.bearing(
                start.latitude,
                start.longitude,
                point.latitude,
                point.longitude,
            );
            let best_distance = best.map_or(f64::INFINITY, |(_, b)| b.distance);
            if bearing.distance < best_distance {
                best = Some((index, bearing));
            }
        }
        best
    }

    fn project(&self, point: &GeographicPoint, max_cross_track_km: f64) -> DisplayPoint {
        if point.is_missing() {
            return DisplayPoint::nan();
        }
        let Some((segment, bearing)) = self.nearest(point) else {
            return DisplayPoint::nan();
        };

        let delta = (bearing.azimuth - self.geometry.bearings[segment]).abs() * DEG2RAD;
        let cross_track = bearing.distance * delta.sin();
        // NaN limit never compares greater, so it is unbounded
        if cross_track.abs() > max_cross_track_km {
            return DisplayPoint::nan();
        }
        let along_track = bearing.distance * delta.cos();

        let x = -1.0
            + 2.0 * (self.geometry.cumulative[segment] + along_track)
                / self.geometry.total_length();
        DisplayPoint::new(x, point.altitude, TRANSECT_DEFAULT_Z)
    }

    /// Projects a point onto the transect plane
    ///
    /// # Arguments
    ///
    /// * `point` - Geographic position
    /// * `max_cross_track_km` - Points farther than this from the line map to
    ///   NaN; NaN means unbounded
    pub fn to_display(&mut self, point: &GeographicPoint, max_cross_track_km: f64) -> DisplayPoint {
        self.refresh();
        self.project(point, max_cross_track_km)
    }

    /// Projects a batch of points, caching large batches
    pub fn to_display_batch(
        &mut self,
        points: &[GeographicPoint],
        max_cross_track_km: f64,
    ) -> Vec<DisplayPoint> {
        self.refresh();
        let cacheable = points.len() > self.cache_threshold;

        if cacheable {
            if let Some(hit) = self
                .cache
                .get(points, self.transect.points(), max_cross_track_km)
            {
                log::debug!("Transect cache hit for {} points", points.len());
                return hit.to_vec();
            }
        }

        let output: Vec<DisplayPoint> = points
            .iter()
            .map(|p| self.project(p, max_cross_track_km))
            .collect();

        if cacheable {
            self.cache.insert(CacheEntry {
                input: points.to_vec(),
                line: self.transect.points().to_vec(),
                max_cross_track: max_cross_track_km,
                output: output.clone(),
            });
        }
        output
    }

    /// Maps a transect display point back to a geographic position
    ///
    /// Latitude and longitude are interpolated linearly within the segment
    /// that contains the distance along the line; altitude is `y`.
    pub fn to_geographic(&mut self, point: &DisplayPoint) -> GeographicPoint {
        self.refresh();
        self.unproject(point)
    }

    /// Maps a batch of display points back to geographic positions
    pub fn to_geographic_batch(&mut self, points: &[DisplayPoint]) -> Vec<GeographicPoint> {
        self.refresh();
        points.iter().map(|p| self.unproject(p)).collect()
    }

    fn unproject(&self, point: &DisplayPoint) -> GeographicPoint {
        if point.x.is_nan() {
            return GeographicPoint::new(f64::NAN, f64::NAN, point.y);
        }

        let geometry = &self.geometry;
        let distance = (point.x + 1.0) / 2.0 * geometry.total_length();
        let segment = geometry.segment_at(distance);

        let length = geometry.distances[segment];
        let fraction = if length > 0.0 {
            (distance - geometry.cumulative[segment]) / length
        } else {
            0.0
        };

        let start = &geometry.line[segment];
        let end = &geometry.line[segment + 1];
        GeographicPoint::new(
            start.latitude + fraction * (end.latitude - start.latitude),
            start.longitude + fraction * (end.longitude - start.longitude),
            point.y,
        )
    }
}

impl<G> PartialEq for TransectProjector<G> {
    /// Two projectors are equal when their transects are equal
    fn eq(&self, other: &Self) -> bool {
        self.transect == other.transect
    }
}
