//! Longitude normalization
//!
//! A display that shows longitudes in [-180, 180] must fold 190° to -170°,
//! while a display whose domain spans [0, 360] must fold -10° to 350°.
//! [`LongitudeMode`] captures which folding a transform applies; it is chosen
//! once, from the projection, when the transform is built.

use crate::constants::{DEFAULT_LONGITUDE_RANGE, LONGITUDE_180_TOLERANCE};
use crate::projection::Projection;

/// Folds a longitude into [-180, 180]
///
/// Values already inside the range are returned unchanged, so both -180 and
/// 180 are preserved. NaN passes through.
///
/// # Examples
///
/// ```rust
/// use geonav::coordinates::normalize_longitude;
///
/// assert_eq!(normalize_longitude(190.0), -170.0);
/// assert_eq!(normalize_longitude(-180.0), -180.0);
/// assert!((normalize_longitude(-180.0001) - 179.9999).abs() < 1e-9);
/// ```
pub fn normalize_longitude(lon: f64) -> f64 {
    if lon.is_nan() || (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    lon - 360.0 * (lon / 360.0).round()
}

/// Folds a longitude into [0, 360]
///
/// Values already inside the range are returned unchanged. NaN passes
/// through.
///
/// # Examples
///
/// ```rust
/// use geonav::coordinates::normalize_longitude_360;
///
/// assert_eq!(normalize_longitude_360(-10.0), 350.0);
/// assert_eq!(normalize_longitude_360(360.0), 360.0);
/// assert!((normalize_longitude_360(-0.0001) - 359.9999).abs() < 1e-9);
/// ```
pub fn normalize_longitude_360(lon: f64) -> f64 {
    if lon.is_nan() || (0.0..=360.0).contains(&lon) {
        return lon;
    }
    lon.rem_euclid(360.0)
}

/// How a transform folds longitudes on the way in and out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LongitudeMode {
    /// Longitudes are passed through untouched
    Disabled,
    /// Longitudes are folded into [-180, 180]
    Wrap180,
    /// Longitudes are folded into [0, 360]
    Wrap360,
}

impl LongitudeMode {
    /// Selects the folding for a projection
    ///
    /// Projections that are not in x/y axis order are left alone. Otherwise
    /// the projection's longitude range decides: a domain that stays within
    /// ±185° is a [-180, 180] domain, anything wider is a [0, 360] domain.
    /// Equirectangular projections already in [-180, 180], and domains that
    /// straddle 0° asymmetrically (west of 0° and past 180° east), are not
    /// folded because folding would tear them.
    pub fn for_projection<P: Projection + ?Sized>(projection: &P) -> Self {
        if !projection.is_xy_order() {
            return LongitudeMode::Disabled;
        }

        let (min_lon, max_lon) = projection
            .longitude_range()
            .unwrap_or(DEFAULT_LONGITUDE_RANGE);
        let use_360 = !(min_lon >= -LONGITUDE_180_TOLERANCE && max_lon <= LONGITUDE_180_TOLERANCE);
        let straddles = min_lon > -360.0 && min_lon < 0.0 && max_lon > 180.0;

        if (projection.is_lat_lon() && !use_360) || straddles {
            LongitudeMode::Disabled
        } else if use_360 {
            LongitudeMode::Wrap360
        } else {
            LongitudeMode::Wrap180
        }
    }

    /// Applies the folding to a single longitude
    pub fn apply(self, lon: f64) -> f64 {
        match self {
            LongitudeMode::Disabled => lon,
            LongitudeMode::Wrap180 => normalize_longitude(lon),
            LongitudeMode::Wrap360 => normalize_longitude_360(lon),
        }
    }
}
