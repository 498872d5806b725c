//! Linear altitude scaling

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_ALTITUDE, DEFAULT_MIN_ALTITUDE};
use crate::{GeoNavError, Result};

/// Maps an altitude range linearly onto a display range
///
/// # Examples
///
/// ```rust
/// use geonav::VerticalScale;
///
/// let scale = VerticalScale::new(0.0, 10_000.0).unwrap();
/// assert_eq!(scale.to_display(5_000.0), 0.0);
/// assert_eq!(scale.to_altitude(1.0), 10_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalScale {
    min_altitude: f64,
    max_altitude: f64,
    display_min: f64,
    display_max: f64,
}

impl VerticalScale {
    /// Maps `[min_altitude, max_altitude]` (meters) onto `[-1, 1]`
    pub fn new(min_altitude: f64, max_altitude: f64) -> Result<Self> {
        Self::with_display_range(min_altitude, max_altitude, -1.0, 1.0)
    }

    /// Maps `[min_altitude, max_altitude]` onto `[display_min, display_max]`
    pub fn with_display_range(
        min_altitude: f64,
        max_altitude: f64,
        display_min: f64,
        display_max: f64,
    ) -> Result<Self> {
        let values = [min_altitude, max_altitude, display_min, display_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeoNavError::InvalidScale(format!(
                "non-finite bounds {:?}",
                values
            )));
        }
        if min_altitude == max_altitude || display_min == display_max {
            return Err(GeoNavError::InvalidScale(format!(
                "empty range: altitude [{}, {}] display [{}, {}]",
                min_altitude, max_altitude, display_min, display_max
            )));
        }
        Ok(VerticalScale {
            min_altitude,
            max_altitude,
            display_min,
            display_max,
        })
    }

    /// Altitude range in meters
    pub fn altitude_range(&self) -> (f64, f64) {
        (self.min_altitude, self.max_altitude)
    }

    /// Display coordinate of an altitude
    pub fn to_display(&self, altitude: f64) -> f64 {
        let t = (altitude - self.min_altitude) / (self.max_altitude - self.min_altitude);
        self.display_min + t * (self.display_max - self.display_min)
    }

    /// Altitude of a display coordinate
    pub fn to_altitude(&self, display: f64) -> f64 {
        let t = (display - self.display_min) / (self.display_max - self.display_min);
        self.min_altitude + t * (self.max_altitude - self.min_altitude)
    }
}

impl Default for VerticalScale {
    fn default() -> Self {
        VerticalScale {
            min_altitude: DEFAULT_MIN_ALTITUDE,
            max_altitude: DEFAULT_MAX_ALTITUDE,
            display_min: -1.0,
            display_max: 1.0,
        }
    }
}
