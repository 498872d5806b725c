//! Navigator configuration
//!
//! Every tunable constant of the transforms and of the animation engine can
//! be overridden from a JSON document. Missing fields keep their defaults:
//!
//! ```json
//! {
//!   "animation": { "step_delay_ms": 20 },
//!   "transect": { "max_cross_track_km": 150.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::adapter::VerticalScale;
use crate::constants::{
    ANIMATION_STEP_DELAY_MS, BASE_ANIMATION_STEPS, DEFAULT_MAX_ALTITUDE, DEFAULT_MIN_ALTITUDE,
    MAX_ANIMATION_DISPLACEMENT, MAX_ANIMATION_STEPS, TRANSECT_CACHE_CAPACITY,
    TRANSECT_CACHE_THRESHOLD,
};
use crate::{GeoNavError, Result};

/// Animation pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Pause between steps in milliseconds
    pub step_delay_ms: u64,
    /// Steps used for displacements up to one display unit
    pub base_steps: usize,
    /// Upper bound on the step count
    pub max_steps: usize,
    /// Displacement at which the step count saturates
    pub max_displacement: f64,
}

impl AnimationConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Checks that the pacing yields at least one step and ordered bounds
    pub fn validate(&self) -> Result<()> {
        if self.base_steps == 0 {
            return Err(GeoNavError::Config("base_steps must be at least 1".into()));
        }
        if self.max_steps < self.base_steps {
            return Err(GeoNavError::Config(format!(
                "max_steps {} is below base_steps {}",
                self.max_steps, self.base_steps
            )));
        }
        if !(self.max_displacement.is_finite() && self.max_displacement >= 1.0) {
            return Err(GeoNavError::Config(format!(
                "max_displacement {} must be finite and at least 1",
                self.max_displacement
            )));
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            step_delay_ms: ANIMATION_STEP_DELAY_MS,
            base_steps: BASE_ANIMATION_STEPS,
            max_steps: MAX_ANIMATION_STEPS,
            max_displacement: MAX_ANIMATION_DISPLACEMENT,
        }
    }
}

/// Transect projection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransectConfig {
    /// Batches longer than this go through the result cache
    pub cache_threshold: usize,
    /// Number of cached batches
    pub cache_capacity: usize,
    /// Cross-track culling distance in kilometers, `None` for unbounded
    pub max_cross_track_km: Option<f64>,
}

impl Default for TransectConfig {
    fn default() -> Self {
        TransectConfig {
            cache_threshold: TRANSECT_CACHE_THRESHOLD,
            cache_capacity: TRANSECT_CACHE_CAPACITY,
            max_cross_track_km: None,
        }
    }
}

/// Altitude range mapped onto the display's vertical axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalConfig {
    /// Lowest altitude in meters
    pub min_altitude: f64,
    /// Highest altitude in meters
    pub max_altitude: f64,
}

impl VerticalConfig {
    /// Builds the corresponding `[-1, 1]` vertical scale
    pub fn scale(&self) -> Result<VerticalScale> {
        VerticalScale::new(self.min_altitude, self.max_altitude)
    }
}

impl Default for VerticalConfig {
    fn default() -> Self {
        VerticalConfig {
            min_altitude: DEFAULT_MIN_ALTITUDE,
            max_altitude: DEFAULT_MAX_ALTITUDE,
        }
    }
}

/// Complete navigator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub animation: AnimationConfig,
    pub transect: TransectConfig,
    pub vertical: VerticalConfig,
}

impl NavigatorConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: NavigatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading navigator configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks that the values describe a usable navigator
    pub fn validate(&self) -> Result<()> {
        self.animation.validate()?;
        if self.transect.cache_capacity == 0 {
            return Err(GeoNavError::Config("cache_capacity must be at least 1".into()));
        }
        if let Some(max) = self.transect.max_cross_track_km {
            if max.is_nan() || max < 0.0 {
                return Err(GeoNavError::Config(format!(
                    "max_cross_track_km {} must be non-negative",
                    max
                )));
            }
        }
        self.vertical.scale().map_err(|e| GeoNavError::Config(e.to_string()))?;
        Ok(())
    }
}
