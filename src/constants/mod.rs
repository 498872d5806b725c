//! Constants module for geographic and navigation calculations

use std::f64::consts::PI;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;

// Earth constants
/// Mean Earth radius in kilometers (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

// Longitude normalization
/// Longitude bounds within which a projection is treated as a [-180, 180] domain
pub const LONGITUDE_180_TOLERANCE: f64 = 185.0;
/// Default longitude range assumed when a projection declares none
pub const DEFAULT_LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

// Vertical scaling
/// Lowest altitude of the default vertical range, in meters
pub const DEFAULT_MIN_ALTITUDE: f64 = 0.0;
/// Highest altitude of the default vertical range, in meters
pub const DEFAULT_MAX_ALTITUDE: f64 = 16_000.0;

// Transect
/// Batches longer than this are served through the result cache
pub const TRANSECT_CACHE_THRESHOLD: usize = 100;
/// Number of cached transect batches
pub const TRANSECT_CACHE_CAPACITY: usize = 10;
/// Depth of every point projected onto a transect plane
pub const TRANSECT_DEFAULT_Z: f64 = 0.0;

// Animation
/// Minimum number of animation steps
pub const BASE_ANIMATION_STEPS: usize = 20;
/// Maximum number of animation steps
pub const MAX_ANIMATION_STEPS: usize = 100;
/// Displacement (display units) at which the step count saturates
pub const MAX_ANIMATION_DISPLACEMENT: f64 = 5.0;
/// Pause between animation steps in milliseconds
pub const ANIMATION_STEP_DELAY_MS: u64 = 50;
