//! Geonav: coordinate transforms and view navigation for geo-referenced displays
//!
//! This crate maps geographic coordinates (latitude, longitude, altitude) to the
//! normalized display space of a map, transect or globe view and back again, and
//! drives the view matrix of a render surface: centering, zooming and smoothly
//! animated, cancellable transitions between view states.

use thiserror::Error;

pub mod adapter;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod geodesy;
pub mod globe;
pub mod navigation;
pub mod projection;
pub mod transect;

// Re-export commonly used types
pub use adapter::{CoordinateAdapter, VerticalScale};
pub use config::NavigatorConfig;
pub use coordinates::{DisplayPoint, GeographicPoint, LongitudeMode};
pub use geodesy::{Bearing, Geodesic, GreatCircle};
pub use globe::GlobeAdapter;
pub use navigation::{
    AnimationHandle, AnimationSequence, AnimationState, DisplayCapabilities, EarthTransform,
    RenderSurface, ViewMatrix, ViewNavigator,
};
pub use projection::{LatLonProjection, MapArea, MercatorProjection, Projection};
pub use transect::{Transect, TransectProjector};

/// Main error type for the geonav library
#[derive(Debug, Error)]
pub enum GeoNavError {
    #[error("Transect needs at least 2 points, found {found}")]
    TooFewTransectPoints { found: usize },

    #[error("Expected {expected} coordinate values, found {found}")]
    InvalidDimension { expected: &'static str, found: usize },

    #[error("Invalid map area: {0}")]
    InvalidMapArea(String),

    #[error("Invalid scale: {0}")]
    InvalidScale(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Animation thread panicked")]
    AnimationPanicked,
}

/// Result type for geonav operations
pub type Result<T> = std::result::Result<T, GeoNavError>;
