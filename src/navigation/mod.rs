//! # View Navigation
//!
//! [`ViewNavigator`] moves the camera of a geo-referenced display. It works on
//! the surface's view matrix through decomposition (see [`matrix`]) and reads
//! positions through an [`EarthTransform`], so the same engine serves map,
//! transect and globe displays.
//!
//! ## Operations
//!
//! - **Centering**: bring a geographic point under the middle of the screen,
//!   immediately or animated. Flat displays slide; globes turn
//! - **Zoom**: multiply every scale component of the view
//! - **Animated transitions**: interpolate to a target matrix on a background
//!   thread; a newer request supersedes older ones
//! - **Readout**: turn a screen pixel into an earth location, or the whole
//!   screen into a lat/lon bounding box
//!
//! Geographic targets are resolved to display coordinates on the calling
//! thread. The animation thread only ever sees matrices, display points and
//! the shared surface.

pub mod animation;
pub mod matrix;
pub mod surface;
pub mod transform;

pub use animation::{
    max_displacement, step_count, AnimationHandle, AnimationSequence, AnimationState,
    AnimationToken,
};
pub use matrix::{ViewComponents, ViewMatrix};
pub use surface::{
    matrix_moving_to_screen, matrix_placing_on_screen, matrix_rotating_to_screen,
    ray_position_at_z, Ray, RenderSurface, ScreenBounds, Sleeper, ThreadSleeper,
};
pub use transform::{Centering, DisplayCapabilities, EarthTransform, NominalSurface};

use nalgebra::Point3;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

use animation::{AnimationContext, AnimationPlan, RunningMark, ScreenAnchor};
use crate::config::AnimationConfig;
use crate::coordinates::{DisplayPoint, GeographicPoint};
use crate::Result;

/// Fractions of the screen width sampled for the visible bounding box
const BOX_SAMPLE_COLUMNS: usize = 11;
/// Fractions of the screen height sampled for the visible bounding box
const BOX_SAMPLE_ROWS: usize = 5;

/// Geographic bounding box of the visible area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl LatLonBox {
    fn from_points<'a>(points: impl IntoIterator<Item = &'a GeographicPoint>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.latitude.is_finite() && p.longitude.is_finite())
            .fold(None, |bbox: Option<LatLonBox>, p| {
                Some(match bbox {
                    None => LatLonBox {
                        min_latitude: p.latitude,
                        max_latitude: p.latitude,
                        min_longitude: p.longitude,
                        max_longitude: p.longitude,
                    },
                    Some(b) => LatLonBox {
                        min_latitude: b.min_latitude.min(p.latitude),
                        max_latitude: b.max_latitude.max(p.latitude),
                        min_longitude: b.min_longitude.min(p.longitude),
                        max_longitude: b.max_longitude.max(p.longitude),
                    },
                })
            })
    }
}

/// Camera navigation over a render surface
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use geonav::{
///     AnimationSequence, CoordinateAdapter, DisplayCapabilities, GeographicPoint,
///     LatLonProjection, RenderSurface, ViewNavigator,
/// };
///
/// fn recenter(surface: Arc<dyn RenderSurface>) -> geonav::Result<()> {
///     let adapter = CoordinateAdapter::new(LatLonProjection::world())?;
///     let mut navigator = ViewNavigator::new(
///         surface,
///         adapter,
///         DisplayCapabilities::flat(),
///         AnimationSequence::new(),
///     );
///     if let Some(animation) = navigator.center(&GeographicPoint::surface(40.0, -105.0), true)? {
///         animation.wait()?;
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ViewNavigator<T> {
    surface: Arc<dyn RenderSurface>,
    transform: T,
    capabilities: DisplayCapabilities,
    sequence: AnimationSequence,
    sleeper: Arc<dyn Sleeper>,
    config: AnimationConfig,
    running: Arc<AtomicU64>,
}

impl<T: EarthTransform> ViewNavigator<T> {
    /// Creates a navigator
    ///
    /// # Arguments
    ///
    /// * `surface` - The surface whose view matrix is driven
    /// * `transform` - Geographic/display transform of the display
    /// * `capabilities` - Depth and stereo support of the display
    /// * `sequence` - Token source shared by everything that animates this view
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        transform: T,
        capabilities: DisplayCapabilities,
        sequence: AnimationSequence,
    ) -> Self {
        ViewNavigator {
            surface,
            transform,
            capabilities,
            sequence,
            sleeper: Arc::new(ThreadSleeper),
            config: AnimationConfig::default(),
            running: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replaces the animation pacing
    ///
    /// Fails with [`GeoNavError::Config`](crate::GeoNavError::Config) when
    /// the pacing does not validate.
    pub fn with_config(mut self, config: AnimationConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Replaces the pause between animation steps
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut T {
        &mut self.transform
    }

    pub fn capabilities(&self) -> DisplayCapabilities {
        self.capabilities
    }

    pub fn sequence(&self) -> &AnimationSequence {
        &self.sequence
    }

    pub fn surface(&self) -> &Arc<dyn RenderSurface> {
        &self.surface
    }

    /// Installs a new transform if it differs from the current one
    ///
    /// Returns whether the transform was replaced.
    pub fn replace_transform(&mut self, transform: T) -> bool
    where
        T: PartialEq,
    {
        if self.transform == transform {
            return false;
        }
        self.transform = transform;
        true
    }

    /// Uniform scale of the current view (x component)
    pub fn scale(&self) -> f64 {
        self.surface.view_matrix().decompose().scale.x
    }

    /// Rotation of the current view as (roll, pitch, yaw) degrees
    pub fn rotation_degrees(&self) -> (f64, f64, f64) {
        self.surface.view_matrix().decompose().rotation_degrees()
    }

    /// True while an animation started through this navigator's sequence runs
    pub fn is_animating(&self) -> bool {
        let running = self.running.load(Ordering::SeqCst);
        running != 0 && self.sequence.current().value() == running
    }

    /// Multiplies every scale component of the view by `factor`
    ///
    /// Applied immediately. Returns false, leaving the view alone, when the
    /// result would not be invertible.
    pub fn zoom(&self, factor: f64) -> bool {
        let mut parts = self.surface.view_matrix().decompose();
        parts.scale *= factor;
        let zoomed = parts.compose();
        if !zoomed.is_invertible() {
            log::warn!("Ignoring zoom by {}: view would not be invertible", factor);
            return false;
        }
        self.apply_now(&zoomed);
        true
    }

    /// Centers the view on a geographic point
    ///
    /// Points with unknown latitude or longitude, and points the transform
    /// places off the display, leave the view unchanged. On a globe the
    /// scene turns so the point faces the viewer. With `animated` the
    /// returned handle tracks the transition.
    pub fn center(
        &mut self,
        point: &GeographicPoint,
        animated: bool,
    ) -> Result<Option<AnimationHandle>> {
        let Some(target) = self.resolve(point) else {
            return Ok(None);
        };
        let bounds = self.surface.screen_bounds();
        self.move_to_screen(&target, bounds.center_x(), bounds.center_y(), animated)
    }

    /// Centers on a geographic point and zooms about it by `factor`
    pub fn center_and_zoom(
        &mut self,
        point: &GeographicPoint,
        factor: f64,
        animated: bool,
    ) -> Result<Option<AnimationHandle>> {
        let Some(target) = self.resolve(point) else {
            return Ok(None);
        };
        let bounds = self.surface.screen_bounds();
        let (sx, sy) = (bounds.center_x(), bounds.center_y());
        let centering = self.centering();
        let Some(centered) =
            matrix_placing_on_screen(self.surface.as_ref(), &target, sx, sy, centering)
        else {
            return Ok(None);
        };

        let zoomed = centered.scaled_about(&target.to_point3(), factor);
        if !zoomed.is_invertible() {
            log::warn!("Ignoring center and zoom by {}: view would not be invertible", factor);
            return Ok(None);
        }
        self.go_to(zoomed, Some(screen_anchor(target, sx, sy, centering)), animated)
    }

    /// Moves a display point under a screen pixel
    pub fn move_to_screen(
        &self,
        point: &DisplayPoint,
        screen_x: f64,
        screen_y: f64,
        animated: bool,
    ) -> Result<Option<AnimationHandle>> {
        let centering = self.centering();
        let Some(target) =
            matrix_placing_on_screen(self.surface.as_ref(), point, screen_x, screen_y, centering)
        else {
            log::debug!("Cannot move {:?} to screen ({}, {})", point, screen_x, screen_y);
            return Ok(None);
        };
        self.go_to(
            target,
            Some(screen_anchor(*point, screen_x, screen_y, centering)),
            animated,
        )
    }

    /// Animates the view to `target`
    ///
    /// When `final_location` is given the view is re-centered on it after the
    /// target matrix has been applied.
    pub fn animate_to(
        &mut self,
        target: ViewMatrix,
        final_location: Option<&GeographicPoint>,
    ) -> Result<AnimationHandle> {
        let bounds = self.surface.screen_bounds();
        let anchor = final_location
            .and_then(|p| self.resolve(p))
            .map(|p| screen_anchor(p, bounds.center_x(), bounds.center_y(), self.centering()));
        self.spawn_animation(target, anchor)
    }

    /// Geographic position of a display point
    pub fn get_earth_location(&mut self, x: f64, y: f64, z: f64) -> GeographicPoint {
        self.transform.display_to_earth(&DisplayPoint::new(x, y, z))
    }

    /// Display point under a pixel
    ///
    /// With a depth the pixel's ray is intersected with that plane; without
    /// one it is intersected with the transform's nominal surface.
    pub fn screen_to_display(&self, screen_x: f64, screen_y: f64, depth: Option<f64>) -> DisplayPoint {
        let ray = self.surface.find_ray(screen_x, screen_y);
        match depth {
            Some(z) => ray_position_at_z(&ray, z),
            None => self
                .transform
                .nominal_surface(&self.capabilities)
                .intersect(&ray),
        }
    }

    /// Earth location under a pixel
    pub fn screen_to_earth(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        depth: Option<f64>,
    ) -> GeographicPoint {
        let display = self.screen_to_display(screen_x, screen_y, depth);
        if display.is_off_display() {
            return GeographicPoint::nan();
        }
        self.transform.display_to_earth(&display)
    }

    /// Bounding box of the earth locations visible on screen
    ///
    /// Returns `None` when no sampled pixel shows the earth.
    pub fn lat_lon_box(&mut self) -> Option<LatLonBox> {
        let bounds = self.surface.screen_bounds();
        let mut locations = Vec::with_capacity(BOX_SAMPLE_COLUMNS * BOX_SAMPLE_ROWS);
        for row in 0..BOX_SAMPLE_ROWS {
            let sy = bounds.height * row as f64 / (BOX_SAMPLE_ROWS - 1) as f64;
            for column in 0..BOX_SAMPLE_COLUMNS {
                let sx = bounds.width * column as f64 / (BOX_SAMPLE_COLUMNS - 1) as f64;
                locations.push(self.screen_to_earth(sx, sy, None));
            }
        }
        LatLonBox::from_points(&locations)
    }

    fn resolve(&mut self, point: &GeographicPoint) -> Option<DisplayPoint> {
        if point.is_missing() {
            log::debug!("Ignoring navigation to a missing location");
            return None;
        }
        let mut display = self.transform.earth_to_display(point);
        if display.is_off_display() {
            log::debug!("{} is not on the display", point);
            return None;
        }
        if display.z.is_nan() {
            display.z = self
                .transform
                .nominal_surface(&self.capabilities)
                .reference_z();
        }
        Some(display)
    }

    fn centering(&self) -> Centering {
        self.transform
            .nominal_surface(&self.capabilities)
            .centering()
    }

    fn go_to(
        &self,
        target: ViewMatrix,
        anchor: Option<ScreenAnchor>,
        animated: bool,
    ) -> Result<Option<AnimationHandle>> {
        if animated {
            return self.spawn_animation(target, anchor).map(Some);
        }
        self.apply_now(&target);
        Ok(None)
    }

    /// Applies a matrix immediately, stopping any animation in flight
    fn apply_now(&self, matrix: &ViewMatrix) {
        self.sequence.issue();
        self.surface.apply_view_matrix(matrix);
    }

    fn estimate_steps(&self, from: &ViewMatrix, to: &ViewMatrix) -> usize {
        let z = self
            .transform
            .nominal_surface(&self.capabilities)
            .reference_z();
        let samples: Vec<Point3<f64>> = self
            .surface
            .screen_bounds()
            .sample_grid()
            .iter()
            .map(|&(sx, sy)| self.surface.find_ray(sx, sy).position_at_z(z))
            .collect();
        step_count(max_displacement(&samples, from, to), &self.config)
    }

    fn spawn_animation(
        &self,
        target: ViewMatrix,
        anchor: Option<ScreenAnchor>,
    ) -> Result<AnimationHandle> {
        let token = self.sequence.issue();
        let from = self.surface.view_matrix();
        let steps = self.estimate_steps(&from, &target);
        log::debug!("Starting animation {} with {} steps", token.value(), steps);
        let mark = RunningMark::set(&self.running, token);

        let plan = AnimationPlan {
            token,
            from: from.decompose(),
            target,
            steps,
            delay: self.config.step_delay(),
            anchor,
        };
        let state = Arc::new(AtomicU8::new(0));
        let context = AnimationContext {
            surface: Arc::clone(&self.surface),
            sequence: self.sequence.clone(),
            sleeper: Arc::clone(&self.sleeper),
            running: Arc::clone(&self.running),
            state: Arc::clone(&state),
        };

        let thread = thread::Builder::new()
            .name(format!("geonav-animation-{}", token.value()))
            .spawn(move || plan.run(context))?;
        mark.keep();
        Ok(AnimationHandle::new(token, steps, state, thread))
    }
}

fn screen_anchor(
    point: DisplayPoint,
    screen_x: f64,
    screen_y: f64,
    centering: Centering,
) -> ScreenAnchor {
    ScreenAnchor {
        point,
        screen_x,
        screen_y,
        centering,
    }
}
