//! Render surface collaborator and screen rays
//!
//! The navigator never draws. It asks a [`RenderSurface`] for the current
//! view matrix, for the ray under a screen pixel, and hands back replacement
//! matrices. Surfaces are shared with the animation thread and must accept
//! matrix updates from it.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;
use std::fmt;
use std::thread;
use std::time::Duration;

use super::matrix::ViewMatrix;
use super::transform::Centering;
use crate::coordinates::DisplayPoint;

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub width: f64,
    pub height: f64,
}

impl ScreenBounds {
    pub fn new(width: f64, height: f64) -> Self {
        ScreenBounds { width, height }
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }

    /// The 3×3 grid of corner, edge-midpoint and center pixels
    pub fn sample_grid(&self) -> [(f64, f64); 9] {
        let xs = [0.0, self.center_x(), self.width];
        let ys = [0.0, self.center_y(), self.height];
        let mut grid = [(0.0, 0.0); 9];
        for (i, &y) in ys.iter().enumerate() {
            for (j, &x) in xs.iter().enumerate() {
                grid[i * 3 + j] = (x, y);
            }
        }
        grid
    }
}

/// A ray in display space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Ray { origin, direction }
    }

    /// Point where the ray crosses the plane at depth `z`
    ///
    /// The ray origin is returned when `z` is NaN, equals the origin's depth,
    /// or when the ray runs parallel to the plane.
    pub fn position_at_z(&self, z: f64) -> Point3<f64> {
        if z.is_nan() || z == self.origin.z || self.direction.z == 0.0 {
            return self.origin;
        }
        let r = (z - self.origin.z) / self.direction.z;
        self.origin + self.direction * r
    }
}

/// Intersects a screen ray with the plane at depth `z`
pub fn ray_position_at_z(ray: &Ray, z: f64) -> DisplayPoint {
    DisplayPoint::from_point3(&ray.position_at_z(z))
}

/// The drawing surface whose view the navigator controls
pub trait RenderSurface: Send + Sync {
    /// Size of the visible area in pixels
    fn screen_bounds(&self) -> ScreenBounds;

    /// Ray through a pixel under the current view matrix, in display space
    fn find_ray(&self, screen_x: f64, screen_y: f64) -> Ray;

    /// The view matrix currently applied
    fn view_matrix(&self) -> ViewMatrix;

    /// Replaces the view matrix
    fn apply_view_matrix(&self, matrix: &ViewMatrix);
}

/// Pause between animation steps
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl fmt::Debug for dyn RenderSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderSurface")
            .field("bounds", &self.screen_bounds())
            .finish()
    }
}

impl fmt::Debug for dyn Sleeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sleeper")
    }
}

/// View matrix that places `point` under pixel `(screen_x, screen_y)`
///
/// The pixel's ray is intersected at the point's own depth so the move is
/// exact under perspective too. Returns `None` for points off the display,
/// rays that cannot be intersected, and non-invertible results.
pub fn matrix_moving_to_screen(
    surface: &dyn RenderSurface,
    point: &DisplayPoint,
    screen_x: f64,
    screen_y: f64,
) -> Option<ViewMatrix> {
    if point.is_off_display() {
        return None;
    }
    let anchor = surface.find_ray(screen_x, screen_y).position_at_z(point.z);
    if !(anchor.x.is_finite() && anchor.y.is_finite()) {
        return None;
    }

    let shift = ViewMatrix::translation(anchor.x - point.x, anchor.y - point.y, 0.0);
    let moved = surface.view_matrix().multiply(&shift);
    moved.is_invertible().then_some(moved)
}

/// View matrix that turns the scene until `point` faces the viewer under
/// pixel `(screen_x, screen_y)`
///
/// The scene rotates about its origin and keeps its scale. The point is
/// turned onto the direction the pixel's line of sight comes from, then slid
/// across that line until it lies on it. A point on the far side of the
/// origin makes a half turn. Returns `None` for points with an unknown
/// coordinate, points at the origin, and non-invertible results.
pub fn matrix_rotating_to_screen(
    surface: &dyn RenderSurface,
    point: &DisplayPoint,
    screen_x: f64,
    screen_y: f64,
) -> Option<ViewMatrix> {
    if point.is_nan() {
        return None;
    }
    let current = surface.view_matrix();
    let ray = surface.find_ray(screen_x, screen_y);

    // Line of sight in view space
    let eye = current.transform_point(&ray.origin).coords;
    let sight = current.transform_vector(&ray.direction);
    if !(eye.iter().all(|v| v.is_finite()) && sight.iter().all(|v| v.is_finite())) {
        return None;
    }
    let sight = Unit::try_new(sight, f64::EPSILON)?.into_inner();
    let toward_viewer = -sight;

    let mut parts = current.decompose();
    let offset = parts.rotation * parts.scale.component_mul(&point.to_vector3());
    if !offset.iter().all(|v| v.is_finite()) || offset.norm() == 0.0 {
        return None;
    }
    let turn = UnitQuaternion::rotation_between(&offset, &toward_viewer)
        .or_else(|| half_turn_across(&toward_viewer))?;
    parts.rotation = turn * parts.rotation;

    let placed = parts.translation + parts.rotation * parts.scale.component_mul(&point.to_vector3());
    let miss = placed - eye;
    parts.translation -= miss - sight * miss.dot(&sight);

    let moved = parts.compose();
    moved.is_invertible().then_some(moved)
}

/// Half turn about an axis perpendicular to `direction`
fn half_turn_across(direction: &Vector3<f64>) -> Option<UnitQuaternion<f64>> {
    let helper = if direction.x.abs() < 0.9 * direction.norm() {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::try_new(direction.cross(&helper), f64::EPSILON)
        .map(|axis| UnitQuaternion::from_axis_angle(&axis, PI))
}

/// View matrix that brings `point` under a pixel with the given centering
pub fn matrix_placing_on_screen(
    surface: &dyn RenderSurface,
    point: &DisplayPoint,
    screen_x: f64,
    screen_y: f64,
    centering: Centering,
) -> Option<ViewMatrix> {
    match centering {
        Centering::Translate => matrix_moving_to_screen(surface, point, screen_x, screen_y),
        Centering::Rotate => matrix_rotating_to_screen(surface, point, screen_x, screen_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    /// Orthographic view of NDC `[-1, 1]` on a 200×200 screen
    struct Ortho(Mutex<ViewMatrix>);

    impl RenderSurface for Ortho {
        fn screen_bounds(&self) -> ScreenBounds {
            ScreenBounds::new(200.0, 200.0)
        }

        fn find_ray(&self, screen_x: f64, screen_y: f64) -> Ray {
            let inverse = self.view_matrix().inverse().unwrap();
            let ndc = Point3::new(screen_x / 100.0 - 1.0, 1.0 - screen_y / 100.0, 2.0);
            Ray::new(
                inverse.transform_point(&ndc),
                inverse.transform_vector(&Vector3::new(0.0, 0.0, -1.0)),
            )
        }

        fn view_matrix(&self) -> ViewMatrix {
            *self.0.lock().unwrap()
        }

        fn apply_view_matrix(&self, matrix: &ViewMatrix) {
            *self.0.lock().unwrap() = *matrix;
        }
    }

    fn downward(origin: Point3<f64>) -> Ray {
        Ray::new(origin, Vector3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_position_at_z() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.5, 0.0, -1.0));
        let p = ray_position_at_z(&ray, -1.0);
        assert_relative_eq!(p.x, 1.5);
        assert_relative_eq!(p.z, -1.0);
    }

    #[test]
    fn test_position_at_z_degenerate_cases() {
        let ray = downward(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.position_at_z(f64::NAN), ray.origin);
        assert_eq!(ray.position_at_z(3.0), ray.origin);

        let flat = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(flat.position_at_z(0.0), flat.origin);
    }

    #[test]
    fn test_sample_grid() {
        let grid = ScreenBounds::new(800.0, 600.0).sample_grid();
        assert_eq!(grid[0], (0.0, 0.0));
        assert_eq!(grid[4], (400.0, 300.0));
        assert_eq!(grid[8], (800.0, 600.0));
    }

    #[test]
    fn test_rotation_brings_far_side_to_front() {
        let surface = Ortho(Mutex::new(ViewMatrix::scaling(0.5)));
        let far = DisplayPoint::new(0.0, 0.0, -1.0);

        let turned = matrix_rotating_to_screen(&surface, &far, 100.0, 100.0).unwrap();
        let seen = turned.transform_point(&far.to_point3());
        assert_relative_eq!(seen, Point3::new(0.0, 0.0, 0.5), epsilon = 1e-12);
        assert_relative_eq!(turned.decompose().scale.x, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_onto_off_center_pixel() {
        let surface = Ortho(Mutex::new(ViewMatrix::identity()));
        let east = DisplayPoint::new(1.0, 0.0, 0.0);

        let turned = matrix_rotating_to_screen(&surface, &east, 150.0, 50.0).unwrap();
        let seen = turned.transform_point(&east.to_point3());
        assert_relative_eq!(seen.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(seen.y, 0.5, epsilon = 1e-12);
        assert!(seen.z > 0.0);
    }

    #[test]
    fn test_rotation_rejects_origin_and_nan() {
        let surface = Ortho(Mutex::new(ViewMatrix::identity()));
        assert!(matrix_rotating_to_screen(&surface, &DisplayPoint::new(0.0, 0.0, 0.0), 100.0, 100.0).is_none());
        assert!(matrix_rotating_to_screen(&surface, &DisplayPoint::nan(), 100.0, 100.0).is_none());
    }
}
