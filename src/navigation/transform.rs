//! Earth transforms as seen by the navigator
//!
//! Map, transect and globe displays differ in how geographic positions land
//! in display space and in what "the ground" is when a screen pixel has no
//! depth. [`EarthTransform`] captures both, so the navigator is written once
//! for all three.

use nalgebra::Vector3;

use super::surface::Ray;
use crate::adapter::CoordinateAdapter;
use crate::coordinates::{DisplayPoint, GeographicPoint};
use crate::geodesy::Geodesic;
use crate::globe::{intersect_sphere, GlobeAdapter};
use crate::projection::Projection;
use crate::transect::TransectProjector;

/// What a display can do, fixed when the display is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayCapabilities {
    /// The scene has a usable z axis (3D box rather than a flat sheet)
    pub has_depth_axis: bool,
    /// The renderer can produce stereo pairs
    pub supports_stereo: bool,
}

impl DisplayCapabilities {
    /// A flat 2D display
    pub fn flat() -> Self {
        DisplayCapabilities {
            has_depth_axis: false,
            supports_stereo: false,
        }
    }

    /// A 3D display
    pub fn volumetric() -> Self {
        DisplayCapabilities {
            has_depth_axis: true,
            supports_stereo: false,
        }
    }

    /// A 3D display with stereo rendering
    pub fn stereo() -> Self {
        DisplayCapabilities {
            has_depth_axis: true,
            supports_stereo: true,
        }
    }

    /// Depth of the ground plane: the floor of the box in 3D, zero in 2D
    pub fn default_z(&self) -> f64 {
        if self.has_depth_axis {
            -1.0
        } else {
            0.0
        }
    }
}

/// How a display point is brought under a screen pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    /// Slide the view in x and y
    Translate,
    /// Turn the scene about its origin until the point faces the viewer
    Rotate,
}

/// Where a depthless screen ray meets the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NominalSurface {
    /// A plane at constant depth
    Plane { z: f64 },
    /// A sphere centered on the display origin
    Sphere { radius: f64 },
}

impl NominalSurface {
    /// Display point where `ray` meets the surface, NaN when it misses
    pub fn intersect(&self, ray: &Ray) -> DisplayPoint {
        match *self {
            NominalSurface::Plane { z } => DisplayPoint::from_point3(&ray.position_at_z(z)),
            NominalSurface::Sphere { radius } => {
                let origin: Vector3<f64> = ray.origin.coords;
                intersect_sphere(&origin, &ray.direction, radius)
                    .map(|hit| DisplayPoint::from_vector3(&hit))
                    .unwrap_or_else(DisplayPoint::nan)
            }
        }
    }

    /// Depth used to sample the ground on screen
    pub fn reference_z(&self) -> f64 {
        match *self {
            NominalSurface::Plane { z } => z,
            NominalSurface::Sphere { .. } => 0.0,
        }
    }

    /// Centering that keeps this surface in view
    ///
    /// Planes slide; spheres turn so that points on the far side come round.
    pub fn centering(&self) -> Centering {
        match self {
            NominalSurface::Plane { .. } => Centering::Translate,
            NominalSurface::Sphere { .. } => Centering::Rotate,
        }
    }
}

/// A bidirectional geographic/display transform a navigator can drive
pub trait EarthTransform {
    /// Display position of a geographic point
    fn earth_to_display(&mut self, point: &GeographicPoint) -> DisplayPoint;

    /// Geographic position of a display point
    fn display_to_earth(&mut self, point: &DisplayPoint) -> GeographicPoint;

    /// The ground, for rays with no explicit depth
    fn nominal_surface(&self, capabilities: &DisplayCapabilities) -> NominalSurface;
}

impl<P: Projection> EarthTransform for CoordinateAdapter<P> {
    fn earth_to_display(&mut self, point: &GeographicPoint) -> DisplayPoint {
        self.to_display(point)
    }

    fn display_to_earth(&mut self, point: &DisplayPoint) -> GeographicPoint {
        self.to_geographic(point)
    }

    fn nominal_surface(&self, capabilities: &DisplayCapabilities) -> NominalSurface {
        NominalSurface::Plane {
            z: capabilities.default_z(),
        }
    }
}

impl<G: Geodesic> EarthTransform for TransectProjector<G> {
    fn earth_to_display(&mut self, point: &GeographicPoint) -> DisplayPoint {
        let limit = self.max_cross_track_km();
        self.to_display(point, limit)
    }

    fn display_to_earth(&mut self, point: &DisplayPoint) -> GeographicPoint {
        self.to_geographic(point)
    }

    fn nominal_surface(&self, _capabilities: &DisplayCapabilities) -> NominalSurface {
        NominalSurface::Plane {
            z: self.default_z(),
        }
    }
}

impl EarthTransform for GlobeAdapter {
    fn earth_to_display(&mut self, point: &GeographicPoint) -> DisplayPoint {
        self.to_display(point)
    }

    fn display_to_earth(&mut self, point: &DisplayPoint) -> GeographicPoint {
        self.to_geographic(point)
    }

    fn nominal_surface(&self, _capabilities: &DisplayCapabilities) -> NominalSurface {
        NominalSurface::Sphere {
            radius: self.surface_radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_default_z_follows_depth_axis() {
        assert_eq!(DisplayCapabilities::flat().default_z(), 0.0);
        assert_eq!(DisplayCapabilities::volumetric().default_z(), -1.0);
        assert!(DisplayCapabilities::stereo().supports_stereo);
    }

    #[test]
    fn test_plane_intersection() {
        let ray = Ray::new(Point3::new(0.25, 0.5, 2.0), Vector3::new(0.0, 0.0, -1.0));
        let p = NominalSurface::Plane { z: -1.0 }.intersect(&ray);
        assert_eq!(p, DisplayPoint::new(0.25, 0.5, -1.0));
    }

    #[test]
    fn test_sphere_miss_is_nan() {
        let ray = Ray::new(Point3::new(3.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(NominalSurface::Sphere { radius: 1.0 }.intersect(&ray).is_nan());
    }

    #[test]
    fn test_centering_follows_surface() {
        assert_eq!(NominalSurface::Plane { z: 0.0 }.centering(), Centering::Translate);
        assert_eq!(
            GlobeAdapter::default()
                .nominal_surface(&DisplayCapabilities::volumetric())
                .centering(),
            Centering::Rotate
        );
    }
}
