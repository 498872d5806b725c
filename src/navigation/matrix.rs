//! # View Matrices
//!
//! The render surface positions the scene with a 4×4 affine matrix. Navigation
//! never edits that matrix element by element: it decomposes it into
//! rotation, per-axis scale and translation, changes the components, and
//! recomposes.
//!
//! ## Decomposition
//!
//! A matrix `M = T · R · S` is split as:
//!
//! - **Translation**: the last column
//! - **Scale**: the norms of the upper-left 3×3 columns, with the first one
//!   negated when the determinant is negative (mirrored views)
//! - **Rotation**: the upper-left 3×3 with the scale divided out, as a unit
//!   quaternion
//!
//! Interpolation between two decomposed matrices uses spherical linear
//! interpolation for rotation and linear interpolation for scale and
//! translation, which keeps animated camera moves free of shear.
//!
//! ## Examples
//!
//! ```rust
//! use geonav::navigation::ViewMatrix;
//!
//! let zoomed = ViewMatrix::translation(0.5, -0.25, 0.0).multiply(&ViewMatrix::scaling(2.0));
//! let parts = zoomed.decompose();
//! assert!((parts.scale.x - 2.0).abs() < 1e-12);
//! assert!((parts.translation.x - 0.5).abs() < 1e-12);
//!
//! let rebuilt = parts.compose();
//! assert!((rebuilt.matrix() - zoomed.matrix()).norm() < 1e-12);
//! ```

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, UnitQuaternion, Vector3};

use crate::constants::RAD2DEG;

/// Below this sine of the half-angle, slerp falls back to the nearer endpoint
const SLERP_EPSILON: f64 = 1e-9;

/// A 4×4 affine view transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMatrix(Matrix4<f64>);

impl ViewMatrix {
    pub fn identity() -> Self {
        ViewMatrix(Matrix4::identity())
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        ViewMatrix(matrix)
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Pure translation
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        ViewMatrix(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    /// Uniform scaling about the origin
    pub fn scaling(factor: f64) -> Self {
        ViewMatrix(Matrix4::new_scaling(factor))
    }

    /// Rotation about an axis through the origin, angle in degrees
    pub fn rotation(axis: &Vector3<f64>, degrees: f64) -> Self {
        let angle = degrees.to_radians();
        let rotation = match nalgebra::Unit::try_new(*axis, f64::EPSILON) {
            Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle),
            None => UnitQuaternion::identity(),
        };
        ViewMatrix(rotation.to_homogeneous())
    }

    /// Matrix product `self · other` (`other` is applied first)
    pub fn multiply(&self, other: &ViewMatrix) -> ViewMatrix {
        ViewMatrix(self.0 * other.0)
    }

    /// Applies the matrix to a display-space point
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.0.transform_point(point)
    }

    /// Applies the linear part of the matrix to a direction
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.0.transform_vector(vector)
    }

    /// Scales about `pivot` after this matrix's own transform of display space
    ///
    /// The pivot keeps its position on screen.
    pub fn scaled_about(&self, pivot: &Point3<f64>, factor: f64) -> ViewMatrix {
        let to_pivot = ViewMatrix::translation(pivot.x, pivot.y, pivot.z);
        let from_pivot = ViewMatrix::translation(-pivot.x, -pivot.y, -pivot.z);
        self.multiply(&to_pivot)
            .multiply(&ViewMatrix::scaling(factor))
            .multiply(&from_pivot)
    }

    /// Inverse matrix, if it exists and is finite
    pub fn inverse(&self) -> Option<ViewMatrix> {
        if !self.0.iter().all(|v| v.is_finite()) {
            return None;
        }
        self.0
            .try_inverse()
            .filter(|inv| inv.iter().all(|v| v.is_finite()))
            .map(ViewMatrix)
    }

    /// True when the matrix can be applied to a surface
    pub fn is_invertible(&self) -> bool {
        self.inverse().is_some()
    }

    /// Splits the matrix into rotation, scale and translation
    ///
    /// Matrices with a zero or non-finite scale cannot yield a rotation; the
    /// identity rotation is reported for them.
    pub fn decompose(&self) -> ViewComponents {
        let m = &self.0;
        let translation = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        let linear: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();

        let mut scale = Vector3::new(
            linear.column(0).norm(),
            linear.column(1).norm(),
            linear.column(2).norm(),
        );
        if linear.determinant() < 0.0 {
            scale.x = -scale.x;
        }

        let usable = scale.iter().all(|s| s.is_finite() && *s != 0.0);
        let rotation = if usable {
            let unscaled = Matrix3::from_columns(&[
                linear.column(0) / scale.x,
                linear.column(1) / scale.y,
                linear.column(2) / scale.z,
            ]);
            let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(unscaled));
            UnitQuaternion::new_normalize(q.into_inner())
        } else {
            UnitQuaternion::identity()
        };

        ViewComponents {
            rotation,
            scale,
            translation,
        }
    }
}

impl Default for ViewMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rotation, per-axis scale and translation of a view matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewComponents {
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    pub translation: Vector3<f64>,
}

impl ViewComponents {
    /// Rebuilds `T · R · S`
    pub fn compose(&self) -> ViewMatrix {
        ViewMatrix(
            Matrix4::new_translation(&self.translation)
                * self.rotation.to_homogeneous()
                * Matrix4::new_nonuniform_scaling(&self.scale),
        )
    }

    /// Components a fraction `t` of the way from `self` to `other`
    pub fn interpolate(&self, other: &ViewComponents, t: f64) -> ViewComponents {
        // Nearly identical rotations have no well-defined slerp axis
        let rotation = self
            .rotation
            .try_slerp(&other.rotation, t, SLERP_EPSILON)
            .unwrap_or(if t < 0.5 { self.rotation } else { other.rotation });

        ViewComponents {
            rotation,
            scale: self.scale.lerp(&other.scale, t),
            translation: self.translation.lerp(&other.translation, t),
        }
    }

    /// Rotation as (roll, pitch, yaw) in degrees
    pub fn rotation_degrees(&self) -> (f64, f64, f64) {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        (roll * RAD2DEG, pitch * RAD2DEG, yaw * RAD2DEG)
    }
}
