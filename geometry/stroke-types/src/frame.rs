//! Orthonormal frames carried by curve samples.
//!
//! A [`Frame`] orients the cross-section at a sample. Its columns are
//! `(binormal, normal, tangent)`: the cross-section lives in the
//! binormal/normal plane and the tangent points forward along the stroke.

use nalgebra::{Matrix3, Unit, Vector3};

use crate::DEGENERATE_EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A right-handed orthonormal basis at a point on a stroke.
///
/// As a rotation matrix the columns are `[binormal, normal, tangent]`, so
/// the local X axis maps to the binormal, Y to the normal and Z to the
/// tangent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Unit binormal (`normal × tangent`), the local X axis.
    pub binormal: Vector3<f32>,
    /// Unit normal, the local Y axis.
    pub normal: Vector3<f32>,
    /// Unit tangent (forward along the stroke), the local Z axis.
    pub tangent: Vector3<f32>,
}

impl Frame {
    /// The world-aligned frame: binormal X, normal Y, tangent Z.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            binormal: Vector3::x(),
            normal: Vector3::y(),
            tangent: Vector3::z(),
        }
    }

    /// Build an orthonormal frame whose tangent is `forward` and whose
    /// normal is as close to `up` as possible.
    ///
    /// If `up` is parallel to `forward` an arbitrary perpendicular is used.
    /// A degenerate `forward` falls back to +Z.
    ///
    /// # Example
    ///
    /// ```
    /// use stroke_types::Frame;
    /// use nalgebra::Vector3;
    ///
    /// let frame = Frame::from_forward_up(Vector3::new(2.0, 0.0, 0.0), Vector3::y());
    /// assert_eq!(frame.tangent, Vector3::x());
    /// assert!(frame.is_orthonormal(1e-6));
    /// ```
    #[must_use]
    pub fn from_forward_up(forward: Vector3<f32>, up: Vector3<f32>) -> Self {
        let tangent = forward
            .try_normalize(DEGENERATE_EPSILON)
            .unwrap_or_else(Vector3::z);

        let binormal = up
            .cross(&tangent)
            .try_normalize(DEGENERATE_EPSILON)
            .unwrap_or_else(|| find_perpendicular(tangent));
        let normal = tangent.cross(&binormal);

        Self {
            binormal,
            normal,
            tangent,
        }
    }

    /// The frame as a rotation matrix with columns `[binormal, normal, tangent]`.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3<f32> {
        Matrix3::from_columns(&[self.binormal, self.normal, self.tangent])
    }

    /// Read a frame from the columns of a rotation matrix.
    ///
    /// The matrix is assumed orthonormal; use [`Self::orthonormalized`]
    /// otherwise.
    #[must_use]
    pub fn from_matrix(matrix: &Matrix3<f32>) -> Self {
        Self {
            binormal: matrix.column(0).into(),
            normal: matrix.column(1).into(),
            tangent: matrix.column(2).into(),
        }
    }

    /// Transform a direction from frame-local to world coordinates.
    #[must_use]
    pub fn local_to_world(&self, local: &Vector3<f32>) -> Vector3<f32> {
        self.binormal * local.x + self.normal * local.y + self.tangent * local.z
    }

    /// Check if the frame is orthonormal within tolerance.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let lengths = [self.binormal, self.normal, self.tangent]
            .iter()
            .all(|v| (v.norm() - 1.0).abs() < tolerance);
        let dots = [
            self.binormal.dot(&self.normal),
            self.binormal.dot(&self.tangent),
            self.normal.dot(&self.tangent),
        ]
        .iter()
        .all(|d| d.abs() < tolerance);

        lengths && dots
    }

    /// Re-orthonormalize with Gram-Schmidt, keeping the tangent direction.
    #[must_use]
    pub fn orthonormalized(&self) -> Self {
        Self::from_forward_up(self.tangent, self.normal)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

/// Minimal rotation taking unit vector `from` onto unit vector `to`.
///
/// Returns the rotation axis and the angle in radians (`0..=π`). For
/// antiparallel inputs the axis is an arbitrary perpendicular of `from`;
/// for parallel inputs the angle is zero.
///
/// # Example
///
/// ```
/// use stroke_types::rotation_between;
/// use nalgebra::Vector3;
///
/// let (axis, angle) = rotation_between(&Vector3::x(), &Vector3::y());
/// assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// assert!((axis.into_inner() - Vector3::z()).norm() < 1e-6);
/// ```
#[must_use]
pub fn rotation_between(from: &Vector3<f32>, to: &Vector3<f32>) -> (Unit<Vector3<f32>>, f32) {
    let cross = from.cross(to);
    let sin = cross.norm();
    let cos = from.dot(to);
    let angle = sin.atan2(cos);

    let axis = Unit::try_new(cross, DEGENERATE_EPSILON)
        .unwrap_or_else(|| Unit::new_normalize(find_perpendicular(*from)));

    (axis, angle)
}

/// Find a unit vector perpendicular to `v`.
fn find_perpendicular(v: Vector3<f32>) -> Vector3<f32> {
    // Cross with the axis least aligned with v
    let abs = v.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };

    v.cross(&axis)
        .try_normalize(DEGENERATE_EPSILON)
        .unwrap_or_else(Vector3::y)
}
