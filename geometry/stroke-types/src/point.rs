//! Styled input points.

use nalgebra::{Point3, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point produced by a brush style for one input event.
///
/// The style stage resolves speed-dependent attributes (radius, color, ...)
/// before the point reaches the sampler, so this is a plain value type.
/// All components interpolate linearly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyledPoint {
    /// Position in world space.
    pub position: Point3<f32>,
    /// Tube radius at this point.
    pub radius: f32,
    /// Linear RGB color.
    pub color: Vector3<f32>,
    /// PBR roughness in `[0, 1]`.
    pub roughness: f32,
    /// PBR metallic factor in `[0, 1]`.
    pub metallic: f32,
}

impl StyledPoint {
    /// Create a styled point from all of its components.
    #[must_use]
    pub const fn new(
        position: Point3<f32>,
        radius: f32,
        color: Vector3<f32>,
        roughness: f32,
        metallic: f32,
    ) -> Self {
        Self {
            position,
            radius,
            color,
            roughness,
            metallic,
        }
    }

    /// Create a white, half-rough, non-metallic point.
    ///
    /// # Example
    ///
    /// ```
    /// use stroke_types::StyledPoint;
    /// use nalgebra::Point3;
    ///
    /// let p = StyledPoint::with_radius(Point3::new(0.0, 1.0, 0.0), 0.005);
    /// assert_eq!(p.radius, 0.005);
    /// assert_eq!(p.roughness, 0.5);
    /// ```
    #[must_use]
    pub fn with_radius(position: Point3<f32>, radius: f32) -> Self {
        Self::new(position, radius, Vector3::repeat(1.0), 0.5, 0.0)
    }

    /// Create a point from a packed `(x, y, z, radius)` vector.
    #[must_use]
    pub fn from_position_and_radius(
        position_and_radius: Vector4<f32>,
        color: Vector3<f32>,
        roughness: f32,
        metallic: f32,
    ) -> Self {
        Self::new(
            Point3::new(
                position_and_radius.x,
                position_and_radius.y,
                position_and_radius.z,
            ),
            position_and_radius.w,
            color,
            roughness,
            metallic,
        )
    }

    /// Position and radius packed as `(x, y, z, radius)`.
    #[must_use]
    pub fn position_and_radius(&self) -> Vector4<f32> {
        Vector4::new(self.position.x, self.position.y, self.position.z, self.radius)
    }

    /// Interpolate component-wise between `self` (`t == 0`) and `other` (`t == 1`).
    ///
    /// # Example
    ///
    /// ```
    /// use stroke_types::StyledPoint;
    /// use nalgebra::Point3;
    ///
    /// let a = StyledPoint::with_radius(Point3::new(0.0, 0.0, 0.0), 1.0);
    /// let b = StyledPoint::with_radius(Point3::new(2.0, 0.0, 0.0), 3.0);
    /// let mid = a.lerp(&b, 0.5);
    /// assert_eq!(mid.position.x, 1.0);
    /// assert_eq!(mid.radius, 2.0);
    /// ```
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position + (other.position - self.position) * t,
            radius: self.radius + (other.radius - self.radius) * t,
            color: self.color + (other.color - self.color) * t,
            roughness: self.roughness + (other.roughness - self.roughness) * t,
            metallic: self.metallic + (other.metallic - self.metallic) * t,
        }
    }
}

impl Default for StyledPoint {
    fn default() -> Self {
        Self::new(Point3::origin(), 0.0, Vector3::zeros(), 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_endpoints() {
        let a = StyledPoint::new(
            Point3::new(0.0, 0.0, 0.0),
            0.01,
            Vector3::new(1.0, 0.0, 0.0),
            0.2,
            0.0,
        );
        let b = StyledPoint::new(
            Point3::new(1.0, 2.0, 3.0),
            0.03,
            Vector3::new(0.0, 0.0, 1.0),
            0.8,
            1.0,
        );

        assert_eq!(a.lerp(&b, 0.0), a);
        let end = a.lerp(&b, 1.0);
        assert_relative_eq!(end.position, b.position, epsilon = 1e-6);
        assert_relative_eq!(end.radius, b.radius, epsilon = 1e-6);
        assert_relative_eq!(end.color, b.color, epsilon = 1e-6);
        assert_relative_eq!(end.metallic, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn packed_position_and_radius() {
        let p = StyledPoint::with_radius(Point3::new(1.0, 2.0, 3.0), 0.25);
        let packed = p.position_and_radius();
        assert_eq!(packed, Vector4::new(1.0, 2.0, 3.0, 0.25));

        let unpacked = StyledPoint::from_position_and_radius(packed, p.color, 0.5, 0.0);
        assert_eq!(unpacked, p);
    }

    #[test]
    fn default_is_zeroed() {
        let p = StyledPoint::default();
        assert_eq!(p.position, Point3::origin());
        assert_eq!(p.radius, 0.0);
    }
}
