//! Vertex type for stroke meshes.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One vertex of a swept stroke.
///
/// Unlike a general-purpose mesh vertex every attribute is always present:
/// a stroke's material attributes come from its samples, and the renderer
/// expects a fixed layout.
///
/// # Example
///
/// ```
/// use mesh_types::{StrokeVertex, Point3, Vector3};
///
/// let v = StrokeVertex::with_normal(Point3::new(1.0, 2.0, 3.0), Vector3::x());
/// assert_eq!(v.normal, Vector3::x());
/// assert_eq!(v.roughness, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrokeVertex {
    /// Position in world space.
    pub position: Point3<f32>,
    /// Unit surface normal.
    pub normal: Vector3<f32>,
    /// Linear RGB color.
    pub color: Vector3<f32>,
    /// PBR roughness.
    pub roughness: f32,
    /// PBR metallic factor.
    pub metallic: f32,
    /// Distance along the stroke's center curve; usable as a texture coordinate.
    pub curve_distance: f32,
}

impl StrokeVertex {
    /// Create a vertex at `position` with default attributes and a +Z normal.
    #[inline]
    #[must_use]
    pub fn new(position: Point3<f32>) -> Self {
        Self::with_normal(position, Vector3::z())
    }

    /// Create a vertex with position and normal, white and half-rough.
    #[inline]
    #[must_use]
    pub fn with_normal(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            normal,
            color: Vector3::repeat(1.0),
            roughness: 0.5,
            metallic: 0.0,
            curve_distance: 0.0,
        }
    }

    /// Create a vertex from raw coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::StrokeVertex;
    ///
    /// let v = StrokeVertex::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(v.position.x, 1.0);
    /// assert_eq!(v.position.z, 3.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_coords(x: f32, y: f32, z: f32) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Set the material attributes, keeping position and normal.
    #[must_use]
    pub const fn with_material(mut self, color: Vector3<f32>, roughness: f32, metallic: f32) -> Self {
        self.color = color;
        self.roughness = roughness;
        self.metallic = metallic;
        self
    }

    /// Set the curve distance.
    #[must_use]
    pub const fn with_curve_distance(mut self, curve_distance: f32) -> Self {
        self.curve_distance = curve_distance;
        self
    }
}

impl Default for StrokeVertex {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}
