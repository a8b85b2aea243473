//! Axis-aligned bounds of the live stroke geometry.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box, grown one vertex at a time.
///
/// The generator keeps one per ring and unions them, so truncating rings
/// never requires a rescan. Hosts use the result for culling.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let mut ring = Aabb::empty();
/// assert!(ring.is_empty());
///
/// ring.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
/// ring.expand_to_include(&Point3::new(-1.0, 0.0, 3.0));
/// assert_eq!(ring.min, Point3::new(-1.0, 0.0, 3.0));
/// assert_eq!(ring.max, Point3::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Smallest coordinate on each axis.
    pub min: Point3<f32>,
    /// Largest coordinate on each axis.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Bounds that enclose nothing. Expanding them by a point yields that
    /// point.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// True until a point has been included.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Bounds enclosing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Grow to enclose `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
