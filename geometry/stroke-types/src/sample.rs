//! Smoothed samples along a stroke.

use nalgebra::{Point3, Vector3};

use crate::{Frame, StyledPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on the smoothed stroke, ready to be swept into a vertex ring.
///
/// Samples are emitted by the curve sampler in order of increasing
/// `parameter`. Endcap samples are copies of a body sample with position
/// and radius adjusted, so they share its parameter and frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveSample {
    /// Styled point data interpolated from the surrounding key points.
    pub point: StyledPoint,
    /// Position along the spline: integer at key points, fractional between.
    pub parameter: f32,
    /// Orientation of the cross-section; its tangent column must be unit length.
    pub rotation_frame: Frame,
    /// Cumulative Euclidean distance from the first sample of the stroke.
    pub curve_distance: f32,
}

impl CurveSample {
    /// Create a sample from its parts.
    #[must_use]
    pub const fn new(
        point: StyledPoint,
        parameter: f32,
        rotation_frame: Frame,
        curve_distance: f32,
    ) -> Self {
        Self {
            point,
            parameter,
            rotation_frame,
            curve_distance,
        }
    }

    /// Position of this sample.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point3<f32> {
        self.point.position
    }

    /// Tube radius at this sample.
    #[inline]
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.point.radius
    }

    /// Forward direction, the tangent column of the rotation frame.
    #[inline]
    #[must_use]
    pub fn tangent(&self) -> Vector3<f32> {
        self.rotation_frame.tangent
    }

    /// Replace the position, keeping every other attribute.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.point.position = position;
    }

    /// Replace the radius, keeping every other attribute.
    pub fn set_radius(&mut self, radius: f32) {
        self.point.radius = radius;
    }
}

impl Default for CurveSample {
    fn default() -> Self {
        Self::new(StyledPoint::default(), 0.0, Frame::identity(), 0.0)
    }
}
