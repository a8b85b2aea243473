//! The closed polygon swept along a stroke.

// Segment counts are small; f32 is exact for them
#![allow(clippy::cast_precision_loss)]

use std::f32::consts::TAU;

use nalgebra::{Vector2, Vector3};
use stroke_types::Frame;

/// Points on a unit circle, counter-clockwise, starting on the +X axis.
///
/// Built once per generator. Local X maps to a sample's binormal and local
/// Y to its normal, so the polygon always lies across the tangent.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    points: Vec<Vector2<f32>>,
}

impl CrossSection {
    /// Unit circle with `segment_count` points.
    ///
    /// # Panics
    ///
    /// Panics if `segment_count < 3`. [`crate::StrokeConfig::validate`]
    /// rejects such counts before a generator is built.
    #[must_use]
    pub fn circle(segment_count: usize) -> Self {
        assert!(
            segment_count >= 3,
            "cross-section needs at least 3 points, got {segment_count}"
        );

        let points = (0..segment_count)
            .map(|j| {
                let angle = TAU * j as f32 / segment_count as f32;
                Vector2::new(angle.cos(), angle.sin())
            })
            .collect();

        Self { points }
    }

    /// Number of points (and of vertices per ring).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a cross-section has at least three points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The polygon's points in the local plane.
    #[must_use]
    pub fn points(&self) -> &[Vector2<f32>] {
        &self.points
    }

    /// Unit directions from the ring center to each point, in world space.
    pub fn radial_directions<'a>(
        &'a self,
        frame: &'a Frame,
    ) -> impl Iterator<Item = Vector3<f32>> + 'a {
        self.points
            .iter()
            .map(move |p| frame.binormal * p.x + frame.normal * p.y)
    }
}
