//! Configuration for stroke mesh generation.

use std::f32::consts::PI;

use crate::error::{StrokeError, StrokeResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters fixed for the lifetime of a stroke generator.
///
/// Changing the radial or endcap resolution requires rebuilding the
/// cross-section and endcap tables, so these are only read at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrokeConfig {
    /// Points on the tube's cross-section circle. Default: 32
    pub radial_segment_count: usize,

    /// Rings in each hemispherical endcap. Default: 16
    pub endcap_segment_count: usize,

    /// Maximum distance between the sampled polyline and the smooth spline.
    /// Smaller values produce more samples. Default: 0.001
    pub flatness: f32,

    /// Largest tangent rotation between consecutive samples, in radians.
    /// Sharper turns get intermediate samples. Default: π/6 (30 degrees)
    pub max_twist_angle: f32,

    /// Rings reserved by the first buffer allocation. Default: 256
    pub initial_sample_capacity: usize,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            radial_segment_count: 32,
            endcap_segment_count: 16,
            flatness: 0.001,
            max_twist_angle: PI / 6.0, // 30 degrees
            initial_sample_capacity: 256,
        }
    }
}

impl StrokeConfig {
    /// Set the number of radial segments.
    #[must_use]
    pub const fn with_radial_segments(mut self, count: usize) -> Self {
        self.radial_segment_count = count;
        self
    }

    /// Set the number of endcap segments.
    #[must_use]
    pub const fn with_endcap_segments(mut self, count: usize) -> Self {
        self.endcap_segment_count = count;
        self
    }

    /// Set the flatness tolerance.
    #[must_use]
    pub const fn with_flatness(mut self, flatness: f32) -> Self {
        self.flatness = flatness;
        self
    }

    /// Set the maximum twist angle in radians.
    #[must_use]
    pub const fn with_max_twist_angle(mut self, angle: f32) -> Self {
        self.max_twist_angle = angle;
        self
    }

    /// Set the initial buffer capacity, in rings.
    #[must_use]
    pub const fn with_initial_capacity(mut self, samples: usize) -> Self {
        self.initial_sample_capacity = samples;
        self
    }

    /// Low-resolution preset for previews and tests.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            radial_segment_count: 8,
            endcap_segment_count: 4,
            flatness: 0.01,
            ..Default::default()
        }
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> StrokeResult<()> {
        if self.radial_segment_count < 3 {
            return Err(StrokeError::TooFewRadialSegments {
                min: 3,
                actual: self.radial_segment_count,
            });
        }
        if self.endcap_segment_count < 1 {
            return Err(StrokeError::TooFewEndcapSegments {
                min: 1,
                actual: self.endcap_segment_count,
            });
        }
        if !(self.flatness > 0.0 && self.flatness.is_finite()) {
            return Err(StrokeError::InvalidFlatness(self.flatness));
        }
        if !(self.max_twist_angle > 0.0 && self.max_twist_angle <= PI) {
            return Err(StrokeError::InvalidTwistAngle(self.max_twist_angle));
        }
        if self.initial_sample_capacity == 0 {
            return Err(StrokeError::InvalidCapacity);
        }
        Ok(())
    }
}
