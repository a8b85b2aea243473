//! Hemispherical endcaps built from a single curve sample.

// Segment counts are small; f32 is exact for them
#![allow(clippy::cast_precision_loss)]

use std::f32::consts::FRAC_PI_2;

use stroke_types::CurveSample;

/// Largest accepted deviation of a cap sample's tangent from unit length.
const TANGENT_TOLERANCE: f32 = 1.0e-4;

/// Which end of a stroke a cap closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapEnd {
    /// Before the first body sample.
    Head,
    /// After the last body sample.
    Tail,
}

/// Generates quarter-circle cap profiles from a precomputed table.
///
/// Entry `i - 1` of the table holds `(cos iθ, sin iθ)` for `i` in
/// `1..=segment_count` and `θ = (π/2) / segment_count`. A cap sample keeps
/// its source sample's parameter, frame and curve distance; only its
/// position along the tangent and its radius change.
#[derive(Debug, Clone, PartialEq)]
pub struct EndcapGenerator {
    table: Vec<(f32, f32)>,
}

impl EndcapGenerator {
    /// Build the table for `segment_count` rings per cap.
    ///
    /// # Panics
    ///
    /// Panics if `segment_count` is zero.
    #[must_use]
    pub fn new(segment_count: usize) -> Self {
        assert!(segment_count >= 1, "endcap needs at least one segment");

        let theta = FRAC_PI_2 / segment_count as f32;
        let table = (1..=segment_count)
            .map(|i| {
                if i == segment_count {
                    // Exact tip so caps close to a point
                    (0.0, 1.0)
                } else {
                    let angle = theta * i as f32;
                    (angle.cos(), angle.sin())
                }
            })
            .collect();

        Self { table }
    }

    /// Rings per cap.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.table.len()
    }

    /// Cap samples for `sample`, in sweep order.
    ///
    /// A head cap runs from its tip, one radius behind the sample, forward
    /// to just before the sample. A tail cap runs from just past the sample
    /// out to its tip, one radius ahead.
    ///
    /// # Panics
    ///
    /// Panics if the sample's tangent is not unit length.
    #[must_use]
    pub fn generate(&self, sample: &CurveSample, end: CapEnd) -> Vec<CurveSample> {
        let tangent = sample.tangent();
        assert!(
            (tangent.norm() - 1.0).abs() <= TANGENT_TOLERANCE,
            "endcap sample tangent must be unit length, got {}",
            tangent.norm()
        );

        let radius = sample.radius();
        let reach = tangent * radius;

        let cap_sample = |cos: f32, offset: f32| {
            let mut cap = *sample;
            cap.set_position(sample.position() + reach * offset);
            cap.set_radius(radius * cos);
            cap
        };

        match end {
            CapEnd::Head => self
                .table
                .iter()
                .rev()
                .map(|&(cos, sin)| cap_sample(cos, -sin))
                .collect(),
            CapEnd::Tail => self
                .table
                .iter()
                .map(|&(cos, sin)| cap_sample(cos, sin))
                .collect(),
        }
    }
}
