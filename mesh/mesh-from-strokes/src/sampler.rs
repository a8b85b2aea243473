//! Smooths traced key points into curve samples.
//!
//! Each traced point becomes a key of a Catmull-Rom spline. Position,
//! radius, color, roughness and metallic are each splined over the keys,
//! and the position spline is subdivided until it is flat to within the
//! configured tolerance. Samples carry a rotation frame propagated from the
//! previous sample, so the cross-section does not spin about the tangent.
//! Sharp turns are broken into intermediate frames no more than the
//! maximum twist angle apart.

// Key counts are small; f32 is exact for them
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use nalgebra::{UnitQuaternion, Vector3};
use stroke_types::{
    CurveSample, DEGENERATE_EPSILON, Frame, StyledPoint, catmull_rom, rotation_between,
};
use tracing::debug;

use crate::config::StrokeConfig;
use crate::error::StrokeResult;
use crate::host::MeshHost;
use crate::ledger::StrokeLedger;

/// Tolerance for the first sample of a stroke sitting at parameter zero.
const START_TOLERANCE: f32 = 1.0e-6;

/// A traced point and the number of samples credited to it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct KeyPoint {
    /// Samples whose parameter floors to this key's index.
    sample_count: usize,
    point: StyledPoint,
}

/// Turns a stream of styled points into a smooth, swept stroke mesh.
///
/// # Example
///
/// ```
/// use mesh_from_strokes::{CpuMeshHost, SmoothCurveSampler, StrokeConfig};
/// use stroke_types::{StyledPoint, Point3};
///
/// let mut sampler = SmoothCurveSampler::new(&StrokeConfig::coarse()).unwrap();
/// sampler.trace(StyledPoint::with_radius(Point3::new(0.0, 0.0, 0.0), 0.01));
/// sampler.trace(StyledPoint::with_radius(Point3::new(1.0, 0.0, 0.0), 0.01));
///
/// let mut host = CpuMeshHost::new();
/// let handle = sampler.update(&mut host).unwrap();
/// assert!(handle.is_some());
/// assert!(sampler.samples().len() >= 2);
/// ```
#[derive(Debug, Clone)]
pub struct SmoothCurveSampler {
    ledger: StrokeLedger,
    key_points: Vec<KeyPoint>,
    flatness: f32,
    max_twist_angle: f32,
}

impl SmoothCurveSampler {
    /// Create a sampler and the ledger it feeds.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: &StrokeConfig) -> StrokeResult<Self> {
        Ok(Self {
            ledger: StrokeLedger::new(config)?,
            key_points: Vec::new(),
            flatness: config.flatness,
            max_twist_angle: config.max_twist_angle,
        })
    }

    /// Flatness tolerance used for subdivision.
    #[must_use]
    pub fn flatness(&self) -> f32 {
        self.flatness
    }

    /// True if the open stroke has no key points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_points.is_empty()
    }

    /// Key points of the open stroke.
    #[must_use]
    pub fn key_point_count(&self) -> usize {
        self.key_points.len()
    }

    /// Body samples of the open stroke.
    #[must_use]
    pub fn samples(&self) -> &[CurveSample] {
        self.ledger.samples()
    }

    /// The ledger holding every stroke and its mesh.
    #[must_use]
    pub fn ledger(&self) -> &StrokeLedger {
        &self.ledger
    }

    /// Add a key point to the end of the open stroke.
    ///
    /// Samples credited to the previous key are regenerated against the
    /// extended spline, then new samples are emitted up to and including
    /// the new key.
    pub fn trace(&mut self, point: StyledPoint) {
        if let Some(previous) = self.pop_key_point() {
            self.key_points.push(KeyPoint {
                sample_count: 0,
                point: previous,
            });
        }
        self.key_points.push(KeyPoint {
            sample_count: 0,
            point,
        });

        if self.samples().is_empty() {
            self.append_sample(0.0, None);
        }

        let end = self.last_key_parameter();
        let start = self.last_parameter().unwrap_or(0.0);
        self.append_samples(start, end);

        if self.last_parameter().is_some_and(|last| last < end) {
            self.append_twist_steps(end);
            self.append_sample(end, None);
        }
    }

    /// Replace the most recent key point with `point`.
    pub fn replace_head_key(&mut self, point: StyledPoint) {
        let _ = self.pop_key_point();
        self.trace(point);
    }

    /// Remove the most recent key point and the samples credited to it.
    ///
    /// Returns the removed point, or `None` if the stroke has no keys.
    pub fn pop_key_point(&mut self) -> Option<StyledPoint> {
        let key = self.key_points.pop()?;
        debug!(
            keys = self.key_points.len(),
            samples = key.sample_count,
            "Popped key point"
        );
        self.ledger.remove_last(key.sample_count);
        Some(key.point)
    }

    /// Close the open stroke and start a new one.
    pub fn begin_new_stroke(&mut self) {
        self.key_points.clear();
        self.ledger.begin_new_stroke();
    }

    /// Finalize the open stroke and flush the mesh into `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot allocate a large enough buffer.
    pub fn update<H: MeshHost>(&mut self, host: &mut H) -> StrokeResult<Option<H::Handle>> {
        self.ledger.update(host)
    }

    fn last_key_parameter(&self) -> f32 {
        self.key_points.len().saturating_sub(1) as f32
    }

    fn last_parameter(&self) -> Option<f32> {
        self.samples().last().map(|s| s.parameter)
    }

    fn sample_point(&self, parameter: f32) -> StyledPoint {
        let keys = &self.key_points;
        let n = keys.len();
        StyledPoint {
            position: catmull_rom::evaluate_by(n, |i| keys[i].point.position.coords, parameter)
                .into(),
            radius: catmull_rom::evaluate_by(n, |i| keys[i].point.radius, parameter),
            color: catmull_rom::evaluate_by(n, |i| keys[i].point.color, parameter),
            roughness: catmull_rom::evaluate_by(n, |i| keys[i].point.roughness, parameter),
            metallic: catmull_rom::evaluate_by(n, |i| keys[i].point.metallic, parameter),
        }
    }

    /// Unit tangent of the position spline, or `None` where it is stationary.
    fn sample_tangent(&self, parameter: f32) -> Option<Vector3<f32>> {
        let keys = &self.key_points;
        catmull_rom::derivative_by(keys.len(), |i| keys[i].point.position.coords, parameter)
            .try_normalize(DEGENERATE_EPSILON)
    }

    /// Subdivide `(start, end]` and append the samples, inserting
    /// intermediate frames wherever the tangent turns too sharply.
    fn append_samples(&mut self, start: f32, end: f32) {
        let keys = &self.key_points;
        let parameters = catmull_rom::subdivide_by(
            keys.len(),
            |i| keys[i].point.position.coords,
            start,
            end,
            self.flatness,
        );

        for parameter in parameters {
            self.append_twist_steps(parameter);
            self.append_sample(parameter, None);
        }
    }

    /// Append intermediate samples between the last sample and `target`
    /// that rotate the frame toward the tangent at `target` in steps no
    /// larger than the maximum twist angle.
    fn append_twist_steps(&mut self, target: f32) {
        let Some(last) = self.samples().last().copied() else {
            return;
        };
        let Some(tangent) = self.sample_tangent(target) else {
            return;
        };

        let (axis, angle) = rotation_between(&last.tangent(), &tangent);
        if angle <= self.max_twist_angle {
            return;
        }

        let mut frame = last.rotation_frame;
        let mut step = self.max_twist_angle * 0.5;
        while step < angle {
            let rotated = UnitQuaternion::from_axis_angle(&axis, step) * last.tangent();
            frame = Frame::from_forward_up(rotated, frame.normal);

            let t = step / angle;
            let parameter = last.parameter + (target - last.parameter) * t;
            if parameter > last.parameter && parameter < target {
                self.append_sample(parameter, Some(frame));
            }
            step += self.max_twist_angle;
        }
    }

    /// Evaluate the spline at `parameter` and hand the sample to the ledger.
    ///
    /// Without an override, the frame is the previous sample's frame turned
    /// onto the new tangent, or kept as is where the tangent is undefined.
    fn append_sample(&mut self, parameter: f32, frame_override: Option<Frame>) {
        let last = self.samples().last().copied();
        match last {
            None => assert!(
                parameter.abs() <= START_TOLERANCE,
                "the first sample of a stroke must be at parameter 0, got {parameter}"
            ),
            Some(last) => assert!(
                parameter > last.parameter,
                "sample parameters must strictly increase ({parameter} after {})",
                last.parameter
            ),
        }

        let point = self.sample_point(parameter);
        let curve_distance = last.map_or(0.0, |last| {
            last.curve_distance + (point.position - last.position()).norm()
        });

        let rotation_frame = frame_override.unwrap_or_else(|| {
            let previous = last.map(|s| s.rotation_frame).unwrap_or_default();
            match self.sample_tangent(parameter) {
                Some(tangent) => Frame::from_forward_up(tangent, previous.normal),
                None => previous,
            }
        });

        self.ledger.append(&[CurveSample::new(
            point,
            parameter,
            rotation_frame,
            curve_distance,
        )]);

        let index = (parameter.max(0.0) as usize).min(self.key_points.len() - 1);
        self.key_points[index].sample_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn config() -> StrokeConfig {
        StrokeConfig::default()
            .with_radial_segments(8)
            .with_endcap_segments(4)
    }

    fn sampler() -> SmoothCurveSampler {
        SmoothCurveSampler::new(&config()).unwrap_or_else(|e| panic!("{e}"))
    }

    fn point(x: f32, y: f32) -> StyledPoint {
        StyledPoint::with_radius(Point3::new(x, y, 0.0), 0.01)
    }

    #[test]
    fn first_trace_samples_start() {
        let mut sampler = sampler();
        assert!(sampler.is_empty());

        sampler.trace(point(0.0, 0.0));
        assert!(!sampler.is_empty());
        assert_eq!(sampler.samples().len(), 1);
        assert_eq!(sampler.samples()[0].parameter, 0.0);
        assert_eq!(sampler.samples()[0].curve_distance, 0.0);
    }

    #[test]
    fn second_trace_reaches_key() {
        let mut sampler = sampler();
        sampler.trace(point(0.0, 0.0));
        sampler.trace(point(1.0, 0.0));

        let samples = sampler.samples();
        assert_eq!(samples[0].parameter, 0.0);
        assert_eq!(samples[samples.len() - 1].parameter, 1.0);
        assert_relative_eq!(
            samples[samples.len() - 1].position(),
            Point3::new(1.0, 0.0, 0.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(samples[0].tangent(), Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn keys_are_landmarks() {
        let mut sampler = sampler();
        for (x, y) in [(0.0, 0.0), (1.0, 0.5), (2.0, -0.5), (3.0, 0.0)] {
            sampler.trace(point(x, y));
        }
        for key in 0..4 {
            let hits = sampler
                .samples()
                .iter()
                .filter(|s| s.parameter == key as f32)
                .count();
            assert_eq!(hits, 1, "key {key}");
        }
    }

    #[test]
    fn parameters_strictly_increase() {
        let mut sampler = sampler();
        for (x, y) in [(0.0, 0.0), (1.0, 1.0), (1.5, -1.0), (0.0, 0.5), (2.0, 2.0)] {
            sampler.trace(point(x, y));
        }
        assert!(sampler.samples().windows(2).all(|w| w[0].parameter < w[1].parameter));
    }

    #[test]
    fn pop_key_point_restores_count() {
        let mut sampler = sampler();
        sampler.trace(point(0.0, 0.0));
        sampler.trace(point(1.0, 0.0));
        sampler.trace(point(2.0, 1.0));

        let popped = sampler.pop_key_point();
        assert_eq!(popped.map(|p| p.position), Some(Point3::new(2.0, 1.0, 0.0)));
        assert_eq!(sampler.key_point_count(), 2);
        let last = sampler.samples().last().map(|s| s.parameter);
        assert!(last.is_some_and(|p| p < 2.0));
    }

    #[test]
    fn pop_everything() {
        let mut sampler = sampler();
        sampler.trace(point(0.0, 0.0));
        sampler.trace(point(1.0, 0.0));
        while sampler.pop_key_point().is_some() {}
        assert!(sampler.is_empty());
        assert!(sampler.samples().is_empty());
        assert_eq!(sampler.ledger().sample_count(), 0);
    }

    #[test]
    fn replace_head_key_moves_end() {
        let mut sampler = sampler();
        sampler.trace(point(0.0, 0.0));
        sampler.trace(point(1.0, 0.0));
        sampler.replace_head_key(point(1.0, 1.0));

        assert_eq!(sampler.key_point_count(), 2);
        let end = sampler.samples().last().map(|s| s.position());
        assert!(end.is_some_and(|p| (p - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-6));
    }

    #[test]
    fn begin_new_stroke_clears_keys() {
        let mut sampler = sampler();
        sampler.trace(point(0.0, 0.0));
        sampler.trace(point(1.0, 0.0));
        sampler.begin_new_stroke();

        assert!(sampler.is_empty());
        assert!(sampler.samples().is_empty());
        assert_eq!(sampler.ledger().strokes().len(), 2);

        sampler.trace(point(5.0, 0.0));
        assert_eq!(sampler.samples()[0].parameter, 0.0);
        assert_eq!(sampler.samples()[0].curve_distance, 0.0);
    }

    #[test]
    fn interpolates_style_attributes() {
        let mut sampler = sampler();
        let mut a = point(0.0, 0.0);
        a.roughness = 0.0;
        let mut b = point(1.0, 0.0);
        b.roughness = 1.0;
        b.radius = 0.03;

        sampler.trace(a);
        sampler.trace(b);
        let samples = sampler.samples();
        let last = samples[samples.len() - 1];
        assert_relative_eq!(last.point.roughness, 1.0, epsilon = 1e-6);
        assert_relative_eq!(last.radius(), 0.03, epsilon = 1e-6);
        assert!(samples.windows(2).all(|w| w[0].point.roughness <= w[1].point.roughness + 1e-6));
    }

    #[test]
    fn sharp_turn_inserts_twist_steps() {
        let mut sampler = SmoothCurveSampler::new(&config().with_flatness(10.0))
            .unwrap_or_else(|e| panic!("{e}"));
        for p in [point(0.0, 0.0), point(1.0, 0.0), point(2.0, 0.0), point(2.0, 1.0)] {
            sampler.trace(p);
        }

        let samples = sampler.samples();
        assert!(samples.iter().any(|s| s.parameter.fract() != 0.0));
        for pair in samples.windows(2) {
            let (_, angle) = rotation_between(&pair[0].tangent(), &pair[1].tangent());
            assert!(angle <= config().max_twist_angle + 1e-4, "step of {angle} rad");
        }
    }

    #[test]
    fn stationary_stroke_keeps_frame() {
        let mut sampler = sampler();
        sampler.trace(point(0.0, 0.0));
        sampler.trace(point(0.0, 0.0));

        // Zero derivative everywhere: every sample keeps the starting frame
        assert_eq!(sampler.samples().len(), 2);
        for sample in sampler.samples() {
            assert_eq!(sample.rotation_frame, Frame::identity());
            assert_eq!(sample.curve_distance, 0.0);
        }
    }
}
