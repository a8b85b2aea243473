//! Per-stroke bookkeeping of head cap, body and tail cap samples.
//!
//! The ledger sits between the curve sampler and the extruder. Every body
//! sample the sampler emits goes through [`StrokeLedger::append`], which
//! adds the head cap for a new stroke and removes a stale tail cap before
//! sweeping the body. Tail caps are generated lazily, when a stroke is
//! closed or the mesh is flushed, so they always hang off the current last
//! body sample.

use stroke_types::CurveSample;
use tracing::debug;

use crate::config::StrokeConfig;
use crate::cross_section::CrossSection;
use crate::endcap::{CapEnd, EndcapGenerator};
use crate::error::StrokeResult;
use crate::extruder::CurveExtruder;
use crate::host::MeshHost;

/// Lifecycle position of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    /// No samples yet.
    Empty,
    /// Head cap and body present; open for more samples.
    HasHead,
    /// Closed by a tail cap. New body samples reopen it.
    HasTail,
}

/// Samples making up one stroke, in sweep order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    /// Cap before the first body sample.
    pub head_endcap_samples: Vec<CurveSample>,
    /// Samples emitted by the curve sampler.
    pub body_samples: Vec<CurveSample>,
    /// Cap after the last body sample; present once the stroke is finalized.
    pub tail_endcap_samples: Vec<CurveSample>,
}

impl Stroke {
    /// Where this stroke is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> StrokeState {
        if self.body_samples.is_empty() {
            StrokeState::Empty
        } else if self.tail_endcap_samples.is_empty() {
            StrokeState::HasHead
        } else {
            StrokeState::HasTail
        }
    }

    /// Rings this stroke contributes to the mesh.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.head_endcap_samples.len() + self.body_samples.len() + self.tail_endcap_samples.len()
    }

    /// All samples in sweep order.
    pub fn samples(&self) -> impl Iterator<Item = &CurveSample> {
        self.head_endcap_samples
            .iter()
            .chain(&self.body_samples)
            .chain(&self.tail_endcap_samples)
    }
}

/// Owns the strokes of a drawing and the extruder that meshes them.
///
/// # Example
///
/// ```
/// use mesh_from_strokes::{CpuMeshHost, StrokeConfig, StrokeLedger};
/// use stroke_types::{CurveSample, Frame, StyledPoint, Point3, Vector3};
///
/// let mut ledger = StrokeLedger::new(&StrokeConfig::coarse()).unwrap();
/// let frame = Frame::from_forward_up(Vector3::x(), Vector3::y());
/// let samples: Vec<_> = (0..3)
///     .map(|i| {
///         let point = StyledPoint::with_radius(Point3::new(i as f32, 0.0, 0.0), 0.1);
///         CurveSample::new(point, i as f32, frame, i as f32)
///     })
///     .collect();
///
/// ledger.append(&samples);
/// let mut host = CpuMeshHost::new();
/// assert!(ledger.update(&mut host).unwrap().is_some());
/// assert_eq!(ledger.strokes().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StrokeLedger {
    strokes: Vec<Stroke>,
    endcaps: EndcapGenerator,
    extruder: CurveExtruder,
}

impl StrokeLedger {
    /// Create an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: &StrokeConfig) -> StrokeResult<Self> {
        config.validate()?;

        Ok(Self {
            strokes: Vec::new(),
            endcaps: EndcapGenerator::new(config.endcap_segment_count),
            extruder: CurveExtruder::new(
                CrossSection::circle(config.radial_segment_count),
                config.initial_sample_capacity,
            ),
        })
    }

    /// Every stroke, oldest first. The last one is open.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Body samples of the open stroke.
    #[must_use]
    pub fn samples(&self) -> &[CurveSample] {
        self.strokes
            .last()
            .map_or(&[], |stroke| stroke.body_samples.as_slice())
    }

    /// The extruder holding the swept mesh.
    #[must_use]
    pub fn extruder(&self) -> &CurveExtruder {
        &self.extruder
    }

    /// Total rings across all strokes, caps included.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.strokes.iter().map(Stroke::sample_count).sum()
    }

    /// Append body samples to the open stroke, opening one if needed.
    ///
    /// # Panics
    ///
    /// Panics if sample parameters do not strictly increase within the
    /// stroke, or if the first sample's tangent is not unit length.
    pub fn append(&mut self, samples: &[CurveSample]) {
        let Some(first) = samples.first() else {
            return;
        };
        if self.strokes.is_empty() {
            self.begin_new_stroke();
        }

        let endcaps = &self.endcaps;
        let extruder = &mut self.extruder;
        let Some(stroke) = self.strokes.last_mut() else {
            unreachable!("a stroke was just opened");
        };
        assert_eq!(
            stroke.head_endcap_samples.is_empty(),
            stroke.body_samples.is_empty(),
            "a stroke has a head cap exactly when it has body samples"
        );

        let mut previous = stroke.body_samples.last().map(|s| s.parameter);
        for sample in samples {
            if let Some(previous) = previous {
                assert!(
                    sample.parameter > previous,
                    "sample parameters must strictly increase ({} after {previous})",
                    sample.parameter
                );
            }
            previous = Some(sample.parameter);
        }

        if !stroke.tail_endcap_samples.is_empty() {
            debug!(
                samples = stroke.tail_endcap_samples.len(),
                "Reopening stroke, removing tail cap"
            );
            extruder.remove_last(stroke.tail_endcap_samples.len());
            stroke.tail_endcap_samples.clear();
        }

        if stroke.head_endcap_samples.is_empty() {
            stroke.head_endcap_samples = endcaps.generate(first, CapEnd::Head);
            extruder.append(&stroke.head_endcap_samples);
        }

        stroke.body_samples.extend_from_slice(samples);
        extruder.append(samples);
    }

    /// Close the open stroke and start collecting a new one.
    ///
    /// Calling this again before any samples arrive does nothing.
    pub fn begin_new_stroke(&mut self) {
        self.finalize_last_stroke();

        if self
            .strokes
            .last()
            .is_none_or(|stroke| !stroke.body_samples.is_empty())
        {
            debug!(strokes = self.strokes.len() + 1, "Beginning new stroke");
            self.strokes.push(Stroke::default());
        }
    }

    /// Remove the last `sample_count` body samples, most recent first.
    ///
    /// Crosses stroke boundaries as needed. Tail caps of affected strokes
    /// are dropped (the next flush regenerates them) and a stroke whose
    /// body becomes empty loses its head cap too. Strokes emptied along
    /// the way are discarded.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `sample_count` body samples exist.
    pub fn remove_last(&mut self, sample_count: usize) {
        let mut remaining = sample_count;

        while remaining > 0 {
            let Some(mut stroke) = self.strokes.pop() else {
                panic!("attempted to remove more samples than were added");
            };

            if !stroke.tail_endcap_samples.is_empty() {
                self.extruder.remove_last(stroke.tail_endcap_samples.len());
                stroke.tail_endcap_samples.clear();
            }

            let now = remaining.min(stroke.body_samples.len());
            let keep = stroke.body_samples.len() - now;
            stroke.body_samples.truncate(keep);
            self.extruder.remove_last(now);

            if stroke.body_samples.is_empty() && !stroke.head_endcap_samples.is_empty() {
                self.extruder.remove_last(stroke.head_endcap_samples.len());
                stroke.head_endcap_samples.clear();
            }

            remaining -= now;

            if remaining == 0 {
                self.strokes.push(stroke);
            }
        }
    }

    /// Finalize the open stroke and flush the mesh into `host`.
    ///
    /// Returns a new buffer handle when the host had to allocate.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot allocate a large enough buffer.
    pub fn update<H: MeshHost>(&mut self, host: &mut H) -> StrokeResult<Option<H::Handle>> {
        self.finalize_last_stroke();
        self.extruder.update(host)
    }

    /// Generate the tail cap of the last stroke if it has a body and no cap.
    fn finalize_last_stroke(&mut self) {
        let Some(stroke) = self.strokes.last_mut() else {
            return;
        };
        if stroke.body_samples.is_empty() || !stroke.tail_endcap_samples.is_empty() {
            return;
        }
        assert!(
            !stroke.head_endcap_samples.is_empty(),
            "a stroke with body samples must have a head cap"
        );

        let Some(last) = stroke.body_samples.last() else {
            return;
        };
        stroke.tail_endcap_samples = self.endcaps.generate(last, CapEnd::Tail);
        self.extruder.append(&stroke.tail_endcap_samples);

        debug!(
            body = stroke.body_samples.len(),
            tail = stroke.tail_endcap_samples.len(),
            "Finalized stroke"
        );
    }
}
