//! Sweep engine: turns curve samples into vertex rings and tube faces.
//!
//! Every appended sample becomes one ring of `radial` vertices, and every
//! ring after the first is joined to its predecessor by `2 * radial`
//! triangles. Rings and faces are only added or removed at the tail, so
//! `remove_last(n)` is the exact inverse of appending `n` samples.
//!
//! Faces index vertices with `u32`, so one extruder holds at most
//! `u32::MAX` vertices. Appending past that panics.

// Vertex indices are range-checked in `ring_base`
#![allow(clippy::cast_possible_truncation)]

use mesh_types::{Aabb, StrokeMesh, StrokeVertex};
use nalgebra::Point3;
use stroke_types::{CurveSample, DEGENERATE_EPSILON};
use tracing::{info, trace};

use crate::cross_section::CrossSection;
use crate::error::{StrokeError, StrokeResult};
use crate::host::{BufferCapacity, MeshHost, MeshRegion};

/// Incrementally swept tube mesh with amortized host buffer growth.
///
/// The extruder keeps a full CPU copy of the live mesh. Edits mark the
/// first changed ring dirty; [`update`](Self::update) then describes only
/// the changed tail to the host, or everything after a reallocation.
#[derive(Debug, Clone)]
pub struct CurveExtruder {
    cross_section: CrossSection,
    /// Center and radius of each live ring, used for slope normals.
    rings: Vec<(Point3<f32>, f32)>,
    mesh: StrokeMesh,
    /// `ring_bounds[i]` encloses rings `0..=i`.
    ring_bounds: Vec<Aabb>,
    dirty_from: Option<usize>,
    capacity: Option<BufferCapacity>,
    initial_capacity: usize,
}

impl CurveExtruder {
    /// Create an extruder sweeping `cross_section`, whose first buffer
    /// holds `initial_capacity` rings.
    #[must_use]
    pub fn new(cross_section: CrossSection, initial_capacity: usize) -> Self {
        Self {
            cross_section,
            rings: Vec::new(),
            mesh: StrokeMesh::new(),
            ring_bounds: Vec::new(),
            dirty_from: None,
            capacity: None,
            initial_capacity: initial_capacity.max(1),
        }
    }

    /// Vertices per ring.
    #[must_use]
    pub fn radial_segment_count(&self) -> usize {
        self.cross_section.len()
    }

    /// Number of live rings (one per appended sample).
    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// The live mesh.
    #[must_use]
    pub fn mesh(&self) -> &StrokeMesh {
        &self.mesh
    }

    /// Bounds of the live mesh; empty when nothing is live.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.ring_bounds.last().copied().unwrap_or_default()
    }

    /// Capacity of the buffer most recently allocated from the host.
    #[must_use]
    pub fn capacity(&self) -> Option<BufferCapacity> {
        self.capacity
    }

    /// True if edits are waiting for [`update`](Self::update).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty_from.is_some()
    }

    /// Sweep the cross-section along `samples`, one ring per sample.
    ///
    /// # Panics
    ///
    /// Panics if the mesh would outgrow `u32` vertex indices.
    pub fn append(&mut self, samples: &[CurveSample]) {
        if samples.is_empty() {
            return;
        }
        self.mark_dirty(self.rings.len());

        for sample in samples {
            self.push_ring(sample);
        }
    }

    /// Remove the last `sample_count` rings and every face touching them.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `sample_count` rings are live.
    pub fn remove_last(&mut self, sample_count: usize) {
        assert!(
            sample_count <= self.rings.len(),
            "cannot remove {sample_count} rings, only {} are live",
            self.rings.len()
        );
        if sample_count == 0 {
            return;
        }

        let remaining = self.rings.len() - sample_count;
        let radial = self.radial_segment_count();

        self.rings.truncate(remaining);
        self.ring_bounds.truncate(remaining);
        self.mesh
            .truncate(remaining * radial, remaining.saturating_sub(1) * radial * 2);
        self.mark_dirty(remaining);
    }

    /// Flush pending edits into the host's buffer.
    ///
    /// Returns the new buffer's handle when the live rings no longer fit the
    /// current buffer (or no buffer exists yet). The new capacity is the
    /// larger of the required size, twice the previous capacity and the
    /// initial capacity, and the whole mesh is described into it.
    /// Otherwise only the changed tail is described and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::Allocation`] if the host cannot allocate. The
    /// pending edits stay pending.
    pub fn update<H: MeshHost>(&mut self, host: &mut H) -> StrokeResult<Option<H::Handle>> {
        let required = self.rings.len();
        let fits = self.capacity.is_some_and(|c| required <= c.rings);

        if fits {
            if let Some(ring) = self.dirty_from.take() {
                let region = self.region_from(ring);
                trace!(
                    first_vertex = region.first_vertex,
                    vertices = region.vertices.len(),
                    faces = region.faces.len(),
                    "Flushing stroke mesh region"
                );
                host.describe(region);
            }
            return Ok(None);
        }

        let previous = self.capacity.map_or(0, |c| c.rings);
        let rings = required.max(previous * 2).max(self.initial_capacity);
        let capacity = BufferCapacity::for_rings(rings, self.radial_segment_count());

        let handle = host
            .allocate(capacity)
            .map_err(|e| StrokeError::Allocation {
                capacity,
                source: Box::new(e),
            })?;

        info!(
            previous_rings = previous,
            rings = rings,
            vertices = self.mesh.vertices.len(),
            faces = self.mesh.faces.len(),
            "Allocated stroke mesh buffer"
        );

        self.capacity = Some(capacity);
        self.dirty_from = None;
        host.describe(self.region_from(0));

        Ok(Some(handle))
    }

    fn mark_dirty(&mut self, ring: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(ring, |d| d.min(ring)));
    }

    fn region_from(&self, ring: usize) -> MeshRegion<'_> {
        let radial = self.radial_segment_count();
        let first_vertex = (ring * radial).min(self.mesh.vertices.len());
        let first_face = (ring.saturating_sub(1) * radial * 2).min(self.mesh.faces.len());

        MeshRegion {
            first_vertex,
            first_face,
            vertices: &self.mesh.vertices[first_vertex..],
            faces: &self.mesh.faces[first_face..],
            vertex_count: self.mesh.vertices.len(),
            face_count: self.mesh.faces.len(),
            bounds: self.bounds(),
        }
    }

    fn push_ring(&mut self, sample: &CurveSample) {
        let frame = &sample.rotation_frame;
        let center = sample.position();
        let radius = sample.radius();

        // Normals tilt by the radius change per unit length since the previous ring
        let slope = self.rings.last().map_or(0.0, |&(prev_center, prev_radius)| {
            let run = (center - prev_center).norm();
            if run > DEGENERATE_EPSILON {
                (radius - prev_radius) / run
            } else {
                0.0
            }
        });

        let ring_index = self.rings.len();
        let mut bounds = Aabb::empty();

        for radial in self.cross_section.radial_directions(frame) {
            let position = center + radial * radius;
            let normal = (radial - frame.tangent * slope)
                .try_normalize(DEGENERATE_EPSILON)
                .unwrap_or(radial);

            bounds.expand_to_include(&position);
            self.mesh.vertices.push(
                StrokeVertex::with_normal(position, normal)
                    .with_material(sample.point.color, sample.point.roughness, sample.point.metallic)
                    .with_curve_distance(sample.curve_distance),
            );
        }

        if ring_index > 0 {
            let n = self.radial_segment_count();
            let prev = ring_base(ring_index - 1, n);
            let cur = ring_base(ring_index, n);
            for j in 0..n {
                let a = j as u32;
                let b = ((j + 1) % n) as u32;
                // CCW seen from outside
                self.mesh.faces.push([prev + a, prev + b, cur + a]);
                self.mesh.faces.push([prev + b, cur + b, cur + a]);
            }
        }

        let total = self
            .ring_bounds
            .last()
            .map_or(bounds, |previous| previous.union(&bounds));
        self.ring_bounds.push(total);
        self.rings.push((center, radius));
    }
}

/// Index of the first vertex of `ring`.
///
/// # Panics
///
/// Panics if the ring's last vertex does not fit a `u32` index.
fn ring_base(ring: usize, radial: usize) -> u32 {
    let fits = ring
        .checked_add(1)
        .and_then(|rings| rings.checked_mul(radial))
        .is_some_and(|end| u32::try_from(end).is_ok());
    assert!(fits, "ring {ring} exceeds the u32 vertex index range");
    (ring * radial) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CpuMeshHost;
    use approx::assert_relative_eq;
    use mesh_types::MeshTopology;
    use nalgebra::Vector3;
    use stroke_types::{Frame, StyledPoint};

    const RADIAL: usize = 6;

    fn sample_at(x: f32, radius: f32) -> CurveSample {
        CurveSample::new(
            StyledPoint::with_radius(Point3::new(x, 0.0, 0.0), radius),
            x,
            Frame::from_forward_up(Vector3::x(), Vector3::y()),
            x,
        )
    }

    fn line(count: usize) -> Vec<CurveSample> {
        (0..count).map(|i| sample_at(i as f32, 0.5)).collect()
    }

    fn extruder(initial_capacity: usize) -> CurveExtruder {
        CurveExtruder::new(CrossSection::circle(RADIAL), initial_capacity)
    }

    #[test]
    fn append_builds_rings_and_faces() {
        let mut ex = extruder(8);
        ex.append(&line(3));
        assert_eq!(ex.ring_count(), 3);
        assert_eq!(ex.mesh().vertex_count(), 3 * RADIAL);
        assert_eq!(ex.mesh().face_count(), 2 * RADIAL * 2);
        assert!(ex.is_dirty());
    }

    #[test]
    fn single_ring_has_no_faces() {
        let mut ex = extruder(8);
        ex.append(&line(1));
        assert_eq!(ex.mesh().vertex_count(), RADIAL);
        assert_eq!(ex.mesh().face_count(), 0);
    }

    #[test]
    fn ring_vertices_lie_on_circle() {
        let mut ex = extruder(8);
        ex.append(&[sample_at(2.0, 0.25)]);
        for v in &ex.mesh().vertices {
            let offset = v.position - Point3::new(2.0, 0.0, 0.0);
            assert_relative_eq!(offset.norm(), 0.25, epsilon = 1e-6);
            assert_relative_eq!(offset.x, 0.0, epsilon = 1e-6);
            // Constant radius gives purely radial normals
            assert_relative_eq!(v.normal, offset / 0.25, epsilon = 1e-5);
        }
    }

    #[test]
    fn vertices_carry_sample_attributes() {
        let mut sample = sample_at(1.0, 0.1);
        sample.point.color = Vector3::new(0.2, 0.4, 0.6);
        sample.point.roughness = 0.9;
        sample.point.metallic = 1.0;
        sample.curve_distance = 7.0;

        let mut ex = extruder(8);
        ex.append(&[sample]);
        let v = ex.mesh().vertices[0];
        assert_eq!(v.color, Vector3::new(0.2, 0.4, 0.6));
        assert_eq!(v.roughness, 0.9);
        assert_eq!(v.metallic, 1.0);
        assert_eq!(v.curve_distance, 7.0);
    }

    #[test]
    fn tapering_tilts_normals_forward() {
        let mut ex = extruder(8);
        ex.append(&[sample_at(0.0, 1.0), sample_at(1.0, 0.5)]);
        for v in &ex.mesh().vertices[RADIAL..] {
            assert!(v.normal.x > 0.0);
            assert_relative_eq!(v.normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn faces_wind_outward() {
        let mut ex = extruder(8);
        ex.append(&line(4));
        for i in 0..ex.mesh().face_count() {
            let normal = ex.mesh().face_normal(i).unwrap_or_default();
            let [a, b, c] = ex.mesh().faces[i];
            let centroid = (ex.mesh().vertices[a as usize].position.coords
                + ex.mesh().vertices[b as usize].position.coords
                + ex.mesh().vertices[c as usize].position.coords)
                / 3.0;
            let outward = Vector3::new(0.0, centroid.y, centroid.z);
            assert!(normal.dot(&outward) > 0.0, "face {i} winds inward");
        }
    }

    #[test]
    fn remove_last_is_inverse_of_append() {
        let mut ex = extruder(8);
        ex.append(&line(3));
        let before = ex.mesh().clone();
        let bounds = ex.bounds();

        ex.append(&[sample_at(3.0, 2.0), sample_at(4.0, 2.0)]);
        assert_ne!(ex.bounds(), bounds);
        ex.remove_last(2);

        assert_eq!(ex.mesh(), &before);
        assert_eq!(ex.bounds(), bounds);
    }

    #[test]
    fn remove_everything() {
        let mut ex = extruder(8);
        ex.append(&line(3));
        ex.remove_last(3);
        assert_eq!(ex.ring_count(), 0);
        assert!(ex.mesh().is_empty());
        assert!(ex.bounds().is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot remove 4 rings")]
    fn remove_too_many_panics() {
        let mut ex = extruder(8);
        ex.append(&line(3));
        ex.remove_last(4);
    }

    #[test]
    fn first_update_allocates() {
        let mut ex = extruder(8);
        let mut host = CpuMeshHost::new();

        let handle = ex.update(&mut host).ok().flatten();
        assert_eq!(handle, Some(0));
        assert_eq!(ex.capacity().map(|c| c.rings), Some(8));
        assert!(!ex.is_dirty());
    }

    #[test]
    fn update_in_place_when_it_fits() {
        let mut ex = extruder(8);
        let mut host = CpuMeshHost::new();
        ex.append(&line(2));
        assert!(ex.update(&mut host).ok().flatten().is_some());

        ex.append(&[sample_at(2.0, 0.5)]);
        assert!(ex.update(&mut host).ok().flatten().is_none());
        assert_eq!(host.allocation_count(), 1);

        let buffer = host.current().cloned().unwrap_or_default();
        assert_eq!(&buffer.mesh, ex.mesh());
        assert_eq!(buffer.bounds, ex.bounds());
    }

    #[test]
    fn update_after_removal_shrinks_host_copy() {
        let mut ex = extruder(8);
        let mut host = CpuMeshHost::new();
        ex.append(&line(4));
        let _ = ex.update(&mut host);

        ex.remove_last(2);
        ex.append(&[sample_at(2.0, 0.1)]);
        assert!(ex.update(&mut host).ok().flatten().is_none());

        let buffer = host.current().cloned().unwrap_or_default();
        assert_eq!(&buffer.mesh, ex.mesh());
        assert_eq!(buffer.vertex_count(), 3 * RADIAL);
    }

    #[test]
    fn growth_doubles_capacity() {
        let mut ex = extruder(2);
        let mut host = CpuMeshHost::new();
        ex.append(&line(2));
        let _ = ex.update(&mut host);
        assert_eq!(ex.capacity().map(|c| c.rings), Some(2));

        ex.append(&[sample_at(2.0, 0.5)]);
        assert_eq!(ex.update(&mut host).ok().flatten(), Some(1));
        assert_eq!(ex.capacity().map(|c| c.rings), Some(4));

        ex.append(&line(20));
        assert_eq!(ex.update(&mut host).ok().flatten(), Some(2));
        assert_eq!(ex.capacity().map(|c| c.rings), Some(23));

        let buffer = host.current().cloned().unwrap_or_default();
        assert_eq!(&buffer.mesh, ex.mesh());
        assert_eq!(
            buffer.capacity.map(|c| c.vertices),
            Some(23 * RADIAL)
        );
    }

    #[test]
    fn allocation_failure_keeps_edits_pending() {
        let mut ex = extruder(4);
        let mut host = CpuMeshHost::new().with_vertex_limit(RADIAL);
        ex.append(&line(2));

        let result = ex.update(&mut host);
        assert!(matches!(result, Err(StrokeError::Allocation { .. })));
        assert!(ex.is_dirty());
        assert!(ex.capacity().is_none());
    }

    #[test]
    fn bounds_track_all_rings() {
        let mut ex = extruder(8);
        ex.append(&[sample_at(0.0, 1.0), sample_at(5.0, 0.5)]);
        let bounds = ex.bounds();
        assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.x, 5.0, epsilon = 1e-6);
        // Binormal is -Z, so the point at half a turn sits on +Z
        assert_relative_eq!(bounds.max.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn ring_base_offsets_by_ring() {
        assert_eq!(ring_base(0, RADIAL), 0);
        assert_eq!(ring_base(10, RADIAL), 10 * RADIAL as u32);

        let last = u32::MAX as usize / RADIAL - 1;
        assert_eq!(ring_base(last, RADIAL) as usize, last * RADIAL);
    }

    #[test]
    #[should_panic(expected = "exceeds the u32 vertex index range")]
    fn ring_base_rejects_index_overflow() {
        let _ = ring_base(u32::MAX as usize / RADIAL + 1, RADIAL);
    }
}
