//! Tail-growable triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, StrokeVertex};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh whose vertices and faces grow and shrink at the tail.
///
/// Stroke geometry is only ever appended to or truncated from the end, so
/// a prefix of the vertex and face arrays is stable across edits and can be
/// uploaded once.
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrokeMesh {
    /// Vertex data.
    pub vertices: Vec<StrokeVertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl StrokeMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Keep only the first `vertex_count` vertices and `face_count` faces.
    ///
    /// Counts larger than the current sizes leave the mesh unchanged.
    pub fn truncate(&mut self, vertex_count: usize, face_count: usize) {
        self.vertices.truncate(vertex_count);
        self.faces.truncate(face_count);
    }

    /// Remove all geometry, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }

    /// Flat index buffer, three indices per face.
    #[must_use]
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Uses the divergence theorem: the signed volume is the sum of signed
    /// tetrahedra volumes formed by each face and the origin. A closed mesh
    /// with outward winding has positive volume.
    #[must_use]
    pub fn signed_volume(&self) -> f32 {
        let mut volume = 0.0;

        for &[i0, i1, i2] in &self.faces {
            let v0 = &self.vertices[i0 as usize].position;
            let v1 = &self.vertices[i1 as usize].position;
            let v2 = &self.vertices[i2 as usize].position;

            // Signed volume of tetrahedron with origin = (v0 · (v1 × v2)) / 6
            volume += v0.coords.dot(&v1.coords.cross(&v2.coords));
        }

        volume / 6.0
    }

    /// Check if the mesh appears to be inside-out.
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Geometric normal of a face (unnormalized, length twice the area).
    ///
    /// Returns `None` if the face index is out of bounds.
    #[must_use]
    pub fn face_normal(&self, index: usize) -> Option<Vector3<f32>> {
        let [i0, i1, i2] = *self.faces.get(index)?;
        let v0 = self.vertices.get(i0 as usize)?.position;
        let v1 = self.vertices.get(i1 as usize)?.position;
        let v2 = self.vertices.get(i2 as usize)?.position;
        Some((v1 - v0).cross(&(v2 - v0)))
    }
}

impl MeshTopology for StrokeMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&StrokeVertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn vertices(&self) -> impl Iterator<Item = &StrokeVertex> {
        self.vertices.iter()
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.faces.iter().copied()
    }
}

impl MeshBounds for StrokeMesh {
    fn bounds(&self) -> Aabb {
        self.vertices.iter().fold(Aabb::empty(), |mut aabb, v| {
            aabb.expand_to_include(&v.position);
            aabb
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tetrahedron() -> StrokeMesh {
        let mut mesh = StrokeMesh::with_capacity(4, 4);
        mesh.vertices.push(StrokeVertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(StrokeVertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(StrokeVertex::from_coords(0.0, 1.0, 0.0));
        mesh.vertices.push(StrokeVertex::from_coords(0.0, 0.0, 1.0));
        // CCW from outside
        mesh.faces.push([0, 2, 1]);
        mesh.faces.push([0, 1, 3]);
        mesh.faces.push([0, 3, 2]);
        mesh.faces.push([1, 2, 3]);
        mesh
    }

    #[test]
    fn empty_mesh() {
        let mesh = StrokeMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_empty());
        assert_eq!(mesh.index_count(), 0);
    }

    #[test]
    fn tetrahedron_volume() {
        let mesh = tetrahedron();
        assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-6);
        assert!(!mesh.is_inside_out());
    }

    #[test]
    fn face_normal_points_outward() {
        let mesh = tetrahedron();
        let n = mesh.face_normal(0).unwrap_or_default();
        assert!(n.z < 0.0);
        assert!(mesh.face_normal(10).is_none());
    }

    #[test]
    fn truncate_and_indices() {
        let mut mesh = tetrahedron();
        assert_eq!(mesh.indices().len(), 12);

        mesh.truncate(3, 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.indices(), vec![0, 2, 1]);

        mesh.truncate(10, 10);
        assert_eq!(mesh.vertex_count(), 3);

        mesh.clear();
        assert!(mesh.is_empty());
    }

    #[test]
    fn topology_accessors() {
        let mesh = tetrahedron();
        assert_eq!(mesh.face(3), Some([1, 2, 3]));
        assert!(mesh.face(4).is_none());
        assert!(mesh.vertex(3).is_some());
        assert_eq!(mesh.vertices().count(), 4);
        assert_eq!(mesh.faces().count(), 4);
    }

    #[test]
    fn mesh_bounds() {
        let mesh = tetrahedron();
        let bounds = mesh.bounds();
        assert_eq!(bounds.min.coords, Vector3::zeros());
        assert_eq!(bounds.max.coords, Vector3::repeat(1.0));
    }
}
