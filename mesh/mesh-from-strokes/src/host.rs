//! The boundary between the stroke generator and a host renderer.
//!
//! The generator keeps its own copy of the live geometry and never holds a
//! buffer handle. On each flush it asks the host for a buffer when the
//! current one is too small, then describes the changed tail of the mesh.

use mesh_types::{Aabb, MeshBounds, MeshTopology, StrokeMesh, StrokeVertex};
use thiserror::Error;

/// Size of a host mesh buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity {
    /// Number of rings the buffer holds.
    pub rings: usize,
    /// Vertex slots.
    pub vertices: usize,
    /// Triangle slots (three indices each).
    pub faces: usize,
}

impl BufferCapacity {
    /// Capacity for `rings` rings of `radial_segments` vertices.
    ///
    /// Reserves two triangles per vertex, which is enough for every ring
    /// including the first (which has no faces).
    #[must_use]
    pub const fn for_rings(rings: usize, radial_segments: usize) -> Self {
        Self {
            rings,
            vertices: rings * radial_segments,
            faces: rings * radial_segments * 2,
        }
    }

    /// Index slots, three per face.
    #[must_use]
    pub const fn indices(&self) -> usize {
        self.faces * 3
    }
}

/// A changed tail of the mesh, handed to [`MeshHost::describe`].
///
/// Everything before `first_vertex` and `first_face` is unchanged since the
/// previous description into the same buffer. The live mesh ends at
/// `vertex_count` and `face_count`; anything the host holds past those
/// counts is stale.
#[derive(Debug, Clone, Copy)]
pub struct MeshRegion<'a> {
    /// Index of the first vertex in `vertices`.
    pub first_vertex: usize,
    /// Index of the first face in `faces`.
    pub first_face: usize,
    /// Vertices from `first_vertex` to the end of the live mesh.
    pub vertices: &'a [StrokeVertex],
    /// Faces from `first_face` to the end of the live mesh.
    pub faces: &'a [[u32; 3]],
    /// Total live vertices.
    pub vertex_count: usize,
    /// Total live faces.
    pub face_count: usize,
    /// Bounds of all live vertices.
    pub bounds: Aabb,
}

impl MeshRegion<'_> {
    /// True if this region rewrites the whole buffer.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.first_vertex == 0 && self.first_face == 0
    }
}

/// A renderer-side owner of mesh buffers.
pub trait MeshHost {
    /// Opaque reference to an allocated buffer.
    type Handle;

    /// Error reported when allocation fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Allocate a buffer of at least `capacity`.
    ///
    /// Subsequent [`describe`](Self::describe) calls target this buffer.
    ///
    /// # Errors
    ///
    /// Returns the host's error if the buffer cannot be created.
    fn allocate(&mut self, capacity: BufferCapacity) -> Result<Self::Handle, Self::Error>;

    /// Write a changed region into the most recently allocated buffer.
    fn describe(&mut self, region: MeshRegion<'_>);
}

/// Errors from [`CpuMeshHost`].
#[derive(Debug, Error)]
pub enum CpuHostError {
    /// Requested more vertices than the host allows.
    #[error("requested {requested} vertices, host limit is {limit}")]
    LimitExceeded {
        /// Vertices requested.
        requested: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// One buffer owned by a [`CpuMeshHost`].
#[derive(Debug, Clone, Default)]
pub struct CpuBuffer {
    /// Capacity the buffer was allocated with.
    pub capacity: Option<BufferCapacity>,
    /// Live contents.
    pub mesh: StrokeMesh,
    /// Bounds last reported by the generator.
    pub bounds: Aabb,
}

impl MeshTopology for CpuBuffer {
    fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    fn vertex(&self, index: usize) -> Option<&StrokeVertex> {
        self.mesh.vertex(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.mesh.face(index)
    }

    fn vertices(&self) -> impl Iterator<Item = &StrokeVertex> {
        self.mesh.vertices()
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.mesh.faces()
    }
}

impl MeshBounds for CpuBuffer {
    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// In-memory [`MeshHost`] that keeps only the most recent buffer.
///
/// A new allocation replaces the previous buffer and its contents. Handles
/// count allocations from zero. Useful for tests, benchmarks and headless
/// export.
///
/// # Example
///
/// ```
/// use mesh_from_strokes::{BufferCapacity, CpuMeshHost, MeshHost};
///
/// let mut host = CpuMeshHost::new();
/// let handle = host.allocate(BufferCapacity::for_rings(4, 8)).unwrap();
/// assert_eq!(handle, 0);
/// assert_eq!(host.allocation_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CpuMeshHost {
    current: Option<CpuBuffer>,
    allocations: usize,
    vertex_limit: Option<usize>,
}

impl CpuMeshHost {
    /// Create a host with no allocation limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse allocations of more than `limit` vertices.
    #[must_use]
    pub const fn with_vertex_limit(mut self, limit: usize) -> Self {
        self.vertex_limit = Some(limit);
        self
    }

    /// Number of buffers allocated so far.
    #[must_use]
    pub const fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// The buffer currently being described into.
    #[must_use]
    pub const fn current(&self) -> Option<&CpuBuffer> {
        self.current.as_ref()
    }
}

impl MeshHost for CpuMeshHost {
    type Handle = usize;
    type Error = CpuHostError;

    fn allocate(&mut self, capacity: BufferCapacity) -> Result<usize, CpuHostError> {
        if let Some(limit) = self.vertex_limit {
            if capacity.vertices > limit {
                return Err(CpuHostError::LimitExceeded {
                    requested: capacity.vertices,
                    limit,
                });
            }
        }

        self.current = Some(CpuBuffer {
            capacity: Some(capacity),
            mesh: StrokeMesh::with_capacity(capacity.vertices, capacity.faces),
            bounds: Aabb::empty(),
        });
        let handle = self.allocations;
        self.allocations += 1;
        Ok(handle)
    }

    fn describe(&mut self, region: MeshRegion<'_>) {
        let Some(buffer) = self.current.as_mut() else {
            return;
        };

        let mesh = &mut buffer.mesh;
        mesh.truncate(region.first_vertex, region.first_face);
        mesh.vertices.extend_from_slice(region.vertices);
        mesh.faces.extend_from_slice(region.faces);
        debug_assert_eq!(mesh.vertices.len(), region.vertex_count);
        debug_assert_eq!(mesh.faces.len(), region.face_count);

        buffer.bounds = region.bounds;
    }
}
