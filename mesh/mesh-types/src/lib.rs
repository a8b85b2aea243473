//! Mesh storage types for swept brush strokes.
//!
//! This crate provides the data a stroke mesh generator hands to a host
//! renderer:
//!
//! - [`StrokeVertex`] - Position, normal and material attributes of one vertex
//! - [`StrokeMesh`] - Vertices plus triangle faces, growable at the tail
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! No engine or GPU dependencies: hosts convert these into whatever buffer
//! layout their renderer expects.
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f32`.
//!
//! # Winding
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{StrokeMesh, StrokeVertex, Point3, MeshTopology};
//!
//! let mut mesh = StrokeMesh::new();
//! mesh.vertices.push(StrokeVertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(StrokeVertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(StrokeVertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.index_count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod traits;
mod vertex;

// Re-export core types
pub use bounds::Aabb;
pub use mesh::StrokeMesh;
pub use traits::{MeshBounds, MeshTopology};
pub use vertex::StrokeVertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
