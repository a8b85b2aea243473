//! Incremental tube meshes for brush strokes.
//!
//! This crate turns a stream of styled input points into a growing,
//! shrinkable triangle mesh:
//!
//! - [`SmoothCurveSampler`] - Catmull-Rom smoothing with adaptive sampling
//!   and twist-bounded frame propagation
//! - [`StrokeLedger`] - Head cap, body and tail cap bookkeeping per stroke,
//!   with exact undo
//! - [`EndcapGenerator`] - Hemispherical caps from a quarter-circle table
//! - [`CurveExtruder`] - Sweeps a [`CrossSection`] along samples into rings
//! - [`MeshHost`] - The buffer allocation and upload boundary
//!
//! # Quick Start
//!
//! ```
//! use mesh_from_strokes::{CpuMeshHost, SmoothCurveSampler, StrokeConfig};
//! use mesh_types::MeshTopology;
//! use stroke_types::{StyledPoint, Point3};
//!
//! let config = StrokeConfig::default();
//! let mut sampler = SmoothCurveSampler::new(&config).unwrap();
//!
//! sampler.trace(StyledPoint::with_radius(Point3::new(0.0, 0.0, 0.0), 0.01));
//! sampler.trace(StyledPoint::with_radius(Point3::new(0.0, 0.1, 0.0), 0.01));
//! sampler.trace(StyledPoint::with_radius(Point3::new(0.1, 0.1, 0.0), 0.01));
//!
//! let mut host = CpuMeshHost::new();
//! sampler.update(&mut host).unwrap();
//!
//! let buffer = host.current().unwrap();
//! assert_eq!(buffer.vertex_count(), sampler.ledger().sample_count() * 32);
//! ```
//!
//! # Undo
//!
//! Every sample is credited to the key point at or before its parameter.
//! Popping a key point removes exactly its credited samples. The ledger
//! drops caps around a removal and regenerates them on the next flush, so
//! removing samples is the exact inverse of appending them.
//!
//! # Threading
//!
//! All types are plain owned data driven from one thread. Nothing blocks
//! and nothing is shared; wrap the sampler in a lock if several threads
//! need it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod cross_section;
mod endcap;
mod error;
mod extruder;
mod host;
mod ledger;
mod sampler;

pub use config::StrokeConfig;
pub use cross_section::CrossSection;
pub use endcap::{CapEnd, EndcapGenerator};
pub use error::{StrokeError, StrokeResult};
pub use extruder::CurveExtruder;
pub use host::{BufferCapacity, CpuBuffer, CpuHostError, CpuMeshHost, MeshHost, MeshRegion};
pub use ledger::{Stroke, StrokeLedger, StrokeState};
pub use sampler::SmoothCurveSampler;
