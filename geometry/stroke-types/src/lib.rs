//! Curve primitives for swept brush strokes.
//!
//! This crate provides the value types that flow between a stroke's input
//! stage and its mesh generator:
//!
//! - [`StyledPoint`] - A styled input point (position, radius, material)
//! - [`CurveSample`] - A smoothed point on the stroke with an orthonormal frame
//! - [`Frame`] - An orthonormal `(binormal, normal, tangent)` basis
//! - [`catmull_rom`] - Uniform Catmull-Rom evaluation and flatness subdivision
//!
//! # Parameterization
//!
//! A stroke's spline is indexed by a single float parameter. Key points sit
//! at integer parameters `0, 1, 2, ...` and samples between two keys carry
//! fractional parameters. Every attribute of a [`StyledPoint`] is smoothed
//! with the same basis, each as its own spline over the key sequence.
//!
//! # Example
//!
//! ```
//! use stroke_types::{StyledPoint, catmull_rom};
//! use nalgebra::{Point3, Vector3};
//!
//! let keys = [
//!     StyledPoint::with_radius(Point3::new(0.0, 0.0, 0.0), 0.01),
//!     StyledPoint::with_radius(Point3::new(1.0, 0.0, 0.0), 0.01),
//!     StyledPoint::with_radius(Point3::new(2.0, 1.0, 0.0), 0.01),
//! ];
//!
//! let position = catmull_rom::evaluate_by(keys.len(), |i| keys[i].position.coords, 1.0);
//! assert_eq!(position, Vector3::new(1.0, 0.0, 0.0));
//! ```
//!
//! # Numeric Type
//!
//! Everything is `f32`: samples end up in GPU vertex buffers.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all value types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(
    clippy::many_single_char_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::suboptimal_flops
)]

pub mod catmull_rom;
mod frame;
mod point;
mod sample;

pub use frame::{Frame, rotation_between};
pub use point::StyledPoint;
pub use sample::CurveSample;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector2, Vector3};

/// Length below which a direction is treated as degenerate.
pub const DEGENERATE_EPSILON: f32 = 1.0e-6;
