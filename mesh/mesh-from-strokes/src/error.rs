//! Error types for stroke mesh generation.

use thiserror::Error;

use crate::host::BufferCapacity;

/// Result type for stroke mesh operations.
pub type StrokeResult<T> = Result<T, StrokeError>;

/// Errors that can occur while configuring or flushing a stroke mesh.
///
/// Violated call-order invariants (removing more samples than exist,
/// non-increasing parameters, non-unit tangents) are programming errors
/// and panic instead.
#[derive(Debug, Error)]
pub enum StrokeError {
    /// Cross-section has too few radial segments.
    #[error("radial segments must be at least {min}, got {actual}")]
    TooFewRadialSegments {
        /// Minimum required segments.
        min: usize,
        /// Actual segment count.
        actual: usize,
    },

    /// Endcaps need at least one segment.
    #[error("endcap segments must be at least {min}, got {actual}")]
    TooFewEndcapSegments {
        /// Minimum required segments.
        min: usize,
        /// Actual segment count.
        actual: usize,
    },

    /// Flatness is zero, negative or not finite.
    #[error("invalid flatness: {0} (must be positive and finite)")]
    InvalidFlatness(f32),

    /// Twist angle is outside `(0, π]`.
    #[error("invalid maximum twist angle: {0} rad")]
    InvalidTwistAngle(f32),

    /// Initial buffer capacity is zero.
    #[error("initial sample capacity must be at least 1")]
    InvalidCapacity,

    /// The mesh host could not allocate a buffer.
    #[error("mesh host failed to allocate {} vertices / {} faces", capacity.vertices, capacity.faces)]
    Allocation {
        /// Capacity that was requested.
        capacity: BufferCapacity,
        /// Error reported by the host.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StrokeError {
    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config(&self) -> bool {
        !matches!(self, Self::Allocation { .. })
    }
}
