//! Error types for building triangle sets.

use thiserror::Error;

/// Result type for triangle set construction.
pub type TypesResult<T> = Result<T, TypesError>;

/// Errors that can occur while reading mesh buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Position buffer length is not a multiple of the expected stride.
    #[error("position buffer length {len} is not a multiple of {stride}")]
    MalformedPositions {
        /// Length of the buffer.
        len: usize,
        /// Required stride (9 for de-indexed triangles, 3 for vertices).
        stride: usize,
    },

    /// Index buffer length is not a multiple of 3.
    #[error("index buffer length {len} is not a multiple of 3")]
    MalformedIndices {
        /// Length of the buffer.
        len: usize,
    },

    /// A triangle index refers to a vertex that does not exist.
    #[error("vertex index {index} out of range ({vertex_count} vertices)")]
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Number of vertices in the position buffer.
        vertex_count: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate at buffer offset {index}")]
    NonFiniteCoordinate {
        /// Offset into the position buffer.
        index: usize,
    },
}
