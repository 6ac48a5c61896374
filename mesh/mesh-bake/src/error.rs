//! Error types for SDF baking.

use mesh_types::{Point3, TypesError};
use thiserror::Error;

/// Result type for bake operations.
pub type BakeResult<T> = Result<T, BakeError>;

/// Errors that can occur while baking a signed distance field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BakeError {
    /// Triangle set has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Grid resolution must be at least 1.
    #[error("invalid grid resolution: {0}")]
    InvalidResolution(usize),

    /// Bake parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Input buffers could not be read as triangles.
    #[error(transparent)]
    Types(#[from] TypesError),

    /// A texture buffer does not match the expected layout.
    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    /// No triangle produced a finite distance for a sample point.
    #[error(
        "no closest triangle for point ({}, {}, {})",
        .point.x,
        .point.y,
        .point.z
    )]
    MissingClosestTriangle {
        /// The canonical-space sample point.
        point: Point3<f64>,
    },

    /// The bake was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("bake cancelled")]
    Cancelled,

    /// A request in a batch failed.
    #[error("bake request '{name}' failed: {source}")]
    Request {
        /// Name of the failing request.
        name: String,
        /// Underlying error.
        source: Box<BakeError>,
    },
}

impl BakeError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }

    /// Create an invalid texture error.
    #[must_use]
    pub fn invalid_texture(details: impl Into<String>) -> Self {
        Self::InvalidTexture(details.into())
    }

    /// Wrap an error with the name of the batch request that produced it.
    #[must_use]
    pub fn request(name: impl Into<String>, source: Self) -> Self {
        Self::Request {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Check whether this error (or the error it wraps) is a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Request { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}
