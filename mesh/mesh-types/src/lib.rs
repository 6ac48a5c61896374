//! Core triangle types for SDF baking.
//!
//! This crate provides the geometric input types consumed by `mesh-bake`:
//!
//! - [`Triangle`] - A triangle with concrete vertex positions
//! - [`TriangleSet`] - An ordered, read-only triangle soup
//! - [`BoundingBox`] - Axis-aligned bounding box
//!
//! # Input Format
//!
//! Meshes enter as a **de-indexed** flat position buffer: every 9 consecutive
//! floats describe one triangle (3 vertices × 3 coordinates), so each triangle
//! owns its own vertices. Indexed meshes are expanded with
//! [`TriangleSet::from_indexed`].
//!
//! # Units
//!
//! This library is **unit-agnostic**. Input buffers are `f32` (as produced by
//! mesh loaders and GPU buffers); all geometry is computed in `f64`.
//!
//! # Winding
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule. Inside/outside
//! classification in `mesh-bake` relies on this.
//!
//! # Example
//!
//! ```
//! use mesh_types::{MeshBounds, TriangleSet};
//!
//! // One triangle in the XY plane
//! let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let triangles = TriangleSet::from_positions(&positions).unwrap();
//!
//! assert_eq!(triangles.len(), 1);
//! assert!((triangles.bounds().size().x - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod error;
mod primitives;
mod traits;
mod triangle;
mod triangle_set;

pub use bounds::BoundingBox;
pub use error::{TypesError, TypesResult};
pub use primitives::{cube, icosphere};
pub use traits::MeshBounds;
pub use triangle::Triangle;
pub use triangle_set::TriangleSet;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
