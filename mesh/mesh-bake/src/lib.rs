//! Baking triangle meshes into signed distance field grids.
//!
//! This crate turns an arbitrary triangle soup into a cubic grid of signed
//! distances over the canonical volume `[-0.5, 0.5]³`: negative inside the
//! mesh, positive outside.
//!
//! # Pipeline
//!
//! 1. **Normalize** - recenter the mesh and shrink it so its largest
//!    half-extent fits a target ([`normalize`], [`GeometryInfo`])
//! 2. **Distance** - unsigned distance to the closest triangle
//!    ([`closest_triangle`])
//! 3. **Sign** - a spherical ray vote decides inside/outside; points outside
//!    the mesh bounds skip it ([`cast_vote`], [`sphere_directions`])
//! 4. **Assemble** - voxels are filled in parallel z-slabs with rayon
//!    ([`SignedDistanceField::bake`])
//!
//! The ray vote tolerates small holes and inconsistent winding but is an
//! approximation: thin features or low sample counts can get the wrong sign.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_bake::{BakeParams, SignedDistanceField};
//! use mesh_types::{cube, Point3};
//!
//! let sdf = SignedDistanceField::new(cube(Point3::origin(), 0.5), BakeParams::default()).unwrap();
//!
//! // One-off queries in canonical space
//! assert!(sdf.signed_distance(&Point3::origin()).unwrap() < 0.0);
//!
//! // Whole grid
//! let grid = sdf.bake(8).unwrap();
//! assert_eq!(grid.len(), 512);
//!
//! // Packed for upload as a 64 × 8 texture
//! let image = grid.to_tiled();
//! assert_eq!((image.width, image.height), (64, 8));
//! ```
//!
//! # Use Cases
//!
//! - **Shader input**: ray marching and soft shadows against baked meshes
//! - **Collision**: fast inside/outside tests by grid lookup
//! - **Offline asset pipelines**: batch bakes with [`bake_all`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod batch;
mod cancel;
mod classify;
mod error;
mod grid;
mod normalize;
mod observer;
mod params;
mod query;
mod sdf;
mod texture;

pub use batch::{BakeRequest, BakedSdf, bake_all};
pub use cancel::CancelToken;
pub use classify::{RayHit, RayVote, cast_vote, closest_ray_hit, sphere_directions};
pub use error::{BakeError, BakeResult};
pub use grid::{SdfGrid, voxel_center};
pub use normalize::{GeometryInfo, geometry_info, normalize};
pub use observer::{BakeObserver, Classification, NoopObserver, VoxelSample};
pub use params::BakeParams;
pub use query::{closest_point_on_triangle, closest_triangle, ray_triangle_intersect};
pub use sdf::{SignedDistanceField, bake, bake_positions};
pub use texture::{
    TiledImage, decode_debug_rgba, decode_raw_rgba, encode_debug_rgba, encode_raw_rgba,
};
