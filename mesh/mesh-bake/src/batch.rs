//! Baking several meshes in one call.
//!
//! Requests are baked in order; each bake is itself parallel over z-slabs.
//! The first failing request stops the batch.
//!
//! # Example
//!
//! ```
//! use mesh_bake::{bake_all, BakeParams, BakeRequest, CancelToken};
//! use mesh_types::{cube, icosphere, Point3};
//!
//! let requests = vec![
//!     BakeRequest::new("crate", cube(Point3::origin(), 1.0), 4),
//!     BakeRequest::new("ball", icosphere(Point3::origin(), 1.0, 1), 3),
//! ];
//!
//! let baked = bake_all(&requests, &BakeParams::preview(), &CancelToken::new()).unwrap();
//! assert_eq!(baked[1].name, "ball");
//! assert_eq!(baked[1].grid.len(), 27);
//! ```

use mesh_types::TriangleSet;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{BakeError, BakeResult};
use crate::grid::SdfGrid;
use crate::normalize::GeometryInfo;
use crate::observer::NoopObserver;
use crate::params::BakeParams;
use crate::sdf::SignedDistanceField;

/// One mesh to bake, with its output name and resolution.
#[derive(Debug, Clone)]
pub struct BakeRequest {
    /// Name reported with the result and in errors.
    pub name: String,
    /// Mesh in world space.
    pub triangles: TriangleSet,
    /// Cells per grid axis.
    pub resolution: usize,
}

impl BakeRequest {
    /// Create a request.
    #[must_use]
    pub fn new(name: impl Into<String>, triangles: TriangleSet, resolution: usize) -> Self {
        Self {
            name: name.into(),
            triangles,
            resolution,
        }
    }
}

/// A finished bake.
#[derive(Debug, Clone)]
pub struct BakedSdf {
    /// Name of the request.
    pub name: String,
    /// Baked values.
    pub grid: SdfGrid,
    /// Transform from the request's world space into the grid volume.
    pub info: GeometryInfo,
}

/// Bake every request in order with shared parameters.
///
/// # Errors
///
/// - [`BakeError::Cancelled`] if `cancel` is set before or during any bake
/// - [`BakeError::Request`] naming the first request that failed, wrapping
///   its error
pub fn bake_all(
    requests: &[BakeRequest],
    params: &BakeParams,
    cancel: &CancelToken,
) -> BakeResult<Vec<BakedSdf>> {
    info!(requests = requests.len(), "Starting batch bake");

    let mut baked = Vec::with_capacity(requests.len());
    for (index, request) in requests.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!(completed = index, "Batch bake cancelled");
            return Err(BakeError::Cancelled);
        }

        debug!(
            index,
            name = %request.name,
            resolution = request.resolution,
            triangles = request.triangles.len(),
            "Baking request"
        );

        let result = bake_request(request, params, cancel);
        match result {
            Ok(sdf) => baked.push(sdf),
            Err(BakeError::Cancelled) => {
                warn!(completed = index, name = %request.name, "Batch bake cancelled");
                return Err(BakeError::Cancelled);
            }
            Err(err) => return Err(BakeError::request(&request.name, err)),
        }
    }

    info!(baked = baked.len(), "Batch bake complete");
    Ok(baked)
}

fn bake_request(
    request: &BakeRequest,
    params: &BakeParams,
    cancel: &CancelToken,
) -> BakeResult<BakedSdf> {
    let sdf = SignedDistanceField::new(request.triangles.clone(), params.clone())?;
    let grid = sdf.bake_with(request.resolution, &NoopObserver, cancel)?;
    Ok(BakedSdf {
        name: request.name.clone(),
        grid,
        info: *sdf.geometry_info(),
    })
}
