//! Signed distance field baking.
//!
//! Computes, for every voxel of a cubic grid over the canonical volume, the
//! distance to the closest triangle signed by a spherical ray vote.

use std::time::Instant;

use mesh_types::{BoundingBox, Point3, TriangleSet, Vector3};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::classify::{cast_vote, sphere_directions};
use crate::error::{BakeError, BakeResult};
use crate::grid::{SdfGrid, voxel_center};
use crate::normalize::{GeometryInfo, normalize};
use crate::observer::{BakeObserver, Classification, NoopObserver, VoxelSample};
use crate::params::BakeParams;
use crate::query::closest_triangle;

/// A mesh prepared for signed distance queries and baking.
///
/// Construction normalizes the mesh into the canonical volume once; every
/// query and bake afterwards works in canonical space.
///
/// # Example
///
/// ```
/// use mesh_bake::{BakeParams, SignedDistanceField};
/// use mesh_types::{cube, Point3};
///
/// let sdf = SignedDistanceField::new(cube(Point3::origin(), 0.5), BakeParams::default()).unwrap();
///
/// let center = sdf.signed_distance(&Point3::origin()).unwrap();
/// assert!((center + 0.5).abs() < 1e-9);
///
/// let outside = sdf.signed_distance(&Point3::new(0.6, 0.0, 0.0)).unwrap();
/// assert!((outside - 0.1).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SignedDistanceField {
    /// Triangles in canonical space.
    triangles: TriangleSet,
    /// Transform that produced `triangles`.
    info: GeometryInfo,
    /// Scaled original bounds; points outside skip the ray vote.
    bounds: BoundingBox,
    /// Classifier ray directions.
    directions: Vec<Vector3<f64>>,
    params: BakeParams,
}

impl SignedDistanceField {
    /// Prepare a triangle set for baking.
    ///
    /// # Errors
    ///
    /// - [`BakeError::InvalidParams`] if `params` fail validation
    /// - [`BakeError::EmptyMesh`] if the set has no triangles
    pub fn new(triangles: TriangleSet, params: BakeParams) -> BakeResult<Self> {
        params.validate()?;
        if triangles.is_empty() {
            return Err(BakeError::EmptyMesh);
        }

        let degenerate = triangles.degenerate_count();
        if degenerate > 0 {
            warn!(
                degenerate,
                triangles = triangles.len(),
                "Mesh contains zero-area triangles"
            );
        }

        let (triangles, info) = normalize(&triangles, params.target_half_extent);
        let bounds = info.canonical_bounds();
        let directions = sphere_directions(params.ray_samples);

        Ok(Self {
            triangles,
            info,
            bounds,
            directions,
            params,
        })
    }

    /// Prepare a de-indexed position buffer for baking.
    ///
    /// # Errors
    ///
    /// [`BakeError::Types`] if the buffer is malformed, otherwise as
    /// [`new`](Self::new).
    pub fn from_positions(positions: &[f32], params: BakeParams) -> BakeResult<Self> {
        Self::new(TriangleSet::from_positions(positions)?, params)
    }

    /// Triangles in canonical space.
    #[must_use]
    pub fn triangles(&self) -> &TriangleSet {
        &self.triangles
    }

    /// The normalization transform.
    #[must_use]
    pub fn geometry_info(&self) -> &GeometryInfo {
        &self.info
    }

    /// Canonical-space bounds used for the outside fast path.
    #[must_use]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// The parameters this field was built with.
    #[must_use]
    pub fn params(&self) -> &BakeParams {
        &self.params
    }

    /// Signed distance at a canonical-space point.
    ///
    /// Negative inside the mesh, positive outside. Points outside the
    /// canonical bounds are positive without casting any rays.
    ///
    /// # Errors
    ///
    /// [`BakeError::MissingClosestTriangle`] if no triangle produced a finite
    /// distance.
    pub fn signed_distance(&self, point: &Point3<f64>) -> BakeResult<f64> {
        self.classify(point, &NoopObserver)
            .map(|(distance, classification)| signed(distance, &classification))
    }

    /// Bake a grid of `resolution³` voxels.
    ///
    /// # Errors
    ///
    /// - [`BakeError::InvalidResolution`] if `resolution` is zero or
    ///   `resolution³` does not fit in `usize`
    /// - [`BakeError::MissingClosestTriangle`] if any voxel has no closest triangle
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_bake::{BakeParams, SignedDistanceField};
    /// use mesh_types::{cube, Point3};
    ///
    /// let sdf = SignedDistanceField::new(cube(Point3::origin(), 0.5), BakeParams::preview()).unwrap();
    /// let grid = sdf.bake(4).unwrap();
    ///
    /// assert_eq!(grid.len(), 64);
    /// assert!((grid.get(1, 1, 1).unwrap() + 0.375).abs() < 1e-6);
    /// ```
    pub fn bake(&self, resolution: usize) -> BakeResult<SdfGrid> {
        self.bake_with(resolution, &NoopObserver, &CancelToken::new())
    }

    /// Bake a grid, reporting progress to `observer` and honoring `cancel`.
    ///
    /// The cancel token is checked before every row of voxels.
    ///
    /// # Errors
    ///
    /// As [`bake`](Self::bake), plus [`BakeError::Cancelled`] if the token was
    /// cancelled before the bake finished.
    pub fn bake_with(
        &self,
        resolution: usize,
        observer: &dyn BakeObserver,
        cancel: &CancelToken,
    ) -> BakeResult<SdfGrid> {
        let voxel_count = match resolution.checked_pow(3) {
            Some(count) if count > 0 => count,
            _ => return Err(BakeError::InvalidResolution(resolution)),
        };

        info!(
            resolution,
            triangles = self.triangles.len(),
            ray_samples = self.params.ray_samples,
            parallel = self.params.parallel,
            "Starting SDF bake"
        );
        let start = Instant::now();

        let slab_len = voxel_count / resolution;
        let mut values = vec![0.0_f32; voxel_count];

        let fill = |(z, slab): (usize, &mut [f32])| {
            self.fill_slab(resolution, z, slab, observer, cancel)
        };
        let result = if self.params.parallel {
            values.par_chunks_mut(slab_len).enumerate().try_for_each(fill)
        } else {
            values.chunks_mut(slab_len).enumerate().try_for_each(fill)
        };

        if let Err(err) = result {
            if err.is_cancelled() {
                warn!(resolution, "SDF bake cancelled");
            }
            return Err(err);
        }

        let inside = values.iter().filter(|v| **v < 0.0).count();
        info!(
            resolution,
            voxels = values.len(),
            inside,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "SDF bake complete"
        );

        SdfGrid::from_values(resolution, values)
    }

    /// Fill one z-slab of `resolution²` voxels.
    #[allow(clippy::cast_possible_truncation)] // grid values are stored as f32
    fn fill_slab(
        &self,
        resolution: usize,
        z: usize,
        slab: &mut [f32],
        observer: &dyn BakeObserver,
        cancel: &CancelToken,
    ) -> BakeResult<()> {
        for (y, row) in slab.chunks_mut(resolution).enumerate() {
            if cancel.is_cancelled() {
                return Err(BakeError::Cancelled);
            }
            for (x, cell) in row.iter_mut().enumerate() {
                let voxel = [x, y, z];
                let point = voxel_center(resolution, voxel);
                let (distance, classification) = self.classify(&point, observer)?;
                let signed_distance = signed(distance, &classification);

                observer.on_voxel_classified(&VoxelSample {
                    voxel,
                    point,
                    distance,
                    signed_distance,
                    classification,
                });

                *cell = signed_distance as f32;
            }
        }
        Ok(())
    }

    /// Unsigned distance and inside/outside decision for one point.
    fn classify(
        &self,
        point: &Point3<f64>,
        observer: &dyn BakeObserver,
    ) -> BakeResult<(f64, Classification)> {
        let (_, distance) = closest_triangle(&self.triangles, point)
            .ok_or(BakeError::MissingClosestTriangle { point: *point })?;

        if !self.bounds.contains(point) {
            return Ok((distance, Classification::OutsideBounds));
        }

        let vote = cast_vote(
            &self.triangles,
            point,
            &self.directions,
            self.params.ray_epsilon,
            observer,
        );
        let classification = if vote.is_inside(self.params.inside_threshold) {
            Classification::Inside { vote }
        } else {
            Classification::Outside { vote }
        };
        Ok((distance, classification))
    }
}

fn signed(distance: f64, classification: &Classification) -> f64 {
    if classification.is_inside() {
        -distance
    } else {
        distance
    }
}

/// Bake a triangle set into a grid in one call.
///
/// Returns the grid together with the normalization transform.
///
/// # Errors
///
/// See [`SignedDistanceField::new`] and [`SignedDistanceField::bake`].
///
/// # Example
///
/// ```
/// use mesh_bake::{bake, BakeParams};
/// use mesh_types::{icosphere, Point3};
///
/// let sphere = icosphere(Point3::new(3.0, 0.0, 0.0), 2.0, 1);
/// let (grid, info) = bake(&sphere, 3, &BakeParams::preview()).unwrap();
///
/// assert!(grid.get(1, 1, 1).unwrap() < 0.0);
/// assert!((info.center.x - 3.0).abs() < 1e-9);
/// ```
pub fn bake(
    triangles: &TriangleSet,
    resolution: usize,
    params: &BakeParams,
) -> BakeResult<(SdfGrid, GeometryInfo)> {
    let sdf = SignedDistanceField::new(triangles.clone(), params.clone())?;
    let grid = sdf.bake(resolution)?;
    Ok((grid, sdf.info))
}

/// Bake a de-indexed position buffer into a grid in one call.
///
/// # Errors
///
/// [`BakeError::Types`] if the buffer is malformed, otherwise as [`bake`].
pub fn bake_positions(
    positions: &[f32],
    resolution: usize,
    params: &BakeParams,
) -> BakeResult<(SdfGrid, GeometryInfo)> {
    bake(&TriangleSet::from_positions(positions)?, resolution, params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Triangle, cube, icosphere};

    fn unit_cube_sdf() -> SignedDistanceField {
        SignedDistanceField::new(cube(Point3::origin(), 0.5), BakeParams::default()).unwrap()
    }

    #[test]
    fn sdf_new_empty_mesh() {
        let result = SignedDistanceField::new(TriangleSet::default(), BakeParams::default());
        assert_eq!(result.unwrap_err(), BakeError::EmptyMesh);
    }

    #[test]
    fn sdf_new_invalid_params() {
        let result = SignedDistanceField::new(
            cube(Point3::origin(), 0.5),
            BakeParams::default().ray_samples(1),
        );
        assert!(matches!(result, Err(BakeError::InvalidParams(_))));
    }

    #[test]
    fn sdf_from_malformed_positions() {
        let result = SignedDistanceField::from_positions(&[0.0; 8], BakeParams::default());
        assert!(matches!(result, Err(BakeError::Types(_))));
    }

    #[test]
    fn unit_cube_center_is_inside() {
        let sdf = unit_cube_sdf();
        let d = sdf.signed_distance(&Point3::origin()).unwrap();
        assert_relative_eq!(d, -0.5, epsilon = 1e-9);
    }

    #[test]
    fn unit_cube_outside_uses_fast_path() {
        let sdf = unit_cube_sdf();
        let d = sdf.signed_distance(&Point3::new(0.6, 0.0, 0.0)).unwrap();
        assert_relative_eq!(d, 0.1, epsilon = 1e-9);
        assert!(!sdf.bounds().contains(&Point3::new(0.6, 0.0, 0.0)));
    }

    #[test]
    fn fast_path_agrees_with_classifier() {
        let sdf = unit_cube_sdf();
        for point in [
            Point3::new(0.7, 0.1, -0.2),
            Point3::new(-0.2, -0.9, 0.3),
            Point3::new(0.1, 0.2, 0.55),
        ] {
            let (distance, classification) = sdf.classify(&point, &NoopObserver).unwrap();
            assert_eq!(classification, Classification::OutsideBounds);

            let vote = cast_vote(&sdf.triangles, &point, &sdf.directions, 1e-7, &NoopObserver);
            assert!(!vote.is_inside(0.5));
            assert_relative_eq!(
                distance,
                closest_triangle(&sdf.triangles, &point).unwrap().1
            );
        }
    }

    #[test]
    fn resolution_four_bake() {
        let sdf = unit_cube_sdf();
        let grid = sdf.bake(4).unwrap();
        assert_eq!(grid.resolution(), 4);

        for z in 1..3 {
            for y in 1..3 {
                for x in 1..3 {
                    let v = grid.get(x, y, z).unwrap();
                    assert_relative_eq!(v, -0.375, epsilon = 1e-6);
                }
            }
        }
        // Corner voxels sit 0.125 inside along every axis
        assert_relative_eq!(grid.get(0, 0, 0).unwrap(), -0.125, epsilon = 1e-6);
    }

    #[test]
    fn resolution_five_has_center_voxel() {
        let sdf = SignedDistanceField::new(cube(Point3::origin(), 0.5), BakeParams::preview())
            .unwrap();
        let grid = sdf.bake(5).unwrap();
        assert_relative_eq!(grid.get(2, 2, 2).unwrap(), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let sdf = unit_cube_sdf();
        assert_eq!(sdf.bake(0).unwrap_err(), BakeError::InvalidResolution(0));
    }

    #[test]
    fn overflowing_resolution_is_rejected() {
        let sdf = unit_cube_sdf();
        let huge = 1_usize << 22;
        assert_eq!(sdf.bake(huge).unwrap_err(), BakeError::InvalidResolution(huge));
        assert_eq!(
            sdf.bake(usize::MAX).unwrap_err(),
            BakeError::InvalidResolution(usize::MAX)
        );
    }

    #[test]
    fn sequential_matches_parallel() {
        let sphere = icosphere(Point3::origin(), 1.0, 1);
        let params = BakeParams::preview();
        let (parallel, _) = bake(&sphere, 6, &params).unwrap();
        let (sequential, _) = bake(&sphere, 6, &params.clone().parallel(false)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn cancelled_bake_returns_no_grid() {
        let sdf = unit_cube_sdf();
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = sdf.bake_with(4, &NoopObserver, &cancel);
        assert_eq!(result.unwrap_err(), BakeError::Cancelled);
    }

    #[test]
    fn large_mesh_is_normalized_before_baking() {
        let big = cube(Point3::new(100.0, -50.0, 20.0), 40.0);
        let sdf = SignedDistanceField::new(big, BakeParams::default()).unwrap();
        assert_relative_eq!(sdf.geometry_info().scale, 0.5 / 40.0, epsilon = 1e-12);

        // Canonical center is inside, half a unit from every face
        let d = sdf.signed_distance(&Point3::origin()).unwrap();
        assert_relative_eq!(d, -0.5, epsilon = 1e-9);
        assert_relative_eq!(sdf.geometry_info().distance_to_world(d), -40.0, epsilon = 1e-6);
    }

    #[test]
    fn open_single_triangle_is_outside() {
        let tri = Triangle::from_arrays([-0.4, -0.4, 0.0], [0.4, -0.4, 0.0], [0.0, 0.4, 0.0]);
        let sdf =
            SignedDistanceField::new(TriangleSet::new(vec![tri]), BakeParams::preview()).unwrap();
        // Flat box: every off-plane point fails the fast-path containment
        let d = sdf.signed_distance(&Point3::new(0.0, 0.0, 0.2)).unwrap();
        assert_relative_eq!(d, 0.2, epsilon = 1e-9);
    }

    #[test]
    fn bake_positions_round_trip() {
        let positions = cube(Point3::origin(), 0.5).to_positions();
        let (grid, info) = bake_positions(&positions, 2, &BakeParams::preview()).unwrap();
        assert_eq!(info.scale, 1.0);
        assert!(grid.values().iter().all(|v| *v < 0.0));
    }
}
