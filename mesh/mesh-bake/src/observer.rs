//! Observer hooks for inspecting a bake.
//!
//! Observers see every classifier ray and every finished voxel. They are
//! read-only: nothing an observer does can change the baked values.

use mesh_types::{Point3, Vector3};

use crate::classify::{RayHit, RayVote};

/// How a voxel's sign was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The sample point lies outside the canonical mesh bounds; no rays were cast.
    OutsideBounds,
    /// The ray vote decided the point is outside.
    Outside {
        /// Tally of the vote.
        vote: RayVote,
    },
    /// The ray vote decided the point is inside.
    Inside {
        /// Tally of the vote.
        vote: RayVote,
    },
}

impl Classification {
    /// Check if the voxel was classified as inside.
    #[must_use]
    pub const fn is_inside(&self) -> bool {
        matches!(self, Self::Inside { .. })
    }

    /// The ray vote, if one was cast.
    #[must_use]
    pub const fn vote(&self) -> Option<&RayVote> {
        match self {
            Self::OutsideBounds => None,
            Self::Outside { vote } | Self::Inside { vote } => Some(vote),
        }
    }
}

/// A single finished voxel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelSample {
    /// Grid coordinates `[x, y, z]`.
    pub voxel: [usize; 3],
    /// Canonical-space sample point.
    pub point: Point3<f64>,
    /// Unsigned distance to the closest triangle.
    pub distance: f64,
    /// Value written into the grid.
    pub signed_distance: f64,
    /// How the sign was decided.
    pub classification: Classification,
}

/// Receives events while a field is baked.
///
/// Bakes run on rayon workers, so implementations must be `Sync`. Events
/// from different slabs arrive in no particular order.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use mesh_bake::{BakeObserver, BakeParams, CancelToken, SignedDistanceField, VoxelSample};
/// use mesh_types::{cube, Point3};
///
/// #[derive(Default)]
/// struct InsideCounter(AtomicUsize);
///
/// impl BakeObserver for InsideCounter {
///     fn on_voxel_classified(&self, sample: &VoxelSample) {
///         if sample.classification.is_inside() {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
///
/// let sdf = SignedDistanceField::new(cube(Point3::origin(), 0.5), BakeParams::preview()).unwrap();
/// let counter = InsideCounter::default();
/// let grid = sdf.bake_with(2, &counter, &CancelToken::new()).unwrap();
///
/// assert_eq!(counter.0.load(Ordering::Relaxed), grid.values().iter().filter(|v| **v < 0.0).count());
/// ```
pub trait BakeObserver: Sync {
    /// Called for every classifier ray, with the hit that counted for the vote.
    ///
    /// Default: no-op.
    #[inline]
    fn on_ray_cast(&self, _origin: &Point3<f64>, _direction: &Vector3<f64>, _hit: Option<&RayHit>) {
    }

    /// Called once per voxel after its value is known.
    ///
    /// Default: no-op.
    #[inline]
    fn on_voxel_classified(&self, _sample: &VoxelSample) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BakeObserver for NoopObserver {}
