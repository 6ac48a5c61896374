//! Normalization of mesh geometry into the canonical bake volume.
//!
//! Baking always happens in a canonical space: the mesh bounding box is
//! recentered on the origin and, if needed, uniformly shrunk so its largest
//! half-extent matches a target. [`GeometryInfo`] records the transform so a
//! baked field can be placed back in world space.

use mesh_types::{BoundingBox, MeshBounds, Point3, TriangleSet, Vector3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Transform from world space into the canonical bake volume.
///
/// # Example
///
/// ```
/// use mesh_bake::geometry_info;
/// use mesh_types::{cube, Point3};
///
/// // A cube of side 4 centered at (10, 0, 0)
/// let triangles = cube(Point3::new(10.0, 0.0, 0.0), 2.0);
/// let info = geometry_info(&triangles, 0.5);
///
/// assert!((info.scale - 0.25).abs() < 1e-12);
/// assert_eq!(info.to_canonical(&Point3::new(12.0, 0.0, 0.0)), Point3::new(0.5, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryInfo {
    /// Uniform scale applied after recentering. Never greater than 1.
    pub scale: f64,
    /// Center of the original bounding box.
    pub center: Point3<f64>,
    /// Size of the original bounding box.
    pub size: Vector3<f64>,
}

impl GeometryInfo {
    /// Map a world-space point into canonical space.
    #[must_use]
    pub fn to_canonical(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from((point - self.center) * self.scale)
    }

    /// Map a canonical-space point back into world space.
    #[must_use]
    pub fn to_world(&self, point: &Point3<f64>) -> Point3<f64> {
        self.center + point.coords / self.scale
    }

    /// Convert a canonical-space distance into world units.
    #[must_use]
    pub fn distance_to_world(&self, distance: f64) -> f64 {
        distance / self.scale
    }

    /// The original bounding box after normalization, centered at the origin.
    #[must_use]
    pub fn canonical_bounds(&self) -> BoundingBox {
        BoundingBox::centered(self.size * self.scale * 0.5)
    }
}

/// Compute the normalization transform for a triangle set.
///
/// The scale is `target_half_extent / biggest` when the largest half-extent
/// of the bounding box exceeds the target, and exactly `1.0` otherwise.
/// Zero-volume boxes (a point, a segment, a flat mesh) take the same path.
/// An empty set yields the identity transform.
///
/// A target that is not positive (or is NaN) never shrinks the mesh: the
/// scale stays `1.0`, so it is always in `(0, 1]`. Bakes reject such targets
/// earlier through [`BakeParams::validate`](crate::BakeParams::validate).
#[must_use]
pub fn geometry_info(triangles: &TriangleSet, target_half_extent: f64) -> GeometryInfo {
    let Some(bounds) = triangles.bounds_opt() else {
        return GeometryInfo {
            scale: 1.0,
            center: Point3::origin(),
            size: Vector3::zeros(),
        };
    };

    let biggest = bounds.max_half_extent();
    let scale = if target_half_extent > 0.0 && biggest > target_half_extent {
        target_half_extent / biggest
    } else {
        1.0
    };

    GeometryInfo {
        scale,
        center: bounds.center(),
        size: bounds.size(),
    }
}

/// Translate and scale a triangle set into the canonical bake volume.
///
/// Returns the transformed set together with the transform that was applied.
///
/// # Example
///
/// ```
/// use mesh_bake::normalize;
/// use mesh_types::{cube, MeshBounds, Point3};
///
/// let (canonical, info) = normalize(&cube(Point3::new(3.0, 3.0, 3.0), 5.0), 0.5);
/// let bounds = canonical.bounds();
///
/// assert!((bounds.max_half_extent() - 0.5).abs() < 1e-12);
/// assert!(bounds.center().coords.norm() < 1e-12);
/// assert!((info.scale - 0.1).abs() < 1e-12);
/// ```
#[must_use]
pub fn normalize(triangles: &TriangleSet, target_half_extent: f64) -> (TriangleSet, GeometryInfo) {
    let info = geometry_info(triangles, target_half_extent);
    debug!(
        scale = info.scale,
        center_x = info.center.x,
        center_y = info.center.y,
        center_z = info.center.z,
        max_half_extent = info.size.max() * 0.5,
        "Normalized mesh into bake volume"
    );
    (triangles.transformed(&info.center, info.scale), info)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Triangle, cube};

    #[test]
    fn large_mesh_is_scaled_to_target() {
        let triangles = cube(Point3::new(-4.0, 1.0, 2.0), 3.0);
        let (canonical, info) = normalize(&triangles, 0.5);

        assert_relative_eq!(info.scale, 0.5 / 3.0, epsilon = 1e-12);
        let b = canonical.bounds();
        assert_relative_eq!(b.max_half_extent(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(b.center().coords.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn small_mesh_keeps_unit_scale() {
        let triangles = cube(Point3::new(5.0, 5.0, 5.0), 0.1);
        let (canonical, info) = normalize(&triangles, 0.5);

        assert_eq!(info.scale, 1.0);
        let b = canonical.bounds();
        assert_relative_eq!(b.max_half_extent(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(b.center().x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn exact_fit_keeps_unit_scale() {
        let info = geometry_info(&cube(Point3::origin(), 0.5), 0.5);
        assert_eq!(info.scale, 1.0);

        let gpu = geometry_info(&cube(Point3::origin(), 0.5), 0.4);
        assert_relative_eq!(gpu.scale, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn zero_volume_box_keeps_unit_scale() {
        let p = [2.0, 2.0, 2.0];
        let point_like = TriangleSet::new(vec![Triangle::from_arrays(p, p, p)]);
        let info = geometry_info(&point_like, 0.5);
        assert_eq!(info.scale, 1.0);
        assert_eq!(info.center, Point3::new(2.0, 2.0, 2.0));

        let flat = TriangleSet::new(vec![Triangle::from_arrays(
            [0.0, 0.0, 0.0],
            [0.2, 0.0, 0.0],
            [0.0, 0.2, 0.0],
        )]);
        assert_eq!(geometry_info(&flat, 0.5).scale, 1.0);
    }

    #[test]
    fn non_positive_target_keeps_unit_scale() {
        let triangles = cube(Point3::new(1.0, 2.0, 3.0), 4.0);
        for target in [0.0, -0.5, f64::NAN] {
            let info = geometry_info(&triangles, target);
            assert_eq!(info.scale, 1.0, "target {target}");

            let p = Point3::new(0.25, -0.125, 0.5);
            assert_relative_eq!(info.to_world(&info.to_canonical(&p)), p);
            assert_eq!(info.distance_to_world(0.5), 0.5);
        }
    }

    #[test]
    fn empty_set_is_identity() {
        let info = geometry_info(&TriangleSet::default(), 0.5);
        assert_eq!(info.scale, 1.0);
        assert_eq!(info.center, Point3::origin());
    }

    #[test]
    fn world_round_trip() {
        let info = geometry_info(&cube(Point3::new(1.0, -2.0, 3.0), 2.0), 0.5);
        let world = Point3::new(1.5, -1.0, 2.0);
        let back = info.to_world(&info.to_canonical(&world));
        assert_relative_eq!(back, world, epsilon = 1e-12);
        assert_relative_eq!(info.distance_to_world(0.25), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn canonical_bounds_match_transformed_mesh() {
        let triangles = cube(Point3::new(7.0, 0.0, 0.0), 1.5);
        let (canonical, info) = normalize(&triangles, 0.4);
        let expected = canonical.bounds();
        let bounds = info.canonical_bounds();
        assert_relative_eq!(bounds.min, expected.min, epsilon = 1e-12);
        assert_relative_eq!(bounds.max, expected.max, epsilon = 1e-12);
    }
}
