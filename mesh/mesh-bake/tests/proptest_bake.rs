//! Property-based tests for SDF baking.
//!
//! These tests use proptest to generate random triangles, points and grids
//! and verify invariants of the distance queries, normalization and texture
//! transport.
//!
//! Run with: cargo test -p mesh-bake -- proptest

#![allow(clippy::unwrap_used)]

use mesh_bake::{
    BakeParams, NoopObserver, SdfGrid, SignedDistanceField, cast_vote, closest_point_on_triangle,
    closest_triangle, decode_raw_rgba, encode_raw_rgba, normalize, sphere_directions,
};
use mesh_types::{MeshBounds, Point3, Triangle, TriangleSet, cube};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A point in a bounded range.
fn arb_point(extent: f64) -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-extent..extent).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// A triangle with vertices in a bounded range; may be degenerate.
fn arb_triangle(extent: f64) -> impl Strategy<Value = Triangle> {
    (arb_point(extent), arb_point(extent), arb_point(extent))
        .prop_map(|(a, b, c)| Triangle::new(a, b, c))
}

/// A non-empty triangle set.
fn arb_triangle_set(extent: f64, max_triangles: usize) -> impl Strategy<Value = TriangleSet> {
    prop::collection::vec(arb_triangle(extent), 1..=max_triangles).prop_map(TriangleSet::new)
}

/// A grid of random values.
fn arb_grid() -> impl Strategy<Value = SdfGrid> {
    (1usize..=6).prop_flat_map(|r| {
        prop::collection::vec(-1.0f32..1.0, r * r * r)
            .prop_map(move |values| SdfGrid::from_values(r, values).unwrap())
    })
}

// =============================================================================
// Property Tests: Distance queries
// =============================================================================

proptest! {
    /// Distances are never negative and vanish on the triangle's vertices.
    #[test]
    fn distance_is_non_negative(tri in arb_triangle(10.0), point in arb_point(20.0)) {
        prop_assert!(tri.distance_to(&point) >= 0.0);
        prop_assume!(tri.area() > 1e-3);
        for v in tri.vertices() {
            prop_assert!(tri.distance_to(&v) < 1e-9);
        }
    }

    /// The closed-form distance agrees with the explicit closest point.
    #[test]
    fn distance_matches_closest_point(tri in arb_triangle(10.0), point in arb_point(20.0)) {
        prop_assume!(tri.area() > 1e-2);
        let direct = tri.distance_to(&point);
        let via_point = (point - closest_point_on_triangle(&point, &tri)).norm();
        prop_assert!(
            (direct - via_point).abs() <= 1e-7 * (1.0 + direct),
            "{direct} vs {via_point}"
        );
    }

    /// The reported closest triangle is never beaten by another one.
    #[test]
    fn closest_triangle_is_minimal(set in arb_triangle_set(5.0, 12), point in arb_point(8.0)) {
        let (index, distance) = closest_triangle(&set, &point).unwrap();
        prop_assert!(index < set.len());
        for (i, tri) in set.iter().enumerate() {
            let other = tri.distance_to(&point);
            prop_assert!(distance <= other);
            if i < index {
                prop_assert!(other > distance, "earlier triangle {i} ties with {index}");
            }
        }
    }
}

// =============================================================================
// Property Tests: Classification
// =============================================================================

proptest! {
    /// Vote tallies are consistent for any geometry.
    #[test]
    fn vote_tallies_are_bounded(
        set in arb_triangle_set(0.5, 8),
        point in arb_point(0.5),
        samples in 2usize..80,
    ) {
        let directions = sphere_directions(samples);
        prop_assert_eq!(directions.len(), samples);
        for d in &directions {
            prop_assert!((d.norm() - 1.0).abs() < 1e-9);
        }

        let vote = cast_vote(&set, &point, &directions, 1e-7, &NoopObserver);
        prop_assert_eq!(vote.samples, samples);
        prop_assert!(vote.back_hits <= vote.hits);
        prop_assert!(vote.hits <= vote.samples);
        let ratio = vote.back_hit_ratio();
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    /// On a closed cube the sign matches containment away from the faces.
    #[test]
    fn cube_sign_matches_containment(point in arb_point(1.0)) {
        let margin = 0.5 - point.x.abs().max(point.y.abs()).max(point.z.abs());
        prop_assume!(margin.abs() > 1e-3);

        let sdf = SignedDistanceField::new(cube(Point3::origin(), 0.5), BakeParams::preview())
            .unwrap();
        let d = sdf.signed_distance(&point).unwrap();
        prop_assert_eq!(d < 0.0, margin > 0.0);

        let (_, unsigned) = closest_triangle(sdf.triangles(), &point).unwrap();
        prop_assert!((d.abs() - unsigned).abs() < 1e-12);
    }
}

// =============================================================================
// Property Tests: Normalization
// =============================================================================

proptest! {
    /// Normalized meshes are centered and fit the target.
    #[test]
    fn normalized_mesh_fits_target(
        set in arb_triangle_set(50.0, 10),
        target in 0.1f64..0.5,
    ) {
        let original = set.bounds();
        let (canonical, info) = normalize(&set, target);
        let bounds = canonical.bounds();

        prop_assert!(info.scale > 0.0 && info.scale <= 1.0);
        prop_assert!(bounds.max_half_extent() <= target * (1.0 + 1e-9));
        prop_assert!(bounds.center().coords.norm() < 1e-9 * (1.0 + original.max_half_extent()));

        if original.max_half_extent() > target {
            prop_assert!((bounds.max_half_extent() - target).abs() < 1e-9);
        } else {
            prop_assert!((info.scale - 1.0).abs() < f64::EPSILON);
        }
    }

    /// World and canonical space transforms are inverse.
    #[test]
    fn canonical_transform_inverts(set in arb_triangle_set(50.0, 6), point in arb_point(60.0)) {
        let (_, info) = normalize(&set, 0.5);
        let back = info.to_world(&info.to_canonical(&point));
        prop_assert!((back - point).norm() < 1e-9 * (1.0 + point.coords.norm()));
    }
}

// =============================================================================
// Property Tests: Input and texture transport
// =============================================================================

proptest! {
    /// Reading arbitrary buffers never panics.
    #[test]
    fn from_positions_never_panics(positions in prop::collection::vec(any::<f32>(), 0..40)) {
        let _ = TriangleSet::from_positions(&positions);
        let _ = SignedDistanceField::from_positions(&positions, BakeParams::preview());
    }

    /// Tiling a grid and reading it back is exact.
    #[test]
    fn tiled_round_trip(grid in arb_grid()) {
        let image = grid.to_tiled();
        prop_assert_eq!(image.width, grid.resolution() * grid.resolution());
        prop_assert_eq!(image.data.len(), grid.len());
        prop_assert_eq!(SdfGrid::from_tiled(&image).unwrap(), grid);
    }

    /// Raw RGBA encoding preserves every bit.
    #[test]
    fn raw_encoding_is_lossless(values in prop::collection::vec(any::<f32>(), 0..64)) {
        let decoded = decode_raw_rgba(&encode_raw_rgba(&values)).unwrap();
        let original: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
        let round_tripped: Vec<u32> = decoded.iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(original, round_tripped);
    }
}
