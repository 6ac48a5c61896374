//! Geometric queries against a triangle set.
//!
//! Provides the closest-triangle search used for the magnitude of every
//! baked value, plus the ray-triangle test used by the inside/outside vote.

use mesh_types::{Point3, Triangle, TriangleSet, Vector3};

/// Find the triangle closest to a point.
///
/// Scans every triangle and keeps the first one achieving the minimum
/// unsigned distance (strict `<`), so ties resolve to the lowest index.
///
/// # Returns
///
/// `Some((index, distance))`, or `None` if no triangle produced a finite
/// distance (for example, an empty set).
///
/// # Example
///
/// ```
/// use mesh_bake::closest_triangle;
/// use mesh_types::{cube, Point3};
///
/// let triangles = cube(Point3::origin(), 0.5);
/// let (_, distance) = closest_triangle(&triangles, &Point3::new(0.0, 0.0, 0.9)).unwrap();
/// assert!((distance - 0.4).abs() < 1e-12);
/// ```
#[must_use]
pub fn closest_triangle(triangles: &TriangleSet, point: &Point3<f64>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (index, tri) in triangles.iter().enumerate() {
        let dist_sq = tri.distance_squared_to(point);
        if !dist_sq.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, min_sq)| dist_sq < min_sq) {
            best = Some((index, dist_sq));
        }
    }

    best.map(|(index, dist_sq)| (index, dist_sq.sqrt()))
}

/// Compute the closest point on a triangle to a query point.
///
/// This implements the algorithm from "Real-Time Collision Detection" by
/// Christer Ericson. The bake itself only needs distances and uses
/// [`Triangle::distance_to`]; this yields the point itself, which is useful
/// for cross-checking those distances or placing surface samples.
#[must_use]
pub fn closest_point_on_triangle(point: &Point3<f64>, tri: &Triangle) -> Point3<f64> {
    let (v0, v1, v2) = (tri.v0, tri.v1, tri.v2);
    let ab = v1 - v0;
    let ac = v2 - v0;
    let ap = point - v0;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);

    // Vertex region outside A
    if d1 <= 0.0 && d2 <= 0.0 {
        return v0;
    }

    let bp = point - v1;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);

    // Vertex region outside B
    if d3 >= 0.0 && d4 <= d3 {
        return v1;
    }

    // Edge region of AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return v0 + ab * v;
    }

    let cp = point - v2;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);

    // Vertex region outside C
    if d6 >= 0.0 && d5 <= d6 {
        return v2;
    }

    // Edge region of AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return v0 + ac * w;
    }

    // Edge region of BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return v1 + (v2 - v1) * w;
    }

    // Face region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;

    v0 + ab * v + ac * w
}

/// Test if a ray intersects a triangle.
///
/// Uses the Möller–Trumbore algorithm. The ray is rejected as parallel when
/// the determinant is below `epsilon` in magnitude. Barycentric acceptance is
/// `u ∈ [-epsilon, 1]`, `v ≥ epsilon`, `u + v ≤ 1`, so hits exactly on the
/// `v = 0` edge are skipped and the neighbouring triangle reports them.
///
/// # Returns
///
/// `Some(t)` where `t ≥ 0` is the ray parameter at intersection, or `None`.
///
/// # Example
///
/// ```
/// use mesh_bake::ray_triangle_intersect;
/// use mesh_types::{Point3, Triangle, Vector3};
///
/// let tri = Triangle::from_arrays([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
/// let t = ray_triangle_intersect(&Point3::new(0.2, 0.2, 0.0), &Vector3::z(), &tri, 1e-7);
/// assert!((t.unwrap() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &Triangle,
    epsilon: f64,
) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle
    if a.abs() < epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);

    if u < -epsilon || u > 1.0 {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);

    if v < epsilon || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t >= 0.0).then_some(t)
}
