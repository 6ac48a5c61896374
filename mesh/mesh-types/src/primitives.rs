//! Closed reference shapes for tests, benchmarks and demos.
//!
//! All shapes are watertight with outward-facing CCW winding.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::{Triangle, TriangleSet};

/// Axis-aligned cube made of 12 triangles.
///
/// # Example
///
/// ```
/// use mesh_types::{cube, MeshBounds, Point3};
///
/// let c = cube(Point3::origin(), 0.5);
/// assert_eq!(c.len(), 12);
/// assert!((c.bounds().max.x - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn cube(center: Point3<f64>, half_extent: f64) -> TriangleSet {
    const FACES: [[usize; 3]; 12] = [
        // -Z
        [0, 2, 1],
        [0, 3, 2],
        // +Z
        [4, 5, 6],
        [4, 6, 7],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [3, 7, 6],
        [3, 6, 2],
        // -X
        [0, 4, 7],
        [0, 7, 3],
        // +X
        [1, 2, 6],
        [1, 6, 5],
    ];

    let h = half_extent;
    let corner = |x: f64, y: f64, z: f64| center + Vector3::new(x, y, z) * h;

    let v = [
        corner(-1.0, -1.0, -1.0), // 0
        corner(1.0, -1.0, -1.0),  // 1
        corner(1.0, 1.0, -1.0),   // 2
        corner(-1.0, 1.0, -1.0),  // 3
        corner(-1.0, -1.0, 1.0),  // 4
        corner(1.0, -1.0, 1.0),   // 5
        corner(1.0, 1.0, 1.0),    // 6
        corner(-1.0, 1.0, 1.0),   // 7
    ];

    FACES
        .iter()
        .map(|f| Triangle::new(v[f[0]], v[f[1]], v[f[2]]))
        .collect()
}

/// Geodesic sphere built by subdividing an icosahedron.
///
/// `subdivisions = 0` gives the 20-face icosahedron; each level multiplies
/// the face count by 4. All vertices lie exactly on the sphere, so the mesh
/// is slightly inside the true sphere between vertices.
///
/// # Example
///
/// ```
/// use mesh_types::{icosphere, Point3};
///
/// let sphere = icosphere(Point3::origin(), 1.0, 2);
/// assert_eq!(sphere.len(), 320);
/// ```
#[must_use]
pub fn icosphere(center: Point3<f64>, radius: f64, subdivisions: u32) -> TriangleSet {
    let phi = f64::midpoint(1.0, 5.0_f64.sqrt());
    let norm = (1.0 + phi * phi).sqrt();
    let a = 1.0 / norm;
    let b = phi / norm;

    let mut vertices: Vec<Vector3<f64>> = [
        [-a, b, 0.0],
        [a, b, 0.0],
        [-a, -b, 0.0],
        [a, -b, 0.0],
        [0.0, -a, b],
        [0.0, a, b],
        [0.0, -a, -b],
        [0.0, a, -b],
        [b, 0.0, -a],
        [b, 0.0, a],
        [-b, 0.0, -a],
        [-b, 0.0, a],
    ]
    .iter()
    .map(|v| Vector3::from(*v))
    .collect();

    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |i: usize, j: usize, vertices: &mut Vec<Vector3<f64>>| {
            let key = (i.min(j), i.max(j));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = (vertices[i] + vertices[j]).normalize();
                vertices.push(mid);
                vertices.len() - 1
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[i0, i1, i2] in &faces {
            let m01 = midpoint(i0, i1, &mut vertices);
            let m12 = midpoint(i1, i2, &mut vertices);
            let m20 = midpoint(i2, i0, &mut vertices);
            next.push([i0, m01, m20]);
            next.push([i1, m12, m01]);
            next.push([i2, m20, m12]);
            next.push([m01, m12, m20]);
        }
        faces = next;
    }

    let place = |i: usize| center + vertices[i] * radius;
    faces
        .iter()
        .map(|&[i0, i1, i2]| Triangle::new(place(i0), place(i1), place(i2)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MeshBounds;
    use approx::assert_relative_eq;

    /// Signed volume via the divergence theorem; positive for outward winding.
    fn signed_volume(set: &TriangleSet) -> f64 {
        set.iter()
            .map(|t| t.v0.coords.dot(&t.v1.coords.cross(&t.v2.coords)) / 6.0)
            .sum()
    }

    #[test]
    fn cube_is_outward() {
        let c = cube(Point3::new(1.0, 2.0, 3.0), 0.5);
        assert_relative_eq!(signed_volume(&c), 1.0, epsilon = 1e-10);
        for tri in &c {
            let n = tri.normal().unwrap();
            let out = tri.centroid() - Point3::new(1.0, 2.0, 3.0);
            assert!(n.dot(&out) > 0.0);
        }
    }

    #[test]
    fn cube_bounds() {
        let c = cube(Point3::origin(), 0.25);
        let b = c.bounds();
        assert_relative_eq!(b.min.x, -0.25);
        assert_relative_eq!(b.max.z, 0.25);
    }

    #[test]
    fn icosphere_face_counts() {
        assert_eq!(icosphere(Point3::origin(), 1.0, 0).len(), 20);
        assert_eq!(icosphere(Point3::origin(), 1.0, 1).len(), 80);
    }

    #[test]
    fn icosphere_is_outward_and_on_sphere() {
        let center = Point3::new(0.5, -0.5, 2.0);
        let sphere = icosphere(center, 2.0, 2);
        assert!(signed_volume(&sphere) > 0.0);
        for tri in &sphere {
            for v in tri.vertices() {
                assert_relative_eq!((v - center).norm(), 2.0, epsilon = 1e-10);
            }
            let n = tri.normal().unwrap();
            assert!(n.dot(&(tri.centroid() - center)) > 0.0);
        }
    }
}
