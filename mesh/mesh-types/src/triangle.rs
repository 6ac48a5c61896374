//! Triangle type and point-to-triangle distance.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One face of a triangle soup, owning its three corners.
///
/// Front faces are counter-clockwise as seen from outside the mesh, so the
/// right-hand normal points out of the solid. The bake's ray vote reads
/// a ray travelling along this normal as leaving the solid.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let floor = Triangle::from_arrays([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
/// assert!((floor.normal().unwrap().z - 1.0).abs() < 1e-12);
///
/// // Above the interior: plane distance
/// assert!((floor.distance_to(&Point3::new(0.5, 0.5, 0.75)) - 0.75).abs() < 1e-12);
///
/// // Beyond the hypotenuse: edge distance
/// let d = floor.distance_to(&Point3::new(2.0, 2.0, 0.0));
/// assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Build a triangle from its corners.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Build a triangle from `[x, y, z]` arrays.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            v0: Point3::from(v0),
            v1: Point3::from(v1),
            v2: Point3::from(v2),
        }
    }

    /// The three vertices in order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Edge vectors `v1 - v0` and `v2 - v0`.
    #[inline]
    #[must_use]
    pub fn edge_vectors(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.v1 - self.v0, self.v2 - self.v0)
    }

    /// `(v1 - v0) × (v2 - v0)`; its length is twice the area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let (e1, e2) = self.edge_vectors();
        e1.cross(&e2)
    }

    /// Outward unit normal, or `None` when the corners are collinear or
    /// coincide.
    ///
    /// ```
    /// use mesh_types::Triangle;
    ///
    /// let sliver = Triangle::from_arrays([0.0; 3], [1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);
    /// assert!(sliver.normal().is_none());
    /// assert!(sliver.is_degenerate());
    /// ```
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.normal_unnormalized().try_normalize(f64::MIN_POSITIVE)
    }

    /// Check if the triangle has zero area.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal().is_none()
    }

    /// Surface area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Mean of the three corners.
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Recenter and uniformly scale the triangle.
    ///
    /// Every vertex `v` becomes `(v - center) * scale`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::from_arrays([2.0, 2.0, 2.0], [4.0, 2.0, 2.0], [2.0, 4.0, 2.0]);
    /// let moved = tri.transformed(&Point3::new(2.0, 2.0, 2.0), 0.5);
    /// assert_eq!(moved.v1, Point3::new(1.0, 0.0, 0.0));
    /// ```
    #[must_use]
    pub fn transformed(&self, center: &Point3<f64>, scale: f64) -> Self {
        let map = |v: &Point3<f64>| Point3::from((v - center) * scale);
        Self {
            v0: map(&self.v0),
            v1: map(&self.v1),
            v2: map(&self.v2),
        }
    }

    /// Unsigned distance from `point` to the closest point of the triangle.
    ///
    /// Closed-form formulation by Inigo Quilez: the three edge-plane sign
    /// tests decide whether the point projects inside the triangle. If it
    /// does, the distance is the distance to the supporting plane; otherwise
    /// it is the smallest of the three clamped edge distances.
    ///
    /// Always `>= 0`, and exactly `0` at each vertex. Zero-length edges and
    /// zero-area triangles degrade to segment/point distances.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    ///
    /// // Beyond the v0-v1 edge
    /// let d = tri.distance_to(&Point3::new(1.0, -1.0, 0.0));
    /// assert!((d - 1.0).abs() < 1e-12);
    ///
    /// assert_eq!(tri.distance_to(&tri.v2), 0.0);
    /// ```
    #[must_use]
    pub fn distance_to(&self, point: &Point3<f64>) -> f64 {
        self.distance_squared_to(point).sqrt()
    }

    /// Squared form of [`distance_to`](Self::distance_to).
    #[must_use]
    pub fn distance_squared_to(&self, point: &Point3<f64>) -> f64 {
        let v21 = self.v1 - self.v0;
        let v32 = self.v2 - self.v1;
        let v13 = self.v0 - self.v2;
        let p1 = point - self.v0;
        let p2 = point - self.v1;
        let p3 = point - self.v2;
        let nor = v21.cross(&v13);

        let inside = sign(v21.cross(&nor).dot(&p1))
            + sign(v32.cross(&nor).dot(&p2))
            + sign(v13.cross(&nor).dot(&p3));

        if inside < 2.0 {
            edge_distance_squared(&v21, &p1)
                .min(edge_distance_squared(&v32, &p2))
                .min(edge_distance_squared(&v13, &p3))
        } else {
            let d = nor.dot(&p1);
            d * d / nor.norm_squared()
        }
    }
}

/// GLSL-style sign: `0.0` for zero, unlike [`f64::signum`].
#[inline]
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Squared distance from `p` (relative to the edge start) to the edge segment.
#[inline]
fn edge_distance_squared(edge: &Vector3<f64>, p: &Vector3<f64>) -> f64 {
    let len_sq = edge.norm_squared();
    let t = if len_sq > 0.0 {
        (edge.dot(p) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (edge * t - p).norm_squared()
}
