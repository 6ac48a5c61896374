//! Inside/outside classification by spherical ray voting.
//!
//! A point is tested by casting rays in many directions spread evenly over
//! the sphere. Each ray keeps the intersected triangle closest to the point;
//! if that triangle faces away from the ray (a back face), the ray "sees"
//! the inside of the surface. The point is inside when the share of
//! back-face rays exceeds a threshold.
//!
//! This is a statistical approximation: thin features or low sample counts
//! can be misclassified, which is reported as a wrong sign rather than an
//! error. It tolerates small holes and inconsistent winding far better than
//! single-ray parity tests.

// Sample counts are small; usize -> f64 is exact in practice.
#![allow(clippy::cast_precision_loss)]

use std::f64::consts::PI;

use mesh_types::{Point3, TriangleSet, Vector3};

use crate::observer::BakeObserver;
use crate::query::ray_triangle_intersect;

/// The hit a classifier ray counted for its vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the triangle in the set.
    pub triangle_index: usize,
    /// The ray direction points along the triangle normal.
    pub is_back_face: bool,
    /// Unsigned distance from the ray origin to the triangle.
    pub distance: f64,
}

/// Tally of one spherical vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RayVote {
    /// Rays cast.
    pub samples: usize,
    /// Rays that hit at least one triangle.
    pub hits: usize,
    /// Rays whose counted hit was a back face.
    pub back_hits: usize,
}

impl RayVote {
    /// Share of all cast rays that counted a back face.
    ///
    /// Rays that hit nothing still count in the denominator.
    #[must_use]
    pub fn back_hit_ratio(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.back_hits as f64 / self.samples as f64
        }
    }

    /// Check if the vote classifies the point as inside.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_bake::RayVote;
    ///
    /// let vote = RayVote { samples: 10, hits: 9, back_hits: 5 };
    /// assert!(!vote.is_inside(0.5)); // strictly greater is required
    /// assert!(vote.is_inside(0.4));
    /// ```
    #[must_use]
    pub fn is_inside(&self, threshold: f64) -> bool {
        self.back_hit_ratio() > threshold
    }
}

/// Generate `count` unit directions spread over the sphere.
///
/// Uses the golden-angle spiral: for `i` in `0..count`, `y` runs linearly
/// from `1` to `-1` and the azimuth advances by `π(3 − √5)` per step.
/// Deterministic for a given count.
///
/// # Example
///
/// ```
/// use mesh_bake::sphere_directions;
///
/// let dirs = sphere_directions(225);
/// assert_eq!(dirs.len(), 225);
/// assert!((dirs[0].y - 1.0).abs() < 1e-12);
/// assert!((dirs[224].y + 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn sphere_directions(count: usize) -> Vec<Vector3<f64>> {
    if count < 2 {
        return vec![Vector3::y(); count];
    }

    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    let last = (count - 1) as f64;

    (0..count)
        .map(|i| {
            let i = i as f64;
            let y = 1.0 - (i / last) * 2.0;
            let radius = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i;
            Vector3::new(theta.cos() * radius, y, theta.sin() * radius)
        })
        .collect()
}

/// Cast one ray and return the hit that counts for the vote.
///
/// Among all intersected triangles the one with the smallest unsigned
/// distance to `origin` wins (not the smallest ray parameter), first index on
/// ties. The hit is a back face when `direction · normal > 0`; zero-area
/// triangles have no normal and count as front faces.
#[must_use]
pub fn closest_ray_hit(
    triangles: &TriangleSet,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    epsilon: f64,
) -> Option<RayHit> {
    let mut best: Option<(usize, f64)> = None;

    for (index, tri) in triangles.iter().enumerate() {
        if ray_triangle_intersect(origin, direction, tri, epsilon).is_none() {
            continue;
        }
        let distance = tri.distance_to(origin);
        if best.is_none_or(|(_, min)| distance < min) {
            best = Some((index, distance));
        }
    }

    best.and_then(|(triangle_index, distance)| {
        let tri = triangles.get(triangle_index)?;
        let is_back_face = tri.normal().is_some_and(|n| direction.dot(&n) > 0.0);
        Some(RayHit {
            triangle_index,
            is_back_face,
            distance,
        })
    })
}

/// Cast one ray per direction from `origin` and tally the result.
///
/// Every ray is reported to `observer`, hit or not.
pub fn cast_vote(
    triangles: &TriangleSet,
    origin: &Point3<f64>,
    directions: &[Vector3<f64>],
    epsilon: f64,
    observer: &dyn BakeObserver,
) -> RayVote {
    let mut vote = RayVote {
        samples: directions.len(),
        ..RayVote::default()
    };

    for direction in directions {
        let hit = closest_ray_hit(triangles, origin, direction, epsilon);
        observer.on_ray_cast(origin, direction, hit.as_ref());
        if let Some(hit) = hit {
            vote.hits += 1;
            if hit.is_back_face {
                vote.back_hits += 1;
            }
        }
    }

    vote
}
