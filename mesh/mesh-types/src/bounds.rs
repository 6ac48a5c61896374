//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// Defined by minimum and maximum corner points. Used both for the bounds of
/// an input mesh and for the canonical bake volume.
///
/// # Example
///
/// ```
/// use mesh_types::{BoundingBox, Point3};
///
/// let bbox = BoundingBox::new(
///     Point3::new(-1.0, -2.0, -3.0),
///     Point3::new(1.0, 2.0, 3.0),
/// );
///
/// assert_eq!(bbox.center(), Point3::origin());
/// assert!((bbox.max_half_extent() - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a new box from minimum and maximum corners.
    ///
    /// The corners are swapped per axis if `min > max`.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create a box centered at the origin with the given half-extents.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{BoundingBox, Point3, Vector3};
    ///
    /// let bbox = BoundingBox::centered(Vector3::new(0.5, 0.25, 0.1));
    /// assert_eq!(bbox.min, Point3::new(-0.5, -0.25, -0.1));
    /// assert_eq!(bbox.max, Point3::new(0.5, 0.25, 0.1));
    /// ```
    #[must_use]
    pub fn centered(half_extents: Vector3<f64>) -> Self {
        let half = half_extents.abs();
        Self {
            min: Point3::from(-half),
            max: Point3::from(half),
        }
    }

    /// Create an empty (inverted) box.
    ///
    /// Useful as a starting point for [`expand_to_include`](Self::expand_to_include).
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create the smallest box enclosing all points.
    ///
    /// Returns an empty box if the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox.expand_to_include(point);
        }
        bbox
    }

    /// Check if the box is empty (min > max on some axis).
    ///
    /// A single point or a flat box is **not** empty; it has zero volume.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Dimensions of the box (width, height, depth).
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Half of [`size`](Self::size).
    #[inline]
    #[must_use]
    pub fn half_extents(&self) -> Vector3<f64> {
        self.size() * 0.5
    }

    /// Largest of the three half-extents.
    #[inline]
    #[must_use]
    pub fn max_half_extent(&self) -> f64 {
        let e = self.half_extents();
        e.x.max(e.y).max(e.z)
    }

    /// Center of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Check if the box contains a point.
    ///
    /// Points on the boundary are considered inside.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{BoundingBox, Point3, Vector3};
    ///
    /// let bbox = BoundingBox::centered(Vector3::new(0.5, 0.5, 0.5));
    /// assert!(bbox.contains(&Point3::new(0.5, 0.0, 0.0)));
    /// assert!(!bbox.contains(&Point3::new(0.6, 0.0, 0.0)));
    /// ```
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Expand the box to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
