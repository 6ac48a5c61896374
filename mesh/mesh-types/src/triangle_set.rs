//! Ordered collection of triangles read from flat buffers.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, MeshBounds, Triangle, TypesError, TypesResult};

/// Floats per de-indexed triangle (3 vertices × xyz).
const TRIANGLE_STRIDE: usize = 9;

/// Floats per vertex.
const VERTEX_STRIDE: usize = 3;

/// An ordered, read-only triangle soup.
///
/// Triangle order is preserved from the input buffer, so indices reported
/// by queries (closest triangle, ray hits) refer back to the source data.
///
/// # Example
///
/// ```
/// use mesh_types::TriangleSet;
///
/// // Two vertices shared by two triangles, expanded from an index buffer
/// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
/// let indices = [0, 1, 2, 0, 2, 3];
///
/// let set = TriangleSet::from_indexed(&positions, &indices).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.to_positions().len(), 18);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleSet {
    triangles: Vec<Triangle>,
}

impl TriangleSet {
    /// Wrap an existing list of triangles.
    #[must_use]
    pub const fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Read a de-indexed position buffer.
    ///
    /// Every 9 consecutive floats form one triangle
    /// `[x0, y0, z0, x1, y1, z1, x2, y2, z2]`. An empty buffer yields an
    /// empty set.
    ///
    /// # Errors
    ///
    /// - [`TypesError::MalformedPositions`] if the length is not a multiple of 9
    /// - [`TypesError::NonFiniteCoordinate`] if any coordinate is NaN or infinite
    pub fn from_positions(positions: &[f32]) -> TypesResult<Self> {
        if positions.len() % TRIANGLE_STRIDE != 0 {
            return Err(TypesError::MalformedPositions {
                len: positions.len(),
                stride: TRIANGLE_STRIDE,
            });
        }
        check_finite(positions)?;

        let triangles = positions
            .chunks_exact(TRIANGLE_STRIDE)
            .map(|c| {
                Triangle::new(
                    point_at(&c[0..3]),
                    point_at(&c[3..6]),
                    point_at(&c[6..9]),
                )
            })
            .collect();

        Ok(Self { triangles })
    }

    /// Expand an indexed mesh into a triangle set.
    ///
    /// `positions` holds xyz triples, `indices` holds vertex index triples.
    ///
    /// # Errors
    ///
    /// - [`TypesError::MalformedPositions`] if `positions` is not a multiple of 3
    /// - [`TypesError::MalformedIndices`] if `indices` is not a multiple of 3
    /// - [`TypesError::IndexOutOfRange`] for an index past the last vertex
    /// - [`TypesError::NonFiniteCoordinate`] if any coordinate is NaN or infinite
    pub fn from_indexed(positions: &[f32], indices: &[u32]) -> TypesResult<Self> {
        if positions.len() % VERTEX_STRIDE != 0 {
            return Err(TypesError::MalformedPositions {
                len: positions.len(),
                stride: VERTEX_STRIDE,
            });
        }
        if indices.len() % 3 != 0 {
            return Err(TypesError::MalformedIndices { len: indices.len() });
        }
        check_finite(positions)?;

        let vertices: Vec<Point3<f64>> = positions
            .chunks_exact(VERTEX_STRIDE)
            .map(point_at)
            .collect();

        let vertex = |index: u32| -> TypesResult<Point3<f64>> {
            vertices
                .get(index as usize)
                .copied()
                .ok_or(TypesError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                })
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|f| Ok(Triangle::new(vertex(f[0])?, vertex(f[1])?, vertex(f[2])?)))
            .collect::<TypesResult<Vec<_>>>()?;

        Ok(Self { triangles })
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the set has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Get a triangle by index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// Iterate over triangles in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Triangles as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Flatten back into a de-indexed `f32` position buffer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: the input format is f32, values originated there
    pub fn to_positions(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(Triangle::vertices)
            .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }

    /// Recenter and uniformly scale every triangle.
    ///
    /// See [`Triangle::transformed`].
    #[must_use]
    pub fn transformed(&self, center: &Point3<f64>, scale: f64) -> Self {
        Self {
            triangles: self
                .triangles
                .iter()
                .map(|t| t.transformed(center, scale))
                .collect(),
        }
    }

    /// Number of zero-area triangles.
    #[must_use]
    pub fn degenerate_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.is_degenerate()).count()
    }
}

impl MeshBounds for TriangleSet {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.triangles.iter().flat_map(|t| [&t.v0, &t.v1, &t.v2]))
    }
}

impl FromIterator<Triangle> for TriangleSet {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TriangleSet {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

fn check_finite(values: &[f32]) -> TypesResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(TypesError::NonFiniteCoordinate { index }),
        None => Ok(()),
    }
}

fn point_at(xyz: &[f32]) -> Point3<f64> {
    Point3::new(f64::from(xyz[0]), f64::from(xyz[1]), f64::from(xyz[2]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const QUAD: [f32; 12] = [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 2.0, 0.0, 0.0, 2.0, 0.0];

    #[test]
    fn from_positions_reads_triangles_in_order() {
        let positions = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 5.0, 1.0, 0.0, 5.0, 0.0, 1.0, 5.0,
        ];
        let set = TriangleSet::from_positions(&positions).unwrap();
        assert_eq!(set.len(), 2);
        assert_relative_eq!(set.get(1).unwrap().v0.z, 5.0);
        assert!(set.get(2).is_none());
    }

    #[test]
    fn from_positions_empty() {
        let set = TriangleSet::from_positions(&[]).unwrap();
        assert!(set.is_empty());
        assert!(set.bounds_opt().is_none());
    }

    #[test]
    fn from_positions_bad_length() {
        let err = TriangleSet::from_positions(&[0.0; 10]).unwrap_err();
        assert_eq!(err, TypesError::MalformedPositions { len: 10, stride: 9 });
    }

    #[test]
    fn from_positions_rejects_nan() {
        let mut positions = [0.0_f32; 9];
        positions[4] = f32::NAN;
        let err = TriangleSet::from_positions(&positions).unwrap_err();
        assert_eq!(err, TypesError::NonFiniteCoordinate { index: 4 });
    }

    #[test]
    fn from_indexed_expands() {
        let set = TriangleSet::from_indexed(&QUAD, &[0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[1].v2, Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn from_indexed_out_of_range() {
        let err = TriangleSet::from_indexed(&QUAD, &[0, 1, 4]).unwrap_err();
        assert_eq!(
            err,
            TypesError::IndexOutOfRange {
                index: 4,
                vertex_count: 4
            }
        );
    }

    #[test]
    fn from_indexed_bad_lengths() {
        assert!(matches!(
            TriangleSet::from_indexed(&QUAD[..11], &[0, 1, 2]),
            Err(TypesError::MalformedPositions { stride: 3, .. })
        ));
        assert!(matches!(
            TriangleSet::from_indexed(&QUAD, &[0, 1]),
            Err(TypesError::MalformedIndices { len: 2 })
        ));
    }

    #[test]
    fn positions_round_trip() {
        let set = TriangleSet::from_indexed(&QUAD, &[0, 1, 2, 0, 2, 3]).unwrap();
        let again = TriangleSet::from_positions(&set.to_positions()).unwrap();
        assert_eq!(set, again);
    }

    #[test]
    fn bounds_and_transform() {
        let set = TriangleSet::from_indexed(&QUAD, &[0, 1, 2]).unwrap();
        let b = set.bounds();
        assert_eq!(b.center(), Point3::new(1.0, 1.0, 0.0));

        let moved = set.transformed(&b.center(), 0.5);
        let mb = moved.bounds();
        assert_relative_eq!(mb.min.x, -0.5);
        assert_relative_eq!(mb.max.y, 0.5);
    }

    #[test]
    fn counts_degenerate() {
        let set: TriangleSet = [
            Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.degenerate_count(), 1);
        assert_eq!((&set).into_iter().count(), 2);
    }
}
