//! Cubic grid of baked signed distances.

// Grid resolutions are small; index <-> float casts are exact in practice.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use mesh_types::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BakeError, BakeResult};

/// A cubic grid of signed distances covering the canonical volume `[-0.5, 0.5]³`.
///
/// Values are stored in a flat buffer with x varying fastest:
/// `index = x + y·r + z·r²`. Voxel `(x, y, z)` holds the signed distance at
/// its cell center (see [`sample_point`](Self::sample_point)), negative
/// inside the mesh and positive outside.
///
/// A grid is immutable once baked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SdfGrid {
    /// Cells per axis.
    resolution: usize,
    /// Signed distances, x varies fastest.
    values: Vec<f32>,
}

impl SdfGrid {
    /// Wrap a flat value buffer.
    ///
    /// # Errors
    ///
    /// - [`BakeError::InvalidResolution`] if `resolution` is zero or
    ///   `resolution³` overflows
    /// - [`BakeError::InvalidTexture`] if `values.len() != resolution³`
    pub fn from_values(resolution: usize, values: Vec<f32>) -> BakeResult<Self> {
        let expected = match resolution.checked_pow(3) {
            Some(count) if count > 0 => count,
            _ => return Err(BakeError::InvalidResolution(resolution)),
        };
        if values.len() != expected {
            return Err(BakeError::invalid_texture(format!(
                "expected {expected} values for resolution {resolution}, got {}",
                values.len()
            )));
        }
        Ok(Self { resolution, values })
    }

    /// Cells per axis.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Total number of cells (`resolution³`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: a grid has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The flat value buffer.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Take ownership of the flat value buffer.
    #[must_use]
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    /// Flat index of voxel `(x, y, z)`. Does not check bounds.
    #[inline]
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.resolution + z * self.resolution * self.resolution
    }

    /// Value at voxel `(x, y, z)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        let r = self.resolution;
        if x < r && y < r && z < r {
            self.values.get(self.index(x, y, z)).copied()
        } else {
            None
        }
    }

    /// Canonical-space sample point of voxel `(x, y, z)`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_bake::SdfGrid;
    ///
    /// let grid = SdfGrid::from_values(4, vec![0.0; 64]).unwrap();
    /// let p = grid.sample_point(0, 1, 3);
    /// assert!((p.x + 0.375).abs() < 1e-12);
    /// assert!((p.y + 0.125).abs() < 1e-12);
    /// assert!((p.z - 0.375).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn sample_point(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        voxel_center(self.resolution, [x, y, z])
    }

    /// Voxel whose cell contains a canonical-space point.
    ///
    /// Cells are half-open, so points on the `+0.5` faces are outside.
    #[must_use]
    pub fn voxel_containing(&self, point: &Point3<f64>) -> Option<[usize; 3]> {
        let r = self.resolution as f64;
        let cell = |v: f64| {
            let i = ((v + 0.5) * r).floor();
            (i >= 0.0 && i < r).then_some(i as usize)
        };
        Some([cell(point.x)?, cell(point.y)?, cell(point.z)?])
    }

    /// Iterate over `([x, y, z], value)` in flat order.
    pub fn iter_voxels(&self) -> impl Iterator<Item = ([usize; 3], f32)> + '_ {
        let r = self.resolution;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| ([i % r, (i / r) % r, i / (r * r)], v))
    }
}

/// Cell-centered sample point of a voxel in a grid of the given resolution.
///
/// `p = v / r − 0.5 + 0.5 / r` per axis.
#[must_use]
pub fn voxel_center(resolution: usize, voxel: [usize; 3]) -> Point3<f64> {
    let step = 1.0 / resolution as f64;
    let axis = |i: usize| i as f64 * step - 0.5 + step * 0.5;
    Point3::new(axis(voxel[0]), axis(voxel[1]), axis(voxel[2]))
}
