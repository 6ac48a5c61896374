//! Parameters for SDF baking.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BakeError, BakeResult};

/// Parameters for SDF baking.
///
/// # Example
///
/// ```
/// use mesh_bake::BakeParams;
///
/// // Default parameters (225 rays, unit canonical volume)
/// let params = BakeParams::default();
/// assert_eq!(params.ray_samples, 225);
/// assert!((params.target_half_extent - 0.5).abs() < 1e-10);
///
/// // Match the GPU bake convention
/// let gpu = BakeParams::gpu_compatible();
/// assert!((gpu.target_half_extent - 0.4).abs() < 1e-10);
///
/// // Customize with the builder
/// let custom = BakeParams::preview().inside_threshold(0.6).parallel(false);
/// assert_eq!(custom.ray_samples, 64);
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BakeParams {
    /// Largest half-extent of the mesh after normalization.
    ///
    /// Meshes already smaller than this are only recentered, never enlarged.
    pub target_half_extent: f64,

    /// Number of rays cast per voxel to vote inside/outside. Must be at least 2.
    pub ray_samples: usize,

    /// A voxel is inside when `back_hits / ray_samples` is strictly greater
    /// than this value. Must lie in `(0, 1)`.
    pub inside_threshold: f64,

    /// Epsilon for ray-triangle intersection tests.
    pub ray_epsilon: f64,

    /// Bake z-slabs in parallel with rayon.
    pub parallel: bool,
}

impl Default for BakeParams {
    fn default() -> Self {
        Self {
            target_half_extent: 0.5,
            ray_samples: 225,
            inside_threshold: 0.5,
            ray_epsilon: 1e-7,
            parallel: true,
        }
    }
}

impl BakeParams {
    /// Create params matching the GPU bake convention.
    ///
    /// Normalizes meshes to a 0.4 half-extent, leaving a margin inside the
    /// unit volume.
    #[must_use]
    pub const fn gpu_compatible() -> Self {
        Self {
            target_half_extent: 0.4,
            ray_samples: 225,
            inside_threshold: 0.5,
            ray_epsilon: 1e-7,
            parallel: true,
        }
    }

    /// Create params for quick previews.
    ///
    /// Uses 64 rays per voxel; thin features are more likely to be
    /// misclassified.
    #[must_use]
    pub const fn preview() -> Self {
        Self {
            target_half_extent: 0.5,
            ray_samples: 64,
            inside_threshold: 0.5,
            ray_epsilon: 1e-7,
            parallel: true,
        }
    }

    /// Set the normalization target half-extent.
    #[must_use]
    pub const fn target_half_extent(mut self, half_extent: f64) -> Self {
        self.target_half_extent = half_extent;
        self
    }

    /// Set the number of rays per voxel.
    #[must_use]
    pub const fn ray_samples(mut self, samples: usize) -> Self {
        self.ray_samples = samples;
        self
    }

    /// Set the back-hit ratio threshold.
    #[must_use]
    pub const fn inside_threshold(mut self, threshold: f64) -> Self {
        self.inside_threshold = threshold;
        self
    }

    /// Set the ray intersection epsilon.
    #[must_use]
    pub const fn ray_epsilon(mut self, epsilon: f64) -> Self {
        self.ray_epsilon = epsilon;
        self
    }

    /// Enable or disable parallel baking.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`BakeError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> BakeResult<()> {
        if !(self.target_half_extent.is_finite() && self.target_half_extent > 0.0) {
            return Err(BakeError::invalid_params(format!(
                "target_half_extent must be positive, got {}",
                self.target_half_extent
            )));
        }
        if self.ray_samples < 2 {
            return Err(BakeError::invalid_params(format!(
                "ray_samples must be at least 2, got {}",
                self.ray_samples
            )));
        }
        if !(self.inside_threshold > 0.0 && self.inside_threshold < 1.0) {
            return Err(BakeError::invalid_params(format!(
                "inside_threshold must be in (0, 1), got {}",
                self.inside_threshold
            )));
        }
        if !(self.ray_epsilon.is_finite() && self.ray_epsilon > 0.0) {
            return Err(BakeError::invalid_params(format!(
                "ray_epsilon must be positive, got {}",
                self.ray_epsilon
            )));
        }
        Ok(())
    }
}
