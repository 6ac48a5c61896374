//! Traits for triangle collections.

use crate::{BoundingBox, Triangle};
use nalgebra::Point3;

/// Trait for types that can compute a bounding box.
pub trait MeshBounds {
    /// Compute the axis-aligned bounding box.
    ///
    /// Returns an empty box if there is no geometry.
    fn bounds(&self) -> BoundingBox;

    /// Compute the bounding box, returning `None` if empty.
    fn bounds_opt(&self) -> Option<BoundingBox> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Get the center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}

impl MeshBounds for Triangle {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices().iter())
    }
}
