//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag for stopping a bake from another thread.
///
/// Clones share the same flag. A bake checks it before every row of voxels
/// and returns [`BakeError::Cancelled`](crate::BakeError::Cancelled) once it
/// is set; no partial grid is produced.
///
/// # Example
///
/// ```
/// use mesh_bake::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
