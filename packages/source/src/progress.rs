//! Progress reporting trait for batch record processing.
//!
//! Loading, normalization and classification report how many records they
//! have handled through [`ProgressCallback`], so the core stays independent
//! of any terminal rendering. The CLI plugs in `indicatif` bars; tests and
//! library callers use [`NullProgress`].

use std::sync::Arc;

/// Trait for reporting progress from record batches.
///
/// Implementations must be `Send + Sync` because parallel stages call
/// [`Self::inc`] from worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected number of records.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` records.
    fn inc(&self, delta: u64);

    /// Mark the stage as complete with a final message.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores all updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
