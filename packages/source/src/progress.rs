//! Progress reporting for the acquisition loop.
//!
//! The library never draws anything itself. Callers pass an
//! `Arc<dyn ProgressCallback>`: a terminal progress bar in the CLI,
//! [`NullProgress`] when nobody is watching, or a recording
//! implementation in tests.

use std::sync::Arc;

/// Observer for a long-running acquisition.
///
/// Implementations must be `Send + Sync` so they can be shared through
/// an `Arc`.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of requests (enables percentage/ETA).
    fn set_total(&self, total: u64);

    /// Advance by `delta` completed requests.
    fn inc(&self, delta: u64);

    /// Update the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark the run as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every progress update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
