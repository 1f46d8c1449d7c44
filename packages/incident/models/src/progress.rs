//! Progress reporting trait for long-running pipeline stages.
//!
//! Decouples progress reporting from any rendering backend (`indicatif`
//! bars, log-only output, or silence). The ETL loader and the geocode
//! resolver take an injected [`ProgressCallback`] instead of touching
//! global state, so test harnesses can capture what a stage reports.

use std::sync::Arc;

/// Trait for reporting progress from long-running pipeline stages.
///
/// Implementations must be `Send + Sync` so a single reporter can be
/// shared across stages via `Arc`.
pub trait ProgressCallback: Send + Sync {
    /// Starts a unit of work. `total` enables percentage/ETA display when
    /// known up front; `None` renders as a spinner.
    fn begin(&self, msg: String, total: Option<u64>);

    /// Advances progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Marks the current unit of work complete with a final message.
    fn finish(&self, msg: String);
}

/// A no-op [`ProgressCallback`] that silently ignores all updates.
///
/// Useful for tests and non-interactive runs.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn begin(&self, _msg: String, _total: Option<u64>) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
