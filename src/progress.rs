//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! real-time events as the driver works through the batch.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal status line, a log file, or a database record
//! without the library knowing anything about how the host application
//! communicates. The driver is strictly sequential, so events always arrive
//! in file order, but the trait is still `Send + Sync` so the same callback
//! can be shared with other threads of the host application.

use std::path::Path;
use std::sync::Arc;

/// Called by the conversion driver as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after enumeration, before any file is processed.
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is read and sent to the completion service.
    ///
    /// `index` is 1-based.
    fn on_file_start(&self, index: usize, total_files: usize, relative_path: &Path) {
        let _ = (index, total_files, relative_path);
    }

    /// Called when a file is skipped because its output already exists.
    fn on_file_skipped(&self, index: usize, total_files: usize, relative_path: &Path) {
        let _ = (index, total_files, relative_path);
    }

    /// Called when a file's converted content has been written.
    ///
    /// `output_len` is the byte length of the written content.
    fn on_file_complete(
        &self,
        index: usize,
        total_files: usize,
        relative_path: &Path,
        output_len: usize,
    ) {
        let _ = (index, total_files, relative_path, output_len);
    }

    /// Called when a file fails for any per-file reason.
    fn on_file_error(&self, index: usize, total_files: usize, relative_path: &Path, error: &str) {
        let _ = (index, total_files, relative_path, error);
    }

    /// Called once after all files have been attempted.
    fn on_run_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
