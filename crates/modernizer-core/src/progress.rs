/// Trait for reporting engine progress.
///
/// The CLI implements this with indicatif; tests and library embedders use
/// `SilentReporter`. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_discovery_complete(&self, _projects: usize) {}
    fn on_copy_start(&self, _total_files: usize) {}
    fn on_copy_progress(&self, _files_done: usize, _total_files: usize) {}
    fn on_copy_complete(&self, _succeeded: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
