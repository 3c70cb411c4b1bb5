/// Trait for reporting scan progress.
///
/// The CLI implements this with an indicatif spinner; library callers that
/// do not care pass `SilentReporter`. All methods have default no-op
/// implementations.
///
/// `on_scan_progress` fires at 500-file batch boundaries with committed
/// totals only. In parallel scans it is invoked from the serialized merge
/// step, so implementations still see monotonically increasing counts.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_progress(&self, _file_count: usize, _total_bytes: u64) {}
    fn on_scan_complete(&self, _file_count: usize, _total_bytes: u64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
