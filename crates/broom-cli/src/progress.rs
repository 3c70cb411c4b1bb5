use std::sync::Mutex;
use std::time::Duration;

use broom_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};

use crate::report::format_size;

/// CLI progress reporter driving an indicatif spinner. The scan total is
/// unknown upfront, so the spinner just keeps a live running count.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message("Scanning files...");
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_scan_progress(&self, file_count: usize, total_bytes: u64) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_message(format!(
                "Scanning... {} files, {}",
                file_count,
                format_size(total_bytes)
            ));
        }
    }

    fn on_scan_complete(&self, file_count: usize, total_bytes: u64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files, {}",
            file_count,
            format_size(total_bytes)
        );
    }
}
