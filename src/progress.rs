//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for a comparison run
#[derive(Debug)]
pub struct ProgressReporter {
    pub connect_pb: Option<ProgressBar>,
    pub rows_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Create progress reporter for a run, starting with the connection spinner
    pub fn new_for_run() -> Self {
        let connect_pb = create_spinner("Connecting to source and target...");

        Self {
            connect_pb: Some(connect_pb),
            rows_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            connect_pb: None,
            rows_pb: None,
            show_progress: false,
        }
    }

    /// Lazily create rows spinner when needed
    fn ensure_rows_pb(&mut self) {
        if self.show_progress && self.rows_pb.is_none() {
            self.rows_pb = Some(create_spinner("Fetching rows..."));
        }
    }

    /// Finish the connection phase
    pub fn finish_connect(&mut self, message: &str) {
        if let Some(pb) = self.connect_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    /// Update row counts fetched so far
    pub fn update_rows(&mut self, source_rows: u64, target_rows: u64) {
        self.ensure_rows_pb();
        if let Some(pb) = &self.rows_pb {
            pb.set_message(format!(
                "Fetched {} source / {} target rows",
                source_rows, target_rows
            ));
        }
    }

    /// Finish row processing
    pub fn finish_rows(&mut self, message: &str) {
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Ensure all progress bars are cleaned up silently
        if let Some(pb) = self.connect_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner on stderr
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
