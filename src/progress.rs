//! Progress bar display for installations

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a run
///
/// Draws to stderr and stays hidden when stderr is not a terminal.
pub struct ProgressDisplay {
    module_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total module count
    pub fn new(total_modules: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let module_pb = ProgressBar::new(total_modules);
        module_pb.set_style(style);

        Self { module_pb }
    }

    /// Update to show current module being installed
    pub fn update_module(&self, module_name: &str, current: usize, total: usize) {
        let msg = format!("({current}/{total}) {module_name}");
        self.module_pb.set_message(msg);
    }

    /// Increment module progress
    pub fn inc_module(&self) {
        self.module_pb.inc(1);
    }

    /// Clear the bar once every module has been processed
    pub fn finish(&self) {
        self.module_pb.finish_and_clear();
    }

    /// Abandon on early stop, leaving the bar where it stopped
    pub fn abandon(&self) {
        self.module_pb.abandon();
    }
}
