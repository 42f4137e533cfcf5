use crate::output::settings;
use indicatif::{HumanDuration, ProgressBar};
use std::time::{Duration, Instant};

/// Spinner shown while a file loads; hidden when not on a terminal or quiet
pub struct Spinner {
    pb: ProgressBar,
    started: Instant,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if settings().show_progress() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self {
            pb,
            started: Instant::now(),
        }
    }

    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    /// Clear the spinner line
    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }

    /// Human-readable time since the spinner started, e.g. "3 seconds"
    pub fn elapsed(&self) -> String {
        HumanDuration(self.started.elapsed()).to_string()
    }
}
