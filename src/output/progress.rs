//! Terminal progress for scans
//!
//! Bars are drawn on stderr so a report piped from stdout stays clean.

use crate::core::parallel::ProgressUpdate;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

/// Progress bar over the files of one scan
pub struct ProgressReporter {
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// A reporter that draws nothing when `quiet` or `!enabled`
    pub fn new(quiet: bool, enabled: bool) -> Self {
        let bar = (!quiet && enabled).then(|| {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });
        Self { quiet, bar }
    }

    /// Hidden reporter, for library use and tests
    pub fn hidden() -> Self {
        Self::new(true, false)
    }

    pub fn start(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.reset();
            bar.set_position(0);
            bar.set_message(message.to_string());
        }
    }

    pub fn update(&self, current: usize, total: usize, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
            bar.set_message(message.to_string());
        }
    }

    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    pub fn finish(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        if !self.quiet && self.bar.is_some() {
            eprintln!("{}", message);
        }
    }

    /// Spinner shown while watch mode waits for changes
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.bar.is_none() {
            return None;
        }
        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

/// Create a progress callback function that updates a ProgressReporter
pub fn create_progress_callback(reporter: Arc<ProgressReporter>) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}
