//! Live progress display for downloads
//!
//! Two rendering modes share one interface: a rich indicatif progress bar
//! for interactive terminals, and plain line-per-file output for pipes and
//! the `--plain` flag. Transfer progress arrives as a fraction in `0..=1`,
//! so the bar uses a fixed virtual length and scales positions into it.
//! An indeterminate transfer reports the constant 1.0, which renders as a
//! full bar for the duration.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::batch::BatchObserver;
use crate::errors::AppError;

/// Virtual bar length that progress fractions are scaled into
const BAR_SCALE: u64 = 1000;

/// Rendering mode for transfer feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// indicatif progress bars
    Fancy,
    /// One line per completed or failed file
    Plain,
}

impl ProgressMode {
    /// Pick the mode for the current session: fancy on an interactive
    /// terminal unless the user forced plain output
    pub fn detect(force_plain: bool) -> Self {
        if force_plain || !atty::is(atty::Stream::Stdout) {
            ProgressMode::Plain
        } else {
            ProgressMode::Fancy
        }
    }
}

/// Batch observer rendering per-item download progress
pub struct ProgressRenderer {
    mode: ProgressMode,
    bar: Option<ProgressBar>,
    current: Option<String>,
}

impl ProgressRenderer {
    pub fn new(mode: ProgressMode) -> Self {
        Self {
            mode,
            bar: None,
            current: None,
        }
    }

    /// Begin rendering one item's transfer
    pub fn begin_item(&mut self, label: &str) {
        self.current = Some(label.to_string());
        if self.mode == ProgressMode::Fancy {
            let bar = ProgressBar::new(BAR_SCALE);
            bar.set_style(
                ProgressStyle::with_template("{msg:32} [{bar:40.cyan/blue}] {percent:>3}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            bar.set_message(label.to_string());
            self.bar = Some(bar);
        }
    }

    /// Update the current item's transfer fraction
    pub fn update(&mut self, fraction: f64) {
        if let Some(bar) = &self.bar {
            let position = (fraction.clamp(0.0, 1.0) * BAR_SCALE as f64) as u64;
            bar.set_position(position);
        }
    }

    /// Finish the current item successfully
    pub fn finish_item(&mut self, bytes: u64) {
        let label = self.current.take().unwrap_or_default();
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        println!("{} ({} bytes)", label, bytes);
    }

    /// Finish the current item with a failure message
    pub fn fail_item(&mut self, reason: &str) {
        let label = self.current.take().unwrap_or_default();
        if let Some(bar) = self.bar.take() {
            // Clear the bar so the failure line below is the only trace.
            bar.finish_and_clear();
        }
        eprintln!("{}: {}", label, reason);
    }
}

impl BatchObserver for ProgressRenderer {
    fn item_started(&mut self, index: usize, total: usize, id: &str) {
        self.begin_item(&format!("[{}/{}] {}", index, total, id));
    }

    fn item_progress(&mut self, fraction: f64) {
        self.update(fraction);
    }

    fn item_retry(&mut self, id: &str, error: &AppError) {
        debug!("retrying {}: {}", id, error);
        if let Some(bar) = &self.bar {
            bar.set_position(0);
        } else {
            eprintln!("{}: connection lost, retrying", id);
        }
    }

    fn item_done(&mut self, _id: &str, bytes: u64) {
        self.finish_item(bytes);
    }

    fn item_failed(&mut self, _id: &str, error: &AppError) {
        self.fail_item(&error.to_string());
    }

    fn item_skipped(&mut self, id: &str) {
        debug!("skipped {}", id);
    }
}
