//! Download progress reporting

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

const BAR_TEMPLATE: &str = "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// Receives progress events from the downloader
pub trait ProgressObserver: Send + Sync {
    /// A download of `name` started; `total` is the transport-reported length
    fn start(&self, name: &str, total: Option<u64>);

    /// Cumulative bytes written so far
    fn advance(&self, bytes_written: u64);

    /// The download finished successfully
    fn finish(&self, name: &str);
}

/// Observer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn start(&self, _name: &str, _total: Option<u64>) {}
    fn advance(&self, _bytes_written: u64) {}
    fn finish(&self, _name: &str) {}
}

/// Terminal progress bar
#[derive(Default)]
pub struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    /// Create a progress bar observer; the bar is drawn on `start`
    pub fn new() -> Self {
        Self::default()
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

impl ProgressObserver for BarProgress {
    fn start(&self, name: &str, total: Option<u64>) {
        let pb = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(Self::style());
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        pb.set_message(format!("Downloading {}", name));

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(pb);
        }
    }

    fn advance(&self, bytes_written: u64) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.set_position(bytes_written);
            }
        }
    }

    fn finish(&self, name: &str) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_with_message(format!("Downloaded {}", name));
            }
        }
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        // A bar left behind by a failed download is cleared rather than frozen
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}
