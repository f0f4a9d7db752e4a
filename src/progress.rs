use indicatif::{ProgressBar, ProgressStyle};
use log::info;

/// Receives processing status from the partitioner.
///
/// `record` is called once per record written with the running count,
/// `done` once after the last target is finished.
pub trait ProgressReporter {
    fn record(&mut self, processed: u64);
    fn done(&mut self, processed: u64);
}

/// Ignores all status.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn record(&mut self, _processed: u64) {}
    fn done(&mut self, _processed: u64) {}
}

pub const DEFAULT_REPORT_INTERVAL: u64 = 10_000;

/// Logs a status line every `interval` records.
#[derive(Debug, Clone)]
pub struct LogProgress {
    total: u64,
    interval: u64,
}

impl LogProgress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    fn due(&self, processed: u64) -> bool {
        processed % self.interval == 0
    }
}

impl ProgressReporter for LogProgress {
    fn record(&mut self, processed: u64) {
        if self.due(processed) {
            info!("Processing record {}/{}", processed, self.total);
        }
    }

    fn done(&mut self, processed: u64) {
        info!("Done processing {} records", processed);
    }
}

/// Terminal progress bar sized to the analyzed record count.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        ) {
            bar.set_style(style);
        }
        Self { bar }
    }

    pub fn from_bar(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl ProgressReporter for BarProgress {
    fn record(&mut self, processed: u64) {
        self.bar.set_position(processed);
    }

    fn done(&mut self, processed: u64) {
        self.bar.set_position(processed);
        self.bar.finish_with_message("done");
    }
}
