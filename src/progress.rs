//! Progress reporting for timeline sampling.
//!
//! Decoding a feature-length video to find 1920 evenly spaced frames takes a
//! while. Attach a [`ProgressCallback`] through
//! [`TimelineOptions::with_progress`](crate::TimelineOptions::with_progress)
//! to observe how many stripes have been sampled so far.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chromashot::{ProgressCallback, ProgressInfo, TimelineOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("{pct:.1}% of stripes sampled");
//!         }
//!     }
//! }
//!
//! let options = TimelineOptions::new().with_progress(Arc::new(PrintProgress));
//! chromashot::render_to_file("input.mp4", "timeline.ppm", &options)?;
//! # Ok::<(), chromashot::ChromashotError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of sampling progress.
///
/// Delivered to [`ProgressCallback::on_progress`] every
/// [`batch_size`](crate::TimelineOptions::with_batch_size) stripes, and once
/// more when sampling finishes.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Stripes sampled so far.
    pub current: u64,
    /// Stripes planned, if known.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since sampling started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Ordinal of the decoded frame that produced the latest stripe.
    pub current_frame: Option<u64>,
}

/// Trait for receiving progress updates while sampling.
///
/// Callbacks are infallible: they observe but cannot halt sampling.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals during sampling.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards every notification. Used when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks timing and emits callbacks in batches.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
        }
    }

    /// Record one sampled stripe and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn advance(&mut self, frame_number: u64) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size {
            self.report(Some(frame_number));
            self.items_since_last_report = 0;
        }
    }

    /// Unconditionally emit a final report.
    pub(crate) fn finish(&mut self) {
        self.report(None);
    }

    fn report(&self, frame_number: Option<u64>) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&t| t > 0)
            .map(|t| (self.current as f32 / t as f32) * 100.0);

        let estimated_remaining = if self.current > 0 {
            self.total.map(|t| {
                let remaining = t.saturating_sub(self.current);
                elapsed.mul_f64(remaining as f64 / self.current as f64)
            })
        } else {
            None
        };

        let info = ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame_number,
        };

        self.callback.on_progress(&info);
    }
}
