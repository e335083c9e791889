//! Frame selection and the sampling loop.
//!
//! Sampling works on decoded-frame ordinals rather than timestamps: before
//! decoding starts, [`SamplePlan`] spreads `min(E, K)` targets evenly over the
//! estimated frame count `E`, and [`sample_colors`] then decodes the stream
//! front to back, reducing only the frames whose ordinal matches the next
//! target.
//!
//! # Example
//!
//! ```
//! use chromashot::SamplePlan;
//!
//! let plan = SamplePlan::new(10, 4);
//! assert_eq!(plan.targets(), &[0, 3, 5, 8]);
//! ```

use crate::color::{Color, rms_color};
use crate::configuration::TimelineOptions;
use crate::error::ChromashotError;
use crate::progress::ProgressTracker;
use crate::source::FrameSource;
use crate::timeline::ColorTimeline;

/// Estimate the number of frames in a stream from its duration and frame
/// rate, rounding half up.
///
/// # Errors
///
/// Returns [`ChromashotError::FrameCountUnavailable`] when either value is
/// missing (zero, negative, or not finite) or the estimate rounds to zero
/// frames. Sampling an unbounded stream is never attempted.
///
/// # Example
///
/// ```
/// use chromashot::estimate_frame_count;
///
/// assert_eq!(estimate_frame_count(10.0, 29.97)?, 300);
/// assert!(estimate_frame_count(10.0, 0.0).is_err());
/// # Ok::<(), chromashot::ChromashotError>(())
/// ```
pub fn estimate_frame_count(
    duration_seconds: f64,
    frames_per_second: f64,
) -> Result<u64, ChromashotError> {
    let unavailable = || ChromashotError::FrameCountUnavailable {
        duration_seconds,
        frames_per_second,
    };

    if !duration_seconds.is_finite()
        || !frames_per_second.is_finite()
        || duration_seconds <= 0.0
        || frames_per_second <= 0.0
    {
        return Err(unavailable());
    }

    let estimate = (duration_seconds * frames_per_second + 0.5).floor();
    if estimate < 1.0 {
        return Err(unavailable());
    }
    Ok(estimate as u64)
}

/// The ordered frame ordinals to sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    targets: Vec<u64>,
    estimated_frames: u64,
    max_stripes: u32,
}

impl SamplePlan {
    /// Spread `min(estimated_frames, max_stripes)` targets evenly over
    /// `[0, estimated_frames)`.
    ///
    /// Target `i` is `round_half_up(i * estimated_frames / keep)`. The first
    /// target is always 0 and targets never decrease. Either argument being
    /// zero produces an empty plan.
    pub fn new(estimated_frames: u64, max_stripes: u32) -> Self {
        let keep = estimated_frames.min(u64::from(max_stripes));
        let step = if keep == 0 {
            0.0
        } else {
            estimated_frames as f64 / keep as f64
        };

        let targets = (0..keep)
            .map(|index| (index as f64 * step + 0.5).floor() as u64)
            .collect();

        Self {
            targets,
            estimated_frames,
            max_stripes,
        }
    }

    /// Build a plan from explicit target ordinals.
    ///
    /// Repeated ordinals are kept: the frame is reduced once and its color
    /// fills one stripe per repetition. The estimated frame count is taken
    /// to be one past the last target.
    ///
    /// # Errors
    ///
    /// Returns [`ChromashotError::InvalidOption`] if the targets decrease
    /// anywhere, or there are more than `u32::MAX` of them.
    ///
    /// # Example
    ///
    /// ```
    /// use chromashot::SamplePlan;
    ///
    /// let plan = SamplePlan::from_targets(vec![0, 4, 4, 9])?;
    /// assert_eq!(plan.len(), 4);
    /// assert_eq!(plan.estimated_frames(), 10);
    /// assert!(SamplePlan::from_targets(vec![3, 1]).is_err());
    /// # Ok::<(), chromashot::ChromashotError>(())
    /// ```
    pub fn from_targets(targets: Vec<u64>) -> Result<Self, ChromashotError> {
        if let Some(pair) = targets.windows(2).find(|pair| pair[1] < pair[0]) {
            return Err(ChromashotError::InvalidOption(format!(
                "sample targets must not decrease ({} follows {})",
                pair[1], pair[0]
            )));
        }
        let max_stripes = u32::try_from(targets.len()).map_err(|_| {
            ChromashotError::InvalidOption(format!("{} sample targets exceed u32::MAX", targets.len()))
        })?;
        let estimated_frames = targets.last().map_or(0, |&last| last.saturating_add(1));

        Ok(Self {
            targets,
            estimated_frames,
            max_stripes,
        })
    }

    /// Target ordinals, non-decreasing.
    pub fn targets(&self) -> &[u64] {
        &self.targets
    }

    /// Number of stripes the plan asks for.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The frame-count estimate the plan was built from.
    pub fn estimated_frames(&self) -> u64 {
        self.estimated_frames
    }

    /// The stripe budget the plan was built from.
    pub fn max_stripes(&self) -> u32 {
        self.max_stripes
    }
}

/// Decode `source` front to back and reduce every planned frame to a color.
///
/// Equivalent to [`sample_colors_with_options`] with default options.
///
/// # Errors
///
/// Returns the first error from the source or from thumbnail conversion.
pub fn sample_colors<S: FrameSource + ?Sized>(
    source: &mut S,
    plan: &SamplePlan,
) -> Result<ColorTimeline, ChromashotError> {
    sample_colors_with_options(source, plan, &TimelineOptions::default())
}

/// Decode `source` front to back and reduce every planned frame to a color,
/// reporting progress through `options`.
///
/// Pulling stops as soon as every target is consumed; the rest of the stream
/// is never decoded. If the stream ends first the returned timeline is
/// shorter than the plan. When consecutive targets share an ordinal, the
/// frame is converted once and its color stored once per target.
///
/// # Errors
///
/// Returns the first error from the source or from thumbnail conversion.
pub fn sample_colors_with_options<S: FrameSource + ?Sized>(
    source: &mut S,
    plan: &SamplePlan,
    options: &TimelineOptions,
) -> Result<ColorTimeline, ChromashotError> {
    let targets = plan.targets();
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        Some(targets.len() as u64),
        options.batch_size,
    );

    let mut colors: Vec<Color> = Vec::with_capacity(targets.len());
    let mut cursor = 0;
    let mut ordinal: u64 = 0;

    while cursor < targets.len() {
        if !source.next_frame()? {
            log::warn!(
                "Stream ended after {ordinal} frames; sampled {} of {} stripes",
                colors.len(),
                targets.len()
            );
            break;
        }

        if targets[cursor] == ordinal {
            let color = rms_color(&source.thumbnail()?);
            while cursor < targets.len() && targets[cursor] == ordinal {
                colors.push(color);
                tracker.advance(ordinal);
                cursor += 1;
            }
        }

        ordinal += 1;
    }

    tracker.finish();
    log::debug!(
        "Sampled {} stripes from {ordinal} decoded frames",
        colors.len()
    );

    Ok(ColorTimeline::new(colors, ordinal, targets.len()))
}
