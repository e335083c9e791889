//! Video stream metadata.
//!
//! [`VideoMetadata`] is read once when a [`VideoSource`](crate::VideoSource)
//! is opened and carries everything the sampler needs to size its plan
//! before the first frame is decoded.

use std::time::Duration;

use ffmpeg_next::Rational;

use crate::error::ChromashotError;
use crate::sampling::estimate_frame_count;

/// Metadata for the sampled video stream.
///
/// # Example
///
/// ```no_run
/// use chromashot::VideoSource;
///
/// let source = VideoSource::open("input.mp4")?;
/// let metadata = source.metadata();
/// println!(
///     "{}x{} @ {:.2} fps, {:?} [{}]",
///     metadata.width,
///     metadata.height,
///     metadata.frames_per_second,
///     metadata.duration,
///     metadata.codec,
/// );
/// # Ok::<(), chromashot::ChromashotError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frame rate, falling back to the stream's base rate. Zero when
    /// neither is declared.
    pub frames_per_second: f64,
    /// Stream duration, falling back to the container duration. Zero when
    /// neither is declared.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
    /// Index of the stream within the container.
    pub stream_index: usize,
}

impl VideoMetadata {
    /// Estimated total number of frames, `round(duration × fps)`.
    ///
    /// # Errors
    ///
    /// Returns [`ChromashotError::FrameCountUnavailable`] if the duration or
    /// frame rate is unknown.
    pub fn estimated_frame_count(&self) -> Result<u64, ChromashotError> {
        estimate_frame_count(self.duration.as_secs_f64(), self.frames_per_second)
    }
}

/// Convert a rational to `f64`, treating a zero numerator or denominator as
/// "not declared".
pub(crate) fn rational_to_f64(value: Rational) -> Option<f64> {
    if value.numerator() == 0 || value.denominator() == 0 {
        None
    } else {
        Some(f64::from(value.numerator()) / f64::from(value.denominator()))
    }
}

/// Stream duration in seconds from a PTS-style duration and its time base.
/// Returns `None` for unset (`AV_NOPTS_VALUE`) or non-positive durations.
pub(crate) fn stream_duration_seconds(duration: i64, time_base: Rational) -> Option<f64> {
    if duration <= 0 {
        return None;
    }
    rational_to_f64(time_base)
        .map(|seconds_per_tick| duration as f64 * seconds_per_tick)
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
}

/// Convert a duration in seconds to a [`Duration`].
///
/// # Errors
///
/// Returns [`ChromashotError::FrameCountUnavailable`] if the value is
/// negative, not finite, or too large to represent.
pub(crate) fn duration_from_seconds(
    duration_seconds: f64,
    frames_per_second: f64,
) -> Result<Duration, ChromashotError> {
    Duration::try_from_secs_f64(duration_seconds).map_err(|_| {
        ChromashotError::FrameCountUnavailable {
            duration_seconds,
            frames_per_second,
        }
    })
}
