//! Error types for the `chromashot` crate.
//!
//! This module defines [`ChromashotError`], the unified error type returned by
//! all fallible operations in the crate, and [`FailureStage`], which sorts
//! every error into the pipeline stage that produced it so callers can tell
//! a bad source apart from a bad destination.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io::Error as IoError,
    path::PathBuf,
};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `chromashot` operations.
///
/// Every public method that can fail returns `Result<T, ChromashotError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChromashotError {
    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// No decoder is available for the video stream's codec.
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// The decoder for the video stream could not be opened.
    #[error("Failed to open codec: {0}")]
    CodecOpen(String),

    /// The total frame count cannot be estimated because the duration or
    /// frame rate is missing.
    #[error(
        "Cannot estimate frame count (duration {duration_seconds:.3}s, {frames_per_second:.3} fps)"
    )]
    FrameCountUnavailable {
        /// Duration in seconds as reported by the container (0 when unknown).
        duration_seconds: f64,
        /// Frame rate as reported by the stream (0 when unknown).
        frames_per_second: f64,
    },

    /// A video frame could not be decoded or converted.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// A pixel buffer does not match its declared geometry.
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// An output buffer could not be allocated.
    #[error("Failed to allocate {bytes} bytes for the output raster")]
    AllocationFailed {
        /// Requested size in bytes (`usize::MAX` when the size overflowed).
        bytes: usize,
    },

    /// The output file could not be written.
    #[error("Failed to write output file at {path}: {reason}")]
    OutputWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying reason the write failed.
        reason: String,
    },

    /// Fewer pixel bytes were written than the raster holds.
    #[error("Short write: expected {expected} pixel bytes, wrote {written}")]
    ShortWrite {
        /// `width * height * 3`.
        expected: usize,
        /// Bytes actually written.
        written: usize,
    },

    /// A configuration value is out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while writing.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding the output.
    #[error("Image encoding error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for ChromashotError {
    fn from(error: FfmpegError) -> Self {
        ChromashotError::FfmpegError(error.to_string())
    }
}

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// The source could not be opened or has no usable video stream.
    Input,
    /// The frame count could not be estimated from the source metadata.
    Estimation,
    /// Decoding or converting frames failed.
    Decode,
    /// An internal buffer could not be allocated.
    Resource,
    /// The destination could not be written.
    Output,
    /// The supplied options are invalid.
    Config,
}

impl Display for FailureStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            FailureStage::Input => "input",
            FailureStage::Estimation => "estimation",
            FailureStage::Decode => "decode",
            FailureStage::Resource => "resource",
            FailureStage::Output => "output",
            FailureStage::Config => "config",
        };
        f.write_str(name)
    }
}

impl ChromashotError {
    /// Classify this error by the stage that produced it.
    pub fn stage(&self) -> FailureStage {
        match self {
            ChromashotError::FileOpen { .. }
            | ChromashotError::NoVideoStream
            | ChromashotError::UnsupportedCodec(_)
            | ChromashotError::CodecOpen(_) => FailureStage::Input,
            ChromashotError::FrameCountUnavailable { .. } => FailureStage::Estimation,
            ChromashotError::VideoDecodeError(_)
            | ChromashotError::InvalidRaster(_)
            | ChromashotError::FfmpegError(_) => FailureStage::Decode,
            ChromashotError::AllocationFailed { .. } => FailureStage::Resource,
            ChromashotError::OutputWrite { .. }
            | ChromashotError::ShortWrite { .. }
            | ChromashotError::IoError(_)
            | ChromashotError::ImageError(_) => FailureStage::Output,
            ChromashotError::InvalidOption(_) => FailureStage::Config,
        }
    }
}
