//! The decoder seam.
//!
//! [`FrameSource`] is the pull-based interface the sampling loop drives.
//! [`VideoSource`](crate::VideoSource) implements it on top of FFmpeg; tests
//! and other callers can implement it over synthetic or pre-decoded frames.

use crate::color::RgbRaster;
use crate::error::ChromashotError;

/// A stream of decoded frames that can be converted to RGB thumbnails on
/// demand.
///
/// Decoding and conversion are split so that the sampling loop only pays for
/// conversion on the frames it keeps.
pub trait FrameSource {
    /// Decode the next frame, making it the current frame.
    ///
    /// Returns `Ok(false)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<bool, ChromashotError>;

    /// Convert the current frame to an RGB thumbnail.
    ///
    /// Only valid after [`next_frame`](FrameSource::next_frame) returned
    /// `Ok(true)`.
    fn thumbnail(&mut self) -> Result<RgbRaster<'_>, ChromashotError>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn next_frame(&mut self) -> Result<bool, ChromashotError> {
        (**self).next_frame()
    }

    fn thumbnail(&mut self) -> Result<RgbRaster<'_>, ChromashotError> {
        (**self).thumbnail()
    }
}
