//! Timeline assembly.
//!
//! The sampled colors become a raster with one column per color, each
//! column filled top to bottom with its color.

use image::RgbImage;

use crate::color::Color;
use crate::error::ChromashotError;

/// The ordered colors sampled from a video.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ColorTimeline {
    colors: Vec<Color>,
    decoded_frames: u64,
    planned_stripes: usize,
}

impl ColorTimeline {
    pub(crate) fn new(colors: Vec<Color>, decoded_frames: u64, planned_stripes: usize) -> Self {
        Self {
            colors,
            decoded_frames,
            planned_stripes,
        }
    }

    /// Colors in output order; index `x` becomes column `x`.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn into_colors(self) -> Vec<Color> {
        self.colors
    }

    /// Number of stripes actually sampled.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Frames pulled from the decoder while sampling.
    pub fn decoded_frames(&self) -> u64 {
        self.decoded_frames
    }

    /// Stripes the sample plan asked for.
    pub fn planned_stripes(&self) -> usize {
        self.planned_stripes
    }

    /// `true` if the stream yielded every planned stripe.
    pub fn is_complete(&self) -> bool {
        self.colors.len() == self.planned_stripes
    }

    /// Render the timeline at the given height. See [`assemble`].
    pub fn to_image(&self, height: u32) -> Result<RgbImage, ChromashotError> {
        assemble(&self.colors, height)
    }
}

/// Lay out `colors` as a `colors.len() × height` raster where every pixel of
/// column `x` is `colors[x]`.
///
/// The buffer is exactly `width * height * 3` bytes, row-major with no
/// padding.
///
/// # Errors
///
/// Returns [`ChromashotError::AllocationFailed`] if the size overflows or
/// the buffer cannot be allocated.
///
/// # Example
///
/// ```
/// use chromashot::{Color, assemble};
///
/// let colors = [Color::new(255, 0, 0), Color::new(0, 0, 255)];
/// let image = assemble(&colors, 4)?;
/// assert_eq!(image.dimensions(), (2, 4));
/// assert_eq!(image.get_pixel(1, 3).0, [0, 0, 255]);
/// # Ok::<(), chromashot::ChromashotError>(())
/// ```
pub fn assemble(colors: &[Color], height: u32) -> Result<RgbImage, ChromashotError> {
    let width = u32::try_from(colors.len())
        .map_err(|_| ChromashotError::AllocationFailed { bytes: usize::MAX })?;

    let row: Vec<u8> = colors.iter().flat_map(|color| color.to_array()).collect();
    let bytes = row
        .len()
        .checked_mul(height as usize)
        .ok_or(ChromashotError::AllocationFailed { bytes: usize::MAX })?;

    let mut buffer: Vec<u8> = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|_| ChromashotError::AllocationFailed { bytes })?;
    for _ in 0..height {
        buffer.extend_from_slice(&row);
    }

    RgbImage::from_raw(width, height, buffer).ok_or(ChromashotError::AllocationFailed { bytes })
}
