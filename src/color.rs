//! Per-frame color reduction.
//!
//! A sampled frame is scaled down to a small RGB24 thumbnail and then
//! collapsed into one [`Color`] by taking the root-mean-square of each channel.
//! RMS weights bright and saturated pixels more heavily than a flat average,
//! so a frame that is half white and half black reduces to 180 rather than
//! 127.
//!
//! # Example
//!
//! ```
//! use chromashot::{Color, RgbRaster, rms_color};
//!
//! // One white pixel and one black pixel, no row padding.
//! let pixels = [255, 255, 255, 0, 0, 0];
//! let raster = RgbRaster::new(&pixels, 2, 1, 6)?;
//! assert_eq!(rms_color(&raster), Color::new(180, 180, 180));
//! # Ok::<(), chromashot::ChromashotError>(())
//! ```

use image::{Rgb, RgbImage};

use crate::error::ChromashotError;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Color {
    /// Pure black.
    pub const BLACK: Color = Color::new(0, 0, 0);

    /// Create a color from its three channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// The channels as an `[r, g, b]` array.
    pub const fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb(color.to_array())
    }
}

impl From<Rgb<u8>> for Color {
    fn from(pixel: Rgb<u8>) -> Self {
        let [red, green, blue] = pixel.0;
        Color::new(red, green, blue)
    }
}

/// A borrowed view of interleaved RGB24 pixel data.
///
/// Rows start `stride` bytes apart; any bytes between `width * 3` and
/// `stride` are padding and never read. FFmpeg frames commonly carry such
/// padding, so the decoder hands its scaled frame to the reducer through this
/// view without copying.
#[derive(Debug, Clone, Copy)]
pub struct RgbRaster<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> RgbRaster<'a> {
    /// Wrap `data` as a `width × height` raster whose rows are `stride`
    /// bytes apart.
    ///
    /// # Errors
    ///
    /// Returns [`ChromashotError::InvalidRaster`] if `stride` is narrower
    /// than one row of pixels or `data` is too short to hold every row.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, ChromashotError> {
        let row_bytes = width as usize * 3;
        if stride < row_bytes {
            return Err(ChromashotError::InvalidRaster(format!(
                "stride {stride} is smaller than a {width}-pixel row ({row_bytes} bytes)"
            )));
        }

        let required = match height as usize {
            0 => 0,
            rows => (rows - 1) * stride + row_bytes,
        };
        if data.len() < required {
            return Err(ChromashotError::InvalidRaster(format!(
                "{width}x{height} raster with stride {stride} needs {required} bytes, got {}",
                data.len()
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// View a tightly packed [`RgbImage`].
    pub fn from_image(image: &'a RgbImage) -> Self {
        Self {
            data: image.as_raw(),
            width: image.width(),
            height: image.height(),
            stride: image.width() as usize * 3,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Iterate over rows, each trimmed to `width * 3` bytes.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + use<'a> {
        let data = self.data;
        let stride = self.stride;
        let row_bytes = self.width as usize * 3;
        (0..self.height as usize).map(move |row| {
            let start = row * stride;
            &data[start..start + row_bytes]
        })
    }
}

/// Reduce a raster to its per-channel root-mean-square color.
///
/// Squares are summed in `u64`, divided by the pixel count with integer
/// division, and the floor square root is taken. A raster with no pixels
/// reduces to black.
pub fn rms_color(raster: &RgbRaster<'_>) -> Color {
    let pixel_count = raster.width() as u64 * raster.height() as u64;
    if pixel_count == 0 {
        return Color::BLACK;
    }

    let mut sums = [0u64; 3];
    for row in raster.rows() {
        for pixel in row.chunks_exact(3) {
            for (sum, &value) in sums.iter_mut().zip(pixel) {
                *sum += u64::from(value) * u64::from(value);
            }
        }
    }

    let [red, green, blue] = sums.map(|sum| (sum / pixel_count).isqrt() as u8);
    Color::new(red, green, blue)
}

/// Reduce an [`RgbImage`] to its RMS color.
pub fn rms_color_of_image(image: &RgbImage) -> Color {
    rms_color(&RgbRaster::from_image(image))
}
