//! Writing the rendered timeline to disk.
//!
//! The output is a binary PPM (`P6`) raster: a three-line ASCII header
//! followed by the raw RGB bytes, whatever the destination is called.
//! Callers that want a compressed image instead can opt into encoding by
//! extension (`.png`, `.jpg`, `.bmp`, ...) through the `image` crate with
//! [`save_timeline_as`] and [`OutputFormat::from_path`].
//!
//! # Example
//!
//! ```no_run
//! use chromashot::{Color, OutputFormat, assemble, save_timeline, save_timeline_as};
//!
//! let image = assemble(&[Color::new(12, 34, 56)], 1080)?;
//! save_timeline(&image, "timeline.raw")?;
//! save_timeline_as(&image, "timeline.png", OutputFormat::from_path("timeline.png"))?;
//! # Ok::<(), chromashot::ChromashotError>(())
//! ```

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use image::{ImageFormat, RgbImage};

use crate::error::ChromashotError;

/// How a timeline is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Binary PPM (`P6`, max value 255).
    Ppm,
    /// Any other format the `image` crate can encode.
    Image(ImageFormat),
}

impl OutputFormat {
    /// Pick an encoder from the path's extension.
    ///
    /// Extensions the `image` crate can write map to that format. Anything
    /// else, including `.ppm`, `.raw`, or no extension at all, is PPM.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
            .filter(|extension| !matches!(extension.as_str(), "ppm" | "pnm" | "pgm" | "pbm"))
            .and_then(ImageFormat::from_extension)
            .filter(|format| format.writing_enabled())
            .map_or(OutputFormat::Ppm, OutputFormat::Image)
    }
}

/// Write `image` as binary PPM.
///
/// The header is `"P6\n<width> <height>\n255\n"`, followed immediately by the
/// pixel bytes. Returns the number of pixel bytes written.
///
/// # Errors
///
/// Returns [`ChromashotError::ShortWrite`] if the buffer or the bytes written
/// do not amount to exactly `width * height * 3`, and
/// [`ChromashotError::IoError`] if the writer fails.
pub fn write_ppm<W: Write>(mut writer: W, image: &RgbImage) -> Result<usize, ChromashotError> {
    let (width, height) = image.dimensions();
    let expected = width as usize * height as usize * 3;
    let pixels = image.as_raw();
    if pixels.len() != expected {
        return Err(ChromashotError::ShortWrite {
            expected,
            written: 0,
        });
    }

    write!(writer, "P6\n{width} {height}\n255\n")?;
    let written = io::copy(&mut pixels.as_slice(), &mut writer)? as usize;
    writer.flush()?;

    if written != expected {
        return Err(ChromashotError::ShortWrite { expected, written });
    }
    Ok(written)
}

/// Save `image` to `path` as binary PPM.
///
/// # Errors
///
/// See [`save_timeline_as`].
pub fn save_timeline<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<(), ChromashotError> {
    save_timeline_as(image, path, OutputFormat::Ppm)
}

/// Save `image` to `path` in the given format.
///
/// A file left behind by a failed write is removed.
///
/// # Errors
///
/// Returns [`ChromashotError::OutputWrite`] if the file cannot be created
/// or written.
pub fn save_timeline_as<P: AsRef<Path>>(
    image: &RgbImage,
    path: P,
    format: OutputFormat,
) -> Result<(), ChromashotError> {
    let path = path.as_ref();
    log::debug!(
        "Writing {}x{} timeline to {} as {format:?}",
        image.width(),
        image.height(),
        path.display()
    );

    let output_error = |error: ChromashotError| ChromashotError::OutputWrite {
        path: path.to_path_buf(),
        reason: error.to_string(),
    };

    let file = File::create(path).map_err(|error| output_error(error.into()))?;

    let result = match format {
        OutputFormat::Ppm => write_ppm(BufWriter::new(file), image).map(|_| ()),
        OutputFormat::Image(image_format) => {
            let mut writer = BufWriter::new(file);
            image
                .write_to(&mut writer, image_format)
                .map_err(ChromashotError::from)
                .and_then(|()| writer.flush().map_err(ChromashotError::from))
        }
    };

    if let Err(error) = result {
        if let Err(cleanup) = fs::remove_file(path) {
            log::warn!("Failed to remove partial output {}: {cleanup}", path.display());
        }
        return Err(output_error(error));
    }

    Ok(())
}
