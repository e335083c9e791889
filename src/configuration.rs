//! Timeline rendering configuration.
//!
//! [`TimelineOptions`] is a builder that threads the rendering constants,
//! decoder tuning, and progress reporting through the pipeline without
//! polluting every function signature. A default-constructed value
//! reproduces the classic 1920 × 1080 barcode sampled from 160-pixel-wide
//! thumbnails.
//!
//! # Example
//!
//! ```
//! use chromashot::TimelineOptions;
//!
//! let options = TimelineOptions::new()
//!     .with_output_height(720)
//!     .with_max_stripes(1280)
//!     .with_batch_size(64);
//! assert_eq!(options.output_height(), 720);
//! assert_eq!(options.max_stripes(), 1280);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;
use std::sync::Arc;

use crate::error::ChromashotError;
use crate::output::OutputFormat;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Width sampled frames are scaled to before reduction.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 160;

/// Height of the rendered timeline.
pub const DEFAULT_OUTPUT_HEIGHT: u32 = 1080;

/// Upper bound on the number of stripes (and therefore the output width).
pub const DEFAULT_MAX_STRIPES: u32 = 1920;

/// Configuration for timeline rendering.
#[derive(Clone)]
pub struct TimelineOptions {
    pub(crate) thumbnail_width: u32,
    pub(crate) output_height: u32,
    pub(crate) max_stripes: u32,
    /// Skip the loop filter and IDCT in the decoder.
    pub(crate) fast_decode: bool,
    /// Encode by file extension instead of always writing PPM.
    pub(crate) encode_by_extension: bool,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often to fire the progress callback (every N stripes).
    pub(crate) batch_size: u64,
}

impl Debug for TimelineOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TimelineOptions")
            .field("thumbnail_width", &self.thumbnail_width)
            .field("output_height", &self.output_height)
            .field("max_stripes", &self.max_stripes)
            .field("fast_decode", &self.fast_decode)
            .field("encode_by_extension", &self.encode_by_extension)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineOptions {
    /// Create options with the default constants, fast decoding, raw PPM
    /// output, no progress callback and a batch size of 1.
    pub fn new() -> Self {
        Self {
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            output_height: DEFAULT_OUTPUT_HEIGHT,
            max_stripes: DEFAULT_MAX_STRIPES,
            fast_decode: true,
            encode_by_extension: false,
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Set the width sampled frames are scaled to. The thumbnail height
    /// follows the source aspect ratio.
    #[must_use]
    pub fn with_thumbnail_width(mut self, width: u32) -> Self {
        self.thumbnail_width = width;
        self
    }

    /// Set the height of the rendered timeline.
    #[must_use]
    pub fn with_output_height(mut self, height: u32) -> Self {
        self.output_height = height;
        self
    }

    /// Set the maximum number of stripes. Videos with fewer estimated
    /// frames produce a correspondingly narrower image.
    #[must_use]
    pub fn with_max_stripes(mut self, stripes: u32) -> Self {
        self.max_stripes = stripes;
        self
    }

    /// Trade decode accuracy for speed by telling the codec to skip the
    /// loop filter and inverse DCT. On by default.
    ///
    /// Stripe colors are computed from the unfiltered frame, so they can
    /// differ slightly from a fully decoded one. Pass `false` for exact
    /// colors.
    #[must_use]
    pub fn with_fast_decode(mut self, fast: bool) -> Self {
        self.fast_decode = fast;
        self
    }

    /// Choose the output encoding from the destination's file extension
    /// (`.png`, `.jpg`, ...) instead of always writing a binary PPM raster.
    ///
    /// Extensions the `image` crate cannot write still produce PPM.
    #[must_use]
    pub fn with_encode_by_extension(mut self, enabled: bool) -> Self {
        self.encode_by_extension = enabled;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn thumbnail_width(&self) -> u32 {
        self.thumbnail_width
    }

    pub fn output_height(&self) -> u32 {
        self.output_height
    }

    pub fn max_stripes(&self) -> u32 {
        self.max_stripes
    }

    pub fn fast_decode(&self) -> bool {
        self.fast_decode
    }

    pub fn encode_by_extension(&self) -> bool {
        self.encode_by_extension
    }

    /// The format a timeline saved to `path` is written in.
    pub fn output_format<P: AsRef<Path>>(&self, path: P) -> OutputFormat {
        if self.encode_by_extension {
            OutputFormat::from_path(path)
        } else {
            OutputFormat::Ppm
        }
    }

    /// Reject values that cannot produce an image.
    ///
    /// # Errors
    ///
    /// Returns [`ChromashotError::InvalidOption`] if the thumbnail width,
    /// output height, or stripe budget is zero.
    pub fn validate(&self) -> Result<(), ChromashotError> {
        if self.thumbnail_width == 0 {
            return Err(ChromashotError::InvalidOption(
                "thumbnail width must be greater than zero".to_string(),
            ));
        }
        if self.output_height == 0 {
            return Err(ChromashotError::InvalidOption(
                "output height must be greater than zero".to_string(),
            ));
        }
        if self.max_stripes == 0 {
            return Err(ChromashotError::InvalidOption(
                "stripe budget must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the thumbnail size for a source of the given dimensions,
    /// preserving its aspect ratio.
    ///
    /// The height is `source_height * width / source_width` in integer
    /// arithmetic (truncated), and never less than 1.
    ///
    /// ```
    /// use chromashot::TimelineOptions;
    ///
    /// let options = TimelineOptions::new();
    /// assert_eq!(options.thumbnail_dimensions(1920, 1080), (160, 90));
    /// assert_eq!(options.thumbnail_dimensions(640, 362), (160, 90));
    /// ```
    pub fn thumbnail_dimensions(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        let width = self.thumbnail_width;
        if source_width == 0 {
            return (width, source_height.max(1));
        }
        let height = u64::from(source_height) * u64::from(width) / u64::from(source_width);
        (width, u32::try_from(height).unwrap_or(u32::MAX).max(1))
    }
}
