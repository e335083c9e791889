//! # chromashot
//!
//! Render a video's color evolution as a single timeline barcode image.
//!
//! `chromashot` decodes a video with FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate), samples up
//! to 1920 frames spread evenly across its estimated length, reduces each
//! sampled frame to its root-mean-square color, and lays those colors out as
//! vertical stripes of a fixed-height image.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chromashot::TimelineOptions;
//!
//! chromashot::render_to_file("input.mp4", "timeline.ppm", &TimelineOptions::new())?;
//! # Ok::<(), chromashot::ChromashotError>(())
//! ```
//!
//! ## Pipeline
//!
//! - [`VideoSource`] opens the file and decodes its first video stream,
//!   scaling only the frames that are sampled down to a thumbnail.
//! - [`SamplePlan`] picks `min(E, K)` evenly spaced decoded-frame ordinals
//!   from the estimated frame count `E` and the stripe budget `K`.
//! - [`sample_colors`] drives any [`FrameSource`] through the plan and
//!   reduces each hit with [`rms_color`].
//! - [`assemble`] turns the colors into an [`image::RgbImage`], one column
//!   per color.
//! - [`save_timeline`] writes the raster as binary PPM. With
//!   [`TimelineOptions::with_encode_by_extension`], [`save_timeline_as`]
//!   encodes it through the `image` crate instead (PNG, JPEG, ...).
//!
//! The sampling and reduction stages only depend on the [`FrameSource`]
//! trait, so they can be driven by synthetic frames without FFmpeg.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod color;
pub mod configuration;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod output;
pub mod progress;
pub mod render;
pub mod sampling;
pub mod source;
pub mod timeline;
pub mod video;

pub use color::{Color, RgbRaster, rms_color, rms_color_of_image};
pub use configuration::{
    DEFAULT_MAX_STRIPES, DEFAULT_OUTPUT_HEIGHT, DEFAULT_THUMBNAIL_WIDTH, TimelineOptions,
};
pub use error::{ChromashotError, FailureStage};
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use metadata::VideoMetadata;
pub use output::{OutputFormat, save_timeline, save_timeline_as, write_ppm};
pub use progress::{ProgressCallback, ProgressInfo};
pub use render::{RenderSummary, RenderedTimeline, render, render_source, render_to_file};
pub use sampling::{SamplePlan, estimate_frame_count, sample_colors, sample_colors_with_options};
pub use source::FrameSource;
pub use timeline::{ColorTimeline, assemble};
pub use video::VideoSource;
