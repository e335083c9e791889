//! One-call timeline rendering.
//!
//! [`render`] runs the whole pipeline up to the assembled raster;
//! [`render_to_file`] also writes it out. [`render_source`] runs the same
//! sampling and assembly over any [`FrameSource`].
//!
//! # Example
//!
//! ```no_run
//! use chromashot::TimelineOptions;
//!
//! let summary = chromashot::render_to_file(
//!     "input.mp4",
//!     "timeline.ppm",
//!     &TimelineOptions::new(),
//! )?;
//! println!("{} stripes from {} frames", summary.stripes, summary.decoded_frames);
//! # Ok::<(), chromashot::ChromashotError>(())
//! ```

use std::path::Path;

use image::RgbImage;

use crate::configuration::TimelineOptions;
use crate::error::ChromashotError;
use crate::output::save_timeline_as;
use crate::sampling::{SamplePlan, sample_colors_with_options};
use crate::source::FrameSource;
use crate::timeline::ColorTimeline;
use crate::video::VideoSource;

/// Figures describing a completed render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    /// Output width, i.e. stripes actually sampled.
    pub stripes: u32,
    /// Output height.
    pub height: u32,
    /// Stripes the plan asked for.
    pub planned_stripes: u32,
    /// Estimated frame count the plan was built from.
    pub estimated_frames: u64,
    /// Frames pulled from the decoder.
    pub decoded_frames: u64,
}

/// A sampled timeline together with its rendered raster.
#[derive(Debug, Clone)]
pub struct RenderedTimeline {
    /// The sampled colors.
    pub timeline: ColorTimeline,
    /// The assembled raster.
    pub image: RgbImage,
    /// Estimated frame count the plan was built from.
    pub estimated_frames: u64,
}

impl RenderedTimeline {
    pub fn summary(&self) -> RenderSummary {
        RenderSummary {
            stripes: self.image.width(),
            height: self.image.height(),
            planned_stripes: self.timeline.planned_stripes() as u32,
            estimated_frames: self.estimated_frames,
            decoded_frames: self.timeline.decoded_frames(),
        }
    }

    /// Write the raster to `output` in the format `options` selects for it
    /// (PPM unless encoding by extension is enabled).
    ///
    /// # Errors
    ///
    /// Returns [`ChromashotError::OutputWrite`] if the file cannot be
    /// written.
    pub fn save<P: AsRef<Path>>(
        &self,
        output: P,
        options: &TimelineOptions,
    ) -> Result<RenderSummary, ChromashotError> {
        let output = output.as_ref();
        save_timeline_as(&self.image, output, options.output_format(output))?;

        let summary = self.summary();
        log::info!(
            "Wrote {}x{} timeline to {}",
            summary.stripes,
            summary.height,
            output.display()
        );
        Ok(summary)
    }
}

/// Sample `source` against a plan for `estimated_frames` and assemble the
/// timeline raster.
///
/// A stream that ends before the plan is exhausted gives a narrower raster;
/// one that yields no frames at all gives a zero-width raster. Both are
/// logged as warnings, not errors.
///
/// # Errors
///
/// Returns [`ChromashotError::InvalidOption`] if `options` fail validation,
/// and any error from decoding or assembling.
pub fn render_source<S: FrameSource + ?Sized>(
    source: &mut S,
    estimated_frames: u64,
    options: &TimelineOptions,
) -> Result<RenderedTimeline, ChromashotError> {
    options.validate()?;

    let plan = SamplePlan::new(estimated_frames, options.max_stripes);
    log::debug!(
        "Planned {} stripes over an estimated {estimated_frames} frames",
        plan.len()
    );

    let timeline = sample_colors_with_options(source, &plan, options)?;
    if timeline.is_empty() {
        log::warn!("No frames were decoded; the timeline is empty");
    } else if !timeline.is_complete() {
        log::warn!(
            "Frame count was overestimated: rendering {} of {} planned stripes",
            timeline.len(),
            timeline.planned_stripes()
        );
    }

    let image = timeline.to_image(options.output_height)?;
    Ok(RenderedTimeline {
        timeline,
        image,
        estimated_frames,
    })
}

/// Open `input`, sample it, and assemble the timeline raster.
///
/// # Errors
///
/// Any error from opening, estimating, decoding, or assembling.
pub fn render<P: AsRef<Path>>(
    input: P,
    options: &TimelineOptions,
) -> Result<RenderedTimeline, ChromashotError> {
    let mut source = VideoSource::open_with_options(input, options)?;
    let estimated_frames = source.metadata().estimated_frame_count()?;
    render_source(&mut source, estimated_frames, options)
}

/// Render `input` and save the timeline to `output`.
///
/// The raster is written as PPM whatever `output` is called, unless
/// [`TimelineOptions::with_encode_by_extension`] is set.
///
/// # Errors
///
/// Any error from [`render`] or [`RenderedTimeline::save`].
pub fn render_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &TimelineOptions,
) -> Result<RenderSummary, ChromashotError> {
    render(input, options)?.save(output, options)
}
