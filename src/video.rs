//! FFmpeg-backed frame source.
//!
//! [`VideoSource`] opens a media file, selects the first video stream in
//! declaration order, and decodes it one frame at a time. Decoded frames are
//! only scaled to an RGB24 thumbnail when the sampler asks for one, so frames
//! that fall between sample targets cost a decode and nothing more.
//!
//! All FFmpeg state (demuxer, decoder, scaler, frame buffers) lives inside
//! the `VideoSource` and is released when it is dropped.
//!
//! # Example
//!
//! ```no_run
//! use chromashot::{FrameSource, VideoSource, rms_color};
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! if source.next_frame()? {
//!     let first = rms_color(&source.thumbnail()?);
//!     println!("first frame: {first:?}");
//! }
//! # Ok::<(), chromashot::ChromashotError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::{self, context::Context as CodecContext, threading},
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    util::error::EAGAIN,
};
use ffmpeg_sys_next::AVDiscard;

use crate::color::RgbRaster;
use crate::configuration::TimelineOptions;
use crate::error::ChromashotError;
use crate::metadata::{
    VideoMetadata, duration_from_seconds, rational_to_f64, stream_duration_seconds,
};
use crate::source::FrameSource;

/// A decoded video stream that yields RGB thumbnails on demand.
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    metadata: VideoMetadata,
    thumbnail_width: u32,
    thumbnail_height: u32,
    decoded_frame: VideoFrame,
    scaled_frame: VideoFrame,
    eof_sent: bool,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("metadata", &self.metadata)
            .field("thumbnail_width", &self.thumbnail_width)
            .field("thumbnail_height", &self.thumbnail_height)
            .field("eof_sent", &self.eof_sent)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a media file with default options.
    ///
    /// # Errors
    ///
    /// See [`open_with_options`](VideoSource::open_with_options).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ChromashotError> {
        Self::open_with_options(path, &TimelineOptions::default())
    }

    /// Open a media file, prepare a decoder for its first video stream, and
    /// a scaler producing thumbnails `options.thumbnail_width()` pixels wide.
    ///
    /// # Errors
    ///
    /// - [`ChromashotError::InvalidOption`] if `options` fail validation.
    /// - [`ChromashotError::FileOpen`] if the file cannot be opened or probed.
    /// - [`ChromashotError::NoVideoStream`] if it has no video stream.
    /// - [`ChromashotError::UnsupportedCodec`] if no decoder exists for the
    ///   stream's codec.
    /// - [`ChromashotError::CodecOpen`] if the decoder cannot be opened.
    /// - [`ChromashotError::FrameCountUnavailable`] if the declared duration
    ///   cannot be represented.
    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: &TimelineOptions,
    ) -> Result<Self, ChromashotError> {
        options.validate()?;

        let path = path.as_ref();
        log::debug!("Opening media file: {}", path.display());

        ffmpeg_next::init().map_err(|error| ChromashotError::FileOpen {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ChromashotError::FileOpen {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .find(|stream| stream.parameters().medium() == Type::Video)
            .ok_or(ChromashotError::NoVideoStream)?;
        let stream_index = stream.index();

        let codec_parameters = stream.parameters();
        let codec_id = codec_parameters.id();
        if codec::decoder::find(codec_id).is_none() {
            return Err(ChromashotError::UnsupportedCodec(format!("{codec_id:?}")));
        }

        let mut decoder_context = CodecContext::from_parameters(codec_parameters)
            .map_err(|error| ChromashotError::CodecOpen(error.to_string()))?;
        decoder_context.set_threading(threading::Config::kind(threading::Type::Frame));
        if options.fast_decode {
            // SAFETY: the context is exclusively owned and not yet opened.
            unsafe {
                let raw = decoder_context.as_mut_ptr();
                (*raw).skip_loop_filter = AVDiscard::AVDISCARD_ALL;
                (*raw).skip_idct = AVDiscard::AVDISCARD_ALL;
            }
        }
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| ChromashotError::CodecOpen(error.to_string()))?;

        let frames_per_second = rational_to_f64(stream.avg_frame_rate())
            .or_else(|| rational_to_f64(stream.rate()))
            .unwrap_or(0.0);

        let container_seconds = match input_context.duration() {
            micros if micros > 0 => Some(micros as f64 / 1_000_000.0),
            _ => None,
        };
        let duration_seconds = stream_duration_seconds(stream.duration(), stream.time_base())
            .or(container_seconds)
            .unwrap_or(0.0);

        let codec_name = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            duration: duration_from_seconds(duration_seconds, frames_per_second)?,
            codec: codec_name,
            format: input_context.format().name().to_string(),
            stream_index,
        };

        let (thumbnail_width, thumbnail_height) =
            options.thumbnail_dimensions(metadata.width, metadata.height);

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            thumbnail_width,
            thumbnail_height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| ChromashotError::CodecOpen(format!("scaler setup failed: {error}")))?;

        log::debug!(
            "Video stream {stream_index}: {}x{} {} @ {:.3} fps, {:.3}s, thumbnails {}x{}",
            metadata.width,
            metadata.height,
            metadata.codec,
            metadata.frames_per_second,
            duration_seconds,
            thumbnail_width,
            thumbnail_height,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            metadata,
            thumbnail_width,
            thumbnail_height,
            decoded_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
            eof_sent: false,
        })
    }

    /// Metadata of the selected video stream.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Thumbnail size as `(width, height)`.
    pub fn thumbnail_dimensions(&self) -> (u32, u32) {
        (self.thumbnail_width, self.thumbnail_height)
    }
}

/// What the decode loop does after a demuxer read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadOutcome {
    Packet,
    Retry,
    EndOfStream,
}

/// Only `EAGAIN` is retried. Any other read failure ends the stream, so a
/// sticky I/O or demuxer error cannot stall the loop.
fn classify_read(result: Result<(), FfmpegError>) -> ReadOutcome {
    match result {
        Ok(()) => ReadOutcome::Packet,
        Err(FfmpegError::Other { errno }) if errno == EAGAIN => ReadOutcome::Retry,
        Err(FfmpegError::Eof) => ReadOutcome::EndOfStream,
        Err(error) => {
            log::warn!("Treating packet read error as end of stream: {error}");
            ReadOutcome::EndOfStream
        }
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<bool, ChromashotError> {
        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return Ok(true);
            }

            if self.eof_sent {
                return Ok(false);
            }

            let mut packet = Packet::empty();
            match classify_read(packet.read(&mut self.input_context)) {
                ReadOutcome::Packet => {
                    if packet.stream() != self.metadata.stream_index {
                        continue;
                    }
                    if let Err(error) = self.decoder.send_packet(&packet) {
                        log::warn!("Skipping undecodable packet: {error}");
                    }
                }
                ReadOutcome::Retry => {}
                ReadOutcome::EndOfStream => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
            }
        }
    }

    fn thumbnail(&mut self) -> Result<RgbRaster<'_>, ChromashotError> {
        self.scaler
            .run(&self.decoded_frame, &mut self.scaled_frame)
            .map_err(|error| {
                ChromashotError::VideoDecodeError(format!("thumbnail conversion failed: {error}"))
            })?;

        RgbRaster::new(
            self.scaled_frame.data(0),
            self.thumbnail_width,
            self.thumbnail_height,
            self.scaled_frame.stride(0),
        )
    }
}
