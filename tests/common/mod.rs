//! Shared helpers for integration tests.
//!
//! [`SyntheticSource`] stands in for the FFmpeg decoder: it yields a fixed
//! list of solid-colored frames and counts how many were decoded and how many
//! were converted to thumbnails.

#![allow(dead_code)]

use chromashot::{ChromashotError, FrameSource, RgbRaster};

pub const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";
pub const SAMPLE_AUDIO_ONLY: &str = "tests/fixtures/sample_audio_only.mp4";

pub struct SyntheticSource {
    frames: Vec<Vec<u8>>,
    width: u32,
    height: u32,
    stride: usize,
    current: Option<usize>,
    pub decoded: usize,
    pub converted: usize,
}

impl SyntheticSource {
    /// One solid `width × height` frame per color, rows padded with
    /// `padding` bytes of `0xAB`.
    pub fn solid(colors: &[[u8; 3]], width: u32, height: u32, padding: usize) -> Self {
        let row_bytes = width as usize * 3;
        let stride = row_bytes + padding;
        let frames = colors
            .iter()
            .map(|color| {
                let mut frame = Vec::with_capacity(stride * height as usize);
                for _ in 0..height {
                    for _ in 0..width {
                        frame.extend_from_slice(color);
                    }
                    frame.extend(std::iter::repeat_n(0xAB, padding));
                }
                frame
            })
            .collect();

        Self {
            frames,
            width,
            height,
            stride,
            current: None,
            decoded: 0,
            converted: 0,
        }
    }

    /// Frame `i` is solid `(25 * i, 0, 0)`.
    pub fn red_ramp(frame_count: usize) -> Self {
        let colors: Vec<[u8; 3]> = (0..frame_count)
            .map(|index| [(25 * index) as u8, 0, 0])
            .collect();
        Self::solid(&colors, 16, 9, 0)
    }

    /// Frame `i` has red channel `i % 256` and green channel `i / 256`.
    pub fn numbered(frame_count: usize) -> Self {
        let colors: Vec<[u8; 3]> = (0..frame_count)
            .map(|index| [(index % 256) as u8, (index / 256) as u8, 0])
            .collect();
        Self::solid(&colors, 4, 4, 0)
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<bool, ChromashotError> {
        let next = self.current.map_or(0, |index| index + 1);
        if next >= self.frames.len() {
            return Ok(false);
        }
        self.current = Some(next);
        self.decoded += 1;
        Ok(true)
    }

    fn thumbnail(&mut self) -> Result<RgbRaster<'_>, ChromashotError> {
        let index = self.current.ok_or_else(|| {
            ChromashotError::VideoDecodeError("thumbnail requested before first frame".into())
        })?;
        self.converted += 1;
        RgbRaster::new(&self.frames[index], self.width, self.height, self.stride)
    }
}
