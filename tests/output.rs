//! PPM writer, output format resolution, and file saving tests.

use std::io::{self, Write};

use chromashot::{
    ChromashotError, Color, FailureStage, OutputFormat, assemble, save_timeline, save_timeline_as,
    write_ppm,
};
use image::{ImageFormat, RgbImage};

fn two_stripes() -> RgbImage {
    assemble(&[Color::new(1, 2, 3), Color::new(250, 251, 252)], 2).unwrap()
}

/// Accepts `capacity` bytes, then refuses further writes.
struct CappedWriter {
    written: Vec<u8>,
    capacity: usize,
}

impl Write for CappedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.written.len();
        let take = room.min(buf.len());
        self.written.extend_from_slice(&buf[..take]);
        Ok(take)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn ppm_header_and_body() {
    let image = two_stripes();
    let mut buffer = Vec::new();
    let written = write_ppm(&mut buffer, &image).unwrap();

    let header = b"P6\n2 2\n255\n";
    assert_eq!(written, 2 * 2 * 3);
    assert_eq!(&buffer[..header.len()], header);
    assert_eq!(
        &buffer[header.len()..],
        &[1, 2, 3, 250, 251, 252, 1, 2, 3, 250, 251, 252]
    );
}

#[test]
fn ppm_has_no_trailing_data() {
    let image = assemble(&[Color::new(5, 5, 5); 10], 1080).unwrap();
    let mut buffer = Vec::new();
    write_ppm(&mut buffer, &image).unwrap();

    let header = b"P6\n10 1080\n255\n";
    assert_eq!(buffer.len(), header.len() + 10 * 1080 * 3);
}

#[test]
fn truncated_writer_is_an_output_error() {
    let image = two_stripes();
    let writer = CappedWriter {
        written: Vec::new(),
        capacity: 16,
    };

    let error = write_ppm(writer, &image).unwrap_err();
    assert_eq!(error.stage(), FailureStage::Output);
}

#[test]
fn oversized_buffer_is_rejected() {
    // Two pixels of storage behind a 1x1 image.
    let image = RgbImage::from_raw(1, 1, vec![0; 6]).unwrap();
    let mut buffer = Vec::new();

    let error = write_ppm(&mut buffer, &image).unwrap_err();
    assert!(matches!(
        error,
        ChromashotError::ShortWrite {
            expected: 3,
            written: 0
        }
    ));
    assert!(buffer.is_empty());
}

#[test]
fn output_format_from_extension() {
    assert_eq!(OutputFormat::from_path("out.ppm"), OutputFormat::Ppm);
    assert_eq!(OutputFormat::from_path("out.PNM"), OutputFormat::Ppm);
    assert_eq!(OutputFormat::from_path("timeline"), OutputFormat::Ppm);
    assert_eq!(
        OutputFormat::from_path("out.png"),
        OutputFormat::Image(ImageFormat::Png)
    );
    assert_eq!(
        OutputFormat::from_path("dir/out.JPG"),
        OutputFormat::Image(ImageFormat::Jpeg)
    );
}

#[test]
fn unknown_extensions_fall_back_to_ppm() {
    for path in ["x.raw", "out.rgb", "out.bin", "out.out", "out.xyz"] {
        assert_eq!(OutputFormat::from_path(path), OutputFormat::Ppm, "{path}");
    }
}

#[test]
fn save_ppm_file() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("timeline.ppm");
    let image = two_stripes();

    save_timeline(&image, &path).expect("Failed to save PPM");

    let bytes = std::fs::read(&path).expect("Failed to read PPM back");
    let mut expected = b"P6\n2 2\n255\n".to_vec();
    expected.extend_from_slice(image.as_raw());
    assert_eq!(bytes, expected);
}

#[test]
fn save_png_file() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("timeline.png");
    let image = two_stripes();

    save_timeline_as(&image, &path, OutputFormat::from_path(&path)).expect("Failed to save PNG");

    let decoded = image::open(&path).expect("Failed to decode PNG").to_rgb8();
    assert_eq!(decoded, image);
}

#[test]
fn unwritable_destination_is_an_output_error() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("missing").join("timeline.ppm");

    let error = save_timeline(&two_stripes(), &path).unwrap_err();
    assert!(matches!(error, ChromashotError::OutputWrite { .. }));
    assert_eq!(error.stage(), FailureStage::Output);
    assert!(!path.exists());
}

#[test]
fn save_timeline_writes_ppm_whatever_the_name() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let image = two_stripes();

    for name in ["timeline.raw", "timeline.png", "timeline"] {
        let path = directory.path().join(name);
        save_timeline(&image, &path).expect("Failed to save timeline");

        let bytes = std::fs::read(&path).expect("Failed to read timeline back");
        assert!(bytes.starts_with(b"P6\n2 2\n255\n"), "{name}");
    }
}
