//! The frame-capture boundary.
//!
//! A [`FrameSource`] stands in for the actual capture device wrapper. It
//! yields raw RGB frames when the device is ready and `None` otherwise
//! (no permission yet, not enough buffered data); a `None` turns the
//! current poll tick into a no-op. Frames are JPEG-encoded at low quality
//! before classification to keep the upload small.

use crate::error::CaptureError;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Default JPEG quality for classification uploads. Low on purpose: the
/// classifier needs a rough gesture, not a portrait.
pub const JPEG_QUALITY: u8 = 60;

/// One raw captured frame, tightly packed RGB8.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Build a frame, validating that the buffer matches the dimensions.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CaptureError::BadDimensions {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }
}

/// Supplies captured frames, one per poll tick.
pub trait FrameSource: Send {
    /// The most recent frame, or `None` while the device is not ready.
    fn frame(&mut self) -> Option<Frame>;
}

/// Encode a frame as JPEG at the given quality.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.write_image(
        &frame.data,
        frame.width,
        frame.height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

/// Synthetic frame source for demos and tests: a small moving gradient.
///
/// Stands in for a webcam so the capture/encode/classify path runs end to
/// end without device access.
pub struct TestPattern {
    width: u32,
    height: u32,
    tick: u32,
}

impl TestPattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }
}

impl FrameSource for TestPattern {
    fn frame(&mut self) -> Option<Frame> {
        self.tick = self.tick.wrapping_add(1);
        let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(((x + self.tick) % 256) as u8);
                data.push((y % 256) as u8);
                data.push(128);
            }
        }
        Frame::new(data, self.width, self.height).ok()
    }
}
