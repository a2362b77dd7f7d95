//! Pixel frames and the record decoder.

mod decoder;
mod session;

use alloc::vec::Vec;

pub use decoder::{Decoded, FrameDecoder, MAX_FPS, frame_interval, parse_rate};
pub use session::{DEFAULT_FPS, PlaybackSession};

use crate::color::{ChannelOrder, Rgb};
use crate::error::AllocError;

/// Bytes per pixel on the wire
pub const BYTES_PER_PIXEL: usize = 3;

/// Pixel buffer in wire order
///
/// Length is always carried by the buffer itself, never inferred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelFrame {
    bytes: Vec<u8>,
}

impl PixelFrame {
    /// Create an empty frame
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a frame of `led_count` pixels, all off
    pub fn try_with_leds(led_count: usize) -> Result<Self, AllocError> {
        let mut frame = Self::new();
        frame.resize(led_count)?;
        Ok(frame)
    }

    /// Resize to `led_count` pixels
    ///
    /// New pixels are off. On failure the frame is unchanged.
    pub fn resize(&mut self, led_count: usize) -> Result<(), AllocError> {
        let len = led_count
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or(AllocError)?;
        if len > self.bytes.len() {
            self.bytes
                .try_reserve_exact(len - self.bytes.len())
                .map_err(|_| AllocError)?;
        }
        self.bytes.resize(len, 0);
        Ok(())
    }

    /// Number of pixels
    pub fn led_count(&self) -> usize {
        self.bytes.len() / BYTES_PER_PIXEL
    }

    /// Number of bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw wire bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Set one pixel
    ///
    /// Returns `false` if `index` is past the end of the frame.
    pub fn set_pixel(&mut self, index: usize, color: Rgb, order: ChannelOrder) -> bool {
        let Some(pixel) = self.bytes.chunks_exact_mut(BYTES_PER_PIXEL).nth(index) else {
            return false;
        };
        pixel.copy_from_slice(&order.to_wire(color));
        true
    }

    /// Read back one pixel
    pub fn pixel(&self, index: usize, order: ChannelOrder) -> Option<Rgb> {
        let pixel = self.bytes.chunks_exact(BYTES_PER_PIXEL).nth(index)?;
        Some(order.from_wire([pixel[0], pixel[1], pixel[2]]))
    }

    /// Set every pixel to one color
    pub fn fill(&mut self, color: Rgb, order: ChannelOrder) {
        let wire = order.to_wire(color);
        for pixel in self.bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&wire);
        }
    }

    /// Overwrite all pixels from red-green-blue source triplets
    ///
    /// `source` must hold exactly `led_count() * 3` bytes.
    fn write_source(&mut self, source: &[u8], order: ChannelOrder) {
        debug_assert_eq!(source.len(), self.bytes.len());
        let pixels = self.bytes.chunks_exact_mut(BYTES_PER_PIXEL);
        for (pixel, rgb) in pixels.zip(source.chunks_exact(BYTES_PER_PIXEL)) {
            let color = Rgb {
                r: rgb[0],
                g: rgb[1],
                b: rgb[2],
            };
            pixel.copy_from_slice(&order.to_wire(color));
        }
    }
}
