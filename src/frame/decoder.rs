use embassy_time::Duration;

use super::{BYTES_PER_PIXEL, PixelFrame, PlaybackSession};
use crate::color::ChannelOrder;
use crate::error::DecodeError;

/// Highest accepted frame rate
pub const MAX_FPS: u32 = 1000;

/// What a record decoded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// Rate directive, frames per second
    Rate(u32),
    /// Pixel data was written to the frame buffer
    Frame,
}

/// Frame interval for a frame rate, rounded to the nearest millisecond
pub fn frame_interval(fps: u32) -> Duration {
    let fps = u64::from(fps.clamp(1, MAX_FPS));
    Duration::from_millis(((1000 + fps / 2) / fps).max(1))
}

/// Parse a rate directive
///
/// Accepts an ASCII decimal in `1..=MAX_FPS`, ignoring surrounding
/// whitespace.
pub fn parse_rate(record: &[u8]) -> Result<u32, DecodeError> {
    let text = core::str::from_utf8(record.trim_ascii()).map_err(|_| DecodeError::InvalidRate)?;
    match text.parse::<u32>() {
        Ok(fps) if (1..=MAX_FPS).contains(&fps) => Ok(fps),
        _ => Err(DecodeError::InvalidRate),
    }
}

/// Turns records into rate updates and pixel frames
#[derive(Debug, Clone, Copy)]
pub struct FrameDecoder {
    order: ChannelOrder,
}

impl FrameDecoder {
    pub const fn new(order: ChannelOrder) -> Self {
        Self { order }
    }

    /// Wire order frames are decoded into
    pub const fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Decode one record
    ///
    /// The first record of every pass is the rate directive; all later
    /// records are frames. A rejected rate keeps the session's current
    /// interval. A rejected frame leaves `frame` untouched.
    pub fn decode(
        &self,
        record: &[u8],
        session: &mut PlaybackSession,
        frame: &mut PixelFrame,
    ) -> Result<Decoded, DecodeError> {
        if session.next_ordinal() == 0 {
            let fps = parse_rate(record)?;
            session.set_rate(fps);
            return Ok(Decoded::Rate(fps));
        }

        let led_count = Self::led_count(record.len(), session.led_count())?;
        if frame.led_count() != led_count {
            frame.resize(led_count)?;
        }
        frame.write_source(record, self.order);

        session.fix_led_count(led_count);
        session.count_frame();
        Ok(Decoded::Frame)
    }

    /// Validate a frame record length against the session topology
    fn led_count(len: usize, fixed: Option<usize>) -> Result<usize, DecodeError> {
        if len == 0 {
            return Err(DecodeError::EmptyFrame);
        }
        if !len.is_multiple_of(BYTES_PER_PIXEL) {
            return Err(DecodeError::NotTriplets { len });
        }
        let led_count = len / BYTES_PER_PIXEL;
        match fixed {
            Some(expected) if expected != led_count => Err(DecodeError::TopologyChanged {
                expected,
                actual: led_count,
            }),
            _ => Ok(led_count),
        }
    }
}
