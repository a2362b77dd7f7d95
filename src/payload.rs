//! Control-plane JSON payloads.
//!
//! Two payloads arrive from the HTTP layer:
//! - an animation document, which is encoded into the storage stream format
//! - a live update, which becomes a single [`PixelFrame`]

use alloc::vec::Vec;
use core::fmt::Write as _;

use serde::Deserialize;

use crate::color::{ChannelOrder, Rgb, hsv_to_rgb};
use crate::config::PlaybackConfig;
use crate::error::PayloadError;
use crate::frame::{BYTES_PER_PIXEL, MAX_FPS, PixelFrame};
use crate::record::DELIMITER;

/// A pixel given either as RGB or as HSV
///
/// RGB channels are 0-255. Hue is in degrees, saturation and value in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PixelColor {
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
    pub value: Option<u8>,
}

impl PixelColor {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: Some(red),
            green: Some(green),
            blue: Some(blue),
            hue: None,
            saturation: None,
            value: None,
        }
    }

    pub const fn hsv(hue: u16, saturation: u8, value: u8) -> Self {
        Self {
            red: None,
            green: None,
            blue: None,
            hue: Some(hue),
            saturation: Some(saturation),
            value: Some(value),
        }
    }

    /// Resolve to an RGB color
    pub fn to_rgb(&self) -> Result<Rgb, PayloadError> {
        match (self.red, self.green, self.blue) {
            (Some(r), Some(g), Some(b)) => Ok(Rgb { r, g, b }),
            (None, None, None) => match (self.hue, self.saturation, self.value) {
                (Some(h), Some(s), Some(v)) => Ok(hsv_to_rgb(h, s, v)),
                _ => Err(PayloadError::IncompletePixel),
            },
            _ => Err(PayloadError::IncompletePixel),
        }
    }
}

/// Full animation: a frame rate and an ordered list of frames
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnimationDocument {
    pub fps: u32,
    pub frames: Vec<Vec<PixelColor>>,
}

impl AnimationDocument {
    /// Pixel count of the first frame
    pub fn led_count(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }
}

/// Parse an animation document
pub fn parse_document(json: &[u8]) -> Result<AnimationDocument, PayloadError> {
    serde_json_core::from_slice::<AnimationDocument>(json)
        .map(|(document, _)| document)
        .map_err(|_| PayloadError::Json)
}

/// Encode a document into the storage stream format
///
/// The output is `fps;frame;frame;...;` with each frame as raw RGB triplets.
/// A channel value equal to the delimiter is lowered by one, since records
/// cannot contain it. Frames longer than `config.max_record_len` are
/// rejected, since the player could not read them back.
pub fn encode_document(
    document: &AnimationDocument,
    config: &PlaybackConfig,
) -> Result<Vec<u8>, PayloadError> {
    if !(1..=MAX_FPS).contains(&document.fps) {
        return Err(PayloadError::InvalidRate);
    }
    let led_count = document.led_count();
    if led_count == 0 {
        return Err(PayloadError::EmptyDocument);
    }
    let record_len = led_count
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or(PayloadError::Alloc)?;
    if record_len > config.max_record_len {
        return Err(PayloadError::FrameTooLarge {
            len: record_len,
            limit: config.max_record_len,
        });
    }

    let mut rate = heapless::String::<10>::new();
    write!(rate, "{}", document.fps).map_err(|_| PayloadError::InvalidRate)?;

    let frame_len = record_len + 1;
    let total = document
        .frames
        .len()
        .checked_mul(frame_len)
        .and_then(|len| len.checked_add(rate.len() + 1))
        .ok_or(PayloadError::Alloc)?;
    let mut stream = Vec::new();
    stream
        .try_reserve_exact(total)
        .map_err(|_| PayloadError::Alloc)?;

    stream.extend_from_slice(rate.as_bytes());
    stream.push(DELIMITER);

    for frame in &document.frames {
        if frame.len() != led_count {
            return Err(PayloadError::TopologyChanged {
                expected: led_count,
                actual: frame.len(),
            });
        }
        for pixel in frame {
            let Rgb { r, g, b } = pixel.to_rgb()?;
            stream.extend_from_slice(&[escape(r), escape(g), escape(b)]);
        }
        stream.push(DELIMITER);
    }

    Ok(stream)
}

/// Keep channel values clear of the record delimiter
const fn escape(value: u8) -> u8 {
    if value == DELIMITER { value - 1 } else { value }
}

/// One addressed pixel of a live update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndexedPixel {
    pub index: usize,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Immediate single-frame update
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct LiveFrameUpdate(pub Vec<IndexedPixel>);

impl LiveFrameUpdate {
    /// Smallest strip that holds every addressed pixel
    pub fn required_leds(&self) -> usize {
        self.0
            .iter()
            .map(|pixel| pixel.index.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Build a frame of `led_count` pixels
    ///
    /// Pixels not addressed by the update are off.
    pub fn to_frame(
        &self,
        led_count: usize,
        order: ChannelOrder,
    ) -> Result<PixelFrame, PayloadError> {
        let mut frame = PixelFrame::try_with_leds(led_count)?;
        for pixel in &self.0 {
            let color = Rgb {
                r: pixel.red,
                g: pixel.green,
                b: pixel.blue,
            };
            if !frame.set_pixel(pixel.index, color, order) {
                return Err(PayloadError::IndexOutOfRange {
                    index: pixel.index,
                    led_count,
                });
            }
        }
        Ok(frame)
    }
}

/// Parse a live update
pub fn parse_live_update(json: &[u8]) -> Result<LiveFrameUpdate, PayloadError> {
    serde_json_core::from_slice::<LiveFrameUpdate>(json)
        .map(|(update, _)| update)
        .map_err(|_| PayloadError::Json)
}
