use crate::color::ChannelOrder;
use crate::frame::{BYTES_PER_PIXEL, DEFAULT_FPS};

/// Longest strip a single record is expected to describe
pub const DEFAULT_MAX_LEDS: usize = 1024;

/// What the scheduler does when the stream ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOfStream {
    /// Rewind and play again
    #[default]
    Loop,
    /// Stop after one pass
    Stop,
}

/// Configuration for the playback scheduler
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub end_of_stream: EndOfStream,
    /// Frame rate used while no valid rate directive has been read
    pub default_fps: u32,
    /// Channel order expected by the LED hardware
    pub wire_order: ChannelOrder,
    /// Largest record the record buffer may grow to, in bytes
    pub max_record_len: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            end_of_stream: EndOfStream::Loop,
            default_fps: DEFAULT_FPS,
            wire_order: ChannelOrder::Grb,
            max_record_len: DEFAULT_MAX_LEDS * BYTES_PER_PIXEL,
        }
    }
}
