#![no_std]

//! LED animation player
//!
//! Data flow:
//! - `record` - splits a storage stream into `;`-delimited records
//! - `frame` - decodes records into rate updates and wire-order pixel frames
//! - `frame_scheduler` - paces frames, loops the stream, handles cancellation
//! - `output` - suppresses repeated frames before they reach the [`OutputDriver`]
//! - `player` - async worker driven by commands from the control plane

extern crate alloc;

/// Print a log line when the `esp32-log` feature is enabled
macro_rules! log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32-log")]
        esp_println::println!($($arg)*);
        #[cfg(not(feature = "esp32-log"))]
        let _ = format_args!($($arg)*);
    }};
}

pub mod channel;
pub mod color;
pub mod config;
pub mod control;
pub mod driver;
pub mod error;
pub mod frame;
pub mod frame_scheduler;
pub mod output;
pub mod payload;
pub mod player;
pub mod record;
pub mod status;

pub use config::{EndOfStream, PlaybackConfig};
pub use control::{CommandChannel, CommandReceiver, CommandSender, PlayerCommand};
pub use driver::SmartLedsDriver;
pub use error::{DecodeError, PayloadError, PlaybackError};
pub use frame::{PixelFrame, PlaybackSession};
pub use frame_scheduler::{FrameResult, PlaybackScheduler, PlaybackState, Tick};
pub use output::OutputBuffer;
pub use player::{FrameStore, Player};
pub use status::{PlayerStatus, SharedStatus};

pub use color::{ChannelOrder, Rgb, hsv_to_rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The player is generic over this trait.
pub trait OutputDriver {
    type Error: core::fmt::Debug;

    /// Write one frame of wire-order bytes to the LED strip
    ///
    /// `frame` must not be reused by the caller until this returns.
    fn write(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}
