//! Commands from the control plane to the playback worker
//!
//! Whole frames are handed over through the queue, so the worker never
//! reads a buffer another task is still writing.

use crate::channel::{Channel, Receiver, Sender, TrySendError};
use crate::frame::PixelFrame;

/// Default command queue depth
pub const COMMAND_CHANNEL_SIZE: usize = 4;

/// Request for the playback worker
///
/// Any pending command cancels the running session at its next checkpoint.
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// (Re)open the stored animation and play it from the start
    Play,
    /// Show one frame immediately, ending playback
    Show(PixelFrame),
    /// End playback, keeping the strip as it is
    Stop,
}

/// Type alias for command sender
pub type CommandSender<'a, const SIZE: usize = COMMAND_CHANNEL_SIZE> =
    Sender<'a, PlayerCommand, SIZE>;

/// Type alias for command receiver
pub type CommandReceiver<'a, const SIZE: usize = COMMAND_CHANNEL_SIZE> =
    Receiver<'a, PlayerCommand, SIZE>;

/// Type alias for the command channel
pub type CommandChannel<const SIZE: usize = COMMAND_CHANNEL_SIZE> =
    Channel<PlayerCommand, SIZE>;

impl<const SIZE: usize> Sender<'_, PlayerCommand, SIZE> {
    /// Restart playback from storage, e.g. after a new upload
    pub fn play(&self) -> Result<(), TrySendError<PlayerCommand>> {
        self.try_send(PlayerCommand::Play)
    }

    /// Hand a complete frame to the worker
    pub fn show(&self, frame: PixelFrame) -> Result<(), TrySendError<PlayerCommand>> {
        self.try_send(PlayerCommand::Show(frame))
    }

    pub fn stop(&self) -> Result<(), TrySendError<PlayerCommand>> {
        self.try_send(PlayerCommand::Stop)
    }
}
