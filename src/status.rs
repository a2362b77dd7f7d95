//! Player status shared with the control plane.

use core::cell::Cell;

use critical_section::Mutex;

use crate::frame_scheduler::PlaybackState;

/// Snapshot of the player, as seen from outside the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerStatus {
    pub state: PlaybackState,
    /// LED count of the last frame shown, kept after playback ends
    pub led_count: Option<usize>,
    /// Frame rate of the active session
    pub fps: Option<u32>,
}

/// Status cell written by the worker and read by any task
pub struct SharedStatus {
    inner: Mutex<Cell<PlayerStatus>>,
}

impl SharedStatus {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(PlayerStatus {
                state: PlaybackState::Idle,
                led_count: None,
                fps: None,
            })),
        }
    }

    /// Read the latest status
    pub fn get(&self) -> PlayerStatus {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    pub(crate) fn set(&self, status: PlayerStatus) {
        critical_section::with(|cs| self.inner.borrow(cs).set(status));
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}
