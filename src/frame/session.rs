use embassy_time::Duration;

use super::decoder::{MAX_FPS, frame_interval};

/// Frame rate used until a valid rate directive is read
pub const DEFAULT_FPS: u32 = 30;

/// Decoding state of one playback session
///
/// The LED count is fixed by the first frame record and survives looping.
/// The record ordinal restarts on every pass over the stream.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    led_count: Option<usize>,
    fps: u32,
    interval: Duration,
    /// Index of the next record within the current pass
    ordinal: usize,
    /// Frames decoded during the current pass
    pass_frames: usize,
    /// Completed passes
    passes: u32,
}

impl PlaybackSession {
    pub fn new(default_fps: u32) -> Self {
        let fps = default_fps.clamp(1, MAX_FPS);
        Self {
            led_count: None,
            fps,
            interval: frame_interval(fps),
            ordinal: 0,
            pass_frames: 0,
            passes: 0,
        }
    }

    /// LED count, once fixed by the first frame
    pub fn led_count(&self) -> Option<usize> {
        self.led_count
    }

    /// Current frame rate
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Time between two frames
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames decoded in the current pass
    pub fn frames_in_pass(&self) -> usize {
        self.pass_frames
    }

    /// Number of completed passes over the stream
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Start a new pass over the same stream
    pub fn restart_pass(&mut self) {
        self.ordinal = 0;
        self.pass_frames = 0;
        self.passes = self.passes.saturating_add(1);
    }

    /// Consume one record position, returning its ordinal
    pub(crate) fn next_ordinal(&mut self) -> usize {
        let ordinal = self.ordinal;
        self.ordinal = self.ordinal.saturating_add(1);
        ordinal
    }

    pub(crate) fn set_rate(&mut self, fps: u32) {
        self.fps = fps;
        self.interval = frame_interval(fps);
    }

    pub(crate) fn fix_led_count(&mut self, led_count: usize) {
        if self.led_count.is_none() {
            self.led_count = Some(led_count);
        }
    }

    pub(crate) fn count_frame(&mut self) {
        self.pass_frames = self.pass_frames.saturating_add(1);
    }
}
