//! Playback scheduling and frame pacing.
//!
//! Provides portable playback without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames; see
//! [`crate::player`] for the async worker built on top of it.

use embassy_time::{Duration, Instant};
use embedded_io::{Error as _, Read, Seek};

use crate::OutputDriver;
use crate::config::{EndOfStream, PlaybackConfig};
use crate::error::{DecodeError, PlaybackError, ReadError};
use crate::frame::{Decoded, FrameDecoder, PixelFrame, PlaybackSession};
use crate::output::OutputBuffer;
use crate::record::{DEFAULT_CHUNK_SIZE, DELIMITER, RecordBuffer, RecordReader};

/// Result of a transmitted (or suppressed) frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// Whether the driver was called; `false` if the frame was unchanged.
    pub transmitted: bool,
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Outcome of one [`PlaybackScheduler::tick`].
#[derive(Debug, Clone, Copy)]
pub enum Tick {
    /// A frame was emitted; wait before the next tick.
    Frame(FrameResult),
    /// Cancellation was observed and the session torn down.
    Cancelled,
    /// A single pass finished and playback stopped.
    Finished,
    /// No session is active.
    Stopped,
    /// The session aborted.
    Failed(PlaybackError),
}

/// Observable scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No session
    #[default]
    Idle,
    /// First pass over the stream
    Streaming,
    /// Replaying the stream after it ended
    Looping,
    /// The stream ended and playback stopped; the strip keeps the last frame
    Draining,
    /// The last session aborted
    Failed(PlaybackError),
}

/// Result of pulling one record.
enum Step {
    Rate,
    Frame,
    Skipped,
    EndOfStream,
    Cancelled,
}

/// Buffers owned by one playback session
///
/// Dropping it releases every session allocation at once.
struct ActiveSession<S, const CHUNK: usize> {
    stream: S,
    reader: RecordReader<CHUNK>,
    buffer: RecordBuffer,
    frame: PixelFrame,
    session: PlaybackSession,
}

/// Drives stream → decoder → output at the declared frame rate.
///
/// This scheduler:
/// - Pulls records one at a time from the active stream
/// - Applies rate directives and decodes frames
/// - Sends frames through the change-detecting [`OutputBuffer`]
/// - Loops or stops at the end of the stream
/// - Returns timing info so the caller can sleep appropriately
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = PlaybackScheduler::new(driver, &PlaybackConfig::default());
/// scheduler.start(stream, Instant::from_millis(now_ms()));
///
/// loop {
///     match scheduler.tick(Instant::from_millis(now_ms()), || cancel_requested()) {
///         Tick::Frame(result) => sleep_ms(result.sleep_duration.as_millis()),
///         _ => break,
///     }
/// }
/// ```
pub struct PlaybackScheduler<S, D: OutputDriver, const CHUNK: usize = DEFAULT_CHUNK_SIZE> {
    output: OutputBuffer<D>,
    decoder: FrameDecoder,
    config: PlaybackConfig,
    state: PlaybackState,
    active: Option<ActiveSession<S, CHUNK>>,
    next_frame: Instant,
    /// Pixel count of the last frame sent to the strip
    led_count: Option<usize>,
}

impl<S, D, const CHUNK: usize> PlaybackScheduler<S, D, CHUNK>
where
    S: Read + Seek,
    D: OutputDriver,
{
    pub fn new(driver: D, config: &PlaybackConfig) -> Self {
        Self {
            output: OutputBuffer::new(driver),
            decoder: FrameDecoder::new(config.wire_order),
            config: config.clone(),
            state: PlaybackState::Idle,
            active: None,
            next_frame: Instant::from_millis(0),
            led_count: None,
        }
    }

    /// Start a new session on an opened stream, replacing any active one.
    pub fn start(&mut self, stream: S, now: Instant) {
        self.active = Some(ActiveSession {
            stream,
            reader: RecordReader::new(DELIMITER),
            buffer: RecordBuffer::new(self.config.max_record_len),
            frame: PixelFrame::new(),
            session: PlaybackSession::new(self.config.default_fps),
        });
        self.next_frame = now;
        self.state = PlaybackState::Streaming;
        log!("playback: session started");
    }

    /// Tear down the active session.
    ///
    /// Returns `true` if a session was running.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active.take().is_some();
        if was_active {
            log!("playback: session cancelled");
        }
        self.state = PlaybackState::Idle;
        was_active
    }

    /// Abort with a fatal error, e.g. when the stream could not be opened.
    pub fn fail(&mut self, error: PlaybackError) -> Tick {
        self.active = None;
        self.state = PlaybackState::Failed(error);
        log!("playback: session failed: {:?}", error);
        Tick::Failed(error)
    }

    /// Show a single frame immediately, ending any active session.
    ///
    /// Returns `true` if the frame was transmitted.
    pub fn show(&mut self, frame: &PixelFrame) -> Result<bool, PlaybackError> {
        self.cancel();
        match self.output.submit(frame.as_bytes()) {
            Ok(transmitted) => {
                self.led_count = Some(frame.led_count());
                Ok(transmitted)
            }
            Err(err) => {
                let error = err.into();
                self.fail(error);
                Err(error)
            }
        }
    }

    /// Process records until one frame is emitted or playback stops.
    ///
    /// `is_cancelled` is checked before every chunk read, before every decode
    /// and before returning a frame for the caller to wait on. Once it returns
    /// `true` no further frame is transmitted.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant, is_cancelled: impl Fn() -> bool) -> Tick {
        loop {
            if self.active.is_none() {
                return match self.state {
                    PlaybackState::Failed(error) => Tick::Failed(error),
                    _ => Tick::Stopped,
                };
            }
            if is_cancelled() {
                self.cancel();
                return Tick::Cancelled;
            }

            match self.advance(&is_cancelled) {
                Ok(Step::Rate | Step::Skipped) => {}
                Ok(Step::Cancelled) => {
                    self.cancel();
                    return Tick::Cancelled;
                }
                Ok(Step::EndOfStream) => {
                    if let Some(tick) = self.end_of_stream() {
                        return tick;
                    }
                }
                Ok(Step::Frame) => return self.emit(now, &is_cancelled),
                Err(error) => return self.fail(error),
            }
        }
    }

    /// Read and decode the next record.
    fn advance(&mut self, is_cancelled: &impl Fn() -> bool) -> Result<Step, PlaybackError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(Step::EndOfStream);
        };

        let record = match active.reader.next_record_or_cancel(
            &mut active.stream,
            &mut active.buffer,
            is_cancelled,
        ) {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(Step::EndOfStream),
            Err(ReadError::Truncated { len }) => {
                log!("playback: dropping {} trailing bytes without delimiter", len);
                return Ok(Step::EndOfStream);
            }
            Err(ReadError::Io(err)) => return Err(PlaybackError::Io(err.kind())),
            Err(ReadError::Alloc) => return Err(PlaybackError::Alloc),
            Err(ReadError::Cancelled) => return Ok(Step::Cancelled),
        };

        if is_cancelled() {
            return Ok(Step::Cancelled);
        }

        match self
            .decoder
            .decode(&record, &mut active.session, &mut active.frame)
        {
            Ok(Decoded::Rate(fps)) => {
                log!("playback: rate {} fps", fps);
                Ok(Step::Rate)
            }
            Ok(Decoded::Frame) => Ok(Step::Frame),
            Err(DecodeError::Alloc) => Err(PlaybackError::Alloc),
            Err(err) => {
                log!("playback: skipping malformed record: {:?}", err);
                Ok(Step::Skipped)
            }
        }
    }

    /// Transmit the decoded frame and compute the next deadline.
    fn emit(&mut self, now: Instant, is_cancelled: &impl Fn() -> bool) -> Tick {
        let Some(active) = self.active.as_ref() else {
            return Tick::Stopped;
        };
        let interval = active.session.interval();
        let led_count = active.frame.led_count();

        let transmitted = match self.output.submit(active.frame.as_bytes()) {
            Ok(transmitted) => transmitted,
            Err(err) => return self.fail(err.into()),
        };
        self.led_count = Some(led_count);

        if is_cancelled() {
            self.cancel();
            return Tick::Cancelled;
        }

        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift = interval * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.next_frame += interval;

        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        Tick::Frame(FrameResult {
            transmitted,
            next_deadline: self.next_frame,
            sleep_duration,
        })
    }

    /// Rewind for another pass or stop.
    ///
    /// Returns `None` when playback continues.
    fn end_of_stream(&mut self) -> Option<Tick> {
        let active = self.active.as_mut()?;

        let has_frames = active.session.frames_in_pass() > 0;
        if self.config.end_of_stream == EndOfStream::Stop || !has_frames {
            if !has_frames {
                log!("playback: stream has no frames, stopping");
            }
            self.active = None;
            self.state = PlaybackState::Draining;
            log!("playback: stream finished");
            return Some(Tick::Finished);
        }

        if let Err(err) = active.stream.rewind() {
            return Some(self.fail(PlaybackError::Io(err.kind())));
        }
        active.reader.reset();
        active.buffer.clear();
        active.session.restart_pass();
        self.state = PlaybackState::Looping;
        None
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether a session is streaming
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Decoding state of the active session
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    /// Pixel count of the strip as last written
    ///
    /// Survives the end of the session that set it.
    pub fn led_count(&self) -> Option<usize> {
        self.led_count
    }

    /// Last decoded frame of the active session
    pub fn frame(&self) -> Option<&PixelFrame> {
        self.active.as_ref().map(|active| &active.frame)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Get a reference to the output buffer.
    pub fn output(&self) -> &OutputBuffer<D> {
        &self.output
    }

    /// Get a mutable reference to the output buffer.
    pub fn output_mut(&mut self) -> &mut OutputBuffer<D> {
        &mut self.output
    }
}
