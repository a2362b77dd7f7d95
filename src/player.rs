//! Playback worker
//!
//! The [`Player`] is the single owner of the scheduler, its session buffers
//! and the output driver. Other tasks talk to it only through the command
//! channel and read its [`SharedStatus`].

use embassy_futures::select::select;
use embassy_time::{Instant, Timer};
use embedded_io::{Error as _, ErrorType, Read, Seek};

use crate::OutputDriver;
use crate::config::PlaybackConfig;
use crate::control::{COMMAND_CHANNEL_SIZE, CommandReceiver, PlayerCommand};
use crate::error::PlaybackError;
use crate::frame_scheduler::{PlaybackScheduler, Tick};
use crate::record::DEFAULT_CHUNK_SIZE;
use crate::status::{PlayerStatus, SharedStatus};

/// Storage holding the current animation stream
pub trait FrameStore {
    type Stream: Read + Seek;

    /// Open the stream from its beginning
    fn open(&mut self) -> Result<Self::Stream, <Self::Stream as ErrorType>::Error>;
}

/// Async worker running the playback loop
pub struct Player<
    'a,
    F: FrameStore,
    D: OutputDriver,
    const SIZE: usize = COMMAND_CHANNEL_SIZE,
    const CHUNK: usize = DEFAULT_CHUNK_SIZE,
> {
    store: F,
    scheduler: PlaybackScheduler<F::Stream, D, CHUNK>,
    commands: CommandReceiver<'a, SIZE>,
    status: Option<&'a SharedStatus>,
}

impl<'a, F, D, const SIZE: usize, const CHUNK: usize> Player<'a, F, D, SIZE, CHUNK>
where
    F: FrameStore,
    D: OutputDriver,
{
    pub fn new(
        store: F,
        driver: D,
        commands: CommandReceiver<'a, SIZE>,
        config: &PlaybackConfig,
    ) -> Self {
        Self {
            store,
            scheduler: PlaybackScheduler::new(driver, config),
            commands,
            status: None,
        }
    }

    /// Attach shared status for external observation
    #[must_use]
    pub fn with_status(mut self, status: &'a SharedStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Run the worker loop indefinitely
    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    /// One worker iteration
    ///
    /// Applies pending commands, then either emits one frame and waits out
    /// its interval, or sleeps until a command arrives. Both waits end early
    /// when a command is sent.
    pub async fn step(&mut self) {
        self.process_commands();

        if !self.scheduler.is_active() {
            self.commands.ready().await;
            return;
        }

        let commands = &self.commands;
        let tick = self
            .scheduler
            .tick(Instant::now(), || commands.has_pending());
        self.publish_status();

        if let Tick::Frame(result) = tick {
            select(Timer::at(result.next_deadline), self.commands.ready()).await;
        }
    }

    /// Apply all queued commands (non-blocking)
    pub fn process_commands(&mut self) {
        while let Ok(command) = self.commands.try_receive() {
            self.handle(command);
        }
        self.publish_status();
    }

    fn handle(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Play => self.play(),
            PlayerCommand::Show(frame) => {
                log!("player: showing live frame of {} leds", frame.led_count());
                // Failure is kept in the scheduler state
                let _ = self.scheduler.show(&frame);
            }
            PlayerCommand::Stop => {
                self.scheduler.cancel();
            }
        }
    }

    /// Restart playback from the beginning of the store
    fn play(&mut self) {
        self.scheduler.cancel();
        match self.store.open() {
            Ok(stream) => self.scheduler.start(stream, Instant::now()),
            Err(err) => {
                self.scheduler.fail(PlaybackError::Io(err.kind()));
            }
        }
    }

    fn publish_status(&self) {
        let Some(status) = self.status else {
            return;
        };
        let session = self.scheduler.session();
        status.set(PlayerStatus {
            state: self.scheduler.state(),
            led_count: self.scheduler.led_count(),
            fps: session.map(|session| session.fps()),
        });
    }

    /// Get a reference to the scheduler.
    pub fn scheduler(&self) -> &PlaybackScheduler<F::Stream, D, CHUNK> {
        &self.scheduler
    }

    pub fn store(&self) -> &F {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut F {
        &mut self.store
    }
}
