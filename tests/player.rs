mod common;

mod tests {
    use std::thread;
    use std::time::{Duration as StdDuration, Instant as StdInstant};

    use crate::common::{MemoryStore, RecordingDriver};
    use embassy_futures::block_on;
    use embedded_io::ErrorKind;
    use myrtio_light_player::{
        ChannelOrder, CommandChannel, PixelFrame, PlaybackConfig, PlaybackError, PlaybackState,
        Player, Rgb, SharedStatus,
    };

    fn config() -> PlaybackConfig {
        PlaybackConfig {
            wire_order: ChannelOrder::Rgb,
            ..PlaybackConfig::default()
        }
    }

    #[test]
    fn test_play_transmits_first_frame() {
        static COMMANDS: CommandChannel = CommandChannel::new();
        let status = SharedStatus::new();
        let mut player: Player<'_, _, _> = Player::new(
            MemoryStore::new(b"30;abc;"),
            RecordingDriver::default(),
            COMMANDS.receiver(),
            &config(),
        )
        .with_status(&status);

        COMMANDS.sender().play().unwrap();
        block_on(player.step());

        let frames = &player.scheduler().output().driver().frames;
        assert_eq!(frames, &[b"abc".to_vec()]);
        assert_eq!(player.store().opens, 1);

        let snapshot = status.get();
        assert_eq!(snapshot.state, PlaybackState::Streaming);
        assert_eq!(snapshot.led_count, Some(1));
        assert_eq!(snapshot.fps, Some(30));
    }

    #[test]
    fn test_stop_interrupts_pacing_wait() {
        static COMMANDS: CommandChannel = CommandChannel::new();
        let status = SharedStatus::new();
        let mut player: Player<'_, _, _> = Player::new(
            MemoryStore::new(b"1;abc;def;"),
            RecordingDriver::default(),
            COMMANDS.receiver(),
            &config(),
        )
        .with_status(&status);

        COMMANDS.sender().play().unwrap();
        let sender = thread::spawn(|| {
            thread::sleep(StdDuration::from_millis(50));
            COMMANDS.sender().stop().unwrap();
        });

        let started = StdInstant::now();
        block_on(player.step());
        assert!(started.elapsed() < StdDuration::from_millis(500));
        sender.join().unwrap();

        player.process_commands();
        assert_eq!(status.get().state, PlaybackState::Idle);
        assert!(!player.scheduler().is_active());
        assert_eq!(player.scheduler().output().driver().frames.len(), 1);
    }

    #[test]
    fn test_idle_step_waits_for_command() {
        static COMMANDS: CommandChannel = CommandChannel::new();
        let mut player: Player<'_, _, _> = Player::new(
            MemoryStore::new(b"30;abc;"),
            RecordingDriver::default(),
            COMMANDS.receiver(),
            &config(),
        );

        let sender = thread::spawn(|| {
            thread::sleep(StdDuration::from_millis(20));
            COMMANDS.sender().play().unwrap();
        });
        block_on(player.step());
        sender.join().unwrap();
        assert!(player.scheduler().output().driver().frames.is_empty());

        block_on(player.step());
        assert_eq!(player.scheduler().output().driver().frames.len(), 1);
    }

    #[test]
    fn test_show_replaces_playback() {
        static COMMANDS: CommandChannel = CommandChannel::new();
        let status = SharedStatus::new();
        let mut player: Player<'_, _, _> = Player::new(
            MemoryStore::new(b"30;abc;"),
            RecordingDriver::default(),
            COMMANDS.receiver(),
            &config(),
        )
        .with_status(&status);

        COMMANDS.sender().play().unwrap();
        player.process_commands();
        assert!(player.scheduler().is_active());

        let mut frame = PixelFrame::try_with_leds(2).unwrap();
        frame.set_pixel(1, Rgb::new(7, 8, 9), ChannelOrder::Rgb);
        COMMANDS.sender().show(frame).unwrap();
        player.process_commands();

        assert!(!player.scheduler().is_active());
        assert_eq!(status.get().state, PlaybackState::Idle);
        assert_eq!(status.get().led_count, Some(2));
        assert_eq!(
            player.scheduler().output().last_frame(),
            Some(&[0u8, 0, 0, 7, 8, 9][..])
        );
    }

    #[test]
    fn test_play_restarts_from_storage() {
        static COMMANDS: CommandChannel = CommandChannel::new();
        let mut player: Player<'_, _, _> = Player::new(
            MemoryStore::new(b"30;abc;def;"),
            RecordingDriver::default(),
            COMMANDS.receiver(),
            &config(),
        );

        COMMANDS.sender().play().unwrap();
        player.process_commands();
        player.store_mut().data = b"30;xyz;".to_vec();
        COMMANDS.sender().play().unwrap();
        player.process_commands();

        assert_eq!(player.store().opens, 2);
        assert!(player.scheduler().is_active());
    }

    #[test]
    fn test_open_failure_is_reported() {
        static COMMANDS: CommandChannel = CommandChannel::new();
        let status = SharedStatus::new();
        let store = MemoryStore {
            fail_open: true,
            ..MemoryStore::default()
        };
        let mut player: Player<'_, _, _> =
            Player::new(store, RecordingDriver::default(), COMMANDS.receiver(), &config())
                .with_status(&status);

        COMMANDS.sender().play().unwrap();
        player.process_commands();

        assert_eq!(
            status.get().state,
            PlaybackState::Failed(PlaybackError::Io(ErrorKind::NotFound))
        );
        assert!(!player.scheduler().is_active());
    }
}
