//! The sequence player: state machine and fixed-rate tick loop
//!
//! A [`SequencePlayer`] owns the loaded geometries, one viewer window and,
//! when recording, one video writer. [`SequencePlayer::play`] blocks on the
//! tick loop until the window closes or a non-looping sequence ends.
//!
//! Each tick polls the window, applies keyboard commands, redraws, captures a
//! frame when recording, and advances to the next geometry once the frame
//! interval has elapsed. While recording the interval is ignored so every
//! tick writes exactly one frame and advances exactly once.

use crate::clock::{Clock, SystemClock};
use crate::config::{PlayerConfig, WindowOptions};
use crate::fps::FpsCounter;
use crate::video::{EncodeConfig, Encoder, VideoWriter};
use crate::viewer::{PlayerCommand, Viewer};
use indicatif::ProgressBar;
use meshseq_core::{color_from_u8, Error, Geometry, Result};
use meshseq_io::loader::{load_geometries, LoadOptions, LoadStrategy};
use meshseq_io::progress::progress_bar;
use meshseq_io::get_files_in_path;
use std::path::Path;

const RENDER_MESSAGE: &str = "rendering";

/// Playback state of an open player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Plays a geometry sequence in a viewer, optionally recording it
pub struct SequencePlayer<V: Viewer, E: Encoder, C: Clock = SystemClock> {
    config: PlayerConfig,
    viewer: V,
    encoder: E,
    clock: C,
    geometries: Vec<Geometry>,
    index: usize,
    /// Sequence index of the geometry currently in the viewer
    displayed: Option<usize>,
    state: PlaybackState,
    window_open: bool,
    writer: Option<E::Writer>,
    render_progress: Option<ProgressBar>,
    recorded_frames: usize,
    last_advance: u64,
    unthrottled: bool,
    fps: FpsCounter,
}

impl<V: Viewer, E: Encoder> SequencePlayer<V, E, SystemClock> {
    pub fn new(config: PlayerConfig, viewer: V, encoder: E) -> Self {
        Self::with_clock(config, viewer, encoder, SystemClock::new())
    }
}

impl<V: Viewer, E: Encoder, C: Clock> SequencePlayer<V, E, C> {
    pub fn with_clock(config: PlayerConfig, viewer: V, encoder: E, clock: C) -> Self {
        let now = clock.now_millis();
        Self {
            config,
            viewer,
            encoder,
            clock,
            geometries: Vec::new(),
            index: 0,
            displayed: None,
            state: PlaybackState::Stopped,
            window_open: false,
            writer: None,
            render_progress: None,
            recorded_frames: 0,
            last_advance: now,
            unthrottled: false,
            fps: FpsCounter::new(now),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    /// Current sequence index
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_open(&self) -> bool {
        self.window_open
    }

    pub fn is_recording(&self) -> bool {
        self.writer.is_some()
    }

    /// Frames written to the video so far
    pub fn recorded_frames(&self) -> usize {
        self.recorded_frames
    }

    /// Measured ticks per second
    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }

    /// Load every file in `folder` whose name matches `pattern`.
    /// Returns the number of geometries loaded.
    pub fn load(&mut self, folder: impl AsRef<Path>, pattern: &str) -> Result<usize> {
        let folder = folder.as_ref();
        let files = get_files_in_path(folder, &[pattern])?;
        if files.is_empty() {
            log::warn!("no files matching '{}' in {}", pattern, folder.display());
        }

        let options = LoadOptions {
            strategy: if self.config.load_safe { LoadStrategy::Safe } else { LoadStrategy::Fast },
            kind: self.config.kind,
            show_progress: self.config.show_progress,
            num_threads: None,
        };
        let geometries = load_geometries(&files, &options)?;
        log::info!("loaded {} geometries from {}", geometries.len(), folder.display());

        self.set_geometries(geometries)?;
        Ok(self.geometries.len())
    }

    /// Replace the sequence and rewind to the first geometry
    pub fn set_geometries(&mut self, geometries: Vec<Geometry>) -> Result<()> {
        if self.window_open {
            if let Some(id) = self.displayed.take() {
                self.viewer.remove_geometry(id)?;
            }
        }

        self.geometries = geometries;
        self.index = 0;

        if self.window_open && !self.geometries.is_empty() {
            self.viewer.add_geometry(0, &self.geometries[0], true)?;
            self.displayed = Some(0);
        }
        Ok(())
    }

    /// Open the viewer window and show the current geometry.
    ///
    /// When recording is configured, the video writer is created here at the
    /// window's size and the configured fps.
    pub fn open(&mut self, window: &WindowOptions) -> Result<()> {
        if self.window_open {
            return Err(Error::Window("player window is already open".to_string()));
        }

        self.viewer.create_window(window)?;
        self.window_open = true;
        self.viewer.set_background_color(color_from_u8(self.config.background_color))?;

        if self.geometries.is_empty() {
            log::warn!("no geometries to play");
            return Ok(());
        }

        if let Some(recording) = &self.config.recording {
            let encode = EncodeConfig {
                path: recording.path.clone(),
                fourcc: recording.fourcc,
                fps: self.config.fps,
                width: window.width,
                height: window.height,
            };
            self.writer = Some(self.encoder.create(&encode)?);
            self.render_progress = Some(progress_bar(
                self.geometries.len(),
                RENDER_MESSAGE,
                self.config.show_progress,
            ));
            self.recorded_frames = 0;
            self.unthrottled = true;
        }

        let geometry = self.geometries.get(self.index).ok_or_else(|| self.out_of_range(self.index))?;
        self.viewer.add_geometry(self.index, geometry, true)?;
        self.displayed = Some(self.index);
        Ok(())
    }

    /// Run the tick loop until the window closes or playback ends
    pub fn play(&mut self) -> Result<()> {
        self.start()?;
        while self.tick()? {}
        Ok(())
    }

    /// Enter the playing state without running the loop, for callers that
    /// drive [`SequencePlayer::tick`] themselves
    pub fn start(&mut self) -> Result<()> {
        if !self.window_open {
            return Err(Error::Window("open the player before playing".to_string()));
        }

        self.state = PlaybackState::Playing;
        let now = self.clock.now_millis();
        self.last_advance = now;
        self.fps.reset(now);
        Ok(())
    }

    /// Run one iteration of the loop. Returns false once playback is over.
    pub fn tick(&mut self) -> Result<bool> {
        let (x, y) = self.config.rotation;
        if x != 0.0 || y != 0.0 {
            self.viewer.rotate(x, y);
        }

        if !self.viewer.poll_events()? {
            log::info!("window closed");
            self.close()?;
            return Ok(false);
        }

        for command in self.viewer.drain_commands() {
            if !self.apply_command(command)? {
                return Ok(false);
            }
        }

        self.viewer.update_renderer()?;

        if !self.geometries.is_empty() && self.is_playing() {
            if self.writer.is_some() {
                self.record_frame()?;
            }

            let now = self.clock.now_millis();
            let elapsed = now.saturating_sub(self.last_advance) as f64;
            if self.unthrottled || elapsed > self.config.frame_interval_ms() {
                self.last_advance = now;
                self.next_frame()?;
            }
        }

        if let Some(fps) = self.fps.update(self.clock.now_millis()) {
            if self.config.debug {
                self.debug_log(format_args!("FPS: {:.1}", fps));
            }
        }

        Ok(self.state != PlaybackState::Stopped)
    }

    fn apply_command(&mut self, command: PlayerCommand) -> Result<bool> {
        self.debug_log(format_args!("command {:?}", command));
        match command {
            PlayerCommand::TogglePause => self.toggle_pause(),
            PlayerCommand::Jump(index) => self.show_frame(index)?,
            PlayerCommand::Close => {
                self.close()?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Display `index` right away and restart the frame interval from now.
    /// Ignored while recording, where every geometry is written exactly once.
    fn show_frame(&mut self, index: usize) -> Result<()> {
        if self.writer.is_some() {
            self.debug_log(format_args!("ignoring jump to {} while recording", index));
            return Ok(());
        }
        if self.geometries.is_empty() {
            return Ok(());
        }
        self.swap_to(index)?;
        self.last_advance = self.clock.now_millis();
        Ok(())
    }

    /// Debug logging that does not tear the rendering progress bar
    fn debug_log(&self, args: std::fmt::Arguments<'_>) {
        match &self.render_progress {
            Some(bar) => bar.suspend(|| log::debug!("{}", args)),
            None => log::debug!("{}", args),
        }
    }

    fn record_frame(&mut self) -> Result<()> {
        let frame = self.viewer.capture_frame()?;
        if let Some(writer) = self.writer.as_mut() {
            writer.write(&frame)?;
            self.recorded_frames += 1;
            if let Some(bar) = &self.render_progress {
                bar.inc(1);
            }
        }
        Ok(())
    }

    /// Advance to the next geometry, or stop at the end of a non-looping sequence
    fn next_frame(&mut self) -> Result<()> {
        let len = self.geometries.len();
        if self.index >= len {
            return Err(self.out_of_range(self.index));
        }

        if !self.config.loop_playback && self.index + 1 == len {
            self.finish_recording()?;
            self.state = PlaybackState::Stopped;
            log::info!("reached the end of the sequence");
            return Ok(());
        }

        self.swap_to((self.index + 1) % len)
    }

    fn swap_to(&mut self, index: usize) -> Result<()> {
        let geometry = self.geometries.get(index).ok_or_else(|| self.out_of_range(index))?;
        if let Some(id) = self.displayed.take() {
            self.viewer.remove_geometry(id)?;
        }
        self.viewer.add_geometry(index, geometry, false)?;
        self.displayed = Some(index);
        self.index = index;
        Ok(())
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::InvalidData(format!(
            "frame index {} is out of range for {} geometries",
            index,
            self.geometries.len()
        ))
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
            self.last_advance = self.clock.now_millis();
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => {}
        }
    }

    /// Set the current index. The index is not checked here; an index past
    /// the end makes the next frame advance fail.
    pub fn jump(&mut self, index: usize) {
        self.index = index;
    }

    /// Stop playback, finish any recording and close the window
    pub fn close(&mut self) -> Result<()> {
        self.state = PlaybackState::Stopped;
        let finished = self.finish_recording();

        if self.window_open {
            self.viewer.destroy_window();
            self.window_open = false;
            self.displayed = None;
        }
        finished
    }

    fn finish_recording(&mut self) -> Result<()> {
        self.unthrottled = false;
        if let Some(bar) = self.render_progress.take() {
            bar.finish();
        }
        if let Some(mut writer) = self.writer.take() {
            writer.release()?;
            log::info!("recorded {} frames", self.recorded_frames);
        }
        Ok(())
    }
}

impl<V: Viewer, E: Encoder, C: Clock> Drop for SequencePlayer<V, E, C> {
    fn drop(&mut self) {
        if self.window_open || self.writer.is_some() {
            if let Err(e) = self.close() {
                log::warn!("closing player: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::RecordingConfig;
    use crate::frame::Frame;
    use meshseq_core::{Point3f, PointCloud};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Add(usize, bool),
        Remove(usize),
        Capture,
        Destroy,
    }

    #[derive(Default)]
    struct FakeViewer {
        calls: Vec<Call>,
        polls_until_close: Option<usize>,
        commands: Vec<PlayerCommand>,
        background: Option<[f32; 3]>,
        rotations: Vec<(f32, f32)>,
    }

    impl Viewer for FakeViewer {
        fn create_window(&mut self, _options: &WindowOptions) -> Result<()> {
            Ok(())
        }

        fn set_background_color(&mut self, color: [f32; 3]) -> Result<()> {
            self.background = Some(color);
            Ok(())
        }

        fn add_geometry(&mut self, id: usize, _geometry: &Geometry, reset_bounding_box: bool) -> Result<()> {
            self.calls.push(Call::Add(id, reset_bounding_box));
            Ok(())
        }

        fn remove_geometry(&mut self, id: usize) -> Result<()> {
            self.calls.push(Call::Remove(id));
            Ok(())
        }

        fn rotate(&mut self, x: f32, y: f32) {
            self.rotations.push((x, y));
        }

        fn poll_events(&mut self) -> Result<bool> {
            match self.polls_until_close.as_mut() {
                Some(0) => Ok(false),
                Some(n) => {
                    *n -= 1;
                    Ok(true)
                }
                None => Ok(true),
            }
        }

        fn drain_commands(&mut self) -> Vec<PlayerCommand> {
            std::mem::take(&mut self.commands)
        }

        fn update_renderer(&mut self) -> Result<()> {
            Ok(())
        }

        fn capture_frame(&mut self) -> Result<Frame> {
            self.calls.push(Call::Capture);
            Ok(Frame::filled(4, 4, [0, 0, 0]))
        }

        fn destroy_window(&mut self) {
            self.calls.push(Call::Destroy);
        }
    }

    #[derive(Default)]
    struct CountingEncoder {
        configs: Vec<EncodeConfig>,
    }

    struct CountingWriter;

    impl VideoWriter for CountingWriter {
        fn write(&mut self, _frame: &Frame) -> Result<()> {
            Ok(())
        }

        fn release(&mut self) -> Result<()> {
            Ok(())
        }
    }

    impl Encoder for CountingEncoder {
        type Writer = CountingWriter;

        fn create(&mut self, config: &EncodeConfig) -> Result<CountingWriter> {
            self.configs.push(config.clone());
            Ok(CountingWriter)
        }
    }

    fn sequence(n: usize) -> Vec<Geometry> {
        (0..n)
            .map(|i| PointCloud::from_points(vec![Point3f::new(i as f32, 0.0, 0.0)]).into())
            .collect()
    }

    fn player(config: PlayerConfig) -> (SequencePlayer<FakeViewer, CountingEncoder, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = PlayerConfig {
            show_progress: false,
            ..config
        };
        let player = SequencePlayer::with_clock(config, FakeViewer::default(), CountingEncoder::default(), clock.clone());
        (player, clock)
    }

    fn adds(calls: &[Call]) -> Vec<usize> {
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Add(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn start(player: &mut SequencePlayer<FakeViewer, CountingEncoder, ManualClock>) {
        player.open(&WindowOptions::default()).unwrap();
        player.start().unwrap();
    }

    #[test]
    fn test_open_shows_current_geometry_with_bbox_reset() {
        let (mut player, _) = player(PlayerConfig::default());
        player.set_geometries(sequence(3)).unwrap();
        player.open(&WindowOptions::default()).unwrap();

        assert!(player.is_open());
        assert_eq!(player.viewer.calls, vec![Call::Add(0, true)]);
        assert_eq!(player.viewer.background, Some([1.0, 1.0, 1.0]));
        assert!(player.open(&WindowOptions::default()).is_err());
    }

    #[test]
    fn test_throttle_follows_frame_interval() {
        let (mut player, clock) = player(PlayerConfig {
            fps: 10,
            ..Default::default()
        });
        player.set_geometries(sequence(3)).unwrap();
        start(&mut player);

        assert!(player.tick().unwrap());
        assert_eq!(player.index(), 0);

        clock.advance(100);
        player.tick().unwrap();
        assert_eq!(player.index(), 0, "advance needs strictly more than the interval");

        clock.advance(1);
        player.tick().unwrap();
        assert_eq!(player.index(), 1);
        assert_eq!(&player.viewer.calls[1..], &[Call::Remove(0), Call::Add(1, false)]);
    }

    #[test]
    fn test_looping_wraps_to_zero() {
        let (mut player, clock) = player(PlayerConfig::default());
        player.set_geometries(sequence(3)).unwrap();
        start(&mut player);

        let mut visited = Vec::new();
        for _ in 0..6 {
            clock.advance(100);
            assert!(player.tick().unwrap());
            visited.push(player.index());
        }
        assert_eq!(visited, vec![1, 2, 0, 1, 2, 0]);
        assert!(player.is_playing());
    }

    #[test]
    fn test_non_looping_stops_at_last_without_swapping() {
        let (mut player, clock) = player(PlayerConfig {
            loop_playback: false,
            ..Default::default()
        });
        player.set_geometries(sequence(2)).unwrap();
        start(&mut player);

        clock.advance(100);
        assert!(player.tick().unwrap());
        assert_eq!(player.index(), 1);

        let calls_before = player.viewer.calls.len();
        clock.advance(100);
        assert!(!player.tick().unwrap());
        assert!(!player.is_playing());
        assert_eq!(player.index(), 1);
        assert_eq!(player.viewer.calls.len(), calls_before);
    }

    #[test]
    fn test_pause_stops_advancing() {
        let (mut player, clock) = player(PlayerConfig::default());
        player.set_geometries(sequence(3)).unwrap();
        start(&mut player);

        player.viewer.commands.push(PlayerCommand::TogglePause);
        clock.advance(100);
        assert!(player.tick().unwrap());
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.index(), 0);

        player.resume();
        clock.advance(100);
        player.tick().unwrap();
        assert_eq!(player.index(), 1);
    }

    #[test]
    fn test_out_of_range_jump_fails_on_next_swap() {
        let (mut player, clock) = player(PlayerConfig::default());
        player.set_geometries(sequence(3)).unwrap();
        start(&mut player);

        player.jump(7);
        assert_eq!(player.index(), 7);
        clock.advance(100);
        assert!(matches!(player.tick(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_jump_sets_next_advance_origin() {
        let (mut player, clock) = player(PlayerConfig::default());
        player.set_geometries(sequence(4)).unwrap();
        start(&mut player);

        player.jump(2);
        clock.advance(100);
        player.tick().unwrap();
        assert_eq!(player.index(), 3);
        assert_eq!(adds(&player.viewer.calls), vec![0, 3]);
    }

    #[test]
    fn test_rewind_command_shows_first_frame() {
        let (mut player, clock) = player(PlayerConfig::default());
        player.set_geometries(sequence(4)).unwrap();
        start(&mut player);

        for _ in 0..2 {
            clock.advance(100);
            player.tick().unwrap();
        }
        assert_eq!(player.index(), 2);

        clock.advance(10);
        player.viewer.commands.push(PlayerCommand::Jump(0));
        player.tick().unwrap();
        assert_eq!(player.index(), 0);
        assert_eq!(adds(&player.viewer.calls), vec![0, 1, 2, 0]);
        assert_eq!(player.viewer.calls.last(), Some(&Call::Add(0, false)));

        // The interval restarts at the rewind
        clock.advance(41);
        player.tick().unwrap();
        assert_eq!(player.index(), 0);
        clock.advance(1);
        player.tick().unwrap();
        assert_eq!(player.index(), 1);
    }

    #[test]
    fn test_rewind_while_paused_updates_display() {
        let (mut player, clock) = player(PlayerConfig::default());
        player.set_geometries(sequence(3)).unwrap();
        start(&mut player);

        clock.advance(100);
        player.tick().unwrap();
        player.pause();

        player.viewer.commands.push(PlayerCommand::Jump(0));
        player.tick().unwrap();
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.index(), 0);
        assert_eq!(&player.viewer.calls[player.viewer.calls.len() - 2..], &[Call::Remove(1), Call::Add(0, false)]);
    }

    #[test]
    fn test_rewind_ignored_while_recording() {
        let (mut player, _) = player(PlayerConfig {
            loop_playback: false,
            recording: Some(RecordingConfig::new("/tmp/out.mp4")),
            ..Default::default()
        });
        player.set_geometries(sequence(3)).unwrap();
        start(&mut player);

        player.tick().unwrap();
        player.viewer.commands.push(PlayerCommand::Jump(0));
        while player.tick().unwrap() {}

        assert_eq!(player.recorded_frames(), 3);
        assert_eq!(adds(&player.viewer.calls), vec![0, 1, 2]);
    }

    #[test]
    fn test_rotation_applied_every_tick() {
        let (mut still, _) = player(PlayerConfig::default());
        let (mut player, clock) = player(PlayerConfig {
            rotation: (2.0, -0.5),
            ..Default::default()
        });
        player.set_geometries(sequence(2)).unwrap();
        start(&mut player);

        for _ in 0..3 {
            clock.advance(10);
            player.tick().unwrap();
        }
        assert_eq!(player.viewer.rotations, vec![(2.0, -0.5); 3]);

        // No configured rotation leaves the camera alone
        still.set_geometries(sequence(2)).unwrap();
        start(&mut still);
        still.tick().unwrap();
        assert!(still.viewer.rotations.is_empty());
    }

    #[test]
    fn test_debug_logging_with_active_bar() {
        let (mut player, _) = player(PlayerConfig {
            debug: true,
            recording: Some(RecordingConfig::new("/tmp/out.mp4")),
            ..Default::default()
        });
        player.set_geometries(sequence(2)).unwrap();
        start(&mut player);
        assert!(player.render_progress.is_some());

        player.viewer.commands.push(PlayerCommand::TogglePause);
        player.tick().unwrap();
        player.debug_log(format_args!("frame {}", player.index()));
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_window_close_stops_and_destroys() {
        let (mut player, _) = player(PlayerConfig::default());
        player.set_geometries(sequence(2)).unwrap();
        player.viewer.polls_until_close = Some(2);
        player.open(&WindowOptions::default()).unwrap();

        player.play().unwrap();
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(!player.is_open());
        assert_eq!(player.viewer.calls.last(), Some(&Call::Destroy));
    }

    #[test]
    fn test_close_command() {
        let (mut player, _) = player(PlayerConfig::default());
        player.set_geometries(sequence(2)).unwrap();
        player.viewer.commands.push(PlayerCommand::Close);
        player.open(&WindowOptions::default()).unwrap();

        player.play().unwrap();
        assert!(!player.is_open());
    }

    #[test]
    fn test_recording_writes_one_frame_per_geometry() {
        let (mut player, _) = player(PlayerConfig {
            fps: 30,
            loop_playback: false,
            recording: Some(RecordingConfig::new("/tmp/out.mp4")),
            ..Default::default()
        });
        player.set_geometries(sequence(4)).unwrap();
        player.open(&WindowOptions::default()).unwrap();
        assert!(player.is_recording());

        // The manual clock never moves, recording must not wait for it
        player.play().unwrap();

        assert_eq!(player.recorded_frames(), 4);
        assert!(!player.is_recording());
        assert_eq!(player.encoder.configs.len(), 1);
        assert_eq!(player.encoder.configs[0].fps, 30);
        assert_eq!(player.encoder.configs[0].width, 512);
        assert_eq!(adds(&player.viewer.calls), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_sequence_idles() {
        let (mut player, clock) = player(PlayerConfig {
            recording: Some(RecordingConfig::new("/tmp/out.mp4")),
            ..Default::default()
        });
        player.open(&WindowOptions::default()).unwrap();
        assert!(!player.is_recording());
        assert!(player.encoder.configs.is_empty());

        player.start().unwrap();
        for _ in 0..3 {
            clock.advance(1000);
            assert!(player.tick().unwrap());
        }
        assert!(player.viewer.calls.is_empty());
    }

    #[test]
    fn test_set_geometries_replaces_display() {
        let (mut player, _) = player(PlayerConfig::default());
        player.set_geometries(sequence(2)).unwrap();
        player.open(&WindowOptions::default()).unwrap();

        player.set_geometries(sequence(5)).unwrap();
        assert_eq!(player.geometries().len(), 5);
        assert_eq!(player.viewer.calls, vec![Call::Add(0, true), Call::Remove(0), Call::Add(0, true)]);
    }

    #[test]
    fn test_play_requires_open_window() {
        let (mut player, _) = player(PlayerConfig::default());
        assert!(matches!(player.play(), Err(Error::Window(_))));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            std::fs::write(
                dir.path().join(format!("{}.obj", i)),
                "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
            )
            .unwrap();
        }
        std::fs::write(dir.path().join("ignored.ply"), "").unwrap();

        let (mut player, _) = player(PlayerConfig::default());
        assert_eq!(player.load(dir.path(), "*.obj").unwrap(), 3);
        assert!(player.geometries().iter().all(|g| g.triangle_count() == 1));
    }
}
