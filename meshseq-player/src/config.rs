//! Player and window configuration

use meshseq_core::GeometryKind;
use std::path::PathBuf;

/// Video recording settings
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingConfig {
    /// Output file, normally ending in `.mp4`
    pub path: PathBuf,
    /// Four character codec tag
    pub fourcc: [u8; 4],
}

impl RecordingConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fourcc: *b"mp4v",
        }
    }
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Playback rate in frames per second
    pub fps: u32,
    pub loop_playback: bool,
    /// Camera rotation applied on every tick (horizontal, vertical)
    pub rotation: (f32, f32),
    /// Background color as 8-bit RGB
    pub background_color: [u8; 3],
    /// Log the measured render rate
    pub debug: bool,
    /// Load sequentially with textures instead of in parallel
    pub load_safe: bool,
    pub kind: GeometryKind,
    /// Show progress bars for loading and recording
    pub show_progress: bool,
    pub recording: Option<RecordingConfig>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            loop_playback: true,
            rotation: (0.0, 0.0),
            background_color: [255, 255, 255],
            debug: false,
            load_safe: false,
            kind: GeometryKind::Auto,
            show_progress: true,
            recording: None,
        }
    }
}

impl PlayerConfig {
    /// Milliseconds between frame advances at `fps`
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps.max(1) as f64
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }
}

/// Preview window parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Mesh Sequence Player".to_string(),
            width: 512,
            height: 512,
            visible: true,
        }
    }
}
