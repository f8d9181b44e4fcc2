//! Sequence playback for meshes and point clouds
//!
//! This crate plays a loaded geometry sequence in a window at a fixed frame
//! rate and can record the playback to video:
//! - [`SequencePlayer`]: the playback state machine and tick loop
//! - [`Viewer`] / [`WgpuViewer`]: the display seam and its winit + wgpu implementation
//! - [`Encoder`] / [`FfmpegEncoder`]: the recording seam and its ffmpeg implementation

pub mod camera;
pub mod clock;
pub mod config;
pub mod device;
pub mod fps;
pub mod frame;
pub mod player;
pub mod renderer;
pub mod shaders;
pub mod video;
pub mod viewer;
pub mod window;

pub use camera::Camera;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{PlayerConfig, RecordingConfig, WindowOptions};
pub use fps::FpsCounter;
pub use frame::Frame;
pub use player::{PlaybackState, SequencePlayer};
pub use video::{EncodeConfig, Encoder, FfmpegEncoder, FfmpegWriter, VideoWriter};
pub use viewer::{PlayerCommand, Viewer};
pub use window::WgpuViewer;

/// The player as used by the command line tool
pub type DesktopPlayer = SequencePlayer<WgpuViewer, FfmpegEncoder>;
