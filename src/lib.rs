//! # mesh-sequence-player
//!
//! Play back a directory of meshes or point clouds as an animation, and
//! optionally record the playback to an MP4 file.
//!
//! This is the umbrella crate over the workspace:
//!
//! - **Core** (`meshseq-core`): `TriangleMesh`, `PointCloud`, `Geometry` and the error type
//! - **I/O** (`meshseq-io`): OBJ/PLY readers and the safe/fast sequence loader
//! - **Player** (`meshseq-player`): the sequence player, the wgpu viewer and the ffmpeg encoder
//!
//! ## Quick Start
//!
//! ```no_run
//! use mesh_sequence_player::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = PlayerConfig {
//!     fps: 30,
//!     ..Default::default()
//! };
//! let mut player = SequencePlayer::new(config, WgpuViewer::new(), FfmpegEncoder::new());
//! player.load("frames", "*.ply")?;
//! player.open(&WindowOptions::default())?;
//! player.play()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;

pub use meshseq_core::*;

pub use meshseq_io as io;
pub use meshseq_player as player;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshseq_core::*;
    pub use meshseq_io::{get_files_in_path, load_geometries, read_geometry, LoadOptions, LoadStrategy, ReadOptions};
    pub use meshseq_player::{
        Encoder, FfmpegEncoder, PlaybackState, PlayerConfig, RecordingConfig, SequencePlayer, VideoWriter, Viewer,
        WgpuViewer, WindowOptions,
    };
}
