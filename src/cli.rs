//! Command-line interface
use clap::{Parser, ValueEnum};
use meshseq_core::GeometryKind;
use meshseq_player::{PlayerConfig, RecordingConfig, WindowOptions};
use std::io;
use std::path::{Path, PathBuf};

const TITLE: &str = "Mesh Sequence Player";

#[derive(Parser, Debug, Clone)]
#[command(name = "mesh-sequence-player")]
#[command(about = "Play back a directory of meshes or point clouds", long_about = None)]
pub struct Cli {
    /// Directory holding the sequence
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// File name pattern of the sequence files
    #[arg(long, default_value = "*.obj")]
    pub format: String,

    /// Playback rate in frames per second
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Stop at the last frame instead of looping
    #[arg(long = "no-loop")]
    pub no_loop: bool,

    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Background color as R G B
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], default_values_t = [255u8, 255, 255])]
    pub background: Vec<u8>,

    /// Do not show the preview window
    #[arg(long)]
    pub hidden: bool,

    /// Horizontal camera rotation per frame
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub rotate: f32,

    /// Record the playback to an mp4 file (implies --no-loop)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Load sequentially with textures instead of in parallel
    #[arg(long = "load-safe")]
    pub load_safe: bool,

    /// How files are interpreted
    #[arg(long, value_enum, default_value_t = KindArg::Auto)]
    pub kind: KindArg,

    /// Print debug output such as the render rate
    #[arg(long)]
    pub debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Auto,
    Mesh,
    PointCloud,
}

impl From<KindArg> for GeometryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Auto => GeometryKind::Auto,
            KindArg::Mesh => GeometryKind::Mesh,
            KindArg::PointCloud => GeometryKind::PointCloud,
        }
    }
}

impl Cli {
    /// Build the player configuration; `cwd` resolves a relative output path
    pub fn player_config(&self, cwd: &Path) -> PlayerConfig {
        let recording = self
            .output
            .as_deref()
            .map(|output| RecordingConfig::new(normalize_output(output, cwd)));

        let mut background = [255u8; 3];
        for (channel, value) in background.iter_mut().zip(&self.background) {
            *channel = *value;
        }

        PlayerConfig {
            fps: self.fps,
            loop_playback: !self.no_loop && recording.is_none(),
            rotation: (self.rotate, 0.0),
            background_color: background,
            debug: self.debug,
            load_safe: self.load_safe,
            kind: self.kind.into(),
            show_progress: true,
            recording,
        }
    }

    pub fn window_options(&self) -> WindowOptions {
        WindowOptions {
            title: window_title(&self.input),
            width: self.width,
            height: self.height,
            visible: !self.hidden,
        }
    }
}

/// Make `output` absolute against `cwd` and make sure it ends in `.mp4`
pub fn normalize_output(output: &Path, cwd: &Path) -> PathBuf {
    let mut path = if output.is_absolute() {
        output.to_path_buf()
    } else {
        cwd.join(output)
    };

    let is_mp4 = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"));
    if !is_mp4 {
        let mut name = path.clone().into_os_string();
        name.push(".mp4");
        path = PathBuf::from(name);
    }
    path
}

/// Create the directories an output file will be written into
pub fn prepare_output(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// `Mesh Sequence Player - <dir name>`
pub fn window_title(input: &Path) -> String {
    let resolved = input.canonicalize().unwrap_or_else(|_| input.to_path_buf());
    match resolved.file_name() {
        Some(name) => format!("{} - {}", TITLE, name.to_string_lossy()),
        None => TITLE.to_string(),
    }
}
