use anyhow::{Context, Result};
use clap::Parser;
use mesh_sequence_player::cli::{prepare_output, Cli};
use mesh_sequence_player::player::{FfmpegEncoder, SequencePlayer, WgpuViewer};

fn init_log(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_log(cli.debug);

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let config = cli.player_config(&cwd);
    if let Some(recording) = &config.recording {
        prepare_output(&recording.path)
            .with_context(|| format!("Failed to create the output directory for {}", recording.path.display()))?;
        log::info!("recording to {}", recording.path.display());
    }
    let window = cli.window_options();

    let mut player = SequencePlayer::new(config, WgpuViewer::new(), FfmpegEncoder::new());
    let count = player
        .load(&cli.input, &cli.format)
        .with_context(|| format!("Failed to load '{}' from {}", cli.format, cli.input.display()))?;
    log::info!("playing {} frames at {} fps", count, cli.fps);

    player.open(&window).context("Failed to open the player window")?;
    player.play().context("Playback failed")?;
    player.close().context("Failed to finish the session")?;
    Ok(())
}
