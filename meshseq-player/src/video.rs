//! Video recording through the system `ffmpeg` binary
//!
//! [`FfmpegEncoder`] spawns `ffmpeg` and streams raw RGB24 frames to its
//! stdin. `ffmpeg` must be installed and on `PATH`; when it is not, creating
//! a writer returns [`Error::Encoder`].

use crate::frame::Frame;
use meshseq_core::{Error, Result};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

/// Output stream parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeConfig {
    pub path: PathBuf,
    pub fourcc: [u8; 4],
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl EncodeConfig {
    pub fn fourcc_str(&self) -> String {
        String::from_utf8_lossy(&self.fourcc).into_owned()
    }
}

/// Creates video writers
pub trait Encoder {
    type Writer: VideoWriter;

    fn create(&mut self, config: &EncodeConfig) -> Result<Self::Writer>;
}

/// An open video stream
pub trait VideoWriter {
    /// Append one frame; its size must match the stream
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close the stream. Further writes fail.
    fn release(&mut self) -> Result<()>;
}

/// Encoder backed by an `ffmpeg` subprocess
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific ffmpeg executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    fn arguments(config: &EncodeConfig) -> Result<Vec<String>> {
        let codec = codec_for_fourcc(&config.fourcc)?;
        let mut args: Vec<String> = [
            "-hide_banner", "-loglevel", "error", "-y",
            "-f", "rawvideo", "-pix_fmt", "rgb24",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        args.extend([
            "-s".to_string(),
            format!("{}x{}", config.width, config.height),
            "-r".to_string(),
            config.fps.to_string(),
            "-i".to_string(),
            "-".to_string(),
            "-c:v".to_string(),
            codec.to_string(),
            "-vtag".to_string(),
            config.fourcc_str(),
            "-q:v".to_string(),
            "2".to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
        ]);
        args.push(config.path.to_string_lossy().into_owned());
        Ok(args)
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for FfmpegEncoder {
    type Writer = FfmpegWriter;

    fn create(&mut self, config: &EncodeConfig) -> Result<FfmpegWriter> {
        if config.width == 0 || config.height == 0 || config.fps == 0 {
            return Err(Error::Encoder(format!(
                "invalid stream {}x{} at {} fps",
                config.width, config.height, config.fps
            )));
        }

        let args = Self::arguments(config)?;
        log::debug!("spawning {} {}", self.program.display(), args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::Encoder(format!(
                    "'{}' not found; install ffmpeg and make sure it is on PATH",
                    self.program.display()
                )),
                _ => Error::Encoder(format!("failed to start ffmpeg: {}", e)),
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Encoder("ffmpeg stdin is not available".to_string()))?;

        log::info!(
            "recording {}x{} at {} fps to {}",
            config.width,
            config.height,
            config.fps,
            config.path.display()
        );

        Ok(FfmpegWriter {
            config: config.clone(),
            child: Some(child),
            stdin: Some(BufWriter::new(stdin)),
            frames: 0,
        })
    }
}

/// Map a fourcc to the ffmpeg encoder producing it
fn codec_for_fourcc(fourcc: &[u8; 4]) -> Result<&'static str> {
    match fourcc {
        b"mp4v" | b"MP4V" | b"FMP4" => Ok("mpeg4"),
        b"avc1" | b"H264" | b"h264" => Ok("libx264"),
        b"MJPG" | b"mjpg" => Ok("mjpeg"),
        _ => Err(Error::Encoder(format!(
            "unsupported fourcc '{}'",
            String::from_utf8_lossy(fourcc)
        ))),
    }
}

/// Writer feeding an `ffmpeg` child process
pub struct FfmpegWriter {
    config: EncodeConfig,
    child: Option<Child>,
    stdin: Option<BufWriter<ChildStdin>>,
    frames: u64,
}

impl FfmpegWriter {
    /// Frames written so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl VideoWriter for FfmpegWriter {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        if frame.width != self.config.width || frame.height != self.config.height {
            return Err(Error::Encoder(format!(
                "frame is {}x{} but the stream is {}x{}",
                frame.width, frame.height, self.config.width, self.config.height
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Error::Encoder("video writer already released".to_string()))?;
        stdin
            .write_all(&frame.rgb)
            .map_err(|e| Error::Encoder(format!("failed to write frame {}: {}", self.frames, e)))?;
        self.frames += 1;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // Closing stdin signals end of stream
        let flushed = match self.stdin.take() {
            Some(mut stdin) => stdin.flush(),
            None => Ok(()),
        };

        let status = child.wait()?;
        flushed.map_err(|e| Error::Encoder(format!("failed to flush frames: {}", e)))?;
        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            return Err(Error::Encoder(format!(
                "ffmpeg exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        log::info!("wrote {} frames to {}", self.frames, self.config.path.display());
        Ok(())
    }
}

impl Drop for FfmpegWriter {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("closing video writer: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EncodeConfig {
        EncodeConfig {
            path: PathBuf::from("/tmp/out.mp4"),
            fourcc: *b"mp4v",
            fps: 24,
            width: 64,
            height: 48,
        }
    }

    #[test]
    fn test_arguments() {
        let args = FfmpegEncoder::arguments(&config()).unwrap();
        let joined = args.join(" ");
        assert!(joined.contains("-f rawvideo -pix_fmt rgb24"));
        assert!(joined.contains("-s 64x48 -r 24 -i -"));
        assert!(joined.contains("-c:v mpeg4 -vtag mp4v"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn test_unknown_fourcc() {
        let config = EncodeConfig {
            fourcc: *b"XXXX",
            ..config()
        };
        assert!(matches!(FfmpegEncoder::arguments(&config), Err(Error::Encoder(_))));
    }

    #[test]
    fn test_missing_program_is_encoder_error() {
        let mut encoder = FfmpegEncoder::with_program("/nonexistent/ffmpeg-binary");
        match encoder.create(&config()) {
            Err(Error::Encoder(message)) => assert!(message.contains("not found")),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("writer created without ffmpeg"),
        }
    }

    #[test]
    fn test_invalid_stream_rejected() {
        let mut encoder = FfmpegEncoder::new();
        let config = EncodeConfig { fps: 0, ..config() };
        assert!(encoder.create(&config).is_err());
    }
}
