//! Rolling frames-per-second measurement

/// Counts ticks and publishes a rate once per second
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: u64,
    frames: u32,
    fps: f64,
}

impl FpsCounter {
    const WINDOW_MS: u64 = 1000;

    pub fn new(now_millis: u64) -> Self {
        Self {
            window_start: now_millis,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Start a new measurement window at `now_millis`
    pub fn reset(&mut self, now_millis: u64) {
        self.window_start = now_millis;
        self.frames = 0;
        self.fps = 0.0;
    }

    /// Count one frame; returns the new rate when a window just closed
    pub fn update(&mut self, now_millis: u64) -> Option<f64> {
        self.frames += 1;
        let elapsed = now_millis.saturating_sub(self.window_start);
        if elapsed < Self::WINDOW_MS {
            return None;
        }

        self.fps = self.frames as f64 * 1000.0 / elapsed as f64;
        self.window_start = now_millis;
        self.frames = 0;
        Some(self.fps)
    }

    /// Rate measured over the last completed window
    pub fn fps(&self) -> f64 {
        self.fps
    }
}
