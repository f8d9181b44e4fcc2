//! The display seam used by the sequence player

use crate::config::WindowOptions;
use crate::frame::Frame;
use meshseq_core::{Geometry, Result};

/// Keyboard requests forwarded from the window to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    TogglePause,
    /// Jump to the given sequence index
    Jump(usize),
    Close,
}

/// A window that shows geometries and can read back what it rendered
///
/// Geometries are identified by the caller's id so that a frame swap is one
/// `remove_geometry` followed by one `add_geometry`.
pub trait Viewer {
    fn create_window(&mut self, options: &WindowOptions) -> Result<()>;

    /// Set the clear color, components in `0.0..=1.0`
    fn set_background_color(&mut self, color: [f32; 3]) -> Result<()>;

    /// Add a geometry to the scene. With `reset_bounding_box` the camera is
    /// fitted to it.
    fn add_geometry(&mut self, id: usize, geometry: &Geometry, reset_bounding_box: bool) -> Result<()>;

    fn remove_geometry(&mut self, id: usize) -> Result<()>;

    /// Orbit the camera by a horizontal and vertical amount
    fn rotate(&mut self, x: f32, y: f32);

    /// Process pending window events. Returns false once the window is closed.
    fn poll_events(&mut self) -> Result<bool>;

    /// Commands produced by input since the last call
    fn drain_commands(&mut self) -> Vec<PlayerCommand>;

    /// Redraw the scene
    fn update_renderer(&mut self) -> Result<()>;

    /// Read back the last rendered image
    fn capture_frame(&mut self) -> Result<Frame>;

    fn destroy_window(&mut self);
}
