//! winit + wgpu implementation of [`Viewer`]
//!
//! The player owns the loop, so events are pumped once per tick instead of
//! handing control to `EventLoop::run`. A hidden window gets no surface and
//! renders only when a frame is captured.

use crate::camera::Camera;
use crate::config::WindowOptions;
use crate::device::GpuContext;
use crate::frame::Frame;
use crate::renderer::SceneRenderer;
use crate::viewer::{PlayerCommand, Viewer};
use meshseq_core::{Error, Geometry, Result};
use std::sync::Arc;
use std::time::Duration;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

/// Format of the off-screen target when there is no surface to match
const HIDDEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

struct SurfaceState {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

/// Desktop viewer window
pub struct WgpuViewer {
    // winit allows a single event loop per process, so it outlives windows
    event_loop: Option<EventLoop<()>>,
    window: Option<Arc<Window>>,
    surface: Option<SurfaceState>,
    renderer: Option<SceneRenderer>,
    camera: Camera,
    background: [f32; 3],
    commands: Vec<PlayerCommand>,
    closed: bool,
}

impl WgpuViewer {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            window: None,
            surface: None,
            renderer: None,
            camera: Camera::default(),
            background: [1.0; 3],
            commands: Vec::new(),
            closed: false,
        }
    }

    fn renderer_mut(&mut self) -> Result<&mut SceneRenderer> {
        self.renderer
            .as_mut()
            .ok_or_else(|| Error::Window("window has not been created".to_string()))
    }
}

impl Default for WgpuViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer for WgpuViewer {
    fn create_window(&mut self, options: &WindowOptions) -> Result<()> {
        if self.event_loop.is_none() {
            let event_loop =
                EventLoop::new().map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;
            self.event_loop = Some(event_loop);
        }
        let Some(event_loop) = self.event_loop.as_ref() else {
            return Err(Error::Window("event loop unavailable".to_string()));
        };

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&options.title)
                .with_inner_size(PhysicalSize::new(options.width, options.height))
                .with_resizable(false)
                .with_visible(options.visible)
                .build(event_loop)
                .map_err(|e| Error::Window(format!("Failed to create window: {}", e)))?,
        );

        let surface_window = options.visible.then(|| window.clone());
        let (gpu, surface) = pollster::block_on(GpuContext::new(surface_window))?;

        let (format, surface) = match surface {
            Some(surface) => {
                let caps = surface.get_capabilities(&gpu.adapter);
                let format = caps
                    .formats
                    .iter()
                    .copied()
                    .find(|f| f.is_srgb())
                    .or_else(|| caps.formats.first().copied())
                    .ok_or_else(|| Error::Gpu("surface reports no formats".to_string()))?;

                let config = wgpu::SurfaceConfiguration {
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    format,
                    width: options.width,
                    height: options.height,
                    present_mode: wgpu::PresentMode::AutoNoVsync,
                    alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
                    view_formats: vec![],
                    desired_maximum_frame_latency: 2,
                };
                surface.configure(&gpu.device, &config);
                (format, Some(SurfaceState { surface, config }))
            }
            None => (HIDDEN_FORMAT, None),
        };

        let mut renderer = SceneRenderer::new(gpu, format, options.width, options.height);
        renderer.set_background(self.background);

        log::debug!(
            "created {}x{} window '{}' ({:?}, visible: {})",
            options.width,
            options.height,
            options.title,
            format,
            options.visible
        );

        self.camera = Camera::new(options.width as f32 / options.height.max(1) as f32);
        self.window = Some(window);
        self.surface = surface;
        self.renderer = Some(renderer);
        self.commands.clear();
        self.closed = false;
        Ok(())
    }

    fn set_background_color(&mut self, color: [f32; 3]) -> Result<()> {
        self.background = color;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_background(color);
        }
        Ok(())
    }

    fn add_geometry(&mut self, id: usize, geometry: &Geometry, reset_bounding_box: bool) -> Result<()> {
        if reset_bounding_box {
            if let Some(bounds) = geometry.bounds() {
                self.camera.fit(&bounds);
            }
        }
        self.renderer_mut()?.add_geometry(id, geometry);
        Ok(())
    }

    fn remove_geometry(&mut self, id: usize) -> Result<()> {
        if !self.renderer_mut()?.remove_geometry(id) {
            log::debug!("geometry {} was not in the scene", id);
        }
        Ok(())
    }

    fn rotate(&mut self, x: f32, y: f32) {
        self.camera.orbit(x, y);
    }

    fn poll_events(&mut self) -> Result<bool> {
        if self.closed || self.window.is_none() {
            return Ok(false);
        }
        let Some(event_loop) = self.event_loop.as_mut() else {
            return Ok(false);
        };

        let mut closed = false;
        let mut commands = Vec::new();
        let status = event_loop.pump_events(Some(Duration::ZERO), |event, elwt| {
            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    closed = true;
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed && !event.repeat => {
                    commands.extend(key_command(&event.logical_key));
                }
                _ => {}
            }
        });

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {}", code);
            closed = true;
        }

        self.commands.extend(commands);
        self.closed = closed;
        Ok(!closed)
    }

    fn drain_commands(&mut self) -> Vec<PlayerCommand> {
        std::mem::take(&mut self.commands)
    }

    fn update_renderer(&mut self) -> Result<()> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Ok(());
        };
        renderer.update_camera(&self.camera);

        let Some(state) = self.surface.as_ref() else {
            return Ok(());
        };
        match state.surface.get_current_texture() {
            Ok(output) => {
                let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
                renderer.render(&view);
                output.present();
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.surface.configure(&renderer.gpu().device, &state.config);
            }
            Err(wgpu::SurfaceError::Timeout) => log::debug!("surface timed out, skipping frame"),
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {}", e))),
        }
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame> {
        let camera = self.camera.clone();
        let renderer = self.renderer_mut()?;
        renderer.update_camera(&camera);
        renderer.capture()
    }

    fn destroy_window(&mut self) {
        // The surface must go before the window it draws to
        self.surface = None;
        self.renderer = None;
        if self.window.take().is_some() {
            log::debug!("window destroyed");
        }
        self.closed = true;
    }
}

/// Map a pressed key to a player command
pub fn key_command(key: &Key) -> Option<PlayerCommand> {
    match key {
        Key::Named(NamedKey::Space) => Some(PlayerCommand::TogglePause),
        Key::Named(NamedKey::Home) => Some(PlayerCommand::Jump(0)),
        Key::Named(NamedKey::Escape) => Some(PlayerCommand::Close),
        Key::Character(c) if c.eq_ignore_ascii_case("r") => Some(PlayerCommand::Jump(0)),
        _ => None,
    }
}
