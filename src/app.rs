//! Window lifecycle and the capture → layout → draw loop.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::audio::{AudioCaptureError, AudioSource, CpalCapture, SampleFrames};
use crate::bars::{BarLayout, BarSet, Vertex};
use crate::config::{ConfigError, Settings};
use crate::error::VisualizerError;
use crate::params::{CaptureErrorPolicy, RenderConfig};
use crate::rendering::{GraphicsInitError, RenderSystem};

/// Main application state
pub struct App {
    settings: Settings,

    // Bar row and the audio feeding it
    bars: BarSet,
    frames: SampleFrames,
    audio: Option<CpalCapture>,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    /// Reused upload buffer for bar quads
    vertices: Vec<Vertex>,

    /// First fatal error seen inside the event loop
    failure: Option<VisualizerError>,
}

impl App {
    /// Lay out the bar row; no window or device is touched yet
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let bars = BarSet::new(BarLayout::from_config(&settings.bars)?);

        Ok(Self {
            vertices: Vec::with_capacity(bars.vertex_count()),
            settings,
            bars,
            frames: SampleFrames::new(),
            audio: None,
            window: None,
            render_system: None,
            failure: None,
        })
    }

    /// Run until the window closes or a fatal error occurs
    pub fn run(mut self) -> Result<(), VisualizerError> {
        let event_loop = EventLoop::new().map_err(GraphicsInitError::from)?;
        event_loop
            .run_app(&mut self)
            .map_err(GraphicsInitError::from)?;

        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Create the centered window, GPU state and audio input
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), VisualizerError> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or(GraphicsInitError::NoMonitor)?;

        let monitor_size = monitor.size();
        let window_size = self.settings.render.window_size(monitor_size);
        let position =
            RenderConfig::centered_position(monitor.position(), monitor_size, window_size);

        log::info!(
            "Window {}x{} at ({}, {}) on a {}x{} monitor",
            window_size.width,
            window_size.height,
            position.x,
            position.y,
            monitor_size.width,
            monitor_size.height
        );

        let window_attributes = Window::default_attributes()
            .with_title(self.settings.render.title.clone())
            .with_inner_size(window_size)
            .with_position(position)
            .with_decorations(false)
            .with_transparent(true);

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(GraphicsInitError::from)?,
        );

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.bars,
            self.settings.render.color,
        ))?;

        let audio = match CpalCapture::open(&self.settings.capture) {
            Ok(audio) => Some(audio),
            Err(e) if self.settings.capture.on_error == CaptureErrorPolicy::Abort => {
                return Err(e.into())
            }
            Err(e) => {
                log::error!("Audio input unavailable, bars stay flat: {}", e);
                None
            }
        };

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.audio = audio;
        Ok(())
    }

    /// Capture one block, regenerate the bars, draw them
    fn render_frame(&mut self) -> Result<(), VisualizerError> {
        let Some(ref render_system) = self.render_system else {
            return Ok(());
        };

        let captured = match self.audio.as_mut() {
            Some(audio) => audio.capture(self.settings.capture.capture_ms),
            None => Err(AudioCaptureError::NoInputDevice),
        };
        let samples = self.frames.advance(captured, self.settings.capture.on_error)?;

        self.bars.apply_samples(samples);
        self.bars.write_vertices(&mut self.vertices);
        render_system.update_vertices(&self.vertices);

        match render_system.render() {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                Err(GraphicsInitError::Frame(wgpu::SurfaceError::OutOfMemory).into())
            }
            Err(e) => {
                log::warn!("Skipped frame: {}", e);
                Ok(())
            }
        }
    }

    /// Stop the loop; `run` reports the error
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: VisualizerError) {
        self.failure.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.render_frame() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lays_out_bars_from_settings() {
        let settings = Settings::from_json_str(
            r#"{"TILES": 4, "Color": "0,1,0,1", "Margin": 0.05, "WidthRatio": 40, "HeightRatio": 10}"#,
        )
        .unwrap();

        let app = App::new(settings).unwrap();
        assert_eq!(app.bars.len(), 4);
        assert!((app.bars.layout().width() - 0.75).abs() < 1e-5);
        assert!(app.window.is_none());
        assert!(app.failure.is_none());
    }
}
