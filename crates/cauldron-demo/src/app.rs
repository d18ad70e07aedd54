//! Windowed demo implementing winit's ApplicationHandler
//!
//! Each redraw turns pending clicks into effects, draws every live effect and
//! the cursor marker, then prunes expired effects.

use crate::config::DemoConfig;
use anyhow::Context;
use cauldron_particles::rand::{particle_rng, ParticleRng};
use cauldron_particles::renderables::circle_renderable;
use cauldron_particles::{flat_command, EffectManager, EffectTechniques};
use cauldron_render::{OrthoCamera, RenderContext, Renderable, Viewport, WgpuBackend};
use cauldron_runtime::{Clock, InputState, SystemClock};
use glam::Mat4;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

const MARKER_RADIUS: f32 = 4.0;
const MARKER_SEGMENTS: usize = 16;

/// Everything that needs a live GPU device
struct Graphics {
    context: RenderContext,
    backend: WgpuBackend,
    techniques: EffectTechniques,
    camera: OrthoCamera,
    effects: EffectManager<WgpuBackend>,
    marker: Renderable<WgpuBackend>,
}

impl Graphics {
    fn new(window: Arc<Window>, config: &DemoConfig) -> anyhow::Result<Self> {
        let context = pollster::block_on(RenderContext::new(window))
            .context("Failed to create render context")?;
        let (width, height) = (context.config.width, context.config.height);

        let mut backend = context.create_backend();
        let techniques = EffectTechniques::new(&mut backend, Viewport::full(width, height))
            .context("Failed to compile effect shaders")?;
        let marker = circle_renderable(&mut backend, MARKER_RADIUS, MARKER_SEGMENTS)
            .context("Failed to build cursor marker")?;

        Ok(Self {
            context,
            backend,
            techniques,
            camera: OrthoCamera::new(width, height),
            effects: EffectManager::new(config.effects.clone()),
            marker,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.context.resize(size);
        self.camera.resize(size.width, size.height);
        self.backend.set_target_size(size.width, size.height);
        self.techniques
            .set_viewport(Viewport::full(size.width, size.height));
    }
}

pub struct CauldronApp {
    config: DemoConfig,
    clock: SystemClock,
    input: InputState,
    rng: ParticleRng,
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    /// Set when startup fails; returned from `main` after the loop exits
    pub error: Option<anyhow::Error>,
}

impl CauldronApp {
    pub fn new(config: DemoConfig) -> Self {
        let rng = particle_rng(config.seed);
        Self {
            config,
            clock: SystemClock,
            input: InputState::new(),
            rng,
            window: None,
            graphics: None,
            error: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(self.config.window.resizable);
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        let graphics = Graphics::new(window.clone(), &self.config)?;
        self.input
            .set_window_height(graphics.context.config.height as f64);

        tracing::info!(
            width = graphics.context.config.width,
            height = graphics.context.config.height,
            "click to spawn effects, Escape to quit"
        );

        self.window = Some(window);
        self.graphics = Some(graphics);
        Ok(())
    }

    fn spawn_pending(&mut self) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };
        for event in self.input.drain_spawn_events() {
            if let Err(e) = graphics.effects.spawn(
                &mut graphics.backend,
                &mut self.rng,
                event.position,
                event.timestamp,
            ) {
                tracing::error!(error = %e, "failed to spawn effect");
            }
        }
    }

    fn render(&mut self, now: Instant) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        let output = match graphics.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                graphics.context.reconfigure();
                return;
            }
            Err(e) => {
                tracing::warn!(error = ?e, "surface error");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = graphics.camera.frame_uniforms();
        graphics.backend.begin_frame(self.config.window.clear_color);

        graphics
            .effects
            .tick(&mut graphics.backend, &graphics.techniques, &frame, now);

        if self.config.window.cursor_marker {
            let cursor = self.input.cursor_world_position();
            let model = Mat4::from_translation(cursor.extend(0.0));
            let command = flat_command(
                &graphics.marker,
                self.config.window.marker_color,
                &frame,
                model,
            );
            graphics
                .techniques
                .flat
                .execute(&mut graphics.backend, &[command]);
        }

        graphics
            .backend
            .end_frame(&view, &graphics.context.depth_view);
        output.present();
    }
}

impl ApplicationHandler for CauldronApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            tracing::error!(error = %e, "startup failed");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize(new_size);
                }
                self.input.set_window_height(new_size.height as f64);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let (PhysicalKey::Code(key_code), ElementState::Pressed) =
                    (event.physical_key, event.state)
                {
                    self.input.process_key_down(key_code);
                    if self.input.exit_requested() {
                        event_loop.exit();
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.input
                    .process_mouse_button(button, state, self.clock.now());
            }

            WindowEvent::RedrawRequested => {
                self.spawn_pending();
                self.render(self.clock.now());
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
