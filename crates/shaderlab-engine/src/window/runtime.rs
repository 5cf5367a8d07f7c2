use std::num::NonZeroU32;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::gl::GlowBackend;

use super::app::{App, AppControl, FrameCtx};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Wait for vblank on swap.
    pub vsync: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "shaderlab".to_string(),
            initial_size: LogicalSize::new(1024.0, 768.0),
            vsync: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes or the app asks to exit.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Window plus the GL objects bound to it. Fields drop in declaration order:
/// the surface and context go before the window they render into.
struct WindowEntry {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl WindowEntry {
    fn create(event_loop: &ActiveEventLoop, config: &RuntimeConfig) -> Result<(Self, glow::Context)> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, template, |configs| {
                // Most samples wins; ties keep the earlier config. The picker must return a
                // `Config`, so an empty list has nothing to fall back to.
                configs
                    .reduce(|a, b| if b.num_samples() > a.num_samples() { b } else { a })
                    .expect("display reported no GL configs for the template")
            })
            .map_err(|e| anyhow!("failed to create window and GL config: {e}"))?;
        let window = window.context("display builder returned no window")?;

        let raw_handle = window
            .window_handle()
            .context("window has no raw handle")?
            .as_raw();
        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));

        let display = gl_config.display();

        // SAFETY: `raw_handle` belongs to `window`, which outlives the context (field order).
        let not_current = unsafe { display.create_context(&gl_config, &context_attrs) }
            .context("failed to create an OpenGL 3.3 core context")?;

        let surface_attrs = window
            .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
            .context("failed to describe the window surface")?;

        // SAFETY: same as above, the surface is dropped before the window.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .context("failed to create the window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make the GL context current")?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("could not set swap interval: {e}");
        }

        // SAFETY: the context is current on this thread.
        let gl = unsafe { glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s)) };

        log::info!(
            "GL context ready: {} samples, window {:?}",
            gl_config.num_samples(),
            window.inner_size()
        );

        Ok((Self { surface, context, window }, gl))
    }

    fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    app: A,

    entry: Option<WindowEntry>,
    started: Instant,
    last_frame: Instant,
    frame_index: u64,

    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        let now = Instant::now();
        Self {
            config,
            app,
            entry: None,
            started: now,
            last_frame: now,
            frame_index: 0,
            exit_requested: false,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.failure = Some(error);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (entry, gl) = WindowEntry::create(event_loop, &self.config)?;
        self.app
            .on_gl_ready(GlowBackend::new(gl))
            .context("application failed to initialise")?;

        entry.window.request_redraw();
        self.entry = Some(entry);
        self.started = Instant::now();
        self.last_frame = self.started;
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_ref() else {
            return;
        };

        let size = entry.window.inner_size();
        if size.width == 0 || size.height == 0 {
            // Minimized.
            return;
        }

        let now = Instant::now();
        let mut ctx = FrameCtx {
            window: &entry.window,
            size,
            frame_index: self.frame_index,
            elapsed: now - self.started,
            delta: now - self.last_frame,
        };
        let control = self.app.on_frame(&mut ctx);

        self.frame_index += 1;
        self.last_frame = now;

        entry.window.pre_present_notify();
        if let Err(e) = entry.surface.swap_buffers(&entry.context) {
            log::error!("swap_buffers failed: {e}");
        }

        if control == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw: uniforms may be animated.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = &self.entry {
            entry.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(entry) = &self.entry {
                    entry.resize(size.width, size.height);
                    entry.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            self.app.on_exit();
        }
        self.entry = None;
        log::debug!("runtime exiting after {} frames", self.frame_index);
    }
}
