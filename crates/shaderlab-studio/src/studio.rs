use std::time::Duration;

use anyhow::Result;
use shaderlab_engine::gl::{GlBackend, GlowBackend, PrimitiveMode};
use shaderlab_engine::window::{App, AppControl, FrameCtx};
use shaderlab_engine::{ChangeEvent, Core, CoreConfig};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::session::{self, Demo, ErrorPane, ShaderSources};

/// Frames slower than this are logged.
const SLOW_FRAME: Duration = Duration::from_millis(100);

/// Windowed shader viewer.
pub struct Studio {
    sources: ShaderSources,
    initial_mode: PrimitiveMode,
    max_frames: Option<u64>,

    core: Option<Core<GlowBackend>>,
    demo: Option<Demo>,
    errors: ErrorPane,
    title: String,
}

impl Studio {
    pub fn new(sources: ShaderSources, mode: PrimitiveMode, max_frames: Option<u64>) -> Self {
        Self {
            sources,
            initial_mode: mode,
            max_frames,
            core: None,
            demo: None,
            errors: ErrorPane::default(),
            title: String::new(),
        }
    }

    fn reload(&mut self) {
        let Some(core) = self.core.as_mut() else { return };
        if self.sources.is_empty() {
            log::info!("no shader files given; nothing to reload");
            return;
        }
        match self.sources.apply(core) {
            Ok(()) => log::info!("shaders reloaded"),
            Err(e) => log::error!("{e:#}"),
        }
    }

    fn cycle_mode(&mut self) {
        if let Some(core) = self.core.as_mut() {
            core.set_primitive_mode(core.primitive_mode().next());
        }
    }
}

impl App for Studio {
    fn on_gl_ready(&mut self, gl: GlowBackend) -> Result<()> {
        let config = CoreConfig {
            primitive_mode: self.initial_mode,
            ..CoreConfig::default()
        };
        let mut core = Core::new(gl, config);

        let demo = session::populate_demo(&mut core)?;
        log::debug!("demo session: k at index {}, position attribute {}", demo.k, demo.position);
        self.demo = Some(demo);
        self.sources.apply(&mut core)?;
        self.core = Some(core);
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
            PhysicalKey::Code(KeyCode::F5) => self.reload(),
            PhysicalKey::Code(KeyCode::Space) => self.cycle_mode(),
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let (Some(core), Some(demo)) = (self.core.as_mut(), self.demo.as_ref()) else {
            return AppControl::Continue;
        };

        if let Err(e) = session::animate(core, demo, ctx.elapsed) {
            log::error!("animation stopped: {e}");
        }

        if let Err(e) = core.render(ctx.size.width, ctx.size.height) {
            log::error!("frame {} skipped: {e}", ctx.frame_index);
        }

        if ctx.delta > SLOW_FRAME {
            log::debug!("frame {} took {:?}", ctx.frame_index, ctx.delta);
        }

        self.errors.update(core);
        log_events(core);

        let title = session::window_title(core);
        if title != self.title {
            ctx.window.set_title(&title);
            self.title = title;
        }

        match self.max_frames {
            Some(max) if ctx.frame_index + 1 >= max => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_exit(&mut self) {
        if let Some(core) = self.core.as_mut() {
            let stats = core.stats();
            log::info!(
                "{} frames, {} draws, {} compiles ({} failed)",
                stats.frames,
                stats.draws,
                stats.compiles,
                stats.compile_failures
            );
            core.release_gpu_resources();
        }
    }
}

/// Logs the structural changes of the last frame. Value edits are too frequent to show.
pub fn log_events<G: GlBackend>(core: &mut Core<G>) {
    for event in core.drain_events() {
        match event {
            ChangeEvent::UniformValueChanged { .. } | ChangeEvent::VertexValueChanged { .. } => {}
            ChangeEvent::PrimitiveModeChanged => log::info!("primitive mode: {}", core.primitive_mode()),
            other => log::debug!("{other:?}"),
        }
    }
}
