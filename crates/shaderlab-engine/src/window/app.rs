use std::time::Duration;

use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::gl::GlowBackend;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Per-frame context passed to [`App::on_frame`].
pub struct FrameCtx<'a> {
    pub window: &'a Window,
    /// Drawable size in physical pixels. Never zero.
    pub size: PhysicalSize<u32>,
    pub frame_index: u64,
    /// Time since the GL context became ready.
    pub elapsed: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
}

/// Application contract implemented by the studio.
pub trait App {
    /// Called once, with the GL context current, before the first frame.
    fn on_gl_ready(&mut self, gl: GlowBackend) -> anyhow::Result<()>;

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw. The buffers are swapped after it returns.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// Called before the context is destroyed, with the context still current.
    fn on_exit(&mut self) {}
}
