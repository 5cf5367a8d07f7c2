//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop, the window and its GL context, and hands a
//! [`GlowBackend`](crate::gl::GlowBackend) to the application once the context is live.

mod app;
mod runtime;

pub use app::{App, AppControl, FrameCtx};
pub use runtime::{Runtime, RuntimeConfig};
