//! Shaderlab engine crate.
//!
//! Render-state reconciliation for an interactive shader editor: a typed value model,
//! uniform registry, attribute schema and vertex store that a UI can mutate freely,
//! and a [`Core`] that lazily recompiles, relocates and repacks before each draw.
//!
//! GPU access goes through the [`gl::GlBackend`] façade. The [`window`] runtime hosts
//! a `Core<GlowBackend>` in a winit window; tests use [`gl::HeadlessGl`].

pub mod attribute;
pub mod core;
pub mod error;
pub mod gl;
pub mod logging;
pub mod uniform;
pub mod value;
pub mod vertex;
pub mod window;

pub use crate::attribute::{AttributeId, AttributeInfo};
pub use crate::core::{ChangeEvent, Core, CoreConfig, DirtyState, FrameReport};
pub use crate::error::{BackendError, CoreError, ShaderCompilationError};
pub use crate::uniform::Uniform;
pub use crate::value::{GlType, GlVariable};
pub use crate::vertex::Vertex;
