//! GPU command façade.
//!
//! `Core` talks to the GPU exclusively through [`GlBackend`]. Two implementations ship
//! with the crate:
//! - [`GlowBackend`]: OpenGL 3.3 core over `glow`, used by the windowed runtime
//! - [`HeadlessGl`]: context-free recorder used by tests and CI

mod color;
mod glow_backend;
mod headless;
mod mode;

pub use color::Color;
pub use glow_backend::GlowBackend;
pub use headless::{GlCall, HeadlessGl};
pub use mode::{BufferUsage, ParsePrimitiveModeError, PrimitiveMode};

use std::fmt::Debug;

use crate::error::{BackendError, ShaderCompilationError};

/// Binding slot assigned by the linker to a named uniform or attribute.
pub type Location = u32;

/// Narrow interface the reconciliation engine issues GPU commands through.
///
/// All handle types are plain copyable ids; ownership of the objects they name stays
/// with the caller (`Core`), which must delete them explicitly.
pub trait GlBackend {
    type Program: Copy + Debug + PartialEq;
    type Buffer: Copy + Debug + PartialEq;
    type VertexArray: Copy + Debug + PartialEq;

    // ── programs ──────────────────────────────────────────────────────────

    /// Compiles both stages and links them into a program.
    fn compile_and_link(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self::Program, ShaderCompilationError>;

    fn delete_program(&mut self, program: Self::Program);

    fn use_program(&mut self, program: Option<Self::Program>);

    /// `None` when the program has no active uniform with this name.
    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Location>;

    /// `None` when the program has no active attribute with this name.
    fn attribute_location(&mut self, program: Self::Program, name: &str) -> Option<Location>;

    fn set_uniform_1f(&mut self, location: Location, x: f32);
    fn set_uniform_2f(&mut self, location: Location, x: f32, y: f32);
    fn set_uniform_3f(&mut self, location: Location, x: f32, y: f32, z: f32);
    fn set_uniform_4f(&mut self, location: Location, x: f32, y: f32, z: f32, w: f32);

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&mut self) -> Result<Self::Buffer, BackendError>;
    fn delete_buffer(&mut self, buffer: Self::Buffer);
    fn bind_array_buffer(&mut self, buffer: Option<Self::Buffer>);

    /// Uploads `data` into the bound array buffer, replacing its contents.
    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage);

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, BackendError>;
    fn delete_vertex_array(&mut self, vao: Self::VertexArray);
    fn bind_vertex_array(&mut self, vao: Option<Self::VertexArray>);

    /// Describes a float attribute in the bound array buffer. `stride` and `offset` are in bytes.
    fn vertex_attrib_pointer(&mut self, location: Location, components: u32, stride: u32, offset: u32);
    fn enable_vertex_attrib_array(&mut self, location: Location);
    fn disable_vertex_attrib_array(&mut self, location: Location);

    // ── frame ─────────────────────────────────────────────────────────────

    fn set_viewport(&mut self, width: u32, height: u32);
    fn clear_color(&mut self, color: Color);
    fn clear(&mut self);
    fn draw_arrays(&mut self, mode: PrimitiveMode, count: u32);
    fn finish(&mut self);
}
