//! Render-state core.
//!
//! `Core` owns the editable model (shader sources, uniforms, attribute schema,
//! vertices), accumulates dirty flags as the model is mutated, and on
//! [`Core::render`] brings the GPU program and vertex buffer back in sync before
//! issuing the frame's single draw call.
//!
//! Mutation is single-threaded and synchronous. Many edits between two renders are
//! coalesced into one reconciliation pass.

mod config;
mod dirty;
mod edit;
mod events;
mod layout;
mod reconcile;
mod schema;

pub use config::{CoreConfig, DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};
pub use dirty::DirtyState;
pub use edit::{UniformEdit, VertexEdit};
pub use events::{ChangeEvent, ShaderStage};
pub use layout::{AttributeSlot, VertexLayout};
pub use reconcile::{DrawCall, FrameReport, RenderStats};

use crate::attribute::{AttributeId, AttributeInfo};
use crate::error::CoreError;
use crate::gl::{BufferUsage, Color, GlBackend, Location, PrimitiveMode};
use crate::uniform::Uniform;
use crate::vertex::Vertex;

use events::EventQueue;
use schema::AttributeSchema;

/// GPU objects owned by the core. Created lazily, deleted explicitly.
struct GpuObjects<G: GlBackend> {
    program: Option<G::Program>,
    buffer: Option<G::Buffer>,
    vertex_array: Option<G::VertexArray>,
    /// Input slots enabled by the last repack.
    enabled: Vec<Location>,
}

impl<G: GlBackend> Default for GpuObjects<G> {
    fn default() -> Self {
        Self { program: None, buffer: None, vertex_array: None, enabled: Vec::new() }
    }
}

/// Single-program, single-buffer render state with lazy reconciliation.
pub struct Core<G: GlBackend> {
    gl: G,
    gpu: GpuObjects<G>,

    vertex_shader: String,
    fragment_shader: String,
    uniforms: Vec<Uniform>,
    attributes: AttributeSchema,
    vertices: Vec<Vertex>,

    dirty: DirtyState,
    error_output: Option<String>,
    primitive_mode: PrimitiveMode,
    clear_color: Color,
    buffer_usage: BufferUsage,

    layout: VertexLayout,
    packed: Vec<f32>,
    stats: RenderStats,
    events: EventQueue,
}

impl<G: GlBackend> Core<G> {
    /// Creates a core over `gl`. Nothing touches the GPU until the first render,
    /// which compiles the program and uploads the (possibly empty) vertex buffer.
    pub fn new(gl: G, config: CoreConfig) -> Self {
        Self {
            gl,
            gpu: GpuObjects::default(),
            vertex_shader: config.vertex_shader,
            fragment_shader: config.fragment_shader,
            uniforms: Vec::new(),
            attributes: AttributeSchema::default(),
            vertices: Vec::new(),
            dirty: DirtyState::all(),
            error_output: None,
            primitive_mode: config.primitive_mode,
            clear_color: config.clear_color,
            buffer_usage: config.buffer_usage,
            layout: VertexLayout::default(),
            packed: Vec::new(),
            stats: RenderStats::default(),
            events: EventQueue::new(config.record_events),
        }
    }

    #[inline]
    pub fn backend(&self) -> &G {
        &self.gl
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut G {
        &mut self.gl
    }

    #[inline]
    pub fn dirty(&self) -> DirtyState {
        self.dirty
    }

    /// Diagnostic of the last failed compile/link; `None` once a compile succeeds.
    #[inline]
    pub fn error_output(&self) -> Option<&str> {
        self.error_output.as_deref()
    }

    #[inline]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Takes every change event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        self.events.drain()
    }

    /// Number of change events waiting to be drained.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // ── shader sources ────────────────────────────────────────────────────

    #[inline]
    pub fn vertex_shader(&self) -> &str {
        &self.vertex_shader
    }

    #[inline]
    pub fn fragment_shader(&self) -> &str {
        &self.fragment_shader
    }

    /// Replaces the vertex stage source. Identical text is not a change.
    pub fn set_vertex_shader(&mut self, src: impl Into<String>) {
        let src = src.into();
        if src != self.vertex_shader {
            self.vertex_shader = src;
            self.mark_shaders(ShaderStage::Vertex);
        }
    }

    /// Replaces the fragment stage source. Identical text is not a change.
    pub fn set_fragment_shader(&mut self, src: impl Into<String>) {
        let src = src.into();
        if src != self.fragment_shader {
            self.fragment_shader = src;
            self.mark_shaders(ShaderStage::Fragment);
        }
    }

    fn mark_shaders(&mut self, stage: ShaderStage) {
        self.dirty.insert(DirtyState::SHADERS);
        self.events.push(ChangeEvent::ShaderSourceChanged(stage));
    }

    // ── frame settings ────────────────────────────────────────────────────

    #[inline]
    pub fn primitive_mode(&self) -> PrimitiveMode {
        self.primitive_mode
    }

    /// Takes effect on the next draw; needs no reconciliation.
    pub fn set_primitive_mode(&mut self, mode: PrimitiveMode) {
        if mode != self.primitive_mode {
            self.primitive_mode = mode;
            self.events.push(ChangeEvent::PrimitiveModeChanged);
        }
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Colors with a NaN or infinite channel are ignored.
    pub fn set_clear_color(&mut self, color: Color) {
        if !color.is_finite() {
            log::warn!("ignoring non-finite clear color {color:?}");
            return;
        }
        if color != self.clear_color {
            self.clear_color = color;
            self.events.push(ChangeEvent::ClearColorChanged);
        }
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[inline]
    pub fn uniforms(&self) -> &[Uniform] {
        &self.uniforms
    }

    #[inline]
    pub fn uniform(&self, index: usize) -> Option<&Uniform> {
        self.uniforms.get(index)
    }

    /// Index of the first uniform named `name`.
    pub fn find_uniform(&self, name: &str) -> Option<usize> {
        self.uniforms.iter().position(|u| u.name() == name)
    }

    /// Appends a uniform and returns its index. Any location it carried is discarded.
    pub fn add_uniform(&mut self, mut uniform: Uniform) -> usize {
        uniform.set_location(None);
        self.uniforms.push(uniform);

        let index = self.uniforms.len() - 1;
        self.dirty.insert(DirtyState::UNIFORMS);
        self.events.push(ChangeEvent::UniformAdded(index));
        index
    }

    pub fn remove_uniform(&mut self, index: usize) -> Result<Uniform, CoreError> {
        if index >= self.uniforms.len() {
            return Err(CoreError::UniformIndex(index));
        }
        let removed = self.uniforms.remove(index);
        self.dirty.insert(DirtyState::UNIFORMS);
        self.events.push(ChangeEvent::UniformRemoved(index));
        Ok(removed)
    }

    pub fn uniform_mut(&mut self, index: usize) -> Result<UniformEdit<'_>, CoreError> {
        let uniform = self.uniforms.get_mut(index).ok_or(CoreError::UniformIndex(index))?;
        Ok(UniformEdit {
            index,
            uniform,
            dirty: &mut self.dirty,
            events: &mut self.events,
        })
    }

    // ── attribute schema ──────────────────────────────────────────────────

    /// Schema entries in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeInfo> {
        self.attributes.iter()
    }

    #[inline]
    pub fn attribute(&self, id: AttributeId) -> Option<&AttributeInfo> {
        self.attributes.get(id)
    }

    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Appends `info` to the schema and a zero value of its type to every existing vertex.
    ///
    /// An id that is already in the schema, or was removed from it, is rejected.
    pub fn add_attribute(&mut self, mut info: AttributeInfo) -> Result<AttributeId, CoreError> {
        let id = info.id();
        let zero = info.create_variable();

        info.set_location(None);
        self.attributes.insert(info)?;

        for vertex in &mut self.vertices {
            vertex.insert(id, zero);
        }

        self.dirty.insert(DirtyState::VERTICES);
        self.events.push(ChangeEvent::AttributeAdded(id));
        Ok(id)
    }

    /// Removes attribute `id` from the schema and from every vertex.
    pub fn remove_attribute(&mut self, id: AttributeId) -> Result<AttributeInfo, CoreError> {
        let info = self.attributes.remove(id).ok_or(CoreError::UnknownAttribute(id))?;

        for vertex in &mut self.vertices {
            vertex.remove(id);
        }

        self.dirty.insert(DirtyState::VERTICES);
        self.events.push(ChangeEvent::AttributeRemoved(id));
        Ok(info)
    }

    /// Renames attribute `id`; vertex values are untouched, the location is re-resolved.
    pub fn rename_attribute(&mut self, id: AttributeId, name: impl Into<String>) -> Result<(), CoreError> {
        let info = self.attributes.get_mut(id).ok_or(CoreError::UnknownAttribute(id))?;
        info.set_name(name.into());
        self.dirty.insert(DirtyState::VERTICES);
        self.events.push(ChangeEvent::AttributeRenamed(id));
        Ok(())
    }

    // ── vertices ──────────────────────────────────────────────────────────

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    /// Appends a vertex holding a zero value for every schema attribute.
    pub fn add_vertex(&mut self) -> usize {
        let mut vertex = Vertex::new();
        for info in self.attributes.iter() {
            vertex.insert(info.id(), info.create_variable());
        }
        self.vertices.push(vertex);

        let index = self.vertices.len() - 1;
        self.dirty.insert(DirtyState::VERTICES);
        self.events.push(ChangeEvent::VertexAdded(index));
        index
    }

    pub fn remove_vertex(&mut self, index: usize) -> Result<Vertex, CoreError> {
        if index >= self.vertices.len() {
            return Err(CoreError::VertexIndex(index));
        }
        let removed = self.vertices.remove(index);
        self.dirty.insert(DirtyState::VERTICES);
        self.events.push(ChangeEvent::VertexRemoved(index));
        Ok(removed)
    }

    pub fn vertex_mut(&mut self, index: usize) -> Result<VertexEdit<'_>, CoreError> {
        let vertex = self.vertices.get_mut(index).ok_or(CoreError::VertexIndex(index))?;
        Ok(VertexEdit {
            index,
            vertex,
            schema: &self.attributes,
            dirty: &mut self.dirty,
            events: &mut self.events,
        })
    }

    /// Every vertex holds exactly one value per schema attribute, and nothing else.
    pub fn is_schema_in_sync(&self) -> bool {
        self.vertices.iter().all(|v| {
            v.len() == self.attributes.len() && v.ids().all(|id| self.attributes.contains(id))
        })
    }

    // ── packed vertex data ────────────────────────────────────────────────

    /// Layout computed by the last repack.
    #[inline]
    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Interleaved floats uploaded by the last repack.
    #[inline]
    pub fn packed_vertices(&self) -> &[f32] {
        &self.packed
    }
}
