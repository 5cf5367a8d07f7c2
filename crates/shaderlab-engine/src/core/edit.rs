//! Edit handles.
//!
//! Every setter marks the matching dirty flag and queues a change event in the same
//! call, so each "X changes, Y is dirty" edge is a plain function call.

use crate::attribute::AttributeId;
use crate::error::CoreError;
use crate::uniform::Uniform;
use crate::value::GlVariable;
use crate::vertex::Vertex;

use super::dirty::DirtyState;
use super::events::{ChangeEvent, EventQueue};
use super::schema::AttributeSchema;

/// Mutable access to one uniform owned by a `Core`.
pub struct UniformEdit<'a> {
    pub(super) index: usize,
    pub(super) uniform: &'a mut Uniform,
    pub(super) dirty: &'a mut DirtyState,
    pub(super) events: &'a mut EventQueue,
}

impl UniformEdit<'_> {
    #[inline]
    pub fn uniform(&self) -> &Uniform {
        self.uniform
    }

    /// Renames the uniform. Its location is re-resolved on the next render.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.uniform.set_name(name.into());
        self.dirty.insert(DirtyState::UNIFORMS);
        self.events.push(ChangeEvent::UniformRenamed(self.index));
        self
    }

    pub fn set_component(&mut self, component: usize, value: f32) -> Result<&mut Self, CoreError> {
        self.uniform.variable_mut().set_component(component, value)?;
        self.dirty.insert(DirtyState::UNIFORMS);
        self.events.push(ChangeEvent::UniformValueChanged {
            index: self.index,
            component: Some(component),
        });
        Ok(self)
    }

    /// Replaces the whole value. The type must not change.
    pub fn set_value(&mut self, value: impl Into<GlVariable>) -> Result<&mut Self, CoreError> {
        let value = value.into();
        let expected = self.uniform.gl_type();
        if value.gl_type() != expected {
            return Err(CoreError::TypeMismatch { expected, found: value.gl_type() });
        }

        *self.uniform.variable_mut() = value;
        self.dirty.insert(DirtyState::UNIFORMS);
        self.events.push(ChangeEvent::UniformValueChanged { index: self.index, component: None });
        Ok(self)
    }
}

/// Mutable access to one vertex owned by a `Core`.
pub struct VertexEdit<'a> {
    pub(super) index: usize,
    pub(super) vertex: &'a mut Vertex,
    pub(super) schema: &'a AttributeSchema,
    pub(super) dirty: &'a mut DirtyState,
    pub(super) events: &'a mut EventQueue,
}

impl VertexEdit<'_> {
    #[inline]
    pub fn vertex(&self) -> &Vertex {
        self.vertex
    }

    fn slot(&mut self, id: AttributeId) -> Result<&mut GlVariable, CoreError> {
        if !self.schema.contains(id) {
            return Err(CoreError::UnknownAttribute(id));
        }
        self.vertex.get_mut(id).ok_or(CoreError::UnknownAttribute(id))
    }

    fn changed(&mut self, id: AttributeId) {
        self.dirty.insert(DirtyState::VERTICES);
        self.events.push(ChangeEvent::VertexValueChanged { index: self.index, attribute: id });
    }

    pub fn set_component(
        &mut self,
        id: AttributeId,
        component: usize,
        value: f32,
    ) -> Result<&mut Self, CoreError> {
        self.slot(id)?.set_component(component, value)?;
        self.changed(id);
        Ok(self)
    }

    /// Replaces the value of attribute `id`. The type must match the schema.
    pub fn set_value(
        &mut self,
        id: AttributeId,
        value: impl Into<GlVariable>,
    ) -> Result<&mut Self, CoreError> {
        let value = value.into();
        let slot = self.slot(id)?;
        let expected = slot.gl_type();
        if value.gl_type() != expected {
            return Err(CoreError::TypeMismatch { expected, found: value.gl_type() });
        }

        *slot = value;
        self.changed(id);
        Ok(self)
    }
}
