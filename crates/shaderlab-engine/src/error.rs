//! Error types for the engine crate.
//!
//! None of these are fatal: the worst outcome of any of them is a skipped frame.

use crate::attribute::AttributeId;
use crate::value::GlType;

/// Compile or link failure, carrying the raw driver diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("shader compilation failed:\n{diagnostic}")]
pub struct ShaderCompilationError {
    pub diagnostic: String,
}

impl ShaderCompilationError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self { diagnostic: diagnostic.into() }
    }
}

/// GPU object creation failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to create {object}: {message}")]
pub struct BackendError {
    pub object: &'static str,
    pub message: String,
}

impl BackendError {
    pub fn create(object: &'static str, message: impl Into<String>) -> Self {
        Self { object, message: message.into() }
    }
}

/// Misuse of the data-model API (bad index, unknown id, wrong type).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("uniform index {0} is out of range")]
    UniformIndex(usize),

    #[error("vertex index {0} is out of range")]
    VertexIndex(usize),

    #[error("attribute {0} is not part of the schema")]
    UnknownAttribute(AttributeId),

    #[error("attribute {0} is, or once was, part of the schema")]
    DuplicateAttribute(AttributeId),

    #[error("component {component} is out of range for `{ty}`")]
    ComponentOutOfRange { component: usize, ty: GlType },

    #[error("expected a `{expected}` value, got `{found}`")]
    TypeMismatch { expected: GlType, found: GlType },
}
