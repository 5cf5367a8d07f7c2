use crate::attribute::AttributeId;

/// Shader stage selector.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A change to the observable model, for UI bindings.
///
/// Indices refer to the collection as it was right after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    ShaderSourceChanged(ShaderStage),
    ErrorOutputChanged,
    PrimitiveModeChanged,
    ClearColorChanged,

    UniformAdded(usize),
    UniformRemoved(usize),
    UniformRenamed(usize),
    /// `component` is `None` when the whole value was replaced.
    UniformValueChanged { index: usize, component: Option<usize> },
    UniformLocationChanged(usize),

    AttributeAdded(AttributeId),
    AttributeRemoved(AttributeId),
    AttributeRenamed(AttributeId),
    AttributeLocationChanged(AttributeId),

    VertexAdded(usize),
    VertexRemoved(usize),
    VertexValueChanged { index: usize, attribute: AttributeId },
}

/// Pending change events; a disabled queue drops everything pushed into it.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    enabled: bool,
    pending: Vec<ChangeEvent>,
}

impl EventQueue {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, pending: Vec::new() }
    }

    #[inline]
    pub(crate) fn push(&mut self, event: ChangeEvent) {
        if self.enabled {
            self.pending.push(event);
        }
    }

    pub(crate) fn drain(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
