use bitflags::bitflags;

bitflags! {
    /// Pending reconciliation work, accumulated between renders.
    ///
    /// The empty set means the GPU state matches the model.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyState: u8 {
        /// Vertex or fragment source changed; the program must be rebuilt.
        const SHADERS = 1;
        /// A uniform was added, removed, renamed or changed value.
        const UNIFORMS = 1 << 1;
        /// The attribute schema or the vertex data changed.
        const VERTICES = 1 << 3;
    }
}

impl DirtyState {
    /// True when nothing needs reconciling.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.is_empty()
    }
}

impl Default for DirtyState {
    fn default() -> Self {
        Self::empty()
    }
}
