//! Attribute schema entries.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::gl::Location;
use crate::value::{GlType, GlVariable};

/// Process-unique attribute handle.
///
/// Ids are handed out from a monotonic counter and never reused, even after the
/// attribute they named has been removed. Vertices key their values by id so that
/// renaming an attribute never touches vertex storage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AttributeId(u64);

impl AttributeId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named, typed per-vertex input.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    id: AttributeId,
    name: String,
    ty: GlType,
    location: Option<Location>,
}

impl AttributeInfo {
    /// Creates an attribute with a freshly allocated id.
    pub fn new(name: impl Into<String>, ty: GlType) -> Self {
        Self {
            id: AttributeId::fresh(),
            name: name.into(),
            ty,
            location: None,
        }
    }

    #[inline]
    pub fn id(&self) -> AttributeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn gl_type(&self) -> GlType {
        self.ty
    }

    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    #[inline]
    pub fn has_valid_location(&self) -> bool {
        self.location.is_some()
    }

    /// Zero-valued variable matching this attribute's type.
    pub fn create_variable(&self) -> GlVariable {
        GlVariable::zeroed(self.ty)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Returns `true` if the location changed.
    pub(crate) fn set_location(&mut self, location: Option<Location>) -> bool {
        std::mem::replace(&mut self.location, location) != location
    }
}

/// Creates an attribute of the given type and name with a fresh id.
pub fn make(ty: GlType, name: impl Into<String>) -> AttributeInfo {
    AttributeInfo::new(name, ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = make(GlType::VEC2, "uv");
        let b = make(GlType::VEC2, "uv");
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn clones_share_the_id() {
        let a = make(GlType::FLOAT, "weight");
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn create_variable_matches_type() {
        let a = make(GlType::VEC4, "color");
        assert_eq!(a.create_variable(), GlVariable::Vec4([0.0; 4]));
    }
}
