//! Uniform registry entries.

use crate::gl::Location;
use crate::value::{GlType, GlVariable};

/// A named value passed uniformly to both shader stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    name: String,
    variable: GlVariable,
    location: Option<Location>,
}

impl Uniform {
    pub fn new(name: impl Into<String>, variable: impl Into<GlVariable>) -> Self {
        Self {
            name: name.into(),
            variable: variable.into(),
            location: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn variable(&self) -> &GlVariable {
        &self.variable
    }

    #[inline]
    pub fn gl_type(&self) -> GlType {
        self.variable.gl_type()
    }

    /// GLSL spelling of the uniform's type ("float", "vec3", ...).
    pub fn type_description(&self) -> &'static str {
        self.gl_type().glsl_name()
    }

    /// Location in the current program. `None` means the linked program has no
    /// active uniform of this name (never resolved, optimized out, or a typo).
    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    #[inline]
    pub fn has_valid_location(&self) -> bool {
        self.location.is_some()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn variable_mut(&mut self) -> &mut GlVariable {
        &mut self.variable
    }

    /// Returns `true` if the location changed.
    pub(crate) fn set_location(&mut self, location: Option<Location>) -> bool {
        std::mem::replace(&mut self.location, location) != location
    }
}

/// Creates a zero-valued uniform of the given type.
pub fn make(ty: GlType, name: impl Into<String>) -> Uniform {
    Uniform::new(name, GlVariable::zeroed(ty))
}
