use std::fmt;
use std::str::FromStr;

/// Scalar base of a GLSL type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BaseType {
    Float,
}

impl BaseType {
    /// Whether values of this base can be packed into the interleaved vertex buffer.
    #[inline]
    pub const fn is_interleavable(self) -> bool {
        match self {
            BaseType::Float => true,
        }
    }
}

/// Base type × component count (1–4).
///
/// This is the sole key for "what kind of value is this", shared by uniforms,
/// attributes and their variables.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlType {
    base: BaseType,
    components: u8,
}

impl GlType {
    pub const FLOAT: GlType = GlType { base: BaseType::Float, components: 1 };
    pub const VEC2: GlType = GlType { base: BaseType::Float, components: 2 };
    pub const VEC3: GlType = GlType { base: BaseType::Float, components: 3 };
    pub const VEC4: GlType = GlType { base: BaseType::Float, components: 4 };

    /// Returns `None` unless `components` is in `1..=4`.
    #[inline]
    pub const fn new(base: BaseType, components: u8) -> Option<Self> {
        if components >= 1 && components <= 4 {
            Some(Self { base, components })
        } else {
            None
        }
    }

    #[inline]
    pub const fn base(self) -> BaseType {
        self.base
    }

    #[inline]
    pub const fn components(self) -> usize {
        self.components as usize
    }

    /// GLSL spelling of this type.
    pub const fn glsl_name(self) -> &'static str {
        match (self.base, self.components) {
            (BaseType::Float, 1) => "float",
            (BaseType::Float, 2) => "vec2",
            (BaseType::Float, 3) => "vec3",
            _ => "vec4",
        }
    }

    /// Labels for each component, suitable as column headers.
    pub fn component_names(self) -> &'static [&'static str] {
        static VECTOR: [&str; 4] = ["x", "y", "z", "w"];
        match self.components {
            1 => &["value"],
            n => &VECTOR[..n as usize],
        }
    }
}

impl fmt::Display for GlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported GLSL type `{0}`")]
pub struct ParseGlTypeError(pub String);

impl FromStr for GlType {
    type Err = ParseGlTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        supported_types()
            .iter()
            .copied()
            .find(|ty| ty.glsl_name() == s.trim())
            .ok_or_else(|| ParseGlTypeError(s.to_string()))
    }
}

const SUPPORTED: [GlType; 4] = [GlType::FLOAT, GlType::VEC2, GlType::VEC3, GlType::VEC4];

/// All types a uniform or attribute can be created with, in ascending component order.
#[inline]
pub fn supported_types() -> &'static [GlType] {
    &SUPPORTED
}
