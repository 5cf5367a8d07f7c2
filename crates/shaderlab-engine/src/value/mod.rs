//! Typed value model.
//!
//! GPU-compatible scalar/vector values used both as uniform values and as
//! per-vertex attribute values. The set of types is closed: `float`, `vec2`,
//! `vec3`, `vec4`.

mod gl_type;
mod variable;

pub use gl_type::{BaseType, GlType, ParseGlTypeError, supported_types};
pub use variable::GlVariable;
