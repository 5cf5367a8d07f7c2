use crate::error::CoreError;
use crate::gl::{GlBackend, Location};

use super::GlType;

/// A typed GPU value with float components.
///
/// Each instance is owned by exactly one uniform or one (vertex, attribute) slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GlVariable {
    Scalar(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl GlVariable {
    /// Zero-valued variable of the given type.
    pub fn zeroed(ty: GlType) -> Self {
        match ty.components() {
            1 => GlVariable::Scalar(0.0),
            2 => GlVariable::Vec2([0.0; 2]),
            3 => GlVariable::Vec3([0.0; 3]),
            _ => GlVariable::Vec4([0.0; 4]),
        }
    }

    pub fn gl_type(&self) -> GlType {
        match self {
            GlVariable::Scalar(_) => GlType::FLOAT,
            GlVariable::Vec2(_) => GlType::VEC2,
            GlVariable::Vec3(_) => GlType::VEC3,
            GlVariable::Vec4(_) => GlType::VEC4,
        }
    }

    /// Components in x, y, z, w order.
    pub fn components(&self) -> &[f32] {
        match self {
            GlVariable::Scalar(v) => std::slice::from_ref(v),
            GlVariable::Vec2(v) => v,
            GlVariable::Vec3(v) => v,
            GlVariable::Vec4(v) => v,
        }
    }

    fn components_mut(&mut self) -> &mut [f32] {
        match self {
            GlVariable::Scalar(v) => std::slice::from_mut(v),
            GlVariable::Vec2(v) => v,
            GlVariable::Vec3(v) => v,
            GlVariable::Vec4(v) => v,
        }
    }

    #[inline]
    pub fn component(&self, index: usize) -> Option<f32> {
        self.components().get(index).copied()
    }

    /// Sets one component. Values are not validated; NaN and infinities pass through.
    pub fn set_component(&mut self, index: usize, value: f32) -> Result<(), CoreError> {
        let ty = self.gl_type();
        let slot = self
            .components_mut()
            .get_mut(index)
            .ok_or(CoreError::ComponentOutOfRange { component: index, ty })?;
        *slot = value;
        Ok(())
    }

    /// Writes the components into `buffer[offset..]`.
    ///
    /// Returns the number of floats written, or `None` if they do not fit.
    pub fn write_to(&self, buffer: &mut [f32], offset: usize) -> Option<usize> {
        let src = self.components();
        let dst = buffer.get_mut(offset..offset.checked_add(src.len())?)?;
        dst.copy_from_slice(src);
        Some(src.len())
    }

    /// Sets this value as the active uniform at `location` of the bound program.
    pub fn bind_uniform<G: GlBackend + ?Sized>(&self, gl: &mut G, location: Location) {
        match *self {
            GlVariable::Scalar(x) => gl.set_uniform_1f(location, x),
            GlVariable::Vec2([x, y]) => gl.set_uniform_2f(location, x, y),
            GlVariable::Vec3([x, y, z]) => gl.set_uniform_3f(location, x, y, z),
            GlVariable::Vec4([x, y, z, w]) => gl.set_uniform_4f(location, x, y, z, w),
        }
    }
}

impl From<f32> for GlVariable {
    fn from(v: f32) -> Self {
        GlVariable::Scalar(v)
    }
}

impl From<[f32; 2]> for GlVariable {
    fn from(v: [f32; 2]) -> Self {
        GlVariable::Vec2(v)
    }
}

impl From<[f32; 3]> for GlVariable {
    fn from(v: [f32; 3]) -> Self {
        GlVariable::Vec3(v)
    }
}

impl From<[f32; 4]> for GlVariable {
    fn from(v: [f32; 4]) -> Self {
        GlVariable::Vec4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, HeadlessGl};
    use crate::value::supported_types;

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn zeroed_matches_requested_type() {
        for &ty in supported_types() {
            let var = GlVariable::zeroed(ty);
            assert_eq!(var.gl_type(), ty);
            assert!(var.components().iter().all(|c| *c == 0.0));
            assert_eq!(var.components().len(), ty.components());
        }
    }

    // ── components ────────────────────────────────────────────────────────

    #[test]
    fn set_component_updates_in_place() {
        let mut var = GlVariable::zeroed(GlType::VEC3);
        var.set_component(2, 7.5).unwrap();
        assert_eq!(var, GlVariable::Vec3([0.0, 0.0, 7.5]));
        assert_eq!(var.component(2), Some(7.5));
    }

    #[test]
    fn set_component_out_of_range_is_rejected() {
        let mut var = GlVariable::Scalar(1.0);
        let err = var.set_component(1, 2.0).unwrap_err();
        assert_eq!(err, CoreError::ComponentOutOfRange { component: 1, ty: GlType::FLOAT });
        assert_eq!(var, GlVariable::Scalar(1.0));
    }

    #[test]
    fn non_finite_values_are_accepted() {
        let mut var = GlVariable::zeroed(GlType::VEC2);
        var.set_component(0, f32::INFINITY).unwrap();
        var.set_component(1, f32::NAN).unwrap();
        assert!(var.component(0).unwrap().is_infinite());
        assert!(var.component(1).unwrap().is_nan());
    }

    // ── serialization ─────────────────────────────────────────────────────

    #[test]
    fn write_to_places_components_at_offset() {
        let var = GlVariable::Vec4([1.0, 2.0, 3.0, 4.0]);
        let mut buf = [0.0f32; 6];
        assert_eq!(var.write_to(&mut buf, 1), Some(4));
        assert_eq!(buf, [0.0, 1.0, 2.0, 3.0, 4.0, 0.0]);
    }

    #[test]
    fn write_to_refuses_spans_that_do_not_fit() {
        let var = GlVariable::Vec3([1.0, 2.0, 3.0]);
        let mut buf = [0.0f32; 4];
        assert_eq!(var.write_to(&mut buf, 2), None);
        assert_eq!(buf, [0.0; 4]);
    }

    // ── uniform binding ───────────────────────────────────────────────────

    #[test]
    fn bind_uniform_dispatches_on_arity() {
        let mut gl = HeadlessGl::new();
        GlVariable::Scalar(0.5).bind_uniform(&mut gl, 3);
        GlVariable::Vec3([1.0, 0.0, 1.0]).bind_uniform(&mut gl, 4);

        assert_eq!(
            gl.calls(),
            [
                GlCall::SetUniform { location: 3, values: vec![0.5] },
                GlCall::SetUniform { location: 4, values: vec![1.0, 0.0, 1.0] },
            ]
        );
    }
}
