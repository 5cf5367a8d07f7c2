//! Shared fixtures for the reconciliation tests.

#![allow(dead_code)]

use shaderlab_engine::gl::{GlCall, HeadlessGl};
use shaderlab_engine::{AttributeId, Core, CoreConfig, GlType, Uniform, attribute};

/// Vertex stage with a second, optional input.
pub const COLORED_VERTEX_SHADER: &str = "#version 330 core
in vec3 position;
in vec3 color;
uniform float k;
uniform vec3 v;
out vec3 vertexColor;
void main() {
    vertexColor = color * v * k;
    gl_Position = vec4(position, 1.0);
}
";

pub const TRIANGLE: [[f32; 3]; 3] = [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.5, 0.5, 0.0]];

/// Core with the default shader pair, no uniforms, no attributes.
pub fn empty_core() -> Core<HeadlessGl> {
    Core::new(HeadlessGl::new(), CoreConfig::default())
}

/// `k = 0.5`, `v = (1, 0, 1)`, a `position` attribute and one triangle.
pub fn demo_core() -> (Core<HeadlessGl>, AttributeId) {
    let mut core = empty_core();
    core.add_uniform(Uniform::new("k", 0.5f32));
    core.add_uniform(Uniform::new("v", [1.0f32, 0.0, 1.0]));

    let position = core
        .add_attribute(attribute::make(GlType::VEC3, "position"))
        .unwrap();

    for p in TRIANGLE {
        let index = core.add_vertex();
        core.vertex_mut(index).unwrap().set_value(position, p).unwrap();
    }

    (core, position)
}

/// Renders once and forgets every call recorded so far.
pub fn settle(core: &mut Core<HeadlessGl>) {
    core.render(800, 600).unwrap();
    core.backend_mut().clear_calls();
    core.drain_events();
}

pub fn count(core: &Core<HeadlessGl>, pred: impl Fn(&GlCall) -> bool) -> usize {
    core.backend().count_calls(pred)
}

pub fn draws(core: &Core<HeadlessGl>) -> usize {
    count(core, |c| matches!(c, GlCall::DrawArrays { .. }))
}

pub fn uniform_lookups(core: &Core<HeadlessGl>) -> usize {
    count(core, |c| matches!(c, GlCall::UniformLocation(_)))
}

pub fn attribute_lookups(core: &Core<HeadlessGl>) -> usize {
    count(core, |c| matches!(c, GlCall::AttributeLocation(_)))
}

pub fn uploads(core: &Core<HeadlessGl>) -> usize {
    count(core, |c| matches!(c, GlCall::BufferData { .. }))
}

pub fn compiles(core: &Core<HeadlessGl>) -> usize {
    count(core, |c| matches!(c, GlCall::CompileAndLink))
}
