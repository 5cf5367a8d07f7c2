use crate::gl::{BufferUsage, Color, PrimitiveMode};

/// Vertex stage used when no source is supplied.
pub const DEFAULT_VERTEX_SHADER: &str = "#version 330 core

in vec3 position;

uniform float k;
uniform vec3 v;

out vec3 vertexColor;

void main() {
    vertexColor = v * k;
    gl_Position = vec4(position, 1.0);
}
";

/// Fragment stage used when no source is supplied.
pub const DEFAULT_FRAGMENT_SHADER: &str = "#version 330 core

in vec3 vertexColor;

out vec4 fragColor;

void main() {
    fragColor = vec4(vertexColor, 1.0);
}
";

/// Initial state of a [`Core`](super::Core).
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub primitive_mode: PrimitiveMode,
    pub clear_color: Color,
    /// Usage hint for vertex buffer uploads.
    pub buffer_usage: BufferUsage,
    /// Record [`ChangeEvent`](super::ChangeEvent)s for `drain_events`. Disable when
    /// nothing drains them.
    pub record_events: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            vertex_shader: DEFAULT_VERTEX_SHADER.to_string(),
            fragment_shader: DEFAULT_FRAGMENT_SHADER.to_string(),
            primitive_mode: PrimitiveMode::Triangles,
            clear_color: Color::new(0.1, 0.1, 0.12, 1.0),
            buffer_usage: BufferUsage::StaticDraw,
            record_events: true,
        }
    }
}
