use glow::HasContext;

use crate::error::{BackendError, ShaderCompilationError};

use super::{BufferUsage, Color, GlBackend, Location, PrimitiveMode};

/// OpenGL 3.3 core backend.
///
/// Requires the context that created `gl` to be current on the calling thread for
/// every call; the windowed runtime guarantees this.
pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Raw context, for callers that need GL state the façade does not cover.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn compile_stage(
        &self,
        stage: u32,
        label: &str,
        src: &str,
    ) -> Result<glow::NativeShader, ShaderCompilationError> {
        // SAFETY: the context is current (type invariant); the shader is deleted on failure.
        unsafe {
            let shader = self.gl.create_shader(stage).map_err(|e| {
                ShaderCompilationError::new(format!("{label} shader: create_shader failed: {e}"))
            })?;
            self.gl.shader_source(shader, src);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let info = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(ShaderCompilationError::new(format!("{label} shader:\n{info}")));
            }

            Ok(shader)
        }
    }
}

impl GlBackend for GlowBackend {
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;

    fn compile_and_link(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self::Program, ShaderCompilationError> {
        let vs = self.compile_stage(glow::VERTEX_SHADER, "vertex", vertex_src)?;
        let fs = match self.compile_stage(glow::FRAGMENT_SHADER, "fragment", fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                // SAFETY: `vs` was created above and is not attached to anything.
                unsafe { self.gl.delete_shader(vs) };
                return Err(e);
            }
        };

        // SAFETY: both shaders compiled on this context; they are detached and deleted
        // before returning regardless of the link outcome.
        unsafe {
            let program = match self.gl.create_program() {
                Ok(p) => p,
                Err(e) => {
                    self.gl.delete_shader(vs);
                    self.gl.delete_shader(fs);
                    return Err(ShaderCompilationError::new(format!(
                        "create_program failed: {e}"
                    )));
                }
            };

            self.gl.attach_shader(program, vs);
            self.gl.attach_shader(program, fs);
            self.gl.link_program(program);

            self.gl.detach_shader(program, vs);
            self.gl.detach_shader(program, fs);
            self.gl.delete_shader(vs);
            self.gl.delete_shader(fs);

            if !self.gl.get_program_link_status(program) {
                let info = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(ShaderCompilationError::new(format!("link:\n{info}")));
            }

            Ok(program)
        }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&mut self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Location> {
        unsafe { self.gl.get_uniform_location(program, name) }.map(|loc| loc.0)
    }

    fn attribute_location(&mut self, program: Self::Program, name: &str) -> Option<Location> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn set_uniform_1f(&mut self, location: Location, x: f32) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_1_f32(Some(&loc), x) }
    }

    fn set_uniform_2f(&mut self, location: Location, x: f32, y: f32) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_2_f32(Some(&loc), x, y) }
    }

    fn set_uniform_3f(&mut self, location: Location, x: f32, y: f32, z: f32) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_3_f32(Some(&loc), x, y, z) }
    }

    fn set_uniform_4f(&mut self, location: Location, x: f32, y: f32, z: f32, w: f32) {
        let loc = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_4_f32(Some(&loc), x, y, z, w) }
    }

    fn create_buffer(&mut self) -> Result<Self::Buffer, BackendError> {
        unsafe { self.gl.create_buffer() }.map_err(|e| BackendError::create("vertex buffer", e))
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn bind_array_buffer(&mut self, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage) {
        let usage = match usage {
            BufferUsage::StaticDraw => glow::STATIC_DRAW,
            BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
            BufferUsage::StreamDraw => glow::STREAM_DRAW,
        };
        unsafe { self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, usage) }
    }

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, BackendError> {
        unsafe { self.gl.create_vertex_array() }
            .map_err(|e| BackendError::create("vertex array", e))
    }

    fn delete_vertex_array(&mut self, vao: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vao) }
    }

    fn bind_vertex_array(&mut self, vao: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vao) }
    }

    fn vertex_attrib_pointer(&mut self, location: Location, components: u32, stride: u32, offset: u32) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location,
                components as i32,
                glow::FLOAT,
                false,
                stride as i32,
                offset as i32,
            )
        }
    }

    fn enable_vertex_attrib_array(&mut self, location: Location) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn disable_vertex_attrib_array(&mut self, location: Location) {
        unsafe { self.gl.disable_vertex_attrib_array(location) }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        unsafe { self.gl.viewport(0, 0, w, h) }
    }

    fn clear_color(&mut self, color: Color) {
        unsafe { self.gl.clear_color(color.r, color.g, color.b, color.a) }
    }

    fn clear(&mut self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, count: u32) {
        let mode = match mode {
            PrimitiveMode::Points => glow::POINTS,
            PrimitiveMode::Lines => glow::LINES,
            PrimitiveMode::LineStrip => glow::LINE_STRIP,
            PrimitiveMode::LineLoop => glow::LINE_LOOP,
            PrimitiveMode::Triangles => glow::TRIANGLES,
            PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
            PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
        };
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        unsafe { self.gl.draw_arrays(mode, 0, count) }
    }

    fn finish(&mut self) {
        unsafe { self.gl.finish() }
    }
}
