//! Context-free backend that records every command.
//!
//! `HeadlessGl` stands in for a driver where no GL context exists (unit tests, CI).
//! It performs a shallow analysis of the GLSL it is given: enough to report
//! driver-style diagnostics for malformed sources and to resolve the locations of
//! declared uniforms and vertex inputs. Declarations whose identifier is never used
//! are treated as inactive, the same way real compilers eliminate dead code.

use std::collections::HashMap;

use crate::error::{BackendError, ShaderCompilationError};

use super::{BufferUsage, Color, GlBackend, Location, PrimitiveMode};

/// One recorded façade call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CompileAndLink,
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    UniformLocation(String),
    AttributeLocation(String),
    SetUniform { location: Location, values: Vec<f32> },
    CreateBuffer(u32),
    DeleteBuffer(u32),
    BindArrayBuffer(Option<u32>),
    BufferData { bytes: usize, usage: BufferUsage },
    CreateVertexArray(u32),
    DeleteVertexArray(u32),
    BindVertexArray(Option<u32>),
    VertexAttribPointer { location: Location, components: u32, stride: u32, offset: u32 },
    EnableVertexAttribArray(Location),
    DisableVertexAttribArray(Location),
    Viewport { width: u32, height: u32 },
    ClearColor(Color),
    Clear,
    DrawArrays { mode: PrimitiveMode, count: u32 },
    Finish,
}

#[derive(Debug, Default, Clone)]
struct LinkedProgram {
    uniforms: Vec<String>,
    attributes: Vec<String>,
}

/// Recording backend with a simulated linker.
#[derive(Debug, Default)]
pub struct HeadlessGl {
    calls: Vec<GlCall>,
    next_handle: u32,
    programs: HashMap<u32, LinkedProgram>,
    buffers: HashMap<u32, Vec<u8>>,
    vertex_arrays: Vec<u32>,
    bound_buffer: Option<u32>,
}

impl HeadlessGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded since creation or the last [`clear_calls`](Self::clear_calls).
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Number of programs that are linked and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    /// Active uniform names of `program`, in location order.
    pub fn active_uniforms(&self, program: u32) -> Option<&[String]> {
        self.programs.get(&program).map(|p| p.uniforms.as_slice())
    }

    /// Active vertex input names of `program`, in location order.
    pub fn active_attributes(&self, program: u32) -> Option<&[String]> {
        self.programs.get(&program).map(|p| p.attributes.as_slice())
    }

    /// Last contents uploaded into `buffer`, reinterpreted as floats.
    pub fn buffer_floats(&self, buffer: u32) -> Option<Vec<f32>> {
        let bytes = self.buffers.get(&buffer)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    fn alloc_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GlBackend for HeadlessGl {
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn compile_and_link(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self::Program, ShaderCompilationError> {
        self.calls.push(GlCall::CompileAndLink);

        let vertex = analyze_stage(vertex_src)
            .map_err(|e| ShaderCompilationError::new(format!("vertex shader:\n{e}")))?;
        let fragment = analyze_stage(fragment_src)
            .map_err(|e| ShaderCompilationError::new(format!("fragment shader:\n{e}")))?;

        let uses = |name: &str| {
            let total = count_identifier(&vertex.text, name) + count_identifier(&fragment.text, name);
            let declared = vertex.declarations(name) + fragment.declarations(name);
            total > declared
        };

        let mut linked = LinkedProgram::default();
        for name in vertex.uniforms.iter().chain(fragment.uniforms.iter()) {
            if uses(name) && !linked.uniforms.contains(name) {
                linked.uniforms.push(name.clone());
            }
        }
        for name in &vertex.inputs {
            if uses(name) && !linked.attributes.contains(name) {
                linked.attributes.push(name.clone());
            }
        }

        let handle = self.alloc_handle();
        self.programs.insert(handle, linked);
        Ok(handle)
    }

    fn delete_program(&mut self, program: Self::Program) {
        self.calls.push(GlCall::DeleteProgram(program));
        self.programs.remove(&program);
    }

    fn use_program(&mut self, program: Option<Self::Program>) {
        self.calls.push(GlCall::UseProgram(program));
    }

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Location> {
        self.calls.push(GlCall::UniformLocation(name.to_string()));
        let linked = self.programs.get(&program)?;
        linked.uniforms.iter().position(|u| u == name).map(|i| i as Location)
    }

    fn attribute_location(&mut self, program: Self::Program, name: &str) -> Option<Location> {
        self.calls.push(GlCall::AttributeLocation(name.to_string()));
        let linked = self.programs.get(&program)?;
        linked.attributes.iter().position(|a| a == name).map(|i| i as Location)
    }

    fn set_uniform_1f(&mut self, location: Location, x: f32) {
        self.calls.push(GlCall::SetUniform { location, values: vec![x] });
    }

    fn set_uniform_2f(&mut self, location: Location, x: f32, y: f32) {
        self.calls.push(GlCall::SetUniform { location, values: vec![x, y] });
    }

    fn set_uniform_3f(&mut self, location: Location, x: f32, y: f32, z: f32) {
        self.calls.push(GlCall::SetUniform { location, values: vec![x, y, z] });
    }

    fn set_uniform_4f(&mut self, location: Location, x: f32, y: f32, z: f32, w: f32) {
        self.calls.push(GlCall::SetUniform { location, values: vec![x, y, z, w] });
    }

    fn create_buffer(&mut self) -> Result<Self::Buffer, BackendError> {
        let handle = self.alloc_handle();
        self.buffers.insert(handle, Vec::new());
        self.calls.push(GlCall::CreateBuffer(handle));
        Ok(handle)
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        self.calls.push(GlCall::DeleteBuffer(buffer));
        self.buffers.remove(&buffer);
        if self.bound_buffer == Some(buffer) {
            self.bound_buffer = None;
        }
    }

    fn bind_array_buffer(&mut self, buffer: Option<Self::Buffer>) {
        self.calls.push(GlCall::BindArrayBuffer(buffer));
        self.bound_buffer = buffer;
    }

    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage) {
        self.calls.push(GlCall::BufferData { bytes: data.len(), usage });
        if let Some(contents) = self.bound_buffer.and_then(|b| self.buffers.get_mut(&b)) {
            contents.clear();
            contents.extend_from_slice(data);
        }
    }

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, BackendError> {
        let handle = self.alloc_handle();
        self.vertex_arrays.push(handle);
        self.calls.push(GlCall::CreateVertexArray(handle));
        Ok(handle)
    }

    fn delete_vertex_array(&mut self, vao: Self::VertexArray) {
        self.calls.push(GlCall::DeleteVertexArray(vao));
        self.vertex_arrays.retain(|v| *v != vao);
    }

    fn bind_vertex_array(&mut self, vao: Option<Self::VertexArray>) {
        self.calls.push(GlCall::BindVertexArray(vao));
    }

    fn vertex_attrib_pointer(&mut self, location: Location, components: u32, stride: u32, offset: u32) {
        self.calls.push(GlCall::VertexAttribPointer { location, components, stride, offset });
    }

    fn enable_vertex_attrib_array(&mut self, location: Location) {
        self.calls.push(GlCall::EnableVertexAttribArray(location));
    }

    fn disable_vertex_attrib_array(&mut self, location: Location) {
        self.calls.push(GlCall::DisableVertexAttribArray(location));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(GlCall::Viewport { width, height });
    }

    fn clear_color(&mut self, color: Color) {
        self.calls.push(GlCall::ClearColor(color));
    }

    fn clear(&mut self) {
        self.calls.push(GlCall::Clear);
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, count: u32) {
        self.calls.push(GlCall::DrawArrays { mode, count });
    }

    fn finish(&mut self) {
        self.calls.push(GlCall::Finish);
    }
}

// ── GLSL analysis ─────────────────────────────────────────────────────────

/// Top-level interface of one shader stage.
#[derive(Debug, Default)]
struct StageInterface {
    /// Source with comments stripped.
    text: String,
    uniforms: Vec<String>,
    /// `in` / `attribute` declarations. Only meaningful for the vertex stage.
    inputs: Vec<String>,
}

impl StageInterface {
    fn declarations(&self, name: &str) -> usize {
        self.uniforms.iter().chain(self.inputs.iter()).filter(|n| *n == name).count()
    }
}

fn analyze_stage(src: &str) -> Result<StageInterface, String> {
    let text = strip_comments(src);
    check_delimiters(&text)?;

    if !identifiers(&text).any(|t| t == "main") {
        return Err("0:1: error: no `main` function defined".to_string());
    }

    let mut interface = StageInterface::default();
    for statement in top_level_statements(&text) {
        let words: Vec<&str> = identifiers(&statement)
            .filter(|w| !w.starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        let Some(name) = words.last().copied() else { continue };

        // Skip `layout(...)` and precision/interpolation qualifiers ahead of the storage qualifier.
        let storage = words.iter().find(|w| matches!(**w, "uniform" | "in" | "attribute"));
        match storage.copied() {
            Some("uniform") if words.len() >= 3 => interface.uniforms.push(name.to_string()),
            Some("in" | "attribute") if words.len() >= 3 => interface.inputs.push(name.to_string()),
            _ => {}
        }
    }

    interface.text = text;
    Ok(interface)
}

fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        // Keep line numbers stable for diagnostics.
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

fn check_delimiters(text: &str) -> Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1;

    for c in text.chars() {
        match c {
            '\n' => line += 1,
            '(' | '{' | '[' => stack.push((c, line)),
            ')' | '}' | ']' => {
                let expected = match c {
                    ')' => '(',
                    '}' => '{',
                    _ => '[',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    _ => return Err(format!("0:{line}: error: syntax error, unexpected '{c}'")),
                }
            }
            _ => {}
        }
    }

    match stack.pop() {
        Some((open, at)) => Err(format!("0:{at}: error: unclosed '{open}'")),
        None => Ok(()),
    }
}

/// Statements outside of any `{}` block, split on `;`.
fn top_level_statements(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                // A function definition ends whatever preceded it.
                if depth == 1 {
                    current.clear();
                }
            }
            '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => out.push(std::mem::take(&mut current)),
            _ if depth == 0 => current.push(c),
            _ => {}
        }
    }

    out
}

fn identifiers(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

fn count_identifier(text: &str, name: &str) -> usize {
    identifiers(text).filter(|w| *w == name).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "#version 330 core
in vec3 position;
in vec2 unused_uv;
uniform float k; // scale
void main() {
    gl_Position = vec4(position * k, 1.0);
}
";

    const FS: &str = "#version 330 core
uniform vec3 tint;
uniform float dead;
out vec4 color;
void main() { color = vec4(tint, 1.0); }
";

    // ── analysis ──────────────────────────────────────────────────────────

    #[test]
    fn collects_declarations_from_both_stages() {
        let vs = analyze_stage(VS).unwrap();
        assert_eq!(vs.uniforms, ["k"]);
        assert_eq!(vs.inputs, ["position", "unused_uv"]);

        let fs = analyze_stage(FS).unwrap();
        assert_eq!(fs.uniforms, ["tint", "dead"]);
        assert!(fs.inputs.is_empty());
    }

    #[test]
    fn layout_qualified_inputs_are_recognized() {
        let vs = analyze_stage("layout(location = 0) in vec4 p; void main() { gl_Position = p; }")
            .unwrap();
        assert_eq!(vs.inputs, ["p"]);
    }

    #[test]
    fn missing_main_is_a_compile_error() {
        let err = analyze_stage("uniform float k;").unwrap_err();
        assert!(err.contains("main"), "{err}");
    }

    #[test]
    fn unbalanced_braces_report_the_line() {
        let err = analyze_stage("void main() {\n  x = (1;\n}").unwrap_err();
        assert!(err.starts_with("0:3:"), "{err}");
    }

    #[test]
    fn comments_do_not_declare_anything() {
        let vs = analyze_stage("/* uniform float k; */\nvoid main() {}").unwrap();
        assert!(vs.uniforms.is_empty());
    }

    // ── linking ───────────────────────────────────────────────────────────

    #[test]
    fn unused_declarations_are_inactive() {
        let mut gl = HeadlessGl::new();
        let program = gl.compile_and_link(VS, FS).unwrap();

        assert_eq!(gl.active_uniforms(program).unwrap(), ["k", "tint"]);
        assert_eq!(gl.active_attributes(program).unwrap(), ["position"]);
        assert_eq!(gl.uniform_location(program, "tint"), Some(1));
        assert_eq!(gl.uniform_location(program, "dead"), None);
        assert_eq!(gl.attribute_location(program, "unused_uv"), None);
    }

    #[test]
    fn compile_errors_name_the_stage() {
        let mut gl = HeadlessGl::new();
        let err = gl.compile_and_link(VS, "void main() {").unwrap_err();
        assert!(err.diagnostic.starts_with("fragment shader:"), "{}", err.diagnostic);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn deleted_programs_resolve_nothing() {
        let mut gl = HeadlessGl::new();
        let program = gl.compile_and_link(VS, FS).unwrap();
        gl.delete_program(program);
        assert_eq!(gl.uniform_location(program, "k"), None);
        assert_eq!(gl.live_programs(), 0);
    }

    // ── buffers ───────────────────────────────────────────────────────────

    #[test]
    fn buffer_data_goes_to_the_bound_buffer() {
        let mut gl = HeadlessGl::new();
        let buffer = gl.create_buffer().unwrap();
        gl.bind_array_buffer(Some(buffer));
        let floats = [1.0f32, 2.5, -3.0];
        gl.buffer_data(bytemuck::cast_slice(&floats), BufferUsage::DynamicDraw);

        assert_eq!(gl.buffer_floats(buffer).unwrap(), floats);
        assert_eq!(
            gl.calls().last(),
            Some(&GlCall::BufferData { bytes: 12, usage: BufferUsage::DynamicDraw })
        );
    }
}
