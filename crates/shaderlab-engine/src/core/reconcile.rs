//! Per-frame reconciliation: shaders, then uniforms, then vertices, then the draw.

use crate::error::BackendError;
use crate::gl::{GlBackend, PrimitiveMode};

use super::dirty::DirtyState;
use super::events::ChangeEvent;
use super::layout::VertexLayout;
use super::Core;

/// The draw call issued by a frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub mode: PrimitiveMode,
    pub count: u32,
}

/// What one [`Core::render`] call did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// A compile + link was attempted (successfully or not).
    pub recompiled: bool,
    pub uniforms_relocated: bool,
    pub vertices_repacked: bool,
    /// `None` when the frame was skipped because the program failed to build.
    pub draw: Option<DrawCall>,
}

/// Cumulative counters since the core was created.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    pub compiles: u64,
    pub compile_failures: u64,
    pub uniform_passes: u64,
    pub vertex_passes: u64,
    pub draws: u64,
}

impl<G: GlBackend> Core<G> {
    /// Reconciles GPU state with the model and draws one frame into a `width` x `height` target.
    ///
    /// Compile failures are not errors: they land in [`error_output`](Self::error_output)
    /// and the frame is cleared but not drawn. The broken source is not compiled again;
    /// frames stay undrawn until the next shader edit.
    /// `Err` is only returned when the backend cannot create a GPU object; the dirty
    /// flags are then left untouched.
    pub fn render(&mut self, width: u32, height: u32) -> Result<FrameReport, BackendError> {
        debug_assert!(self.is_schema_in_sync(), "vertex keys drifted from the attribute schema");

        self.stats.frames += 1;
        let mut report = FrameReport::default();

        if self.dirty.contains(DirtyState::SHADERS) {
            report.recompiled = true;
            if !self.recompile() {
                // Uniform and vertex work stays pending for the next successful compile.
                self.dirty.remove(DirtyState::SHADERS);
                self.clear_target(width, height);
                return Ok(report);
            }
        }

        let Some(program) = self.gpu.program else {
            // The last compile failed and the source has not changed since.
            self.clear_target(width, height);
            return Ok(report);
        };

        self.gl.use_program(Some(program));

        if report.recompiled || self.dirty.contains(DirtyState::UNIFORMS) {
            self.relocate_uniforms(program);
            report.uniforms_relocated = true;
        }

        if report.recompiled || self.dirty.contains(DirtyState::VERTICES) {
            if let Err(e) = self.repack_vertices(program) {
                log::error!("vertex repack failed: {e}");
                return Err(e);
            }
            report.vertices_repacked = true;
        }

        self.dirty = DirtyState::empty();

        let draw = DrawCall {
            mode: self.primitive_mode,
            count: u32::try_from(self.vertices.len()).unwrap_or(u32::MAX),
        };

        self.clear_target(width, height);
        self.gl.bind_vertex_array(self.gpu.vertex_array);
        self.gl.draw_arrays(draw.mode, draw.count);
        self.gl.bind_vertex_array(None);
        self.gl.finish();

        self.stats.draws += 1;
        report.draw = Some(draw);
        Ok(report)
    }

    /// Deletes the program, vertex buffer and vertex array. The next render recreates them.
    pub fn release_gpu_resources(&mut self) {
        self.gl.use_program(None);
        if let Some(program) = self.gpu.program.take() {
            self.gl.delete_program(program);
        }
        if let Some(vao) = self.gpu.vertex_array.take() {
            self.gl.delete_vertex_array(vao);
        }
        if let Some(buffer) = self.gpu.buffer.take() {
            self.gl.delete_buffer(buffer);
        }
        self.gpu.enabled.clear();

        self.reset_locations();
        self.dirty = DirtyState::all();
        log::debug!("gpu resources released");
    }

    fn clear_target(&mut self, width: u32, height: u32) {
        self.gl.set_viewport(width, height);
        self.gl.clear_color(self.clear_color);
        self.gl.clear();
    }

    /// Replaces the program. Returns `false` when compile or link failed.
    fn recompile(&mut self) -> bool {
        self.gl.use_program(None);
        if let Some(old) = self.gpu.program.take() {
            self.gl.delete_program(old);
        }

        match self.gl.compile_and_link(&self.vertex_shader, &self.fragment_shader) {
            Ok(program) => {
                self.gpu.program = Some(program);
                self.stats.compiles += 1;
                if self.error_output.take().is_some() {
                    self.events.push(ChangeEvent::ErrorOutputChanged);
                }
                log::debug!("program linked: {program:?}");
                true
            }
            Err(e) => {
                self.stats.compile_failures += 1;
                self.reset_locations();
                if self.error_output.as_deref() != Some(e.diagnostic.as_str()) {
                    log::warn!("{e}");
                    self.error_output = Some(e.diagnostic);
                    self.events.push(ChangeEvent::ErrorOutputChanged);
                }
                false
            }
        }
    }

    /// Drops every resolved location; they referred to a program that no longer exists.
    fn reset_locations(&mut self) {
        for (index, uniform) in self.uniforms.iter_mut().enumerate() {
            if uniform.set_location(None) {
                self.events.push(ChangeEvent::UniformLocationChanged(index));
            }
        }
        for info in self.attributes.iter_mut() {
            if info.set_location(None) {
                self.events.push(ChangeEvent::AttributeLocationChanged(info.id()));
            }
        }
        self.layout = VertexLayout::default();
    }

    /// Resolves every uniform by name and binds the ones the program still has.
    fn relocate_uniforms(&mut self, program: G::Program) {
        for (index, uniform) in self.uniforms.iter_mut().enumerate() {
            let location = self.gl.uniform_location(program, uniform.name());
            if uniform.set_location(location) {
                self.events.push(ChangeEvent::UniformLocationChanged(index));
            }

            match location {
                Some(location) => uniform.variable().bind_uniform(&mut self.gl, location),
                None => log::debug!("uniform `{}` is not active in the program", uniform.name()),
            }
        }
        self.stats.uniform_passes += 1;
    }

    /// Rebuilds the interleaved vertex buffer and the vertex array pointing into it.
    fn repack_vertices(&mut self, program: G::Program) -> Result<(), BackendError> {
        let mut layout = VertexLayout::default();
        for info in self.attributes.iter_mut() {
            let id = info.id();
            let location = if info.gl_type().base().is_interleavable() {
                self.gl.attribute_location(program, info.name())
            } else {
                None
            };

            if info.set_location(location) {
                self.events.push(ChangeEvent::AttributeLocationChanged(id));
            }

            match location {
                Some(location) => layout.push(id, location, info.gl_type().components() as u32),
                None => log::debug!("attribute `{}` is not active in the program", info.name()),
            }
        }

        let vao = match self.gpu.vertex_array {
            Some(vao) => vao,
            None => *self.gpu.vertex_array.insert(self.gl.create_vertex_array()?),
        };
        let buffer = match self.gpu.buffer {
            Some(buffer) => buffer,
            None => *self.gpu.buffer.insert(self.gl.create_buffer()?),
        };

        let packed = layout.pack(&self.vertices);
        log::trace!(
            "repacked {} vertices, stride {} floats, {} bytes",
            self.vertices.len(),
            layout.stride(),
            packed.len() * size_of::<f32>()
        );

        self.gl.bind_vertex_array(Some(vao));
        self.gl.bind_array_buffer(Some(buffer));
        self.gl.buffer_data(bytemuck::cast_slice(&packed), self.buffer_usage);

        let stride = layout.stride_bytes();
        for slot in layout.slots() {
            self.gl.vertex_attrib_pointer(slot.location, slot.components, stride, slot.offset_bytes());
            self.gl.enable_vertex_attrib_array(slot.location);
        }
        for &stale in self.gpu.enabled.iter().filter(|l| !layout.contains_location(**l)) {
            self.gl.disable_vertex_attrib_array(stale);
        }

        self.gl.bind_vertex_array(None);
        self.gl.bind_array_buffer(None);

        self.gpu.enabled = layout.slots().iter().map(|s| s.location).collect();
        self.layout = layout;
        self.packed = packed;
        self.stats.vertex_passes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute;
    use crate::core::CoreConfig;
    use crate::gl::{GlCall, HeadlessGl};
    use crate::uniform::Uniform;
    use crate::value::GlType;

    fn demo() -> Core<HeadlessGl> {
        let mut core = Core::new(HeadlessGl::new(), CoreConfig::default());
        core.add_uniform(Uniform::new("k", 0.5f32));
        core.add_uniform(Uniform::new("v", [1.0f32, 0.0, 1.0]));
        let pos = core.add_attribute(attribute::make(GlType::VEC3, "position")).unwrap();
        for p in [[-0.5f32, -0.5, 0.0], [0.5, -0.5, 0.0], [0.5, 0.5, 0.0]] {
            let i = core.add_vertex();
            core.vertex_mut(i).unwrap().set_value(pos, p).unwrap();
        }
        core
    }

    // ── first frame ───────────────────────────────────────────────────────

    #[test]
    fn first_frame_runs_every_step() {
        let mut core = demo();
        let report = core.render(640, 480).unwrap();

        assert!(report.recompiled && report.uniforms_relocated && report.vertices_repacked);
        assert_eq!(report.draw, Some(DrawCall { mode: PrimitiveMode::Triangles, count: 3 }));
        assert!(core.dirty().is_valid());
        assert_eq!(core.error_output(), None);
        assert_eq!(core.uniform(0).unwrap().location(), Some(0));
        assert_eq!(core.uniform(1).unwrap().location(), Some(1));
    }

    #[test]
    fn uniform_values_are_bound_after_relocation() {
        let mut core = demo();
        core.render(1, 1).unwrap();

        let gl = core.backend();
        assert!(gl.calls().contains(&GlCall::SetUniform { location: 0, values: vec![0.5] }));
        assert!(gl.calls().contains(&GlCall::SetUniform { location: 1, values: vec![1.0, 0.0, 1.0] }));
    }

    #[test]
    fn draw_follows_clear() {
        let mut core = demo();
        core.render(320, 200).unwrap();

        let calls = core.backend().calls();
        let clear = calls.iter().position(|c| *c == GlCall::Clear).unwrap();
        let draw = calls.iter().position(|c| matches!(c, GlCall::DrawArrays { .. })).unwrap();
        assert!(clear < draw);
        assert!(calls.contains(&GlCall::Viewport { width: 320, height: 200 }));
        assert_eq!(calls.last(), Some(&GlCall::Finish));
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn compile_failure_resets_locations_and_waits_for_an_edit() {
        let mut core = demo();
        core.render(1, 1).unwrap();
        core.set_fragment_shader("void main() {");

        let report = core.render(1, 1).unwrap();
        assert!(report.recompiled);
        assert_eq!(report.draw, None);
        assert!(core.error_output().is_some());
        assert_eq!(core.dirty(), DirtyState::empty());
        assert!(core.uniforms().iter().all(|u| u.location().is_none()));
        assert!(core.attributes().all(|a| a.location().is_none()));
        assert_eq!(core.backend().live_programs(), 0);
        assert_eq!(core.stats().compile_failures, 1);
    }

    #[test]
    fn broken_program_is_not_recompiled_without_edits() {
        let mut core = demo();
        core.set_fragment_shader("void main() {");

        for _ in 0..5 {
            let report = core.render(1, 1).unwrap();
            assert_eq!(report.draw, None);
        }

        let gl = core.backend();
        assert_eq!(gl.count_calls(|c| *c == GlCall::CompileAndLink), 1);
        assert_eq!(gl.count_calls(|c| matches!(c, GlCall::DrawArrays { .. })), 0);
        assert_eq!(core.stats().compile_failures, 1);
    }

    #[test]
    fn edits_during_a_failure_apply_after_the_fix() {
        let mut core = demo();
        core.set_fragment_shader("void main() {");
        core.render(1, 1).unwrap();

        core.uniform_mut(0).unwrap().set_component(0, 0.25).unwrap();
        let report = core.render(1, 1).unwrap();
        assert!(!report.recompiled && !report.uniforms_relocated);
        assert_eq!(core.dirty(), DirtyState::UNIFORMS | DirtyState::VERTICES);

        core.set_fragment_shader(crate::core::DEFAULT_FRAGMENT_SHADER);
        let report = core.render(1, 1).unwrap();
        assert!(report.draw.is_some());
        assert!(core.backend().calls().contains(&GlCall::SetUniform { location: 0, values: vec![0.25] }));
    }

    #[test]
    fn same_diagnostic_is_reported_once() {
        let mut core = demo();
        core.set_vertex_shader("void mian() {}");
        core.render(1, 1).unwrap();
        core.drain_events();

        // A different source that fails with the same message.
        core.set_vertex_shader("void mian() { }");
        core.render(1, 1).unwrap();
        assert!(!core.drain_events().contains(&ChangeEvent::ErrorOutputChanged));
        assert_eq!(core.stats().compile_failures, 2);
    }

    // ── resources ─────────────────────────────────────────────────────────

    #[test]
    fn releasing_resources_deletes_everything_and_forces_a_rebuild() {
        let mut core = demo();
        core.render(1, 1).unwrap();
        core.release_gpu_resources();

        let gl = core.backend();
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.count_calls(|c| matches!(c, GlCall::DeleteBuffer(_))), 1);
        assert_eq!(gl.count_calls(|c| matches!(c, GlCall::DeleteVertexArray(_))), 1);
        assert_eq!(core.dirty(), DirtyState::all());

        assert!(core.render(1, 1).unwrap().recompiled);
        assert_eq!(core.backend().live_programs(), 1);
    }

    #[test]
    fn buffer_and_vertex_array_are_reused_across_repacks() {
        let mut core = demo();
        core.render(1, 1).unwrap();
        core.add_vertex();
        core.render(1, 1).unwrap();

        let gl = core.backend();
        assert_eq!(gl.count_calls(|c| matches!(c, GlCall::CreateBuffer(_))), 1);
        assert_eq!(gl.count_calls(|c| matches!(c, GlCall::CreateVertexArray(_))), 1);
        assert_eq!(core.packed_vertices().len(), 12);
    }
}
