//! Demo session: the model the studio edits, independent of any window.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use shaderlab_engine::gl::GlBackend;
use shaderlab_engine::{AttributeId, Core, CoreError, GlType, Uniform, attribute};

const TRIANGLE: [[f32; 3]; 3] = [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.5, 0.5, 0.0]];

/// Handles into the demo model.
#[derive(Debug, Copy, Clone)]
pub struct Demo {
    pub k: usize,
    pub position: AttributeId,
}

/// Adds `k = 0.5`, `v = (1, 0, 1)`, a `position` attribute and one triangle.
pub fn populate_demo<G: GlBackend>(core: &mut Core<G>) -> Result<Demo, CoreError> {
    let k = core.add_uniform(Uniform::new("k", 0.5f32));
    core.add_uniform(Uniform::new("v", [1.0f32, 0.0, 1.0]));
    let position = core.add_attribute(attribute::make(GlType::VEC3, "position"))?;

    for p in TRIANGLE {
        let index = core.add_vertex();
        core.vertex_mut(index)?.set_value(position, p)?;
    }

    Ok(Demo { k, position })
}

/// Pulses `k` between 0 and 1 with a two second period.
pub fn animate<G: GlBackend>(core: &mut Core<G>, demo: &Demo, elapsed: Duration) -> Result<(), CoreError> {
    let phase = elapsed.as_secs_f32() * std::f32::consts::PI;
    let k = 0.5 + 0.5 * phase.sin();
    core.uniform_mut(demo.k)?.set_component(0, k)?;
    Ok(())
}

/// Shader files given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ShaderSources {
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

impl ShaderSources {
    /// Reads both files (when set) into `core`. Unchanged text is a no-op in the core.
    ///
    /// Nothing is applied unless every configured file could be read.
    pub fn apply<G: GlBackend>(&self, core: &mut Core<G>) -> Result<()> {
        let vertex = self.vertex.as_deref().map(read_source).transpose()?;
        let fragment = self.fragment.as_deref().map(read_source).transpose()?;

        if let Some(src) = vertex {
            core.set_vertex_shader(src);
        }
        if let Some(src) = fragment {
            core.set_fragment_shader(src);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.vertex.is_none() && self.fragment.is_none()
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read shader {}", path.display()))
}

/// Prints compiler output whenever it changes.
#[derive(Debug, Default)]
pub struct ErrorPane {
    shown: Option<String>,
}

impl ErrorPane {
    /// Returns `true` when the displayed text changed.
    pub fn update<G: GlBackend>(&mut self, core: &Core<G>) -> bool {
        let current = core.error_output();
        if current == self.shown.as_deref() {
            return false;
        }

        match current {
            Some(text) => eprintln!("\n── compiler output ──\n{text}"),
            None => eprintln!("── shaders compiled ──"),
        }
        self.shown = current.map(str::to_owned);
        true
    }
}

/// Window title showing the primitive mode and whether the shaders are broken.
pub fn window_title<G: GlBackend>(core: &Core<G>) -> String {
    match core.error_output() {
        Some(_) => format!("shaderlab [{}] (compile error)", core.primitive_mode()),
        None => format!("shaderlab [{}]", core.primitive_mode()),
    }
}
