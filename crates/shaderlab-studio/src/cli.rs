use std::path::PathBuf;

use clap::Parser;
use shaderlab_engine::gl::PrimitiveMode;
use shaderlab_engine::logging::LoggingConfig;
use shaderlab_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Live GLSL viewer.
#[derive(Parser, Debug)]
#[command(
    name = "shaderlab",
    about = "Live GLSL shader viewer",
    long_about = "Opens a window rendering a demo triangle with the given shaders.\n\n\
        KEYS:\n\
          F5      reload shader files from disk\n\
          Space   cycle the primitive mode\n\
          Escape  quit\n\
        \n\
        EXAMPLES:\n\
          shaderlab --vertex tri.vert --fragment tri.frag\n\
          shaderlab --headless --max-frames 10",
    version
)]
pub struct Cli {
    /// Vertex shader file. The built-in shader is used when omitted.
    #[arg(long)]
    pub vertex: Option<PathBuf>,

    /// Fragment shader file. The built-in shader is used when omitted.
    #[arg(long)]
    pub fragment: Option<PathBuf>,

    /// Primitive mode (points, lines, line-strip, line-loop, triangles, triangle-strip, triangle-fan).
    #[arg(long, default_value = "triangles")]
    pub mode: PrimitiveMode,

    /// Log filter in env_logger syntax, e.g. "debug" or "shaderlab_engine=trace".
    #[arg(long)]
    pub log: Option<String>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value = "1024")]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value = "768")]
    pub height: u32,

    /// Disable vertical sync.
    #[arg(long)]
    pub no_vsync: bool,

    /// Exit after rendering N frames.
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Render without a window or GL context, then print the frame statistics.
    #[arg(long, requires = "max_frames")]
    pub headless: bool,
}

impl Cli {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..LoggingConfig::default()
        }
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: "shaderlab".to_string(),
            initial_size: LogicalSize::new(f64::from(self.width), f64::from(self.height)),
            vsync: !self.no_vsync,
        }
    }
}
