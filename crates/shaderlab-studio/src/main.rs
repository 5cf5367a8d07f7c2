mod cli;
mod session;
mod studio;

use anyhow::Result;
use clap::Parser;
use shaderlab_engine::gl::HeadlessGl;
use shaderlab_engine::logging::init_logging;
use shaderlab_engine::window::Runtime;
use shaderlab_engine::{Core, CoreConfig};

use cli::Cli;
use session::{ErrorPane, ShaderSources};
use studio::Studio;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logging());

    let sources = ShaderSources {
        vertex: cli.vertex.clone(),
        fragment: cli.fragment.clone(),
    };

    if cli.headless {
        return run_headless(&cli, &sources);
    }

    log::info!("F5 reloads shaders, Space cycles the primitive mode, Escape quits");
    Runtime::run(cli.runtime(), Studio::new(sources, cli.mode, cli.max_frames))
}

/// Renders the demo session against the recording backend and prints what happened.
fn run_headless(cli: &Cli, sources: &ShaderSources) -> Result<()> {
    let config = CoreConfig {
        primitive_mode: cli.mode,
        ..CoreConfig::default()
    };
    let mut core = Core::new(HeadlessGl::new(), config);
    let demo = session::populate_demo(&mut core)?;
    sources.apply(&mut core)?;

    let mut errors = ErrorPane::default();
    let frames = cli.max_frames.unwrap_or(1);
    for frame in 0..frames {
        let elapsed = std::time::Duration::from_millis(frame * 16);
        session::animate(&mut core, &demo, elapsed)?;
        core.render(cli.width, cli.height)?;
        errors.update(&core);
        studio::log_events(&mut core);
    }

    let stats = core.stats();
    println!(
        "frames: {}  draws: {}  compiles: {}  failed: {}  uniform passes: {}  vertex passes: {}",
        stats.frames,
        stats.draws,
        stats.compiles,
        stats.compile_failures,
        stats.uniform_passes,
        stats.vertex_passes
    );
    println!("gl calls recorded: {}", core.backend().calls().len());
    Ok(())
}
