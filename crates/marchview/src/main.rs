mod cli;
mod config;

use anyhow::Result;
use config::Settings;
use renderer::ViewerConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::parse();
    initialise_tracing();

    let settings = match &cli.config {
        Some(path) => config::load(path)?,
        None => Settings::default(),
    };

    let surface_size = cli
        .size
        .unwrap_or((settings.window.width, settings.window.height));
    let viewer = ViewerConfig {
        surface_size,
        shader_source: cli.shader.clone(),
        scales: settings.motion,
    };

    tracing::info!(
        width = surface_size.0,
        height = surface_size.1,
        shader = ?viewer.shader_source,
        "starting marchview"
    );
    renderer::run(viewer)
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
