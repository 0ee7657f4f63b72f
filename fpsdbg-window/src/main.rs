/// fpsdbg - Spinning Flat-Shaded Cube
///
/// Opens a window and spins a flat-shaded mesh in front of the camera.
/// Controls:
///   - W/A/S/D, Space, Left Shift: Move the camera
///   - Mouse wheel: Move along Z
///   - Left/Right: Wireframe/filled triangles
///   - ESC: Quit
use anyhow::Context as _;
use clap::Parser;
use fpsdbg_window::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("fpsdbg starting");

    fpsdbg_window::run(&cli).context("fpsdbg terminated")?;

    tracing::info!("fpsdbg exiting");
    Ok(())
}
