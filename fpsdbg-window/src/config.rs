/// Command-line configuration
use std::path::PathBuf;

use clap::Parser;

use crate::error::AppError;

#[derive(Debug, Clone, Parser)]
#[command(name = "fpsdbg", about = "Spinning flat-shaded mesh in a window")]
pub struct Cli {
    /// Directory holding flat.vert.wgsl and flat.frag.wgsl
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))]
    pub shader_dir: PathBuf,

    /// STL file to display instead of the default cube
    #[arg(long)]
    pub mesh: Option<PathBuf>,

    /// Initial window width (default: half the primary monitor)
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height (default: half the primary monitor)
    #[arg(long)]
    pub height: Option<u32>,

    /// Multisample anti-aliasing sample count
    #[arg(long, default_value_t = 4, value_parser = parse_samples)]
    pub samples: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_samples(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(n @ (1 | 2 | 4 | 8)) => Ok(n),
        _ => Err(format!("expected 1, 2, 4 or 8, got {value}")),
    }
}

impl Cli {
    /// Window size from the flags, filling gaps with half the monitor size.
    pub fn window_size(&self, monitor: Option<(u32, u32)>) -> Result<(u32, u32), AppError> {
        match (self.width, self.height, monitor) {
            (Some(w), Some(h), _) => Ok((w.max(1), h.max(1))),
            (w, h, Some((mw, mh))) => Ok((
                w.unwrap_or(mw / 2).max(1),
                h.unwrap_or(mh / 2).max(1),
            )),
            (_, _, None) => Err(AppError::NoMonitor),
        }
    }
}
