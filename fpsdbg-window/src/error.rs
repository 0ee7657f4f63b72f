/// Startup and frame failures; every one of them ends the process
use std::path::PathBuf;

use fpsdbg_core::MeshError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to read shader {path}: {source}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile shader {label}: {message}")]
    ShaderCompile { label: String, message: String },
    #[error("failed to get primary monitor")]
    NoMonitor,
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface format unsupported by adapter")]
    UnsupportedSurface,
    #[error("surface error: {0}")]
    Frame(#[from] wgpu::SurfaceError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
