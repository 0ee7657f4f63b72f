/// WGSL shader loading and compilation
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const VERTEX_FILE: &str = "flat.vert.wgsl";
pub const FRAGMENT_FILE: &str = "flat.frag.wgsl";
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Source text of one pipeline stage and where it came from.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub source: String,
}

impl ShaderSource {
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let source = std::fs::read_to_string(&path).map_err(|source| AppError::ShaderRead {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, source })
    }

    fn label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Fail early when the stage does not define `entry_point`.
    pub fn require_entry_point(&self, entry_point: &str) -> Result<(), AppError> {
        let defines = self.source.split("fn ").skip(1).any(|rest| {
            rest.trim_start()
                .strip_prefix(entry_point)
                .is_some_and(|after| after.trim_start().starts_with('('))
        });

        if defines {
            Ok(())
        } else {
            Err(AppError::ShaderCompile {
                label: self.label(),
                message: format!("missing entry point `{entry_point}`"),
            })
        }
    }

    /// Compile into a shader module, turning validation errors into
    /// [`AppError::ShaderCompile`] instead of a device panic.
    pub fn compile(&self, device: &wgpu::Device) -> Result<wgpu::ShaderModule, AppError> {
        let label = self.label();

        let module = validated(device, &label, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
            })
        })?;

        tracing::info!(shader = %label, "compiled shader");
        Ok(module)
    }
}

/// Run `create` inside a validation error scope so a bad shader or an
/// interface mismatch becomes [`AppError::ShaderCompile`].
pub fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, AppError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let created = create();

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(AppError::ShaderCompile {
            label: label.to_string(),
            message: error.to_string(),
        }),
        None => Ok(created),
    }
}

/// The vertex/fragment pair drawn with every object.
#[derive(Debug, Clone)]
pub struct ShaderPair {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ShaderPair {
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        Ok(Self {
            vertex: ShaderSource::read(dir.join(VERTEX_FILE))?,
            fragment: ShaderSource::read(dir.join(FRAGMENT_FILE))?,
        })
    }
}
