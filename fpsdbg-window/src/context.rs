/// Per-run state shared by event handling and rendering
use fpsdbg_core::{aspect_for, Camera};

use crate::input::{Action, FillMode};

/// Camera, framebuffer size and display toggles for one window.
#[derive(Debug)]
pub struct Context {
    pub camera: Camera,
    width: u32,
    height: u32,
    fill_mode: FillMode,
    wireframe_supported: bool,
    closing: bool,
}

impl Context {
    pub fn new(width: u32, height: u32, wireframe_supported: bool) -> Self {
        Self {
            camera: Camera::new(aspect_for(width, height)),
            width,
            height,
            fill_mode: FillMode::Fill,
            wireframe_supported,
            closing: false,
        }
    }

    /// Track a new framebuffer size and refresh the projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.camera.resize(width, height);
        self.camera.recompute();
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Close => self.closing = true,
            Action::SetFillMode(FillMode::Wireframe) if !self.wireframe_supported => {
                tracing::warn!("wireframe mode is not supported by this adapter");
            }
            Action::SetFillMode(mode) => {
                tracing::debug!(?mode, "fill mode changed");
                self.fill_mode = mode;
            }
            Action::Translate(delta) => {
                self.camera.translate(&delta);
                self.camera.recompute();
                tracing::debug!(position = ?self.camera.position(), "camera moved");
            }
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_translate_recomputes_modelview() {
        let mut ctx = Context::new(800, 600, true);
        let before = *ctx.camera.modelview();

        ctx.apply(Action::Translate(Vector3::new(0.0, 0.0, -0.2)));

        assert_eq!(ctx.camera.position(), Vector3::new(0.0, 0.0, -0.2));
        assert_ne!(ctx.camera.modelview(), &before);
    }

    #[test]
    fn test_resize_updates_projection() {
        let mut ctx = Context::new(800, 600, true);
        let before = *ctx.camera.projection();

        ctx.resize(600, 800);

        assert_eq!(ctx.size(), (600, 800));
        assert!((ctx.camera.aspect() - 0.75).abs() < 1e-6);
        assert_ne!(ctx.camera.projection(), &before);
    }

    #[test]
    fn test_wireframe_toggle() {
        let mut ctx = Context::new(800, 600, true);
        ctx.apply(Action::SetFillMode(FillMode::Wireframe));
        assert_eq!(ctx.fill_mode(), FillMode::Wireframe);
        ctx.apply(Action::SetFillMode(FillMode::Fill));
        assert_eq!(ctx.fill_mode(), FillMode::Fill);
    }

    #[test]
    fn test_wireframe_ignored_when_unsupported() {
        let mut ctx = Context::new(800, 600, false);
        ctx.apply(Action::SetFillMode(FillMode::Wireframe));
        assert_eq!(ctx.fill_mode(), FillMode::Fill);
    }

    #[test]
    fn test_close() {
        let mut ctx = Context::new(800, 600, true);
        assert!(!ctx.is_closing());
        ctx.apply(Action::Close);
        assert!(ctx.is_closing());
    }
}
