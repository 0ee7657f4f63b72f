/// Camera state and the view/projection/modelview pipeline
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

/// Vertical field of view, in radians.
pub const FOV_Y: f32 = 0.8;
pub const NEAR: f32 = 0.001;
pub const FAR: f32 = 1000.0;

/// Aspect ratio of a framebuffer as width over height, so portrait windows
/// get a ratio below one instead of longer side over shorter side.
/// A zero height is treated as one pixel.
pub fn aspect_for(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

/// Camera with a fixed eye/center/up frame and a movable position offset.
///
/// The derived matrices are only refreshed by [`Camera::recompute`]; the
/// mutators change state and leave that call to the owner.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Point3<f32>,
    center: Point3<f32>,
    up: Vector3<f32>,
    position: Vector3<f32>,
    aspect: f32,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    modelview: Matrix4<f32>,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self::with_frame(
            Point3::new(0.0, 0.0, -2.0),
            Point3::origin(),
            Vector3::y(),
            aspect,
        )
    }

    pub fn with_frame(eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            center,
            up,
            position: Vector3::zeros(),
            aspect,
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            modelview: Matrix4::identity(),
        };
        camera.recompute();
        camera
    }

    /// Rebuild view, projection and modelview from the current state.
    pub fn recompute(&mut self) {
        self.view = Matrix4::look_at_rh(&self.eye, &self.center, &self.up);
        self.projection = Matrix4::new_perspective(self.aspect, FOV_Y, NEAR, FAR);
        self.modelview = Matrix4::<f32>::identity() * self.view * Transform::translation(&self.position);
    }

    pub fn translate(&mut self, delta: &Vector3<f32>) {
        self.position += delta;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.set_aspect(aspect_for(width, height));
    }

    /// Modelview for one frame with the model spun `angle` radians about Y.
    pub fn frame_modelview(&self, angle: f32) -> Matrix4<f32> {
        self.modelview * Transform::rotation_y(angle)
    }

    pub fn eye(&self) -> Point3<f32> {
        self.eye
    }

    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn projection(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn modelview(&self) -> &Matrix4<f32> {
        &self.modelview
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(aspect_for(800, 600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation_column(m: &Matrix4<f32>) -> Vector3<f32> {
        m.fixed_view::<3, 1>(0, 3).into_owned()
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(aspect_for(800, 600));
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.position(), Vector3::zeros());
        assert_eq!(camera.eye(), Point3::new(0.0, 0.0, -2.0));
        assert_eq!(camera.modelview(), camera.view());
    }

    #[test]
    fn test_center_lands_in_front_of_eye() {
        let camera = Camera::default();
        let p = camera.view().transform_point(&camera.center());
        // Right-handed view space looks down -Z.
        assert!((p - Point3::new(0.0, 0.0, -2.0)).norm() < 1e-5);
    }

    #[test]
    fn test_translation_only_moves_modelview() {
        let mut camera = Camera::default();
        let view = *camera.view();
        let projection = *camera.projection();
        let before = translation_column(camera.modelview());

        let delta = Vector3::new(0.5, -1.0, 2.0);
        camera.translate(&delta);
        camera.recompute();

        assert_eq!(camera.view(), &view);
        assert_eq!(camera.projection(), &projection);

        let expected = view.fixed_view::<3, 3>(0, 0) * delta;
        let moved = translation_column(camera.modelview()) - before;
        assert!((moved - expected).norm() < 1e-5);
    }

    #[test]
    fn test_mutation_without_recompute_keeps_matrices() {
        let mut camera = Camera::default();
        let modelview = *camera.modelview();
        let projection = *camera.projection();

        camera.translate(&Vector3::new(1.0, 0.0, 0.0));
        camera.resize(100, 1000);

        assert_eq!(camera.modelview(), &modelview);
        assert_eq!(camera.projection(), &projection);
    }

    #[test]
    fn test_resize_changes_projection() {
        let mut camera = Camera::default();
        let before = *camera.projection();

        camera.resize(1920, 1080);
        camera.recompute();

        assert!((camera.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        assert_ne!(camera.projection(), &before);
        assert!((camera.projection()[(1, 1)] - 1.0 / (FOV_Y / 2.0).tan()).abs() < 1e-5);
    }

    #[test]
    fn test_portrait_aspect_below_one() {
        assert!((aspect_for(600, 800) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_aspect() {
        assert_eq!(aspect_for(640, 0), 640.0);
    }

    #[test]
    fn test_frame_modelview_leaves_camera_untouched() {
        let camera = Camera::default();
        let modelview = *camera.modelview();

        let spun = camera.frame_modelview(1.0);
        assert_ne!(spun, modelview);
        assert_eq!(camera.modelview(), &modelview);
        assert!((camera.frame_modelview(0.0) - modelview).norm() < 1e-6);
    }
}
