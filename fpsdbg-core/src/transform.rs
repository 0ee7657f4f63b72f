/// Matrix builders shared by the camera and the renderer
use nalgebra::{Matrix3, Matrix4, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Rotation about the Y axis, in radians
    pub fn rotation_y(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
    }

    /// Inverse-transpose of the upper-left 3x3 block, used to carry normals
    /// through a modelview that may scale non-uniformly.
    ///
    /// A singular block has no inverse; identity is returned in that case.
    pub fn normal_matrix(modelview: &Matrix4<f32>) -> Matrix3<f32> {
        modelview
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix3::identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = Transform::rotation_y(std::f32::consts::FRAC_PI_2);
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let matrix = Transform::rotation_y(0.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_translation_moves_points() {
        let m = Transform::translation(&Vector3::new(1.0, -2.0, 3.0));
        let p = m.transform_point(&Point3::origin());
        assert_eq!(p, Point3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_normal_matrix_of_rigid_transform_is_rotation() {
        let modelview = Transform::translation(&Vector3::new(4.0, 5.0, 6.0))
            * Transform::rotation_y(0.7);
        let normal = Transform::normal_matrix(&modelview);
        let rotation = modelview.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((normal - rotation).norm() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_undoes_scaling() {
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        let normal = Transform::normal_matrix(&scale);
        assert!((normal[(0, 0)] - 0.5).abs() < 1e-6);
        assert!((normal[(1, 1)] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_singular_normal_matrix_falls_back_to_identity() {
        let normal = Transform::normal_matrix(&Matrix4::zeros());
        assert_eq!(normal, Matrix3::identity());
    }
}
