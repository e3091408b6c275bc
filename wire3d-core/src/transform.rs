//! Model transforms for spinning a mesh in place
use crate::geometry::Bounds;
use crate::math::{self, Mat4};

/// Model rotation around three axes (in radians)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotate by delta amounts (in radians), wrapping each angle into [0, 2π)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        let tau = std::f32::consts::TAU;
        self.x = (self.x + dx).rem_euclid(tau);
        self.y = (self.y + dy).rem_euclid(tau);
        self.z = (self.z + dz).rem_euclid(tau);
    }
}

/// Model matrix builders
pub struct Transform;

impl Transform {
    /// Rotation applied in order X, then Y, then Z
    pub fn rotation_matrix(rotation: &RotationState) -> Mat4 {
        math::rotation_z(rotation.z) * math::rotation_y(rotation.y) * math::rotation_x(rotation.x)
    }

    /// Rotation about the centre of `bounds` instead of the origin
    pub fn spin_about(rotation: &RotationState, bounds: &Bounds) -> Mat4 {
        let pivot = bounds.center().coords;
        math::translation(&pivot) * Self::rotation_matrix(rotation) * math::translation(&-pivot)
    }

    /// Combined model-view matrix, the camera-space transform used for clipping
    pub fn model_view(view: &Mat4, model: &Mat4) -> Mat4 {
        view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state_wraps() {
        let mut state = RotationState::default();
        state.rotate(0.1, 0.2, 0.3);
        assert_relative_eq!(state.x, 0.1);
        assert_relative_eq!(state.y, 0.2);
        assert_relative_eq!(state.z, 0.3);

        state.rotate(-0.2, std::f32::consts::TAU, 0.0);
        assert!(state.x > 6.0 && state.x < std::f32::consts::TAU);
        assert_relative_eq!(state.y, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&RotationState::default());
        assert_relative_eq!(matrix, Mat4::identity());
    }

    #[test]
    fn test_spin_keeps_pivot_fixed() {
        let bounds = Bounds {
            min: Point3::new(1.0, 1.0, 1.0),
            max: Point3::new(3.0, 3.0, 3.0),
        };
        let m = Transform::spin_about(&RotationState::new(0.4, 1.1, -0.7), &bounds);
        let p = math::transform_point(&m, &bounds.center());
        assert_relative_eq!(p.xyz(), bounds.center().coords, epsilon = 1e-5);
    }

    #[test]
    fn test_model_view_applies_model_first() {
        let model = math::scale(&Vec3::repeat(2.0));
        let view = math::translation(&Vec3::new(0.0, 0.0, -5.0));
        let p = math::transform_point(
            &Transform::model_view(&view, &model),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(p.xyz(), Vec3::new(2.0, 0.0, -5.0), epsilon = 1e-6);
    }
}
