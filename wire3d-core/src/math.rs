//! Vector and matrix kernel
//!
//! Thin layer over `nalgebra` that pins down the conventions the rest of the
//! crate relies on: column vectors, `a * b` applies `b` first, right-handed
//! camera space looking down negative Z, OpenGL-style clip volume.
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
pub type Vec4 = Vector4<f32>;
pub type Mat4 = Matrix4<f32>;

/// Lengths at or below this are treated as zero by [`normalize`].
pub const LENGTH_EPSILON: f32 = 1e-12;

pub fn dot(a: &Vec3, b: &Vec3) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

pub fn length(v: &Vec3) -> f32 {
    dot(v, v).sqrt()
}

/// Unit vector in the direction of `v`, or `v` itself when it has no length.
pub fn normalize(v: &Vec3) -> Vec3 {
    let len = length(v);
    if len > LENGTH_EPSILON {
        v / len
    } else {
        *v
    }
}

/// Homogeneous transform of a 4-vector.
pub fn transform(m: &Mat4, v: &Vec4) -> Vec4 {
    m * v
}

/// Transform a position (w = 1) without dividing by the resulting w.
pub fn transform_point(m: &Mat4, p: &Point3<f32>) -> Vec4 {
    m * Vec4::new(p.x, p.y, p.z, 1.0)
}

pub fn identity() -> Mat4 {
    Mat4::identity()
}

#[rustfmt::skip]
pub fn translation(t: &Vec3) -> Mat4 {
    Mat4::new(
        1.0, 0.0, 0.0, t.x,
        0.0, 1.0, 0.0, t.y,
        0.0, 0.0, 1.0, t.z,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub fn scale(s: &Vec3) -> Mat4 {
    Mat4::new(
        s.x, 0.0, 0.0, 0.0,
        0.0, s.y, 0.0, 0.0,
        0.0, 0.0, s.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, c, -s, 0.0,
        0.0, s, c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new(
        c, 0.0, s, 0.0,
        0.0, 1.0, 0.0, 0.0,
        -s, 0.0, c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new(
        c, -s, 0.0, 0.0,
        s, c, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Right-handed view matrix. The third row is the negated forward axis, so
/// points in front of the eye end up with negative z.
#[rustfmt::skip]
pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vec3) -> Mat4 {
    let eye_v = eye.coords;
    let forward = normalize(&(target - eye));
    let right = normalize(&cross(&forward, up));
    let true_up = cross(&right, &forward);

    Mat4::new(
        right.x, right.y, right.z, -dot(&right, &eye_v),
        true_up.x, true_up.y, true_up.z, -dot(&true_up, &eye_v),
        -forward.x, -forward.y, -forward.z, dot(&forward, &eye_v),
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Right-handed perspective projection mapping camera depth into NDC
/// z in [-1, 1], with clip `w = -z_camera`.
#[rustfmt::skip]
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y * 0.5).tan();
    Mat4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, (far + near) / (near - far), (2.0 * far * near) / (near - far),
        0.0, 0.0, -1.0, 0.0,
    )
}

/// Orthographic projection of the box `[left, right] x [bottom, top]` with
/// camera depth in `[near, far]` mapped linearly to NDC z in [-1, 1].
#[rustfmt::skip]
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new(
        2.0 / (right - left), 0.0, 0.0, -(right + left) / (right - left),
        0.0, 2.0 / (top - bottom), 0.0, -(top + bottom) / (top - bottom),
        0.0, 0.0, -2.0 / (far - near), -(far + near) / (far - near),
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_zero_vector() {
        let zero = Vec3::zeros();
        let n = normalize(&zero);
        assert_eq!(n, zero);
        assert!(n.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize(&Vec3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(length(&n), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-6);
    }

    #[test]
    fn test_cross_is_right_handed() {
        let z = cross(&Vec3::x(), &Vec3::y());
        assert_eq!(z, Vec3::z());
        assert_eq!(dot(&z, &Vec3::x()), 0.0);
    }

    #[test]
    fn test_product_is_associative() {
        let a = perspective(1.0, 1.5, 0.1, 50.0);
        let b = look_at(&Point3::new(1.0, 2.0, 3.0), &Point3::origin(), &Vec3::y());
        let c = translation(&Vec3::new(0.5, -1.0, 2.0)) * rotation_y(0.3);
        assert_relative_eq!(a * (b * c), (a * b) * c, epsilon = 1e-4);
    }

    #[test]
    fn test_product_applies_right_operand_first() {
        let t = translation(&Vec3::new(1.0, 0.0, 0.0));
        let s = scale(&Vec3::new(2.0, 2.0, 2.0));
        let p = transform_point(&(t * s), &Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vec4::new(3.0, 0.0, 0.0, 1.0));
        assert_eq!(identity() * t, t);
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let quarter = rotation_z(std::f32::consts::FRAC_PI_2);
        let p = transform(&quarter, &Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_relative_eq!(p, Vec4::new(0.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_rotations_match_nalgebra() {
        let angle = 0.7;
        let about = |axis: Vec3| Mat4::new_rotation(axis * angle);
        assert_relative_eq!(rotation_x(angle), about(Vec3::x()), epsilon = 1e-6);
        assert_relative_eq!(rotation_y(angle), about(Vec3::y()), epsilon = 1e-6);
        assert_relative_eq!(rotation_z(angle), about(Vec3::z()), epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_matches_nalgebra() {
        let eye = Point3::new(2.0, 1.5, -3.0);
        let target = Point3::new(0.0, 0.5, 0.0);
        let ours = look_at(&eye, &target, &Vec3::y());
        let reference = Mat4::look_at_rh(&eye, &target, &Vec3::y());
        assert_relative_eq!(ours, reference, epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_puts_target_in_front() {
        let view = look_at(&Point3::new(0.0, 0.0, 5.0), &Point3::origin(), &Vec3::y());
        let forward = Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(view.fixed_view::<1, 3>(2, 0).transpose(), -forward);
        let target = transform_point(&view, &Point3::origin());
        assert_relative_eq!(target.z, -5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = perspective(1.2, 4.0 / 3.0, 0.1, 100.0);
        let reference = Mat4::new_perspective(4.0 / 3.0, 1.2, 0.1, 100.0);
        assert_relative_eq!(ours, reference, epsilon = 1e-5);
    }

    #[test]
    fn test_perspective_depth_range() {
        let proj = perspective(1.0, 1.0, 0.5, 10.0);
        let near = transform(&proj, &Vec4::new(0.0, 0.0, -0.5, 1.0));
        let far = transform(&proj, &Vec4::new(0.0, 0.0, -10.0, 1.0));
        assert_relative_eq!(near.w, 0.5);
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-5);
        assert_relative_eq!(far.w, 10.0);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_matches_nalgebra() {
        let ours = orthographic(-2.0, 2.0, -1.5, 1.5, 0.1, 20.0);
        let reference = Mat4::new_orthographic(-2.0, 2.0, -1.5, 1.5, 0.1, 20.0);
        assert_relative_eq!(ours, reference, epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_depth_is_linear() {
        let proj = orthographic(-1.0, 1.0, -1.0, 1.0, 1.0, 3.0);
        let mid = transform(&proj, &Vec4::new(0.0, 0.0, -2.0, 1.0));
        assert_relative_eq!(mid.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(mid.w, 1.0);
    }
}
