//! Hand-built transform and projection matrices.
//!
//! Everything here is right-handed and column-major, and targets the wgpu
//! clip space: NDC x/y in `[-1, 1]`, depth in `[0, 1]`.

use glam::{Mat4, Vec3, Vec4};

const PARALLEL_EPSILON: f32 = 1e-6;

pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, c, s, 0.0),
        Vec4::new(0.0, -s, c, 0.0),
        Vec4::W,
    )
}

pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(c, 0.0, -s, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(s, 0.0, c, 0.0),
        Vec4::W,
    )
}

pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(c, s, 0.0, 0.0),
        Vec4::new(-s, c, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::W,
    )
}

/// World-to-camera matrix from an eye position and a viewing direction.
///
/// The basis is orthonormalised Gram-Schmidt style: `right = forward × up`,
/// then `up = right × forward`. When `forward` is (nearly) parallel to
/// `world_up` another up axis is substituted so the basis never collapses.
pub fn view_from_basis(eye: Vec3, forward: Vec3, world_up: Vec3) -> Mat4 {
    let forward = forward.normalize();
    let right = [world_up, Vec3::Z, Vec3::X]
        .into_iter()
        .map(|up| forward.cross(up))
        .find(|r| r.length_squared() > PARALLEL_EPSILON)
        .unwrap_or(Vec3::X)
        .normalize();
    let up = right.cross(forward);

    // Rows are right, up and -forward; the translation is the eye expressed in that basis.
    Mat4::from_cols(
        Vec4::new(right.x, up.x, -forward.x, 0.0),
        Vec4::new(right.y, up.y, -forward.y, 0.0),
        Vec4::new(right.z, up.z, -forward.z, 0.0),
        Vec4::new(-right.dot(eye), -up.dot(eye), forward.dot(eye), 1.0),
    )
}

pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    view_from_basis(eye, target - eye, up)
}

/// Perspective projection mapping `z = -near` to depth 0 and `z = -far` to depth 1.
pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_radians * 0.5).tan();
    let range = near - far;
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, far / range, -1.0),
        Vec4::new(0.0, 0.0, near * far / range, 0.0),
    )
}

pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let width = right - left;
    let height = top - bottom;
    let range = near - far;
    Mat4::from_cols(
        Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0 / range, 0.0),
        Vec4::new(
            -(right + left) / width,
            -(top + bottom) / height,
            near / range,
            1.0,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotations_match_glam() {
        for angle in [0.0, 0.3, -1.2, std::f32::consts::PI] {
            assert!(rotation_x(angle).abs_diff_eq(Mat4::from_rotation_x(angle), 1e-6));
            assert!(rotation_y(angle).abs_diff_eq(Mat4::from_rotation_y(angle), 1e-6));
            assert!(rotation_z(angle).abs_diff_eq(Mat4::from_rotation_z(angle), 1e-6));
        }
    }

    #[test]
    fn test_look_at_matches_glam() {
        let eye = Vec3::new(3.0, 2.0, 5.0);
        let target = Vec3::new(-1.0, 0.5, 0.0);
        let ours = look_at(eye, target, Vec3::Y);
        let theirs = Mat4::look_at_rh(eye, target, Vec3::Y);
        assert!(ours.abs_diff_eq(theirs, 1e-5));
    }

    #[test]
    fn test_look_at_straight_down_stays_finite() {
        let view = look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(view.is_finite());

        // The origin sits ten units in front of the eye.
        let origin = view.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.z, -10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_perspective_depth_range() {
        let (near, far) = (0.1, 100.0);
        let proj = perspective(60f32.to_radians(), 1.5, near, far);
        assert!(proj.abs_diff_eq(Mat4::perspective_rh(60f32.to_radians(), 1.5, near, far), 1e-6));

        let at_near = proj.project_point3(Vec3::new(0.0, 0.0, -near));
        let at_far = proj.project_point3(Vec3::new(0.0, 0.0, -far));
        assert_relative_eq!(at_near.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(at_far.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_depth_range() {
        let (near, far) = (0.1, 25.0);
        let proj = orthographic(-10.0, 10.0, -10.0, 10.0, near, far);
        assert!(proj.abs_diff_eq(
            Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, near, far),
            1e-6
        ));

        let at_near = proj.project_point3(Vec3::new(10.0, -10.0, -near));
        let at_far = proj.project_point3(Vec3::new(0.0, 0.0, -far));
        assert_relative_eq!(at_near.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(at_near.y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(at_near.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(at_far.z, 1.0, epsilon = 1e-5);
    }
}
