use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

use crate::math;

pub const MOUSE_SENSITIVITY: f32 = 0.1;
pub const MOVE_SPEED: f32 = 5.0;
pub const ZOOM_SPEED: f32 = 3.0;
pub const PITCH_LIMIT: f32 = 89.9;
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 179.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective,
    /// Half-height of the view volume; the half-width follows the aspect ratio.
    Orthographic { height: f32 },
}

pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,   // Rotation around Y axis, degrees
    pub pitch: f32, // Rotation around X axis, degrees
    fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub projection: Projection,
    home: (Vec3, f32, f32),
    // Movement state
    pub moving_forward: bool,
    pub moving_backward: bool,
    pub moving_left: bool,
    pub moving_right: bool,
    pub moving_up: bool,
    pub moving_down: bool,
}

impl Camera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            fov: 60.0,
            aspect,
            near: 0.1,
            far: 100.0,
            projection: Projection::Perspective,
            home: (position, -90.0, 0.0),
            moving_forward: false,
            moving_backward: false,
            moving_left: false,
            moving_right: false,
            moving_up: false,
            moving_down: false,
        }
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = if fov.is_nan() { MIN_FOV } else { fov.clamp(MIN_FOV, MAX_FOV) };
    }

    pub fn forward(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        math::view_from_basis(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                math::perspective(self.fov.to_radians(), self.aspect, self.near, self.far)
            }
            Projection::Orthographic { height } => {
                let width = height * self.aspect;
                math::orthographic(-width, width, -height, height, self.near, self.far)
            }
        }
    }

    /// Points the camera at `target` by re-deriving yaw and pitch.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = dir.z.atan2(dir.x).to_degrees();
    }

    /// Makes the current pose the one `reset` returns to.
    pub fn set_home(&mut self) {
        self.home = (self.position, self.yaw, self.pitch);
    }

    pub fn reset(&mut self) {
        let (position, yaw, pitch) = self.home;
        self.position = position;
        self.yaw = yaw;
        self.pitch = pitch;
    }

    pub fn toggle_projection(&mut self, ortho_height: f32) {
        self.projection = match self.projection {
            Projection::Perspective => Projection::Orthographic { height: ortho_height },
            Projection::Orthographic { .. } => Projection::Perspective,
        };
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn process_scroll(&mut self, offset: f32) {
        if offset.abs() > 0.0 {
            self.set_fov(self.fov - offset * ZOOM_SPEED);
        }
    }

    pub fn update(&mut self, dt: f32) {
        let velocity = MOVE_SPEED * dt;

        let forward = self.forward();
        let right = self.right();
        let up = self.up();

        if self.moving_forward {
            self.position += forward * velocity;
        }
        if self.moving_backward {
            self.position -= forward * velocity;
        }
        if self.moving_right {
            self.position += right * velocity;
        }
        if self.moving_left {
            self.position -= right * velocity;
        }
        if self.moving_up {
            self.position += up * velocity;
        }
        if self.moving_down {
            self.position -= up * velocity;
        }
    }

    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.moving_forward = pressed,
            KeyCode::KeyS => self.moving_backward = pressed,
            KeyCode::KeyA => self.moving_left = pressed,
            KeyCode::KeyD => self.moving_right = pressed,
            KeyCode::KeyE => self.moving_up = pressed,
            KeyCode::KeyQ => self.moving_down = pressed,
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_initialization() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 16.0 / 9.0);
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.aspect, 16.0 / 9.0);
        assert_eq!(camera.projection, Projection::Perspective);
        assert!(!camera.moving_forward);
        assert!(!camera.moving_up);
    }

    #[test]
    fn test_default_forward_is_negative_z() {
        let camera = Camera::new(Vec3::ZERO, 1.0);
        let forward = camera.forward();
        assert_relative_eq!(forward.x, 0.0, epsilon = 0.001);
        assert_relative_eq!(forward.y, 0.0, epsilon = 0.001);
        assert_relative_eq!(forward.z, -1.0, epsilon = 0.001);

        let right = camera.right();
        assert_relative_eq!(right.x, 1.0, epsilon = 0.001);
        assert_relative_eq!(right.z, 0.0, epsilon = 0.001);

        let up = camera.up();
        assert_relative_eq!(up.y, 1.0, epsilon = 0.001);
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let mut camera = Camera::new(Vec3::new(4.0, -2.0, 7.5), 1.0);
        camera.yaw = 33.0;
        camera.pitch = -20.0;
        let eye = camera.view_matrix().transform_point3(camera.position);
        assert_relative_eq!(eye.length(), 0.0, epsilon = 1e-5);

        // A point straight ahead lands on the camera's -Z axis.
        let ahead = camera.view_matrix().transform_point3(camera.position + camera.forward() * 3.0);
        assert_relative_eq!(ahead.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ahead.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ahead.z, -3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_projection_near_far_depth() {
        let mut camera = Camera::new(Vec3::ZERO, 1.5);
        for projection in [Projection::Perspective, Projection::Orthographic { height: 2.0 }] {
            camera.projection = projection;
            let proj = camera.projection_matrix();
            let near = proj.project_point3(Vec3::new(0.0, 0.0, -camera.near));
            let far = proj.project_point3(Vec3::new(0.0, 0.0, -camera.far));
            assert_relative_eq!(near.z, 0.0, epsilon = 1e-5);
            assert_relative_eq!(far.z, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_fov_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.set_fov(-10.0);
        assert_eq!(camera.fov(), MIN_FOV);
        camera.set_fov(180.0);
        assert_eq!(camera.fov(), MAX_FOV);
        camera.set_fov(f32::NAN);
        assert_eq!(camera.fov(), MIN_FOV);
        assert!(camera.projection_matrix().is_finite());
    }

    #[test]
    fn test_scroll_zooms() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.process_scroll(2.0);
        assert_relative_eq!(camera.fov(), 60.0 - 2.0 * ZOOM_SPEED, epsilon = 0.001);
        camera.process_scroll(0.0);
        assert_relative_eq!(camera.fov(), 54.0, epsilon = 0.001);
    }

    #[test]
    fn test_mouse_movement() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);

        camera.process_mouse(100.0, 0.0);
        assert_relative_eq!(camera.yaw, -90.0 + 10.0, epsilon = 0.001);

        camera.process_mouse(0.0, -100.0);
        assert_relative_eq!(camera.pitch, 10.0, epsilon = 0.001);

        camera.process_mouse(0.0, -10_000.0);
        assert_relative_eq!(camera.pitch, PITCH_LIMIT, epsilon = 0.001);

        camera.process_mouse(0.0, 10_000.0);
        assert_relative_eq!(camera.pitch, -PITCH_LIMIT, epsilon = 0.001);
    }

    #[test]
    fn test_keyboard_input() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.process_keyboard(KeyCode::KeyW, true);
        camera.process_keyboard(KeyCode::KeyE, true);
        assert!(camera.moving_forward);
        assert!(camera.moving_up);
        camera.process_keyboard(KeyCode::KeyW, false);
        assert!(!camera.moving_forward);
    }

    #[test]
    fn test_q_moves_down_e_moves_up() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.process_keyboard(KeyCode::KeyQ, true);
        camera.update(1.0);
        assert_relative_eq!(camera.position.y, -MOVE_SPEED, epsilon = 0.001);

        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.process_keyboard(KeyCode::KeyE, true);
        camera.update(1.0);
        assert_relative_eq!(camera.position.y, MOVE_SPEED, epsilon = 0.001);
    }

    #[test]
    fn test_movement_update() {
        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.moving_forward = true;
        camera.update(1.0);
        assert_relative_eq!(camera.position.z, -MOVE_SPEED, epsilon = 0.001);

        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.moving_right = true;
        camera.update(1.0);
        assert_relative_eq!(camera.position.x, MOVE_SPEED, epsilon = 0.001);

        let mut camera = Camera::new(Vec3::ZERO, 1.0);
        camera.moving_up = true;
        camera.update(0.5);
        assert_relative_eq!(camera.position.y, MOVE_SPEED * 0.5, epsilon = 0.001);
    }

    #[test]
    fn test_look_at_and_reset() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        camera.position = Vec3::new(7.0, 0.0, 0.0);
        camera.look_at(Vec3::ZERO);
        let forward = camera.forward();
        assert_relative_eq!(forward.x, -1.0, epsilon = 1e-4);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-4);

        camera.reset();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn test_toggle_projection() {
        let mut camera = Camera::new(Vec3::ZERO, 2.0);
        camera.toggle_projection(3.0);
        assert_eq!(camera.projection, Projection::Orthographic { height: 3.0 });
        let proj = camera.projection_matrix();
        let corner = proj.project_point3(Vec3::new(6.0, 3.0, -1.0));
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-5);
        camera.toggle_projection(3.0);
        assert_eq!(camera.projection, Projection::Perspective);
    }
}
