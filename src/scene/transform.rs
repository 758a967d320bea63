use glam::{Mat4, Vec3};

use crate::math;

/// Position, Euler rotation (radians) and non-uniform scale of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// `T * (RotY * RotX * RotZ) * S`, applied to local-space points.
    pub fn model_matrix(&self) -> Mat4 {
        let translation = Mat4::from_translation(self.position);
        let rotation = math::rotation_y(self.rotation.y)
            * math::rotation_x(self.rotation.x)
            * math::rotation_z(self.rotation.z);
        let scale = Mat4::from_scale(self.scale);
        translation * rotation * scale
    }

    /// Inverse-transpose of the model matrix, for transforming normals under non-uniform scale.
    pub fn normal_matrix(&self) -> Mat4 {
        self.model_matrix().inverse().transpose()
    }
}
