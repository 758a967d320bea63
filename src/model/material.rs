use glam::Vec3;

/// Phong surface parameters shared by every lit object in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub ambient_k: f32,
    pub diffuse_k: f32,
    pub specular_k: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            ambient_k: 0.2,
            diffuse_k: 0.5,
            specular_k: 0.5,
            shininess: 150.0,
        }
    }
}

impl Material {
    pub fn with_color(color: Vec3) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}
