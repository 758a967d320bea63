use glam::Vec3;

/// Number of point lights the lit shader accepts.
pub const MAX_POINT_LIGHTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    /// Direction the light travels in; need not be normalised.
    pub direction: Vec3,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            direction: Vec3::new(1.0, -1.0, 0.0),
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    /// Unit vector from a surface towards the light. Falls back to straight up for a zero direction.
    pub fn to_light(&self) -> Vec3 {
        let dir = -self.direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            Vec3::Y
        } else {
            dir
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub position: Vec3,
    pub attenuation: f32,
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            position: Vec3::ZERO,
            attenuation: 1.0,
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub color: Vec3,
    pub position: Vec3,
    pub direction: Vec3,
    pub attenuation: f32,
    pub intensity: f32,
    /// Full cone angle in degrees inside which the light is at full strength.
    pub min_angle: f32,
    /// Full cone angle in degrees outside which the light contributes nothing.
    pub max_angle: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            position: Vec3::new(0.0, 2.0, 0.0),
            direction: Vec3::new(0.0, -1.0, 0.0),
            attenuation: 1.0,
            intensity: 1.0,
            min_angle: 80.0,
            max_angle: 140.0,
        }
    }
}

impl SpotLight {
    /// Cosines of the inner and outer half angles, as compared against in the shader.
    /// The outer cone never ends up narrower than the inner one.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let inner = self.min_angle.clamp(0.0, 180.0);
        let outer = self.max_angle.clamp(inner, 180.0);
        ((inner * 0.5).to_radians().cos(), (outer * 0.5).to_radians().cos())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lights {
    pub directional: DirectionalLight,
    pub points: Vec<PointLight>,
    pub spot: Option<SpotLight>,
}
