//! CPU mirrors of the WGSL uniform structs in `src/shaders/`.
//!
//! Every struct is a multiple of 16 bytes with only `vec4`/`mat4` sized
//! fields, so the `#[repr(C)]` layout matches the WGSL uniform layout.
//! Scalars ride in the spare `w` lanes.

use glam::{Mat4, Vec3};

use crate::model::Material;
use crate::scene::light::MAX_POINT_LIGHTS;
use crate::scene::{Camera, Scene, Transform};

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            view_pos: vec4(camera.position, 1.0),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    /// Flat colour for the unlit pipeline.
    pub color: [f32; 4],
}

impl ModelUniform {
    pub fn new(transform: &Transform, color: Vec3) -> Self {
        Self {
            model: transform.model_matrix().to_cols_array_2d(),
            normal: transform.normal_matrix().to_cols_array_2d(),
            color: vec4(color, 1.0),
        }
    }
}

/// `color.w` is the intensity.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuDirectionalLight {
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

/// `position.w` is the attenuation, `color.w` the intensity.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// As [`GpuPointLight`], plus `cone = [cos inner, cos outer, 0, 0]` of the half angles.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuSpotLight {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub color: [f32; 4],
    pub cone: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub light_matrix: [[f32; 4]; 4],
    pub directional: GpuDirectionalLight,
    pub points: [GpuPointLight; MAX_POINT_LIGHTS],
    pub spot: GpuSpotLight,
    pub light_position: [f32; 4],
    /// `[min_bias, max_bias, enabled, 0]`
    pub shadow: [f32; 4],
    /// `[point light count, spot enabled, 0, 0]`
    pub counts: [u32; 4],
}

impl LightingUniform {
    /// Point lights past [`MAX_POINT_LIGHTS`] are dropped.
    pub fn from_scene(scene: &Scene) -> Self {
        let lights = &scene.lights;
        let dir = &lights.directional;

        let mut points = [GpuPointLight::default(); MAX_POINT_LIGHTS];
        for (slot, light) in points.iter_mut().zip(&lights.points) {
            *slot = GpuPointLight {
                position: vec4(light.position, light.attenuation),
                color: vec4(light.color, light.intensity),
            };
        }

        let spot = lights
            .spot
            .map(|spot| {
                let (inner, outer) = spot.cone_cosines();
                GpuSpotLight {
                    position: vec4(spot.position, spot.attenuation),
                    direction: vec4(spot.direction.normalize_or_zero(), 0.0),
                    color: vec4(spot.color, spot.intensity),
                    cone: [inner, outer, 0.0, 0.0],
                }
            })
            .unwrap_or_default();

        let settings = scene.shadow_settings();
        Self {
            light_matrix: scene.light_view_projection().to_cols_array_2d(),
            directional: GpuDirectionalLight {
                direction: vec4(-dir.to_light(), 0.0),
                color: vec4(dir.color, dir.intensity),
            },
            points,
            spot,
            light_position: vec4(scene.light_position(), 1.0),
            shadow: [
                settings.min_bias,
                settings.max_bias,
                if scene.shadows.is_some() { 1.0 } else { 0.0 },
                0.0,
            ],
            counts: [
                lights.points.len().min(MAX_POINT_LIGHTS) as u32,
                lights.spot.is_some() as u32,
                0,
                0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    /// `[ambient_k, diffuse_k, specular_k, shininess]`
    pub coefficients: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            color: vec4(material.color, 1.0),
            coefficients: [
                material.ambient_k,
                material.diffuse_k,
                material.specular_k,
                material.shininess,
            ],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightPassUniform {
    pub light_matrix: [[f32; 4]; 4],
}

impl LightPassUniform {
    pub fn new(light_matrix: Mat4) -> Self {
        Self {
            light_matrix: light_matrix.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PointLight, SpotLight};
    use crate::shadow::ShadowSettings;
    use approx::assert_relative_eq;
    use std::mem::size_of;

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(size_of::<CameraUniform>(), 144);
        assert_eq!(size_of::<ModelUniform>(), 144);
        assert_eq!(size_of::<MaterialUniform>(), 32);
        assert_eq!(size_of::<LightPassUniform>(), 64);
        // 64 + 32 + 2 * 32 + 64 + 16 + 16 + 16
        assert_eq!(size_of::<LightingUniform>(), 272);
    }

    #[test]
    fn test_lighting_from_scene() {
        let mut scene = Scene::new(Camera::new(Vec3::new(0.0, 0.0, 5.0), 1.0));
        scene.lights.directional.direction = Vec3::new(0.0, -7.0, 0.0);
        scene.lights.directional.intensity = 2.0;
        for x in [-1.0, 1.0, 3.0] {
            scene.lights.points.push(PointLight {
                position: Vec3::new(x, 1.0, 0.0),
                attenuation: 0.5,
                ..Default::default()
            });
        }

        let uniform = LightingUniform::from_scene(&scene);
        assert_relative_eq!(uniform.directional.direction[1], -1.0, epsilon = 1e-6);
        assert_eq!(uniform.directional.color[3], 2.0);
        assert_eq!(uniform.counts, [2, 0, 0, 0]);
        assert_eq!(uniform.points[1].position, [1.0, 1.0, 0.0, 0.5]);
        assert_eq!(uniform.shadow[2], 0.0);
        assert_eq!(uniform.spot, GpuSpotLight::default());

        scene.shadows = Some(ShadowSettings::default());
        scene.lights.spot = Some(SpotLight::default());
        let uniform = LightingUniform::from_scene(&scene);
        assert_eq!(uniform.shadow, [0.007, 0.02, 1.0, 0.0]);
        assert_eq!(uniform.counts[1], 1);
        assert!(uniform.spot.cone[0] > uniform.spot.cone[1]);
        assert_eq!(uniform.light_matrix, scene.light_view_projection().to_cols_array_2d());
    }

    #[test]
    fn test_model_uniform_carries_normal_matrix() {
        let transform = Transform::new().with_scale(Vec3::new(2.0, 1.0, 1.0));
        let uniform = ModelUniform::new(&transform, Vec3::X);
        assert_eq!(uniform.model[0][0], 2.0);
        assert_relative_eq!(uniform.normal[0][0], 0.5);
        assert_eq!(uniform.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_material_uniform() {
        let uniform = MaterialUniform::from(&Material::default());
        assert_eq!(uniform.coefficients, [0.2, 0.5, 0.5, 150.0]);
    }
}
