//! Directional-light shadow mapping.
//!
//! The GPU runs a depth-only pass from the light and then compares against it
//! while shading (`shaders/lit.wgsl`). The functions here are the same maths on
//! the CPU; `DepthMap` is a software version of the depth pass.

mod depth_map;

pub use depth_map::DepthMap;

use glam::{Mat4, Vec2, Vec3};

use crate::math;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    /// Side length of the square depth target in texels.
    pub resolution: u32,
    pub min_bias: f32,
    pub max_bias: f32,
    /// How far from the origin the light's eye is placed, against its direction.
    pub light_distance: f32,
    pub near: f32,
    pub far: f32,
    /// Half the width/height of the light's orthographic volume.
    pub half_extent: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            resolution: 2048,
            min_bias: 0.007,
            max_bias: 0.02,
            light_distance: 10.0,
            near: 0.1,
            far: 25.0,
            half_extent: 10.0,
        }
    }
}

/// Where on the shadow map a world point falls, and its depth as seen from the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCoord {
    /// Texture coordinates, origin top-left.
    pub uv: Vec2,
    pub depth: f32,
}

/// Eye position for a directional light travelling along `direction`.
pub fn light_position(direction: Vec3, distance: f32) -> Vec3 {
    let dir = direction.normalize_or_zero();
    let dir = if dir == Vec3::ZERO { Vec3::NEG_Y } else { dir };
    -dir * distance
}

pub fn light_view_projection(position: Vec3, settings: &ShadowSettings) -> Mat4 {
    let e = settings.half_extent;
    let projection = math::orthographic(-e, e, -e, e, settings.near, settings.far);
    let view = math::look_at(position, Vec3::ZERO, Vec3::Y);
    projection * view
}

/// Depth bias that grows as the surface turns away from the light.
pub fn slope_scaled_bias(normal: Vec3, to_light: Vec3, min_bias: f32, max_bias: f32) -> f32 {
    let facing = normal.dot(to_light).clamp(0.0, 1.0);
    min_bias + (max_bias - min_bias) * (1.0 - facing)
}

/// Projects a world point into shadow-map space. `None` outside the light's volume.
pub fn project(light_matrix: Mat4, world: Vec3) -> Option<ShadowCoord> {
    let clip = light_matrix * world.extend(1.0);
    if clip.w.abs() <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }
    Some(ShadowCoord {
        uv: Vec2::new(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5),
        depth: ndc.z,
    })
}

/// 1.0 when `world` receives direct light, 0.0 when an occluder in `map` hides it.
pub fn shadow_factor(
    map: &DepthMap,
    light_matrix: Mat4,
    world: Vec3,
    normal: Vec3,
    to_light: Vec3,
    settings: &ShadowSettings,
) -> f32 {
    let Some(coord) = project(light_matrix, world) else {
        return 1.0;
    };
    let closest = map.sample(coord.uv);
    let bias = slope_scaled_bias(normal, to_light, settings.min_bias, settings.max_bias);
    if coord.depth - bias > closest {
        0.0
    } else {
        1.0
    }
}
