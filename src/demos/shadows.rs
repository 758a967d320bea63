use glam::Vec3;

use super::lighting::add_primitives;
use super::Demo;
use crate::scene::Scene;
use crate::shadow::ShadowSettings;

/// The lighting scene under a single, steep directional light with a shadow map.
#[derive(Default)]
pub struct ShadowsDemo;

impl Demo for ShadowsDemo {
    fn name(&self) -> &'static str {
        "shadows"
    }

    fn setup(&mut self, scene: &mut Scene) {
        add_primitives(scene);
        scene.lights.directional.direction = Vec3::new(1.0, -7.0, 0.0);
        scene.lights.points.clear();
        scene.lights.spot = None;
        scene.shadows = Some(ShadowSettings::default());
    }

    fn update(&mut self, _scene: &mut Scene, _time: f32, _dt: f32) {}
}
