use glam::Vec3;

use super::Demo;
use crate::model::{Material, MeshData};
use crate::scene::{PointLight, Scene, SceneObject, Shading, SpotLight, Transform};

pub const SPHERE_SEGMENTS: u32 = 64;

/// Cube, sphere and cylinder in a row over a 10x10 floor, with a red material.
/// Shared with the shadow demo.
pub(super) fn add_primitives(scene: &mut Scene) {
    let cube = scene.add_mesh(MeshData::cube(1.0, 1.0, 1.0));
    let sphere = scene.add_mesh(MeshData::sphere(0.5, SPHERE_SEGMENTS));
    let cylinder = scene.add_mesh(MeshData::cylinder(1.0, 0.5, SPHERE_SEGMENTS));
    let plane = scene.add_mesh(MeshData::plane(1.0, 1.0));

    scene.add_object(SceneObject::lit(
        "cube",
        cube,
        Transform::from_position(Vec3::new(-2.0, 0.0, 0.0)),
    ));
    scene.add_object(SceneObject::lit("sphere", sphere, Transform::new()));
    scene.add_object(SceneObject::lit(
        "cylinder",
        cylinder,
        Transform::from_position(Vec3::new(2.0, 0.0, 0.0)),
    ));
    scene.add_object(SceneObject::lit(
        "plane",
        plane,
        Transform::from_position(Vec3::new(0.0, -1.0, 0.0)).with_scale(Vec3::splat(10.0)),
    ));

    scene.material = Material::with_color(Vec3::new(1.0, 0.0, 0.0));
    scene.camera.position = Vec3::new(0.0, 0.0, 5.0);
    scene.camera.yaw = -90.0;
    scene.camera.pitch = 0.0;
}

/// Phong-lit primitives under a directional light, two point lights drawn as
/// small unlit spheres, and a spot light pointing straight down.
#[derive(Default)]
pub struct LightingDemo {
    markers: Vec<usize>,
}

impl Demo for LightingDemo {
    fn name(&self) -> &'static str {
        "lighting"
    }

    fn setup(&mut self, scene: &mut Scene) {
        add_primitives(scene);

        scene.lights.points = vec![
            PointLight {
                position: Vec3::new(1.0, 1.0, 0.0),
                ..Default::default()
            },
            PointLight {
                position: Vec3::new(-1.0, 1.0, 0.0),
                ..Default::default()
            },
        ];
        scene.lights.spot = Some(SpotLight::default());

        let marker = scene.add_mesh(MeshData::sphere(0.5, SPHERE_SEGMENTS));
        for (i, light) in scene.lights.points.clone().iter().enumerate() {
            let transform = Transform::from_position(light.position).with_scale(Vec3::splat(0.5));
            let name = format!("point light {}", i);
            self.markers
                .push(scene.add_object(SceneObject::unlit(&name, marker, transform, light.color)));
        }
    }

    /// Keeps the markers on their lights.
    fn update(&mut self, scene: &mut Scene, _time: f32, _dt: f32) {
        for (&idx, light) in self.markers.iter().zip(&scene.lights.points) {
            if let Some(object) = scene.objects.get_mut(idx) {
                object.transform.position = light.position;
                object.shading = Shading::Unlit { color: light.color };
            }
        }
    }
}
