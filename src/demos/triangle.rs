use glam::Vec3;

use super::Demo;
use crate::model::MeshData;
use crate::scene::{Projection, Scene, SceneObject, Shading, Transform};

/// Per-vertex colours, brightening towards the shared apex.
const COLORS: [[Vec3; 3]; 2] = [
    [Vec3::new(0.3, 0.1, 0.0), Vec3::new(0.3, 0.1, 0.0), Vec3::new(0.4, 0.2, 0.0)],
    [Vec3::new(0.0, 0.3, 0.5), Vec3::new(0.0, 0.3, 0.6), Vec3::new(0.0, 0.3, 0.7)],
];

/// Two overlapping vertex-coloured triangles whose brightness pulses with `|sin(time)|`.
#[derive(Default)]
pub struct TriangleDemo {
    objects: Vec<usize>,
}

impl Demo for TriangleDemo {
    fn name(&self) -> &'static str {
        "triangle"
    }

    fn setup(&mut self, scene: &mut Scene) {
        scene.clear_color = wgpu::Color {
            r: 0.2,
            g: 0.3,
            b: 0.6,
            a: 1.0,
        };
        scene.camera.position = Vec3::new(0.0, 0.0, 1.0);
        scene.camera.yaw = -90.0;
        scene.camera.pitch = 0.0;
        scene.camera.projection = Projection::Orthographic { height: 1.0 };

        let shapes = [
            MeshData::triangle(
                Vec3::new(-0.2, -0.45, 0.0),
                Vec3::new(0.5, -0.75, 0.0),
                Vec3::new(0.0, 0.5, 0.0),
            ),
            MeshData::triangle(
                Vec3::new(-1.0, -0.35, 0.0),
                Vec3::new(-0.3, -0.85, 0.0),
                Vec3::new(0.0, 0.5, 0.0),
            ),
        ];
        for (i, (shape, colors)) in shapes.into_iter().zip(COLORS).enumerate() {
            let mesh = scene.add_mesh(shape.with_colors(&colors));
            let name = format!("triangle {}", i);
            self.objects
                .push(scene.add_object(SceneObject::unlit(&name, mesh, Transform::new(), Vec3::ZERO)));
        }
    }

    fn update(&mut self, scene: &mut Scene, time: f32, _dt: f32) {
        let t = time.sin().abs();
        for &idx in &self.objects {
            if let Some(object) = scene.objects.get_mut(idx) {
                object.shading = Shading::Unlit {
                    color: Vec3::splat(t),
                };
            }
        }
    }
}
