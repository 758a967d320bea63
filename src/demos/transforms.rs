use glam::Vec3;

use super::Demo;
use crate::model::MeshData;
use crate::scene::{Scene, SceneObject, Shading, Transform};

pub const CUBE_COUNT: usize = 50;
pub const MAX_SCALE: f32 = 6.0;
pub const MIN_SCALE: f32 = 0.8;
/// Y scale change per second.
pub const GROW_RATE: f32 = 3.0;
pub const SHRINK_RATE: f32 = 4.2;
/// Seconds between neighbouring cubes starting to move.
pub const STAGGER: f32 = 0.1;

const ORBIT_RADIUS: f32 = 7.0;
const ORBIT_SPEED: f32 = 1.0;

const LOW: Vec3 = Vec3::new(0.1, 0.3, 0.9);
const HIGH: Vec3 = Vec3::new(1.0, 0.5, 0.1);

struct Bouncer {
    object: usize,
    growing: bool,
}

/// A row of thin cubes that stretch up and down in a wave, seen from a camera
/// circling the origin.
#[derive(Default)]
pub struct TransformsDemo {
    cubes: Vec<Bouncer>,
}

/// Next Y scale of a bouncing cube. The scale stops at each limit and the
/// direction flips there, so a long frame never overshoots.
fn bounce(scale: f32, growing: bool, dt: f32) -> (f32, bool) {
    if growing {
        let scale = (scale + GROW_RATE * dt).min(MAX_SCALE);
        (scale, scale < MAX_SCALE)
    } else {
        let scale = (scale - SHRINK_RATE * dt).max(MIN_SCALE);
        (scale, scale <= MIN_SCALE)
    }
}

fn color_for(scale: f32) -> Vec3 {
    let t = ((scale - MIN_SCALE) / (MAX_SCALE - MIN_SCALE)).clamp(0.0, 1.0);
    LOW.lerp(HIGH, t)
}

impl Demo for TransformsDemo {
    fn name(&self) -> &'static str {
        "transforms"
    }

    fn setup(&mut self, scene: &mut Scene) {
        scene.clear_color = wgpu::Color::BLACK;
        scene.camera.position = Vec3::new(ORBIT_RADIUS, 0.0, 0.0);
        scene.camera.look_at(Vec3::ZERO);

        let cube = scene.add_mesh(MeshData::cube(1.0, 1.0, 1.0));
        for i in 0..CUBE_COUNT {
            let x = -(CUBE_COUNT as f32) * 0.1 + i as f32 * 0.2;
            let transform = Transform::from_position(Vec3::new(x, 0.0, 0.0))
                .with_scale(Vec3::new(0.2, 1.0, 1.0));
            let object = scene.add_object(SceneObject::unlit(
                &format!("cube {}", i),
                cube,
                transform,
                color_for(1.0),
            ));
            self.cubes.push(Bouncer {
                object,
                growing: true,
            });
        }
    }

    fn update(&mut self, scene: &mut Scene, time: f32, dt: f32) {
        let (sin, cos) = (time * ORBIT_SPEED).sin_cos();
        scene.camera.position = Vec3::new(cos * ORBIT_RADIUS, scene.camera.position.y, sin * ORBIT_RADIUS);
        scene.camera.look_at(Vec3::ZERO);

        for (i, cube) in self.cubes.iter_mut().enumerate() {
            if time <= i as f32 * STAGGER {
                continue;
            }
            let Some(object) = scene.objects.get_mut(cube.object) else {
                continue;
            };
            let (scale, growing) = bounce(object.transform.scale.y, cube.growing, dt);
            object.transform.scale.y = scale;
            object.shading = Shading::Unlit {
                color: color_for(scale),
            };
            cube.growing = growing;
        }
    }
}
