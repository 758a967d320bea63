use super::*;
use crate::scene::{Camera, Projection, Shading};
use crate::shadow::ShadowSettings;
use approx::assert_relative_eq;
use clap::ValueEnum;
use glam::Vec3;

fn setup(kind: DemoKind) -> (Box<dyn Demo>, Scene) {
    let mut scene = Scene::new(Camera::new(Vec3::ZERO, 1.5));
    let mut demo = kind.create();
    demo.setup(&mut scene);
    (demo, scene)
}

#[test]
fn test_every_kind_builds_a_scene() {
    for kind in DemoKind::value_variants() {
        let (demo, scene) = setup(*kind);
        assert!(!scene.objects.is_empty(), "{} has no objects", demo.name());
        for object in &scene.objects {
            assert!(scene.mesh(object.mesh).is_some());
        }
        let (w, h) = kind.default_size();
        assert!(w > 0 && h > 0);
        assert!(!kind.window_title().is_empty());
    }
}

#[test]
fn test_triangle_pulses() {
    let (mut demo, mut scene) = setup(DemoKind::Triangle);
    assert_eq!(scene.objects.len(), 2);
    assert_eq!(scene.camera.projection, Projection::Orthographic { height: 1.0 });

    demo.update(&mut scene, 0.0, 0.0);
    assert!(matches!(scene.objects[0].shading, Shading::Unlit { color } if color == Vec3::ZERO));

    demo.update(&mut scene, std::f32::consts::FRAC_PI_2, 0.0);
    let Shading::Unlit { color } = scene.objects[1].shading else {
        panic!("triangle should be unlit");
    };
    assert!(color.abs_diff_eq(Vec3::ONE, 1e-5));
}

#[test]
fn test_triangle_vertex_colors_brighten_to_apex() {
    let (_, scene) = setup(DemoKind::Triangle);
    let warm = scene.mesh(scene.objects[0].mesh).unwrap();
    assert_eq!(warm.vertices[0].color, [0.3, 0.1, 0.0]);
    assert_eq!(warm.vertices[2].color, [0.4, 0.2, 0.0]);

    let cool = scene.mesh(scene.objects[1].mesh).unwrap();
    let blues: Vec<f32> = cool.vertices.iter().map(|v| v.color[2]).collect();
    assert_eq!(blues, vec![0.5, 0.6, 0.7]);
}

#[test]
fn test_transforms_layout_and_stagger() {
    let (mut demo, mut scene) = setup(DemoKind::Transforms);
    assert_eq!(scene.objects.len(), transforms::CUBE_COUNT);
    assert_relative_eq!(scene.objects[0].transform.position.x, -5.0, epsilon = 1e-5);
    assert_relative_eq!(scene.objects[49].transform.position.x, 4.8, epsilon = 1e-5);
    assert_eq!(scene.objects[3].transform.scale, Vec3::new(0.2, 1.0, 1.0));

    // At t = 0.25 only the first three cubes have started.
    demo.update(&mut scene, 0.25, 0.1);
    assert!(scene.objects[2].transform.scale.y > 1.0);
    assert_eq!(scene.objects[3].transform.scale.y, 1.0);

    // The camera stays on its orbit, facing the origin.
    assert_relative_eq!(scene.camera.position.length(), 7.0, epsilon = 1e-4);
    let to_origin = -scene.camera.position.normalize();
    assert_relative_eq!(scene.camera.forward().dot(to_origin), 1.0, epsilon = 1e-4);
}

#[test]
fn test_transforms_scale_stays_bounded() {
    let (mut demo, mut scene) = setup(DemoKind::Transforms);
    let dt = 1.0 / 60.0;
    for frame in 0..2000 {
        demo.update(&mut scene, 10.0 + frame as f32 * dt, dt);
        for object in &scene.objects {
            let y = object.transform.scale.y;
            assert!((0.7..=6.1).contains(&y), "scale {} out of range", y);
        }
    }
}

#[test]
fn test_transforms_survive_a_frame_hitch() {
    let (mut demo, mut scene) = setup(DemoKind::Transforms);
    let dt = 1.0 / 60.0;
    let mut time = 0.0;
    let mut previous = scene.objects[0].transform.scale.y;
    // Run until the first cube is on its way down and below 2.
    loop {
        time += dt;
        demo.update(&mut scene, time, dt);
        let y = scene.objects[0].transform.scale.y;
        if y < previous && y < 2.0 {
            break;
        }
        previous = y;
        assert!(time < 30.0, "first cube never started shrinking");
    }

    demo.update(&mut scene, time + 0.5, 0.5);
    for object in &scene.objects {
        let y = object.transform.scale.y;
        assert!(
            (transforms::MIN_SCALE..=transforms::MAX_SCALE).contains(&y),
            "scale {} left its range",
            y
        );
    }
    assert_eq!(scene.objects[0].transform.scale.y, transforms::MIN_SCALE);

    // It bounces back up on the next frame.
    demo.update(&mut scene, time + 0.5 + dt, dt);
    assert!(scene.objects[0].transform.scale.y > transforms::MIN_SCALE);
}

#[test]
fn test_lighting_scene() {
    let (mut demo, mut scene) = setup(DemoKind::Lighting);
    assert_eq!(scene.lights.points.len(), 2);
    assert!(scene.lights.spot.is_some());
    assert!(scene.shadows.is_none());
    assert_eq!(scene.material.color, Vec3::new(1.0, 0.0, 0.0));

    let markers: Vec<_> = scene
        .objects
        .iter()
        .filter(|o| matches!(o.shading, Shading::Unlit { .. }))
        .collect();
    assert_eq!(markers.len(), 2);
    assert!(markers.iter().all(|m| !m.casts_shadow && m.transform.scale == Vec3::splat(0.5)));

    scene.lights.points[0].position = Vec3::new(0.0, 3.0, 0.0);
    demo.update(&mut scene, 1.0, 0.016);
    assert!(scene
        .objects
        .iter()
        .any(|o| o.transform.position == Vec3::new(0.0, 3.0, 0.0)));
}

#[test]
fn test_shadows_scene() {
    let (_, scene) = setup(DemoKind::Shadows);
    assert!(scene.lights.points.is_empty());
    assert!(scene.lights.spot.is_none());
    assert_eq!(scene.lights.directional.direction, Vec3::new(1.0, -7.0, 0.0));
    assert_eq!(scene.shadows, Some(ShadowSettings::default()));
    assert!(scene.objects.iter().all(|o| o.casts_shadow));
}

#[test]
fn test_shadows_demo_casts_under_sphere() {
    let (_, mut scene) = setup(DemoKind::Shadows);
    if let Some(settings) = scene.shadows.as_mut() {
        settings.resolution = 512;
    }
    let map = scene.render_depth_map();

    // The light comes in steeply from -X, so the sphere's shadow lands just to its +X side.
    let under_sphere = Vec3::new(0.15, -1.0, 0.0);
    let open_floor = Vec3::new(0.0, -1.0, 3.0);
    assert_eq!(scene.shadow_factor_at(&map, under_sphere, Vec3::Y), 0.0);
    assert_eq!(scene.shadow_factor_at(&map, open_floor, Vec3::Y), 1.0);
}
