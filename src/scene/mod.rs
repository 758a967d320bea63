pub mod camera;
pub mod light;
pub mod transform;

pub use camera::{Camera, Projection};
pub use light::{DirectionalLight, Lights, PointLight, SpotLight};
pub use transform::Transform;

use glam::{Mat4, Vec3};
use std::time::Instant;
use winit::keyboard::KeyCode;

use crate::model::{Material, MeshData};
use crate::shadow::{self, DepthMap, ShadowSettings};

/// Index of a mesh registered with [`Scene::add_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Blinn-Phong with the scene material, lights and shadows.
    Lit,
    /// Flat colour, no lighting.
    Unlit { color: Vec3 },
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshId,
    pub transform: Transform,
    pub shading: Shading,
    pub casts_shadow: bool,
}

impl SceneObject {
    pub fn lit(name: &str, mesh: MeshId, transform: Transform) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform,
            shading: Shading::Lit,
            casts_shadow: true,
        }
    }

    /// Unlit objects are markers (light gizmos, flat shapes) and cast no shadow.
    pub fn unlit(name: &str, mesh: MeshId, transform: Transform, color: Vec3) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform,
            shading: Shading::Unlit { color },
            casts_shadow: false,
        }
    }
}

pub struct Scene {
    pub camera: Camera,
    pub meshes: Vec<MeshData>,
    pub objects: Vec<SceneObject>,
    pub lights: Lights,
    pub material: Material,
    /// `None` disables the shadow pass.
    pub shadows: Option<ShadowSettings>,
    pub clear_color: wgpu::Color,
    last_update: Instant,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            meshes: Vec::new(),
            objects: Vec::new(),
            lights: Lights::default(),
            material: Material::default(),
            shadows: None,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
            last_update: Instant::now(),
        }
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id.0)
    }

    /// Returns the index of the new object.
    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Restarts the frame clock so the next `update` does not count setup time.
    pub fn reset_clock(&mut self) {
        self.last_update = Instant::now();
    }

    /// Advances the frame clock and moves the camera. Returns the elapsed seconds.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        self.camera.update(dt);
        dt
    }

    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) {
        self.camera.process_keyboard(key, pressed);
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.camera.process_mouse(dx, dy);
    }

    pub fn process_scroll(&mut self, offset: f32) {
        self.camera.process_scroll(offset);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Settings used for the light matrix even when shadows are off.
    pub fn shadow_settings(&self) -> ShadowSettings {
        self.shadows.unwrap_or_default()
    }

    pub fn light_position(&self) -> Vec3 {
        shadow::light_position(self.lights.directional.direction, self.shadow_settings().light_distance)
    }

    pub fn light_view_projection(&self) -> Mat4 {
        shadow::light_view_projection(self.light_position(), &self.shadow_settings())
    }

    /// Software depth pass over every shadow caster, as the GPU shadow pass would see it.
    pub fn render_depth_map(&self) -> DepthMap {
        let settings = self.shadow_settings();
        let light_matrix = self.light_view_projection();
        let mut map = DepthMap::new(settings.resolution);
        for object in self.objects.iter().filter(|o| o.casts_shadow) {
            match self.mesh(object.mesh) {
                Some(mesh) => map.rasterize(mesh, object.transform.model_matrix(), light_matrix),
                None => log::warn!("Object `{}` refers to missing mesh {:?}", object.name, object.mesh),
            }
        }
        map
    }

    /// Direct-light visibility of a world point: 1.0 lit, 0.0 shadowed.
    /// Always 1.0 when shadows are disabled.
    pub fn shadow_factor_at(&self, map: &DepthMap, point: Vec3, normal: Vec3) -> f32 {
        let Some(settings) = self.shadows else {
            return 1.0;
        };
        shadow::shadow_factor(
            map,
            self.light_view_projection(),
            point,
            normal.normalize_or_zero(),
            self.lights.directional.to_light(),
            &settings,
        )
    }
}
