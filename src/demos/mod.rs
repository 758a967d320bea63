//! The four demo programs, each a scene setup plus a per-frame update over the
//! shared render harness.

mod lighting;
mod shadows;
mod transforms;
mod triangle;

pub use lighting::LightingDemo;
pub use shadows::ShadowsDemo;
pub use transforms::TransformsDemo;
pub use triangle::TriangleDemo;

use crate::scene::Scene;

pub trait Demo {
    fn name(&self) -> &'static str;

    /// Populates a freshly created scene. The camera pose left behind becomes its home.
    fn setup(&mut self, scene: &mut Scene);

    /// Called once per frame with seconds since start and since the last frame.
    fn update(&mut self, scene: &mut Scene, time: f32, dt: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoKind {
    /// Two pulsing flat triangles
    Triangle,
    /// A row of bouncing cubes under an orbiting camera
    Transforms,
    /// Phong lighting with point and spot lights
    Lighting,
    /// Directional light with shadow mapping
    Shadows,
}

impl DemoKind {
    pub fn create(self) -> Box<dyn Demo> {
        match self {
            DemoKind::Triangle => Box::new(TriangleDemo::default()),
            DemoKind::Transforms => Box::new(TransformsDemo::default()),
            DemoKind::Lighting => Box::new(LightingDemo::default()),
            DemoKind::Shadows => Box::new(ShadowsDemo::default()),
        }
    }

    pub fn window_title(self) -> &'static str {
        match self {
            DemoKind::Triangle => "Triangle",
            DemoKind::Transforms => "Transformations",
            DemoKind::Lighting => "Lighting",
            DemoKind::Shadows => "Shadow Mapping",
        }
    }

    pub fn default_size(self) -> (u32, u32) {
        match self {
            DemoKind::Triangle => (640, 480),
            _ => (1080, 720),
        }
    }
}

#[cfg(test)]
mod tests;
