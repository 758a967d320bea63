use anyhow::Result;
use glam::Vec3;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::dpi::PhysicalSize;
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

pub mod cli;
pub mod demos;
pub mod input;
pub mod math;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod shadow;

pub use cli::{AppConfig, Args};
pub use demos::{Demo, DemoKind};
pub use renderer::Renderer;
pub use scene::{Camera, Scene, Transform};

use input::{Action, MouseCapture};
use shadow::ShadowSettings;

/// Pixels of trackpad scrolling treated as one wheel notch.
const PIXELS_PER_LINE: f32 = 20.0;

/// Creates the configured demo and its scene, with the demo's starting camera
/// pose stored as the reset pose.
pub fn build_scene(config: &AppConfig) -> (Box<dyn Demo>, Scene) {
    let aspect = config.width as f32 / config.height.max(1) as f32;
    let mut scene = Scene::new(Camera::new(Vec3::new(0.0, 0.0, 5.0), aspect));
    let mut demo = config.demo.create();
    demo.setup(&mut scene);
    if let Some(settings) = scene.shadows.as_mut() {
        settings.resolution = config.shadow_resolution;
    }
    scene.camera.set_home();
    log::info!("Set up `{}` demo with {} objects", demo.name(), scene.objects.len());
    (demo, scene)
}

/// Renders the demo's depth map from the light on the CPU and writes it as a PNG.
pub fn dump_shadow_map(config: &AppConfig, path: &Path) -> Result<()> {
    let (demo, mut scene) = build_scene(config);
    if scene.shadows.is_none() {
        log::warn!("Demo `{}` has shadows disabled; dumping its light view anyway", demo.name());
        scene.shadows = Some(ShadowSettings {
            resolution: config.shadow_resolution,
            ..Default::default()
        });
    }

    let map = scene.render_depth_map();
    map.save_png(path)?;
    log::info!(
        "Wrote {}x{} shadow map to {}",
        map.resolution(),
        map.resolution(),
        path.display()
    );
    Ok(())
}

/// Everything the event loop drives: window, scene, renderer and the running demo.
pub struct State {
    window: Arc<Window>,
    pub scene: Scene,
    renderer: Renderer,
    demo: Box<dyn Demo>,
    capture: MouseCapture,
    start: Instant,
}

impl State {
    pub fn new(window: Window, config: &AppConfig) -> Result<Self> {
        let window = Arc::new(window);
        let (demo, mut scene) = build_scene(config);
        let size = window.inner_size();
        scene.resize(size.width, size.height);

        let renderer = Renderer::new(window.clone(), &scene, config)?;
        scene.reset_clock();

        let state = Self {
            window,
            scene,
            renderer,
            demo,
            capture: MouseCapture::default(),
            start: Instant::now(),
        };
        state.apply_capture();
        Ok(state)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size.width, new_size.height);
            self.scene.resize(new_size.width, new_size.height);
        }
    }

    /// Returns `false` once the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if let Some(action) = input::action_for_key(key) {
            if !pressed {
                return true;
            }
            match action {
                Action::Quit => return false,
                Action::ResetCamera => self.scene.camera.reset(),
                Action::ToggleWireframe => {
                    if self.renderer.supports_wireframe() {
                        let on = self.renderer.toggle_wireframe();
                        log::info!("Wireframe {}", if on { "on" } else { "off" });
                    } else {
                        log::warn!("Wireframe is not supported on this adapter");
                    }
                }
                Action::ToggleProjection => {
                    self.scene.camera.toggle_projection(input::ORTHO_HEIGHT);
                    log::info!("Projection: {:?}", self.scene.camera.projection);
                }
            }
            return true;
        }

        self.scene.process_keyboard(key, pressed);
        true
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed && button == input::CAPTURE_BUTTON {
            self.capture.toggle();
            self.apply_capture();
        }
    }

    pub fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.capture.is_captured() {
            self.scene.process_mouse(dx as f32, dy as f32);
        }
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let offset = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        self.scene.process_scroll(offset);
    }

    fn apply_capture(&self) {
        if self.capture.is_captured() {
            let grab = self
                .window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(e) = grab {
                log::warn!("Failed to grab cursor: {}", e);
            }
            self.window.set_cursor_visible(false);
        } else {
            if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Failed to release cursor: {}", e);
            }
            self.window.set_cursor_visible(true);
        }
    }

    pub fn update(&mut self) {
        let dt = self.scene.update();
        let time = self.start.elapsed().as_secs_f32();
        self.demo.update(&mut self.scene, time, dt);
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.renderer.render(&self.scene)
    }

    /// Reconfigures the surface after it was lost or became outdated.
    pub fn reconfigure(&mut self) {
        self.renderer.reconfigure();
    }
}
