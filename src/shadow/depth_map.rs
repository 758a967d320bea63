use std::path::Path;

use anyhow::{Context, Result};
use glam::{Mat4, Vec2, Vec3};

use crate::model::MeshData;

/// Square software depth buffer, cleared to the far plane (1.0).
#[derive(Debug, Clone)]
pub struct DepthMap {
    resolution: u32,
    depths: Vec<f32>,
}

impl DepthMap {
    pub fn new(resolution: u32) -> Self {
        let resolution = resolution.max(1);
        Self {
            resolution,
            depths: vec![1.0; texel_index(resolution, 0, resolution)],
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.depths[texel_index(self.resolution, x, y)]
    }

    /// Nearest-texel lookup; coordinates outside `[0, 1]` clamp to the edge.
    pub fn sample(&self, uv: Vec2) -> f32 {
        let max = (self.resolution - 1) as f32;
        let x = (uv.x * self.resolution as f32).floor().clamp(0.0, max) as u32;
        let y = (uv.y * self.resolution as f32).floor().clamp(0.0, max) as u32;
        self.depth_at(x, y)
    }

    /// Rasterizes every triangle of `mesh`, keeping the nearest depth per texel.
    /// Both windings are drawn.
    pub fn rasterize(&mut self, mesh: &MeshData, model: Mat4, light_matrix: Mat4) {
        let mvp = light_matrix * model;
        for tri in mesh.triangles() {
            let projected = tri.map(|p| {
                let clip = mvp * p.extend(1.0);
                clip.truncate() / clip.w
            });
            self.rasterize_triangle(projected);
        }
    }

    fn to_texels(&self, ndc: Vec3) -> Vec2 {
        let size = self.resolution as f32;
        Vec2::new((ndc.x * 0.5 + 0.5) * size, (0.5 - ndc.y * 0.5) * size)
    }

    fn rasterize_triangle(&mut self, ndc: [Vec3; 3]) {
        let [a, b, c] = ndc.map(|p| self.to_texels(p));
        let area = edge(a, b, c);
        if area.abs() <= f32::EPSILON {
            return;
        }

        let size = self.resolution as f32;
        let min = a.min(b).min(c).floor().max(Vec2::ZERO);
        let max = a.max(b).max(c).ceil().min(Vec2::splat(size));
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let depth = w0 * ndc[0].z + w1 * ndc[1].z + w2 * ndc[2].z;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }
                let slot = &mut self.depths[texel_index(self.resolution, x, y)];
                if depth < *slot {
                    *slot = depth;
                }
            }
        }
    }

    /// Writes the map as an 8-bit grayscale PNG, near = black.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let img = image::GrayImage::from_fn(self.resolution, self.resolution, |x, y| {
            image::Luma([(self.depth_at(x, y).clamp(0.0, 1.0) * 255.0).round() as u8])
        });
        img.save(path)
            .with_context(|| format!("Failed to write shadow map to {}", path.display()))
    }
}

/// Twice the signed area of `(a, b, p)`.
/// Row-major offset of texel `(x, y)`, computed in `usize` so large maps do not wrap.
pub(super) fn texel_index(resolution: u32, x: u32, y: u32) -> usize {
    y as usize * resolution as usize + x as usize
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
