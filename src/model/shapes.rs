//! Procedural primitives.
//!
//! Every generator centres its shape on the origin, winds front faces
//! counter-clockwise and emits unit-length outward normals.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::ModelVertex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Iterates the triangles as vertex positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                Vec3::from(self.vertices[tri[0] as usize].position),
                Vec3::from(self.vertices[tri[1] as usize].position),
                Vec3::from(self.vertices[tri[2] as usize].position),
            ]
        })
    }

    /// Sets per-vertex colours in vertex order. Vertices past the end of `colors` keep theirs.
    pub fn with_colors(mut self, colors: &[Vec3]) -> Self {
        for (vertex, color) in self.vertices.iter_mut().zip(colors) {
            vertex.color = color.to_array();
        }
        self
    }

    fn push(&mut self, position: Vec3, tex_coords: [f32; 2], normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices
            .push(ModelVertex::new(position.to_array(), tex_coords, normal.to_array()));
        index
    }

    /// Appends a rectangle spanned by `u` and `v` around `center`; its normal is `u × v`.
    fn push_face(&mut self, center: Vec3, u: Vec3, v: Vec3) {
        let normal = u.cross(v).normalize();
        let base = self.push(center - u - v, [0.0, 1.0], normal);
        self.push(center + u - v, [1.0, 1.0], normal);
        self.push(center + u + v, [1.0, 0.0], normal);
        self.push(center - u + v, [0.0, 0.0], normal);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let mut mesh = Self::default();
        mesh.push(a, [0.0, 1.0], normal);
        mesh.push(b, [1.0, 1.0], normal);
        mesh.push(c, [0.5, 0.0], normal);
        mesh.indices.extend_from_slice(&[0, 1, 2]);
        mesh
    }

    pub fn cube(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        let mut mesh = Self::default();
        // (normal, u, v) per face with u × v == normal.
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (normal, u, v) in faces {
            mesh.push_face(normal * half, u * half, v * half);
        }
        mesh
    }

    /// A plane on XZ facing +Y.
    pub fn plane(width: f32, depth: f32) -> Self {
        let mut mesh = Self::default();
        mesh.push_face(
            Vec3::ZERO,
            Vec3::new(width * 0.5, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -depth * 0.5),
        );
        mesh
    }

    /// A quad on XY facing +Z.
    pub fn quad(width: f32, height: f32) -> Self {
        let mut mesh = Self::default();
        mesh.push_face(
            Vec3::ZERO,
            Vec3::new(width * 0.5, 0.0, 0.0),
            Vec3::new(0.0, height * 0.5, 0.0),
        );
        mesh
    }

    /// UV sphere with `segments` slices around Y and `segments` stacks from pole to pole.
    pub fn sphere(radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Self::default();

        for ring in 0..=segments {
            let phi = PI * ring as f32 / segments as f32;
            let (ring_radius, y) = phi.sin_cos();
            for seg in 0..=segments {
                let theta = TAU * seg as f32 / segments as f32;
                let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
                let uv = [seg as f32 / segments as f32, ring as f32 / segments as f32];
                mesh.push(normal * radius, uv, normal.normalize_or_zero());
            }
        }

        let stride = segments + 1;
        for ring in 0..segments {
            for seg in 0..segments {
                let current = ring * stride + seg;
                let below = current + stride;
                // Skip the zero-area triangles that touch the poles.
                if ring != 0 {
                    mesh.indices.extend_from_slice(&[current, current + 1, below]);
                }
                if ring != segments - 1 {
                    mesh.indices.extend_from_slice(&[current + 1, below + 1, below]);
                }
            }
        }
        mesh
    }

    /// Open tube of `height` along Y, closed by two caps.
    pub fn cylinder(height: f32, radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height * 0.5;
        let mut mesh = Self::default();

        // Side: pairs of (bottom, top) vertices per slice.
        for seg in 0..=segments {
            let t = seg as f32 / segments as f32;
            let (sin, cos) = (TAU * t).sin_cos();
            let normal = Vec3::new(cos, 0.0, sin);
            mesh.push(Vec3::new(cos * radius, -half, sin * radius), [t, 1.0], normal);
            mesh.push(Vec3::new(cos * radius, half, sin * radius), [t, 0.0], normal);
        }
        for seg in 0..segments {
            let bottom = seg * 2;
            let top = bottom + 1;
            let next_bottom = bottom + 2;
            let next_top = bottom + 3;
            mesh.indices
                .extend_from_slice(&[bottom, top, next_bottom, top, next_top, next_bottom]);
        }

        for (y, normal) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
            let center = mesh.push(Vec3::new(0.0, y, 0.0), [0.5, 0.5], normal);
            let first = center + 1;
            for seg in 0..=segments {
                let (sin, cos) = (TAU * seg as f32 / segments as f32).sin_cos();
                mesh.push(
                    Vec3::new(cos * radius, y, sin * radius),
                    [0.5 + cos * 0.5, 0.5 + sin * 0.5],
                    normal,
                );
            }
            for seg in 0..segments {
                let (a, b) = (first + seg, first + seg + 1);
                if normal.y > 0.0 {
                    mesh.indices.extend_from_slice(&[center, b, a]);
                } else {
                    mesh.indices.extend_from_slice(&[center, a, b]);
                }
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Every triangle's winding must agree with the stored normals and point away from the centre.
    fn assert_outward(mesh: &MeshData) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let (pa, pb, pc) = (Vec3::from(a.position), Vec3::from(b.position), Vec3::from(c.position));
            let face = (pb - pa).cross(pc - pa);
            assert!(face.length() > 0.0, "degenerate triangle {:?}", tri);
            let centroid = (pa + pb + pc) / 3.0;
            assert!(face.dot(Vec3::from(a.normal)) > 0.0, "winding disagrees with normal in {:?}", tri);
            assert!(face.dot(centroid) > 0.0, "triangle {:?} faces inward", tri);
        }
    }

    fn assert_valid(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        for &i in &mesh.indices {
            assert!((i as usize) < mesh.vertices.len());
        }
        for v in &mesh.vertices {
            assert_relative_eq!(Vec3::from(v.normal).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cube() {
        let cube = MeshData::cube(1.0, 2.0, 3.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_valid(&cube);
        assert_outward(&cube);

        let max = cube
            .vertices
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, v| acc.max(Vec3::from(v.position)));
        assert_eq!(max, Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_sphere() {
        let sphere = MeshData::sphere(0.5, 16);
        assert_valid(&sphere);
        assert_outward(&sphere);
        for v in &sphere.vertices {
            assert_relative_eq!(Vec3::from(v.position).length(), 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cylinder() {
        let cylinder = MeshData::cylinder(1.0, 0.5, 12);
        assert_valid(&cylinder);
        assert_outward(&cylinder);
        for v in &cylinder.vertices {
            assert!(v.position[1].abs() <= 0.5 + f32::EPSILON);
        }
    }

    #[test]
    fn test_plane_and_quad_face_their_axes() {
        let plane = MeshData::plane(2.0, 4.0);
        assert_valid(&plane);
        for [a, b, c] in plane.triangles() {
            assert!((b - a).cross(c - a).y > 0.0);
        }
        assert!(plane.vertices.iter().all(|v| v.position[1] == 0.0 && v.normal == [0.0, 1.0, 0.0]));

        let quad = MeshData::quad(2.0, 2.0);
        assert_valid(&quad);
        for [a, b, c] in quad.triangles() {
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }

    #[test]
    fn test_triangle_normal() {
        let tri = MeshData::triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(tri.indices, vec![0, 1, 2]);
        assert_eq!(tri.vertices[0].normal, [0.0, 0.0, 1.0]);
    }
}
