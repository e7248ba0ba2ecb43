//! Procedural meshes.
//!
//! Every scene is built from a few primitives merged with [`MeshData::append`];
//! nothing is loaded from disk.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // uv
    ];

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU-side indexed triangle list (counter-clockwise front faces).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Axis-aligned unit cube centered at the origin (side 1).
    pub fn cube() -> Self {
        let mut mesh = Self::default();
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (normal, right, up) in faces {
            let base = mesh.vertices.len() as u32;
            let center = normal * 0.5;
            for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                let p = center + right * (u - 0.5) + up * (v - 0.5);
                mesh.vertices.push(Vertex::new(p, normal, Vec2::new(u, 1.0 - v)));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Square grid in the XZ plane, facing +Y, `size` units across.
    pub fn plane(size: f32, subdivisions: u32) -> Self {
        let n = subdivisions.max(1);
        let mut mesh = Self::default();
        for row in 0..=n {
            for col in 0..=n {
                let u = col as f32 / n as f32;
                let v = row as f32 / n as f32;
                let p = Vec3::new((u - 0.5) * size, 0.0, (v - 0.5) * size);
                mesh.vertices.push(Vertex::new(p, Vec3::Y, Vec2::new(u, v)));
            }
        }
        let stride = n + 1;
        for row in 0..n {
            for col in 0..n {
                let i = row * stride + col;
                mesh.indices
                    .extend_from_slice(&[i, i + stride, i + 1, i + 1, i + stride, i + stride + 1]);
            }
        }
        mesh
    }

    /// Unit-radius sphere.
    pub fn uv_sphere(segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut mesh = Self::default();
        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let theta = v * PI;
            for seg in 0..=segments {
                let u = seg as f32 / segments as f32;
                let phi = u * TAU;
                let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                mesh.vertices.push(Vertex::new(n, n, Vec2::new(u, v)));
            }
        }
        let stride = segments + 1;
        for ring in 0..rings {
            for seg in 0..segments {
                let i = ring * stride + seg;
                mesh.indices
                    .extend_from_slice(&[i, i + 1, i + stride, i + 1, i + stride + 1, i + stride]);
            }
        }
        mesh
    }

    /// Open cylinder (radius 1, y in 0..1) with a top cap.
    pub fn cylinder(segments: u32) -> Self {
        Self::frustum(segments, 1.0, 1.0)
    }

    /// Cone (base radius 1 at y = 0, apex at y = 1).
    pub fn cone(segments: u32) -> Self {
        Self::frustum(segments, 1.0, 0.0)
    }

    fn frustum(segments: u32, bottom: f32, top: f32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Self::default();
        let slope = bottom - top;
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let (s, c) = (u * TAU).sin_cos();
            let normal = Vec3::new(c, slope, s).normalize();
            mesh.vertices
                .push(Vertex::new(Vec3::new(c * bottom, 0.0, s * bottom), normal, Vec2::new(u, 1.0)));
            mesh.vertices
                .push(Vertex::new(Vec3::new(c * top, 1.0, s * top), normal, Vec2::new(u, 0.0)));
        }
        for seg in 0..segments {
            let i = seg * 2;
            mesh.indices
                .extend_from_slice(&[i, i + 1, i + 2, i + 2, i + 1, i + 3]);
        }
        if top > 0.0 {
            let center = mesh.vertices.len() as u32;
            mesh.vertices
                .push(Vertex::new(Vec3::Y, Vec3::Y, Vec2::splat(0.5)));
            for seg in 0..=segments {
                let u = seg as f32 / segments as f32;
                let (s, c) = (u * TAU).sin_cos();
                mesh.vertices.push(Vertex::new(
                    Vec3::new(c * top, 1.0, s * top),
                    Vec3::Y,
                    Vec2::new(0.5 + 0.5 * c, 0.5 + 0.5 * s),
                ));
            }
            for seg in 0..segments {
                let a = center + 1 + seg;
                mesh.indices.extend_from_slice(&[center, a + 1, a]);
            }
        }
        mesh
    }

    /// Appends `other` transformed by `transform` (normals by its inverse transpose).
    pub fn append(&mut self, other: &MeshData, transform: Mat4) {
        let base = self.vertices.len() as u32;
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
        self.vertices.extend(other.vertices.iter().map(|v| {
            let p = transform.transform_point3(Vec3::from_array(v.position));
            let n = (normal_matrix * Vec3::from_array(v.normal)).normalize_or_zero();
            Vertex::new(p, n, Vec2::from_array(v.uv))
        }));
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Builder form of [`append`](Self::append).
    pub fn with(mut self, other: &MeshData, transform: Mat4) -> Self {
        self.append(other, transform);
        self
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// GPU-resident mesh. Shared between scene objects through `Rc`.
pub struct Mesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vbo")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} ibo")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: data.index_count(),
        }
    }

    /// Binds vertex slot 0 + the index buffer and draws `instances`.
    pub fn draw_instanced(&self, pass: &mut wgpu::RenderPass<'_>, instances: std::ops::Range<u32>) {
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, instances);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.draw_instanced(pass, 0..1);
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_in_range(mesh: &MeshData) -> bool {
        mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len())
    }

    // ── primitives ────────────────────────────────────────────────────────

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(size_of::<Vertex>(), 32);
    }

    #[test]
    fn cube_has_24_vertices_and_12_triangles() {
        let c = MeshData::cube();
        assert_eq!(c.vertices.len(), 24);
        assert_eq!(c.indices.len(), 36);
        assert!(indices_in_range(&c));
        assert!(c
            .vertices
            .iter()
            .all(|v| v.position.iter().all(|p| p.abs() <= 0.5 + 1e-6)));
    }

    #[test]
    fn cube_faces_wind_outward() {
        let c = MeshData::cube();
        for tri in c.indices.chunks(3) {
            let [a, b, d] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(c.vertices[i as usize].position));
            let n = Vec3::from_array(c.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(d - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn plane_grid_counts() {
        let p = MeshData::plane(10.0, 4);
        assert_eq!(p.vertices.len(), 25);
        assert_eq!(p.indices.len(), 4 * 4 * 6);
        assert!(indices_in_range(&p));
    }

    #[test]
    fn plane_triangles_face_up() {
        let p = MeshData::plane(2.0, 2);
        for tri in p.indices.chunks(3) {
            let [a, b, d] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(p.vertices[i as usize].position));
            assert!((b - a).cross(d - a).y > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_are_on_unit_radius() {
        let s = MeshData::uv_sphere(16, 8);
        assert!(indices_in_range(&s));
        for v in &s.vertices {
            assert!((Vec3::from_array(v.position).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn cone_apex_is_at_top() {
        let c = MeshData::cone(12);
        assert!(indices_in_range(&c));
        let max_y = c.vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 1.0);
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn append_offsets_indices_and_transforms_positions() {
        let cube = MeshData::cube();
        let merged = MeshData::default()
            .with(&cube, Mat4::IDENTITY)
            .with(&cube, Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

        assert_eq!(merged.vertices.len(), 48);
        assert_eq!(merged.indices[36], 24);
        assert!(indices_in_range(&merged));
        assert!(merged.vertices[24..].iter().all(|v| v.position[0] > 9.0));
    }

    #[test]
    fn append_keeps_normals_unit_under_scale() {
        let mut m = MeshData::default();
        m.append(&MeshData::cube(), Mat4::from_scale(Vec3::new(4.0, 1.0, 0.5)));
        for v in &m.vertices {
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }
}
