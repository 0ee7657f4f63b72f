/// GPU-side vertex and uniform layouts
use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fpsdbg_core::{Mesh, Transform};
use nalgebra::Matrix4;

/// Maps OpenGL clip depth [-1, 1] onto wgpu's [0, 1].
#[rustfmt::skip]
pub fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl GpuVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Bit pattern used to merge equal vertices. Adding `0.0` folds `-0.0`
    /// into `+0.0`; cross products of coplanar triangles disagree on the sign.
    fn key(&self) -> [u32; 6] {
        let [px, py, pz] = self.position;
        let [nx, ny, nz] = self.normal;
        [px, py, pz, nx, ny, nz].map(|c| (c + 0.0).to_bits())
    }
}

/// Vertex and index data ready for upload.
#[derive(Debug, Default)]
pub struct PackedMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices: Vec<u32>,
}

/// Interleave a mesh and merge vertices that share position and normal.
///
/// Flat shading only merges corners of coplanar neighbours, so a cuboid's
/// 36 soup vertices become 24 unique ones.
pub fn pack(mesh: &Mesh) -> PackedMesh {
    let mut packed = PackedMesh {
        vertices: Vec::new(),
        indices: Vec::with_capacity(mesh.vertex_count()),
    };
    let mut seen: HashMap<[u32; 6], u32> = HashMap::new();

    for (position, normal) in mesh.positions().iter().zip(mesh.normals()) {
        let vertex = GpuVertex {
            position: [position.x, position.y, position.z],
            normal: [normal.x, normal.y, normal.z],
        };
        let index = *seen.entry(vertex.key()).or_insert_with(|| {
            packed.vertices.push(vertex);
            (packed.vertices.len() - 1) as u32
        });
        packed.indices.push(index);
    }

    packed
}

/// Per-object uniform block; matches `Uniforms` in flat.vert.wgsl.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub modelview: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl Uniforms {
    pub fn new(modelview: &Matrix4<f32>, projection: &Matrix4<f32>) -> Self {
        let normal = Transform::normal_matrix(modelview).to_homogeneous();
        Self {
            modelview: (*modelview).into(),
            projection: (opengl_to_wgpu() * projection).into(),
            normal_matrix: normal.into(),
        }
    }
}
