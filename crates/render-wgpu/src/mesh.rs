use crate::context::GpuContext;
use bytemuck::{Pod, Zeroable};
use facet_geometry::MeshData;
use wgpu::util::DeviceExt;

/// Interleaved vertex as the shader library's `VertexInput` expects it.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a mesh's separate attribute arrays; missing colors become
/// opaque white.
pub fn interleave(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .enumerate()
        .map(|(i, (p, n))| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            color: mesh
                .colors
                .as_ref()
                .and_then(|c| c.get(i).copied())
                .unwrap_or([1.0; 4]),
        })
        .collect()
}

/// A mesh's vertex and index buffers on the GPU.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub fn new(ctx: &GpuContext, mesh: &MeshData) -> Self {
        let vertices = interleave(mesh);
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Free the GPU buffers now rather than when the last reference drops.
    pub fn release(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_geometry::square;
    use glam::Vec3;

    #[test]
    fn vertex_stride_matches_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
        assert_eq!(Vertex::layout().array_stride, 40);
        assert_eq!(Vertex::layout().attributes[2].offset, 24);
    }

    #[test]
    fn interleave_defaults_to_white() {
        let v = interleave(&square(Vec3::ZERO));
        assert_eq!(v.len(), 4);
        assert_eq!(v[0].position, [-1.0, -1.0, 0.0]);
        assert_eq!(v[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(v[0].color, [1.0; 4]);
    }

    #[test]
    fn interleave_keeps_vertex_colors() {
        let mesh = MeshData {
            colors: Some(vec![[1.0, 0.0, 0.0, 1.0]; 4]),
            ..square(Vec3::ZERO)
        };
        let v = interleave(&mesh);
        assert!(v.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }
}
