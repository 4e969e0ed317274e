use std::mem;

use lumen_scene::{Scene, Vertex};
use wgpu::util::DeviceExt;

use crate::RenderContext;

/// Layout of [`Vertex`] as bound at slot 0.
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    const F32X3: wgpu::BufferAddress = mem::size_of::<[f32; 3]>() as wgpu::BufferAddress;
    const F32X2: wgpu::BufferAddress = mem::size_of::<[f32; 2]>() as wgpu::BufferAddress;
    const F32X4: wgpu::BufferAddress = mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;

    wgpu::VertexBufferLayout {
        array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0, // @location(0) in shader
                format: wgpu::VertexFormat::Float32x3, // position
            },
            wgpu::VertexAttribute {
                offset: F32X3,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3, // normal
            },
            wgpu::VertexAttribute {
                offset: F32X3 * 2,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2, // uv
            },
            wgpu::VertexAttribute {
                offset: F32X3 * 2 + F32X2,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x4, // color
            },
            wgpu::VertexAttribute {
                offset: F32X3 * 2 + F32X2 + F32X4,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32x4, // tangent
            },
        ],
    }
}

/// The scene's shared vertex and index buffers, uploaded once at load.
pub struct GeometryBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GeometryBuffers {
    pub fn upload(context: &RenderContext, scene: &Scene) -> Self {
        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Vertex Buffer"),
                contents: bytemuck::cast_slice(&scene.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Index Buffer"),
                contents: bytemuck::cast_slice(&scene.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::info!(
            "Uploaded {} vertices ({} bytes) and {} indices",
            scene.vertices.len(),
            mem::size_of_val(scene.vertices.as_slice()),
            scene.indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: scene.vertices.len() as u32,
            index_count: scene.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_covers_the_whole_vertex() {
        let layout = vertex_buffer_layout();
        let last = layout.attributes.last().unwrap();
        assert_eq!(last.offset + last.format.size(), layout.array_stride);
        assert_eq!(layout.array_stride, 64);
    }
}
