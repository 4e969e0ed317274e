use std::sync::Arc;

use glam::Mat4;
use lumen_scene::NodeMatrices;

use crate::{RenderContext, RenderError, Result};

/// Bytes per node in each matrix region: one tightly packed 4x4 f32 matrix,
/// 16 little-endian floats in column-major order (glTF and WGSL `mat4x4<f32>`
/// layout). Node `i` starts at byte `i * MATRIX_STRIDE`.
pub const MATRIX_STRIDE: u64 = std::mem::size_of::<Mat4>() as u64;

/// Memory the rendering backend reads matrices from. Regions hold one
/// column-major matrix per node, indexed by node index.
pub trait BackendRegion {
    fn capacity(&self) -> u64;

    /// Replaces the region's contents starting at offset 0.
    fn write(&mut self, bytes: &[u8]);
}

/// Region in host memory. Used by tests and when no adapter is available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostRegion {
    bytes: Vec<u8>,
    writes: usize,
}

impl HostRegion {
    pub fn new(capacity: u64) -> Self {
        Self {
            bytes: vec![0; capacity as usize],
            writes: 0,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of writes so far, i.e. frames synced.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn read_matrix(&self, index: usize) -> Option<Mat4> {
        let start = index * MATRIX_STRIDE as usize;
        let bytes = self.bytes.get(start..start + MATRIX_STRIDE as usize)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }
}

impl BackendRegion for HostRegion {
    fn capacity(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn write(&mut self, bytes: &[u8]) {
        self.bytes[..bytes.len()].copy_from_slice(bytes);
        self.writes += 1;
    }
}

/// A `STORAGE | COPY_DST` buffer written through the queue.
pub struct WgpuRegion {
    pub buffer: wgpu::Buffer,
    queue: Arc<wgpu::Queue>,
}

impl WgpuRegion {
    pub fn new(context: &RenderContext, label: &str, capacity: u64) -> Self {
        // Storage bindings cannot be empty.
        let size = capacity.max(MATRIX_STRIDE);
        let buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            // Rewritten every frame through the queue.
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            queue: context.queue.clone(),
        }
    }
}

impl BackendRegion for WgpuRegion {
    fn capacity(&self) -> u64 {
        self.buffer.size()
    }

    fn write(&mut self, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

/// Per-node world and normal matrices plus the backend regions they are
/// mirrored into.
///
/// [`sync`](Self::sync) copies both arrays in full. It must run on the
/// thread that later submits draws reading the regions.
pub struct GpuSyncBuffer<R: BackendRegion> {
    matrices: NodeMatrices,
    world: R,
    normal: R,
}

impl<R: BackendRegion> GpuSyncBuffer<R> {
    pub fn new(matrices: NodeMatrices, world: R, normal: R) -> Result<Self> {
        let required = required_bytes(matrices.len());
        for (region, capacity) in [("World", world.capacity()), ("Normal", normal.capacity())] {
            if capacity < required {
                return Err(RenderError::RegionTooSmall {
                    region,
                    capacity,
                    required,
                });
            }
        }

        Ok(Self {
            matrices,
            world,
            normal,
        })
    }

    pub fn node_count(&self) -> usize {
        self.matrices.len()
    }

    pub fn matrices(&self) -> &NodeMatrices {
        &self.matrices
    }

    pub fn matrices_mut(&mut self) -> &mut NodeMatrices {
        &mut self.matrices
    }

    pub fn world_region(&self) -> &R {
        &self.world
    }

    pub fn normal_region(&self) -> &R {
        &self.normal
    }

    /// Copies both arrays into their regions. Returns the bytes written.
    pub fn sync(&mut self) -> Result<usize> {
        let world: &[u8] = bytemuck::cast_slice(self.matrices.world());
        let normal: &[u8] = bytemuck::cast_slice(self.matrices.normal());

        // The matrix arrays follow the node store; a different store may have resized them.
        let required = world.len() as u64;
        let capacity = self.world.capacity().min(self.normal.capacity());
        if capacity < required {
            return Err(RenderError::RegionTooSmall {
                region: "Matrix",
                capacity,
                required,
            });
        }

        self.world.write(world);
        self.normal.write(normal);

        log::trace!("Synced {} node matrices", self.matrices.len());
        Ok(world.len() + normal.len())
    }
}

impl GpuSyncBuffer<HostRegion> {
    pub fn host(node_count: usize) -> Self {
        let capacity = required_bytes(node_count);
        Self {
            matrices: NodeMatrices::new(node_count),
            world: HostRegion::new(capacity),
            normal: HostRegion::new(capacity),
        }
    }
}

impl GpuSyncBuffer<WgpuRegion> {
    pub fn gpu(context: &RenderContext, node_count: usize) -> Self {
        let capacity = required_bytes(node_count);
        log::debug!("Allocating 2 x {capacity} bytes of matrix storage for {node_count} nodes");

        Self {
            matrices: NodeMatrices::new(node_count),
            world: WgpuRegion::new(context, "World Matrix Buffer", capacity),
            normal: WgpuRegion::new(context, "Normal Matrix Buffer", capacity),
        }
    }
}

pub fn required_bytes(node_count: usize) -> u64 {
    node_count as u64 * MATRIX_STRIDE
}
