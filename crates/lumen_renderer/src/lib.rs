mod context;
pub mod draw;
mod error;
pub mod geometry;
pub mod material;
pub mod sync;
pub mod texture;

pub use context::RenderContext;
pub use draw::{DrawCommand, DrawList};
pub use error::{RenderError, Result};
pub use geometry::{GeometryBuffers, vertex_buffer_layout};
pub use material::{
    FallbackTexture, GpuMaterialUniform, MaterialBinding, TextureSlot, resolve_material,
    resolve_materials,
};
pub use sync::{BackendRegion, GpuSyncBuffer, HostRegion, MATRIX_STRIDE, WgpuRegion};
pub use texture::{GpuTexture, SceneTextures};
