pub mod description;
mod error;
pub mod loader;
pub mod material;

pub use description::{
    AnimationRecord, AssetDescription, ChannelRecord, ImageRecord, IndexAccessor, Interpolation,
    MeshRecord, NodeRecord, PrimitiveRecord, SamplerRecord, TextureRecord,
};
pub use error::{AssetError, Result};
pub use loader::load_gltf;
pub use material::{AlphaMode, Material};
