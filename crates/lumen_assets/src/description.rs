//! In-memory asset description handed to the scene builder.
//!
//! These records are the contract between whatever parses a file on disk and
//! the rest of the engine. They are plain data: buffers are already decoded
//! into typed arrays, except index data, which keeps its declared component
//! width so the builder can validate and widen it.

use lumen_core::TransformField;

use crate::material::Material;

pub const COMPONENT_UNSIGNED_BYTE: u32 = 5121;
pub const COMPONENT_UNSIGNED_SHORT: u32 = 5123;
pub const COMPONENT_UNSIGNED_INT: u32 = 5125;

#[derive(Clone, Debug, Default)]
pub struct AssetDescription {
    pub nodes: Vec<NodeRecord>,
    /// Nodes the forest is built from, in draw order.
    pub roots: Vec<usize>,
    pub meshes: Vec<MeshRecord>,
    pub materials: Vec<Material>,
    pub textures: Vec<TextureRecord>,
    /// Decoded images; `None` when the source format could not be expanded to RGBA8.
    pub images: Vec<Option<ImageRecord>>,
    pub animations: Vec<AnimationRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct NodeRecord {
    pub index: usize,
    pub name: Option<String>,
    /// Column-major 4x4, same element order as glTF.
    pub matrix: Option<[f32; 16]>,
    pub translation: Option<[f32; 3]>,
    /// Quaternion as (x, y, z, w).
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
}

impl NodeRecord {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn has_trs(&self) -> bool {
        self.translation.is_some() || self.rotation.is_some() || self.scale.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshRecord {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct PrimitiveRecord {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub tangents: Option<Vec<[f32; 4]>>,
    pub indices: IndexAccessor,
    pub material: Option<usize>,
}

/// Raw index data with its declared component type (GL enum).
#[derive(Clone, Debug, Default)]
pub struct IndexAccessor {
    pub component_type: u32,
    pub count: usize,
    /// Tightly packed little-endian elements.
    pub data: Vec<u8>,
}

impl IndexAccessor {
    pub fn from_u8(indices: &[u8]) -> Self {
        Self {
            component_type: COMPONENT_UNSIGNED_BYTE,
            count: indices.len(),
            data: indices.to_vec(),
        }
    }

    pub fn from_u16(indices: &[u16]) -> Self {
        Self {
            component_type: COMPONENT_UNSIGNED_SHORT,
            count: indices.len(),
            data: indices.iter().flat_map(|i| i.to_le_bytes()).collect(),
        }
    }

    pub fn from_u32(indices: &[u32]) -> Self {
        Self {
            component_type: COMPONENT_UNSIGNED_INT,
            count: indices.len(),
            data: indices.iter().flat_map(|i| i.to_le_bytes()).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureRecord {
    pub image: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, no padding.
    pub pixels: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct AnimationRecord {
    pub name: Option<String>,
    pub channels: Vec<ChannelRecord>,
}

#[derive(Clone, Debug)]
pub struct ChannelRecord {
    pub target_node: usize,
    pub property: TransformField,
    pub sampler: SamplerRecord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

#[derive(Clone, Debug, Default)]
pub struct SamplerRecord {
    pub times: Vec<f32>,
    /// Flattened output values, `components` floats per keyframe.
    pub values: Vec<f32>,
    pub components: usize,
    pub interpolation: Interpolation,
    pub min_time: Option<f32>,
    pub max_time: Option<f32>,
}

impl SamplerRecord {
    pub fn vec3(times: Vec<f32>, values: &[[f32; 3]]) -> Self {
        Self {
            times,
            values: values.iter().flatten().copied().collect(),
            components: 3,
            ..Default::default()
        }
    }

    pub fn quat(times: Vec<f32>, values: &[[f32; 4]]) -> Self {
        Self {
            times,
            values: values.iter().flatten().copied().collect(),
            components: 4,
            ..Default::default()
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn value_count(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.values.len() / self.components
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_indices_are_little_endian() {
        let accessor = IndexAccessor::from_u16(&[1, 0x0203]);
        assert_eq!(accessor.component_type, COMPONENT_UNSIGNED_SHORT);
        assert_eq!(accessor.count, 2);
        assert_eq!(accessor.data, vec![1, 0, 3, 2]);
    }

    #[test]
    fn value_count_follows_components() {
        let sampler = SamplerRecord::quat(vec![0.0, 1.0], &[[0.0, 0.0, 0.0, 1.0]; 2]);
        assert_eq!(sampler.value_count(), 2);
        assert_eq!(SamplerRecord::default().value_count(), 0);
    }
}
