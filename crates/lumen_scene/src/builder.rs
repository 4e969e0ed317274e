use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use lumen_assets::{
    AssetDescription, ImageRecord, IndexAccessor, Material, NodeRecord, PrimitiveRecord,
    TextureRecord,
    description::{COMPONENT_UNSIGNED_BYTE, COMPONENT_UNSIGNED_INT, COMPONENT_UNSIGNED_SHORT},
};
use lumen_core::{LocalTransform, Transform};

use crate::{
    Result, SceneError,
    node::{Mesh, Node, NodeStore, Primitive},
};

// #[repr(C)] keeps the field order the vertex layout describes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub tangent: [f32; 4],
}

/// Everything the renderer needs from an imported asset. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: NodeStore,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub materials: Vec<Material>,
    pub textures: Vec<TextureRecord>,
    pub images: Vec<Option<ImageRecord>>,
}

impl Scene {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Builds a [`Scene`] from an [`AssetDescription`].
pub fn build_scene(description: &AssetDescription) -> Result<Scene> {
    SceneBuilder::new(description)?.build()
}

pub struct SceneBuilder<'a> {
    description: &'a AssetDescription,
    /// Node index -> position of its record in `description.nodes`.
    records: Vec<usize>,
    slots: Vec<Option<Node>>,
    visited: Vec<bool>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(description: &'a AssetDescription) -> Result<Self> {
        let count = description.nodes.len();
        let mut records = vec![usize::MAX; count];

        for (position, record) in description.nodes.iter().enumerate() {
            let slot = records
                .get_mut(record.index)
                .ok_or(SceneError::NodeIndexOutOfRange {
                    position,
                    index: record.index,
                    count,
                })?;
            if *slot != usize::MAX {
                return Err(SceneError::DuplicateNodeIndex {
                    index: record.index,
                });
            }
            *slot = position;
        }

        Ok(Self {
            description,
            records,
            slots: vec![None; count],
            visited: vec![false; count],
            vertices: Vec::new(),
            indices: Vec::new(),
        })
    }

    pub fn build(mut self) -> Result<Scene> {
        for &root in &self.description.roots {
            if root >= self.records.len() {
                return Err(SceneError::UnknownRoot { index: root });
            }
            self.load_node(root, None)?;
        }

        let mut nodes = Vec::with_capacity(self.slots.len());
        for (index, slot) in self.slots.into_iter().enumerate() {
            nodes.push(slot.ok_or(SceneError::UnreachableNode { index })?);
        }

        log::info!(
            "Built scene: {} nodes ({} roots), {} vertices, {} indices, {} materials",
            nodes.len(),
            self.description.roots.len(),
            self.vertices.len(),
            self.indices.len(),
            self.description.materials.len(),
        );

        Ok(Scene {
            nodes: NodeStore::from_parts(nodes, self.description.roots.clone()),
            vertices: self.vertices,
            indices: self.indices,
            materials: self.description.materials.clone(),
            textures: self.description.textures.clone(),
            images: self.description.images.clone(),
        })
    }

    fn load_node(&mut self, index: usize, parent: Option<usize>) -> Result<()> {
        if std::mem::replace(&mut self.visited[index], true) {
            return Err(SceneError::NodeVisitedTwice { index });
        }

        let description = self.description;
        let record = &description.nodes[self.records[index]];

        // Children are built before this node is finished.
        for &child in &record.children {
            if child >= self.records.len() {
                return Err(SceneError::DanglingChild {
                    parent: index,
                    child,
                });
            }
            self.load_node(child, Some(index))?;
        }

        let mesh = match record.mesh {
            Some(mesh_index) => Some(self.load_mesh(index, mesh_index)?),
            None => None,
        };

        log::debug!(
            "Node {index} ({}): {} children, {} primitives",
            record.name.as_deref().unwrap_or("unnamed"),
            record.children.len(),
            mesh.as_ref().map_or(0, |m| m.primitives.len()),
        );

        self.slots[index] = Some(Node {
            index,
            name: record.name.clone(),
            parent,
            children: record.children.clone(),
            local: local_transform(record),
            mesh,
        });
        Ok(())
    }

    fn load_mesh(&mut self, node: usize, mesh_index: usize) -> Result<Mesh> {
        let description = self.description;
        let mesh = description
            .meshes
            .get(mesh_index)
            .ok_or(SceneError::DanglingMesh {
                node,
                mesh: mesh_index,
            })?;

        let mut primitives = Vec::with_capacity(mesh.primitives.len());
        for (primitive_index, record) in mesh.primitives.iter().enumerate() {
            let location = Location {
                node,
                mesh: mesh_index,
                primitive: primitive_index,
            };
            primitives.push(self.load_primitive(location, record)?);
        }
        Ok(Mesh { primitives })
    }

    fn load_primitive(&mut self, at: Location, record: &PrimitiveRecord) -> Result<Primitive> {
        let vertex_count = record.positions.len();
        if vertex_count == 0 {
            return Err(SceneError::MissingPositions {
                node: at.node,
                mesh: at.mesh,
                primitive: at.primitive,
            });
        }
        at.check_count("NORMAL", vertex_count, record.normals.as_ref().map(Vec::len))?;
        at.check_count("TEXCOORD_0", vertex_count, record.tex_coords.as_ref().map(Vec::len))?;
        at.check_count("TANGENT", vertex_count, record.tangents.as_ref().map(Vec::len))?;

        // Decode before touching the shared buffers so a bad primitive leaves them untouched.
        let raw_indices = decode_indices(at, &record.indices, vertex_count)?;

        let vertex_start = self.vertices.len() as u32;
        let first_index = self.indices.len() as u32;

        for v in 0..vertex_count {
            let normal = record
                .normals
                .as_ref()
                .map_or(Vec3::ZERO, |n| Vec3::from(n[v]).normalize_or_zero());

            self.vertices.push(Vertex {
                position: record.positions[v],
                normal: normal.to_array(),
                uv: record.tex_coords.as_ref().map_or([0.0; 2], |t| t[v]),
                color: [1.0; 4],
                tangent: record.tangents.as_ref().map_or([0.0; 4], |t| t[v]),
            });
        }

        // Shift into the global vertex space shared by every primitive.
        self.indices
            .extend(raw_indices.iter().map(|&index| index + vertex_start));

        Ok(Primitive {
            first_index,
            index_count: raw_indices.len() as u32,
            material: record.material,
            vertex_start,
            vertex_count: vertex_count as u32,
        })
    }
}

#[derive(Clone, Copy)]
struct Location {
    node: usize,
    mesh: usize,
    primitive: usize,
}

impl Location {
    fn check_count(self, attribute: &'static str, expected: usize, found: Option<usize>) -> Result<()> {
        match found {
            Some(found) if found != expected => Err(SceneError::AttributeCountMismatch {
                node: self.node,
                mesh: self.mesh,
                primitive: self.primitive,
                attribute,
                expected,
                found,
            }),
            _ => Ok(()),
        }
    }
}

/// Widens 8/16/32-bit indices to u32 and checks them against the
/// primitive's own vertex count.
fn decode_indices(at: Location, accessor: &IndexAccessor, vertex_count: usize) -> Result<Vec<u32>> {
    let width = match accessor.component_type {
        COMPONENT_UNSIGNED_BYTE => 1,
        COMPONENT_UNSIGNED_SHORT => 2,
        COMPONENT_UNSIGNED_INT => 4,
        component_type => {
            return Err(SceneError::UnsupportedIndexComponent {
                node: at.node,
                mesh: at.mesh,
                primitive: at.primitive,
                component_type,
            });
        }
    };

    let expected = accessor.count * width;
    if accessor.data.len() < expected {
        return Err(SceneError::TruncatedIndices {
            node: at.node,
            mesh: at.mesh,
            primitive: at.primitive,
            expected,
            found: accessor.data.len(),
        });
    }

    let indices: Vec<u32> = accessor.data[..expected]
        .chunks_exact(width)
        .map(|bytes| match *bytes {
            [b] => u32::from(b),
            [b0, b1] => u32::from(u16::from_le_bytes([b0, b1])),
            [b0, b1, b2, b3] => u32::from_le_bytes([b0, b1, b2, b3]),
            _ => unreachable!("chunks_exact yields {width}-byte chunks"),
        })
        .collect();

    if let Some(&value) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(SceneError::IndexOutOfRange {
            node: at.node,
            mesh: at.mesh,
            primitive: at.primitive,
            value,
            vertex_count,
        });
    }

    Ok(indices)
}

/// TRS when any TRS field is present, otherwise the baked matrix, otherwise identity.
fn local_transform(record: &NodeRecord) -> LocalTransform {
    if record.has_trs() {
        if record.matrix.is_some() {
            log::warn!("Node {} has both TRS and a matrix, using TRS", record.index);
        }
        let mut trs = Transform::default();
        if let Some(t) = record.translation {
            trs.translation = Vec3::from(t);
        }
        if let Some(r) = record.rotation {
            trs.rotation = Quat::from_array(r);
        }
        if let Some(s) = record.scale {
            trs.scale = Vec3::from(s);
        }
        LocalTransform::Trs(trs)
    } else if let Some(matrix) = record.matrix {
        LocalTransform::Matrix(Mat4::from_cols_array(&matrix))
    } else {
        LocalTransform::Trs(Transform::default())
    }
}
