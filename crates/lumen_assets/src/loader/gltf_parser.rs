use std::path::Path;

use glam::Mat4;
use gltf::animation::util::ReadOutputs;
use gltf::image::Format;
use gltf::mesh::util::ReadIndices;
use lumen_core::TransformField;

use crate::{
    AnimationRecord, AssetDescription, AssetError, ChannelRecord, ImageRecord, IndexAccessor,
    Interpolation, MeshRecord, NodeRecord, PrimitiveRecord, Result, SamplerRecord, TextureRecord,
    material::{AlphaMode, Material},
};

pub fn parse_gltf(path: &Path) -> Result<AssetDescription> {
    // A. Load Document & Buffers (images come back decoded)
    let (document, buffers, images) = gltf::import(path).map_err(|source| AssetError::Import {
        path: path.display().to_string(),
        source,
    })?;

    // --- STEP 1: IMAGES & TEXTURES ---
    let images = images.into_iter().enumerate().map(|(i, image)| convert_image(i, image)).collect();

    let textures = document
        .textures()
        .map(|texture| TextureRecord {
            image: texture.source().index(),
        })
        .collect();

    // --- STEP 2: MATERIALS ---
    let materials = document.materials().map(|mat| convert_material(&mat)).collect();

    // --- STEP 3: MESHES ---
    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let mut primitives = Vec::new();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .ok_or(AssetError::MissingPositions {
                    mesh: mesh.index(),
                    primitive: primitive.index(),
                })?;

            let normals = reader.read_normals().map(|iter| iter.collect());
            let tex_coords = reader.read_tex_coords(0).map(|read| read.into_f32().collect());
            let tangents = reader.read_tangents().map(|iter| iter.collect());

            let indices = match reader.read_indices() {
                Some(ReadIndices::U8(iter)) => IndexAccessor::from_u8(&iter.collect::<Vec<_>>()),
                Some(ReadIndices::U16(iter)) => IndexAccessor::from_u16(&iter.collect::<Vec<_>>()),
                Some(ReadIndices::U32(iter)) => IndexAccessor::from_u32(&iter.collect::<Vec<_>>()),
                None => {
                    // Non-indexed primitive: draw the vertices in order.
                    log::debug!(
                        "Mesh {} primitive {} has no indices, generating {}",
                        mesh.index(),
                        primitive.index(),
                        positions.len()
                    );
                    let sequential: Vec<u32> = (0..positions.len() as u32).collect();
                    IndexAccessor::from_u32(&sequential)
                }
            };

            primitives.push(PrimitiveRecord {
                positions,
                normals,
                tex_coords,
                tangents,
                indices,
                material: primitive.material().index(),
            });
        }

        meshes.push(MeshRecord {
            name: mesh.name().map(str::to_owned),
            primitives,
        });
    }

    // --- STEP 4: NODES (The Hierarchy) ---
    let nodes: Vec<NodeRecord> = document.nodes().map(|node| convert_node(&node)).collect();

    let mut roots: Vec<usize> = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|scene| scene.nodes().map(|n| n.index()).collect())
        .unwrap_or_default();

    // Parentless nodes outside the default scene still get built, so every
    // index in the matrix arrays belongs to some node.
    let mut is_child = vec![false; nodes.len()];
    for node in &nodes {
        for &child in &node.children {
            if let Some(flag) = is_child.get_mut(child) {
                *flag = true;
            }
        }
    }
    for (index, child) in is_child.iter().enumerate() {
        if !child && !roots.contains(&index) {
            log::debug!("Node {index} is outside the default scene, adding it as a root");
            roots.push(index);
        }
    }

    // --- STEP 5: ANIMATIONS ---
    let mut animations = Vec::new();
    for (animation_index, animation) in document.animations().enumerate() {
        let mut channels = Vec::new();

        for (channel_index, channel) in animation.channels().enumerate() {
            let property = match channel.target().property() {
                gltf::animation::Property::Translation => TransformField::Translation,
                gltf::animation::Property::Rotation => TransformField::Rotation,
                gltf::animation::Property::Scale => TransformField::Scale,
                gltf::animation::Property::MorphTargetWeights => {
                    log::warn!(
                        "Animation {animation_index} channel {channel_index}: morph target weights are not supported, skipping"
                    );
                    continue;
                }
            };

            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
            let missing = |what| AssetError::MissingChannelData {
                animation: animation_index,
                channel: channel_index,
                what,
            };

            let times: Vec<f32> = reader.read_inputs().ok_or_else(|| missing("input"))?.collect();

            let (values, components): (Vec<f32>, usize) =
                match reader.read_outputs().ok_or_else(|| missing("output"))? {
                    ReadOutputs::Translations(iter) => (iter.flatten().collect(), 3),
                    ReadOutputs::Scales(iter) => (iter.flatten().collect(), 3),
                    ReadOutputs::Rotations(rotations) => (rotations.into_f32().flatten().collect(), 4),
                    ReadOutputs::MorphTargetWeights(_) => return Err(missing("transform output")),
                };

            let sampler = channel.sampler();
            let interpolation = match sampler.interpolation() {
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };

            let input = sampler.input();
            let bound = |value: Option<serde_json::Value>| {
                value
                    .as_ref()
                    .and_then(|v| v.as_array())
                    .and_then(|a| a.first())
                    .and_then(|v| v.as_f64())
                    .map(|v| v as f32)
            };

            channels.push(ChannelRecord {
                target_node: channel.target().node().index(),
                property,
                sampler: SamplerRecord {
                    times,
                    values,
                    components,
                    interpolation,
                    min_time: bound(input.min()),
                    max_time: bound(input.max()),
                },
            });
        }

        animations.push(AnimationRecord {
            name: animation.name().map(str::to_owned),
            channels,
        });
    }

    Ok(AssetDescription {
        nodes,
        roots,
        meshes,
        materials,
        textures,
        images,
        animations,
    })
}

fn convert_node(node: &gltf::Node) -> NodeRecord {
    let mut record = NodeRecord {
        index: node.index(),
        name: node.name().map(str::to_owned),
        children: node.children().map(|c| c.index()).collect(),
        mesh: node.mesh().map(|m| m.index()),
        ..Default::default()
    };

    match node.transform() {
        gltf::scene::Transform::Matrix { matrix } => {
            record.matrix = Some(Mat4::from_cols_array_2d(&matrix).to_cols_array());
        }
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => {
            record.translation = Some(translation);
            record.rotation = Some(rotation);
            record.scale = Some(scale);
        }
    }

    record
}

fn convert_material(mat: &gltf::Material) -> Material {
    let pbr = mat.pbr_metallic_roughness();

    Material {
        name: mat.name().unwrap_or("GLTF Material").to_string(),
        base_color_factor: pbr.base_color_factor(),
        base_color_texture: pbr.base_color_texture().map(|info| info.texture().index()),
        metallic_factor: pbr.metallic_factor(),
        roughness_factor: pbr.roughness_factor(),
        metallic_roughness_texture: pbr
            .metallic_roughness_texture()
            .map(|info| info.texture().index()),
        normal_texture: mat.normal_texture().map(|info| info.texture().index()),
        occlusion_texture: mat.occlusion_texture().map(|info| info.texture().index()),
        emissive_factor: mat.emissive_factor(),
        emissive_texture: mat.emissive_texture().map(|info| info.texture().index()),
        alpha_mode: match mat.alpha_mode() {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask,
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        },
        alpha_cutoff: mat.alpha_cutoff().unwrap_or(0.5),
        double_sided: mat.double_sided(),
    }
}

fn convert_image(index: usize, image: gltf::image::Data) -> Option<ImageRecord> {
    // Most devices have no RGB8 formats, so everything is expanded to RGBA8.
    let pixels = match image.format {
        Format::R8G8B8A8 => image.pixels,
        Format::R8G8B8 => {
            let mut rgba = Vec::with_capacity(image.pixels.len() / 3 * 4);
            for chunk in image.pixels.chunks_exact(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(255);
            }
            rgba
        }
        Format::R8 => image.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => {
            log::warn!("Image {index} has unsupported format {other:?}, a fallback will be bound instead");
            return None;
        }
    };

    Some(ImageRecord {
        width: image.width,
        height: image.height,
        pixels,
    })
}
