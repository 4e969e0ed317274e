use std::path::Path;

use crate::{AssetDescription, Result};

pub mod gltf_parser;

/// Imports a `.gltf`/`.glb` file into an [`AssetDescription`].
pub fn load_gltf(path: impl AsRef<Path>) -> Result<AssetDescription> {
    let path = path.as_ref();
    log::info!("Loading glTF asset {}", path.display());

    let description = gltf_parser::parse_gltf(path)?;

    log::info!(
        "Parsed {}: {} nodes, {} meshes, {} materials, {} animations",
        path.display(),
        description.nodes.len(),
        description.meshes.len(),
        description.materials.len(),
        description.animations.len(),
    );
    Ok(description)
}
