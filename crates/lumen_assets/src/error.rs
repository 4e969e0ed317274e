use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("glTF import failed for '{path}': {source}")]
    Import {
        path: String,
        #[source]
        source: gltf::Error,
    },

    #[error("Mesh {mesh} primitive {primitive} has no POSITION attribute")]
    MissingPositions { mesh: usize, primitive: usize },

    #[error("Animation {animation} channel {channel} has no {what} data")]
    MissingChannelData {
        animation: usize,
        channel: usize,
        what: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, AssetError>;
