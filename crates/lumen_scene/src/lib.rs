pub mod builder;
mod error;
pub mod node;
pub mod transform_system;

pub use builder::{Scene, SceneBuilder, Vertex, build_scene};
pub use error::{Result, SceneError};
pub use node::{Mesh, Node, NodeStore, Primitive};
pub use transform_system::{NodeMatrices, evaluate_transforms, normal_matrix};
