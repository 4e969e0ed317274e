use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("Node record {position} declares index {index}, outside 0..{count}")]
    NodeIndexOutOfRange {
        position: usize,
        index: usize,
        count: usize,
    },

    #[error("Node index {index} is declared by more than one record")]
    DuplicateNodeIndex { index: usize },

    #[error("Node {index} is reached twice while building the forest (shared child or cycle)")]
    NodeVisitedTwice { index: usize },

    #[error("Node {index} is not reachable from any root")]
    UnreachableNode { index: usize },

    #[error("Root {index} does not name a node")]
    UnknownRoot { index: usize },

    #[error("Node {parent} lists child {child}, which does not exist")]
    DanglingChild { parent: usize, child: usize },

    #[error("Node {node} references mesh {mesh}, which does not exist")]
    DanglingMesh { node: usize, mesh: usize },

    #[error("Node {node} mesh {mesh} primitive {primitive} has no positions")]
    MissingPositions {
        node: usize,
        mesh: usize,
        primitive: usize,
    },

    #[error(
        "Node {node} mesh {mesh} primitive {primitive}: {attribute} has {found} elements, expected {expected}"
    )]
    AttributeCountMismatch {
        node: usize,
        mesh: usize,
        primitive: usize,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(
        "Node {node} mesh {mesh} primitive {primitive}: index component type {component_type} is not supported"
    )]
    UnsupportedIndexComponent {
        node: usize,
        mesh: usize,
        primitive: usize,
        component_type: u32,
    },

    #[error(
        "Node {node} mesh {mesh} primitive {primitive}: index accessor holds {found} bytes, {expected} needed"
    )]
    TruncatedIndices {
        node: usize,
        mesh: usize,
        primitive: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "Node {node} mesh {mesh} primitive {primitive}: index {value} is outside its {vertex_count} vertices"
    )]
    IndexOutOfRange {
        node: usize,
        mesh: usize,
        primitive: usize,
        value: u32,
        vertex_count: usize,
    },
}

pub type Result<T> = std::result::Result<T, SceneError>;
