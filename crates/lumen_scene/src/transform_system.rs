use glam::Mat4;

use crate::node::NodeStore;

/// Per-node world and normal matrices, indexed by node index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeMatrices {
    world: Vec<Mat4>,
    normal: Vec<Mat4>,
}

impl NodeMatrices {
    pub fn new(count: usize) -> Self {
        Self {
            world: vec![Mat4::IDENTITY; count],
            normal: vec![Mat4::IDENTITY; count],
        }
    }

    pub fn for_store(store: &NodeStore) -> Self {
        Self::new(store.len())
    }

    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    pub fn world(&self) -> &[Mat4] {
        &self.world
    }

    pub fn normal(&self) -> &[Mat4] {
        &self.normal
    }

    pub fn world_matrix(&self, index: usize) -> Option<Mat4> {
        self.world.get(index).copied()
    }

    pub fn normal_matrix(&self, index: usize) -> Option<Mat4> {
        self.normal.get(index).copied()
    }

    pub(crate) fn resize(&mut self, count: usize) {
        self.world.resize(count, Mat4::IDENTITY);
        self.normal.resize(count, Mat4::IDENTITY);
    }
}

/// Inverse-transpose of `world`, or zero when `world` cannot be inverted
/// (e.g. a scale of 0 on some axis). Small but invertible scales keep
/// their exact inverse.
pub fn normal_matrix(world: Mat4) -> Mat4 {
    if world.determinant() == 0.0 {
        return Mat4::ZERO;
    }
    let normal = world.inverse().transpose();
    if normal.is_finite() { normal } else { Mat4::ZERO }
}

/// Recomputes every world and normal matrix top-down.
///
/// Each parent's world matrix is computed once and pushed alongside its
/// children, so the whole pass is O(n). Returns the number of nodes visited.
pub fn evaluate_transforms(store: &NodeStore, matrices: &mut NodeMatrices) -> usize {
    if matrices.len() != store.len() {
        matrices.resize(store.len());
    }

    let mut stack: Vec<(usize, Mat4)> = store
        .roots()
        .iter()
        .rev()
        .map(|&root| (root, Mat4::IDENTITY))
        .collect();
    let mut visited = 0;

    while let Some((index, parent_world)) = stack.pop() {
        let Some(node) = store.get(index) else {
            continue;
        };

        let world = parent_world * node.local.compute_matrix();
        matrices.world[index] = world;
        matrices.normal[index] = normal_matrix(world);
        visited += 1;

        stack.extend(node.children.iter().rev().map(|&child| (child, world)));
    }

    visited
}
