use glam::Mat4;
use lumen_core::LocalTransform;

/// A contiguous range of the shared index buffer drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Primitive {
    pub first_index: u32,
    pub index_count: u32,
    pub material: Option<usize>,
    /// Range of the shared vertex buffer this primitive's indices point into.
    pub vertex_start: u32,
    pub vertex_count: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub index: usize,
    pub name: Option<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub local: LocalTransform,
    pub mesh: Option<Mesh>,
}

impl Node {
    pub fn has_geometry(&self) -> bool {
        self.mesh.as_ref().is_some_and(|m| !m.primitives.is_empty())
    }
}

/// Arena owning every node of the forest.
///
/// A node's position in the arena is its index, so the store doubles as the
/// index → node lookup. Parent and child links are plain indices; the arena
/// itself is the only owner and is dropped in one piece.
#[derive(Clone, Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    roots: Vec<usize>,
}

impl NodeStore {
    /// Callers guarantee `nodes[i].index == i` and a well-formed forest;
    /// the scene builder is the only producer.
    pub(crate) fn from_parts(nodes: Vec<Node>, roots: Vec<usize>) -> Self {
        debug_assert!(nodes.iter().enumerate().all(|(i, n)| n.index == i));
        Self { nodes, roots }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Mutable access limited to the local transform; the hierarchy is
    /// fixed once the store is built.
    pub fn local_mut(&mut self, index: usize) -> Option<&mut LocalTransform> {
        self.nodes.get_mut(index).map(|node| &mut node.local)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Parent chain from the immediate parent up to the root.
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors {
            store: self,
            next: self.get(index).and_then(|n| n.parent),
        }
    }

    /// Node indices in depth-first pre-order, roots in declaration order.
    pub fn depth_first(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            order.push(index);
            if let Some(node) = self.get(index) {
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// World matrix by walking the ancestor chain, without any caching.
    ///
    /// The transform system computes the same product top-down; this form
    /// exists for spot checks on individual nodes.
    pub fn compose_world_matrix(&self, index: usize) -> Option<Mat4> {
        let node = self.get(index)?;
        let mut matrix = node.local.compute_matrix();
        for ancestor in self.ancestors(index) {
            matrix = ancestor.local.compute_matrix() * matrix;
        }
        Some(matrix)
    }
}

pub struct Ancestors<'a> {
    store: &'a NodeStore,
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.store.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}
