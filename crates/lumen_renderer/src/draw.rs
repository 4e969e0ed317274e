use lumen_scene::NodeStore;

/// One indexed draw. `node_index` selects the matrices in the sync buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub node_index: u32,
    pub first_index: u32,
    pub index_count: u32,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// One command per non-empty primitive, in depth-first node order.
    pub fn from_store(store: &NodeStore) -> Self {
        let mut commands = Vec::new();

        for index in store.depth_first() {
            let Some(mesh) = store.get(index).and_then(|node| node.mesh.as_ref()) else {
                continue;
            };
            commands.extend(
                mesh.primitives
                    .iter()
                    .filter(|p| p.index_count > 0)
                    .map(|p| DrawCommand {
                        node_index: index as u32,
                        first_index: p.first_index,
                        index_count: p.index_count,
                        material: p.material,
                    }),
            );
        }

        log::debug!("Draw list: {} commands", commands.len());
        Self { commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn total_indices(&self) -> u64 {
        self.commands.iter().map(|c| c.index_count as u64).sum()
    }
}
