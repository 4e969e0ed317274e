use lumen_assets::ChannelRecord;
use lumen_core::TransformField;
use lumen_scene::NodeStore;

use crate::{
    AnimationError, Result,
    sampler::{KeyframeSampler, SampledValue},
};

/// One animated TRS field of one node.
///
/// The target is a plain node index; the store that owns the node is passed
/// in on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub animation: usize,
    pub index: usize,
    pub target: usize,
    pub field: TransformField,
    pub sampler: KeyframeSampler,
}

impl Channel {
    /// Validates the record's keyframes and its target against `store`.
    pub fn from_record(
        animation: usize,
        index: usize,
        record: &ChannelRecord,
        store: &NodeStore,
    ) -> Result<Self> {
        let sampler = KeyframeSampler::from_record(&record.sampler, record.property).map_err(|source| {
            AnimationError::InvalidSampler {
                animation,
                channel: index,
                source,
            }
        })?;

        let channel = Self {
            animation,
            index,
            target: record.target_node,
            field: record.property,
            sampler,
        };

        let node = store.get(channel.target).ok_or_else(|| channel.node_not_found())?;
        if node.local.is_matrix() {
            return Err(channel.matrix_target());
        }

        Ok(channel)
    }

    pub fn sample(&self, time: f32) -> SampledValue {
        self.sampler.sample(time)
    }

    /// Writes an already sampled value into the target node.
    pub fn apply(&self, value: SampledValue, store: &mut NodeStore) -> Result<()> {
        let local = store.local_mut(self.target).ok_or_else(|| self.node_not_found())?;
        let trs = local.as_trs_mut().ok_or_else(|| self.matrix_target())?;
        value.write(trs, self.field);
        Ok(())
    }

    fn node_not_found(&self) -> AnimationError {
        AnimationError::NodeNotFound {
            animation: self.animation,
            channel: self.index,
            node: self.target,
        }
    }

    fn matrix_target(&self) -> AnimationError {
        AnimationError::MatrixTarget {
            animation: self.animation,
            channel: self.index,
            node: self.target,
            field: self.field,
        }
    }
}

/// Samples `channel` at `time` and overwrites the target's field.
pub fn evaluate(channel: &Channel, store: &mut NodeStore, time: f32) -> Result<()> {
    channel.apply(channel.sample(time), store)
}
