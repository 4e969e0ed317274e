use std::collections::HashMap;

use lumen_assets::AnimationRecord;
use lumen_core::{EngineConfig, TransformField, build_worker_pool};
use lumen_scene::{NodeMatrices, NodeStore, evaluate_transforms};
use rayon::prelude::*;

use crate::{AnimationError, Result, channel::Channel, sampler::SampledValue};

/// Counts from one [`AnimationDispatch::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub channels: usize,
    pub nodes: usize,
}

/// Drives every channel of every animation from one global clock.
///
/// Sampling is split into contiguous chunks and runs on a dedicated pool.
/// Results are written back on the calling thread in declaration order, so
/// when two channels drive the same field the later one always wins.
pub struct AnimationDispatch {
    channels: Vec<Channel>,
    pool: rayon::ThreadPool,
    chunk_size: usize,
    samples: Vec<SampledValue>,
}

impl AnimationDispatch {
    pub fn new(channels: Vec<Channel>, config: &EngineConfig) -> Result<Self> {
        let pool = build_worker_pool(config)?;
        let threads = pool.current_num_threads().max(1);
        let chunk_size = channels.len().div_ceil(threads).max(1);

        log::info!(
            "Animation dispatch: {} channels in chunks of {chunk_size} over {threads} workers",
            channels.len()
        );

        Ok(Self {
            samples: Vec::with_capacity(channels.len()),
            channels,
            pool,
            chunk_size,
        })
    }

    /// Validates every channel of `animations` against `store` and checks
    /// for channels that drive the same node field.
    pub fn from_animations(
        animations: &[AnimationRecord],
        store: &NodeStore,
        config: &EngineConfig,
    ) -> Result<Self> {
        let mut channels = Vec::new();
        for (animation_index, animation) in animations.iter().enumerate() {
            for (channel_index, record) in animation.channels.iter().enumerate() {
                channels.push(Channel::from_record(animation_index, channel_index, record, store)?);
            }
        }

        check_conflicts(&channels, config.strict_channels)?;
        Self::new(channels, config)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Longest channel, i.e. the loop length of the longest animation.
    pub fn duration(&self) -> f32 {
        self.channels
            .iter()
            .map(|c| c.sampler.end_time())
            .fold(0.0, f32::max)
    }

    /// Samples every channel at `elapsed` seconds and writes the results
    /// into `store`. Returns the number of channels evaluated.
    pub fn advance(&mut self, elapsed: f32, store: &mut NodeStore) -> Result<usize> {
        let channels = &self.channels;
        let chunk_size = self.chunk_size;
        let samples = &mut self.samples;

        samples.clear();
        self.pool.install(|| {
            samples.par_extend(
                channels
                    .par_chunks(chunk_size)
                    .flat_map_iter(|chunk| chunk.iter().map(|channel| channel.sample(elapsed))),
            );
        });

        for (channel, value) in self.channels.iter().zip(self.samples.iter()) {
            channel.apply(*value, store)?;
        }

        log::trace!("Sampled {} channels at t={elapsed:.3}", self.channels.len());
        Ok(self.channels.len())
    }

    /// One animation step followed by a full transform pass.
    pub fn tick(&mut self, elapsed: f32, store: &mut NodeStore, matrices: &mut NodeMatrices) -> Result<DispatchStats> {
        let channels = self.advance(elapsed, store)?;
        let nodes = evaluate_transforms(store, matrices);
        Ok(DispatchStats { channels, nodes })
    }
}

/// Reports channels that write the same field of the same node; at runtime
/// the later one in declaration order wins.
fn check_conflicts(channels: &[Channel], strict: bool) -> Result<()> {
    let mut owners: HashMap<(usize, TransformField), (usize, usize)> = HashMap::new();

    for channel in channels {
        let id = (channel.animation, channel.index);
        let Some(first) = owners.insert((channel.target, channel.field), id) else {
            continue;
        };

        if strict {
            return Err(AnimationError::ConflictingChannels {
                node: channel.target,
                field: channel.field,
                first,
                second: id,
            });
        }
        log::warn!(
            "Channels {first:?} and {id:?} both drive {:?} of node {}, the later one wins",
            channel.field,
            channel.target
        );
    }

    Ok(())
}
