use anyhow::Context;
use lumen_animation::AnimationDispatch;
use lumen_assets::AnimationRecord;
use lumen_core::EngineConfig;
use lumen_renderer::{BackendRegion, DrawList, GpuSyncBuffer};
use lumen_scene::{Scene, evaluate_transforms};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub channels: usize,
    pub nodes: usize,
    pub bytes: usize,
    pub draws: usize,
}

/// Owns a built scene and runs its per-frame pipeline:
/// animation, then transforms, then the matrix copy.
pub struct ScenePlayer<R: BackendRegion> {
    scene: Scene,
    dispatch: AnimationDispatch,
    sync: GpuSyncBuffer<R>,
    draws: DrawList,
}

impl<R: BackendRegion> ScenePlayer<R> {
    pub fn new(
        scene: Scene,
        animations: &[AnimationRecord],
        config: &EngineConfig,
        mut sync: GpuSyncBuffer<R>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            sync.node_count() == scene.node_count(),
            "sync buffer holds {} nodes, scene has {}",
            sync.node_count(),
            scene.node_count()
        );

        let dispatch = AnimationDispatch::from_animations(animations, &scene.nodes, config)
            .context("Failed to load animations")?;
        let draws = DrawList::from_store(&scene.nodes);

        // Rest pose, so the regions hold valid matrices before the first frame.
        evaluate_transforms(&scene.nodes, sync.matrices_mut());
        sync.sync()?;

        Ok(Self {
            scene,
            dispatch,
            sync,
            draws,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn sync_buffer(&self) -> &GpuSyncBuffer<R> {
        &self.sync
    }

    pub fn draws(&self) -> &DrawList {
        &self.draws
    }

    pub fn duration(&self) -> f32 {
        self.dispatch.duration()
    }

    /// Runs one frame at `elapsed` seconds of playback.
    pub fn frame(&mut self, elapsed: f32) -> anyhow::Result<FrameStats> {
        let stats = self
            .dispatch
            .tick(elapsed, &mut self.scene.nodes, self.sync.matrices_mut())?;
        let bytes = self.sync.sync()?;

        Ok(FrameStats {
            channels: stats.channels,
            nodes: stats.nodes,
            bytes,
            draws: self.draws.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use lumen_assets::{
        AssetDescription, ChannelRecord, IndexAccessor, MeshRecord, NodeRecord, PrimitiveRecord,
        SamplerRecord,
    };
    use lumen_core::TransformField;
    use lumen_renderer::HostRegion;
    use lumen_scene::build_scene;

    fn bouncing_triangle() -> (Scene, Vec<AnimationRecord>) {
        let mut root = NodeRecord::new(0);
        root.children = vec![1];
        let mut leaf = NodeRecord::new(1);
        leaf.mesh = Some(0);
        leaf.translation = Some([0.0; 3]);

        let description = AssetDescription {
            nodes: vec![root, leaf],
            roots: vec![0],
            meshes: vec![MeshRecord {
                name: None,
                primitives: vec![PrimitiveRecord {
                    positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                    indices: IndexAccessor::from_u16(&[0, 1, 2]),
                    ..Default::default()
                }],
            }],
            animations: vec![AnimationRecord {
                name: Some("bounce".into()),
                channels: vec![ChannelRecord {
                    target_node: 1,
                    property: TransformField::Translation,
                    sampler: SamplerRecord::vec3(vec![0.0, 1.0, 2.0], &[[0.0; 3], [0.0, 4.0, 0.0], [0.0; 3]]),
                }],
            }],
            ..Default::default()
        };

        let scene = build_scene(&description).unwrap();
        (scene, description.animations)
    }

    fn player() -> ScenePlayer<HostRegion> {
        let (scene, animations) = bouncing_triangle();
        let config = EngineConfig {
            worker_threads: 2,
            ..Default::default()
        };
        let sync = GpuSyncBuffer::host(scene.node_count());
        ScenePlayer::new(scene, &animations, &config, sync).unwrap()
    }

    #[test]
    fn frame_runs_the_whole_pipeline() {
        let mut player = player();
        let stats = player.frame(0.5).unwrap();

        assert_eq!(
            stats,
            FrameStats {
                channels: 1,
                nodes: 2,
                bytes: 2 * 2 * 64,
                draws: 1,
            }
        );

        let world = player.sync_buffer().world_region().read_matrix(1).unwrap();
        assert!(world.w_axis.truncate().abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn regions_hold_rest_pose_before_first_frame() {
        let player = player();
        assert_eq!(player.sync_buffer().world_region().writes(), 1);
        assert!((player.duration() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_sync_buffer_is_rejected() {
        let (scene, animations) = bouncing_triangle();
        let sync = GpuSyncBuffer::host(7);
        assert!(ScenePlayer::new(scene, &animations, &EngineConfig::default(), sync).is_err());
    }
}
