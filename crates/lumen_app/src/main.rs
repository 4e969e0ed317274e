use std::time::Duration;

use anyhow::Context;
use lumen_assets::load_gltf;
use lumen_core::{EngineConfig, Time};
use lumen_renderer::{
    BackendRegion, GeometryBuffers, GpuSyncBuffer, RenderContext, SceneTextures, TextureSlot,
    resolve_materials,
};
use lumen_scene::build_scene;

mod player;

use player::ScenePlayer;

const CONFIG_PATH: &str = "lumen.json";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EngineConfig::load_or_default(CONFIG_PATH)?;
    let path = std::env::args()
        .nth(1)
        .context("Usage: lumen_app <scene.gltf|scene.glb>")?;

    let description = load_gltf(&path)?;
    let scene = build_scene(&description).with_context(|| format!("Failed to build scene from '{path}'"))?;

    let bindings = resolve_materials(&scene.materials, &scene.textures, &scene.images);
    let fallback_slots = bindings
        .iter()
        .flat_map(|b| b.slots())
        .filter(|slot| matches!(slot, TextureSlot::Fallback(_)))
        .count();
    log::info!(
        "{} materials, {fallback_slots} texture slots bound to fallbacks",
        bindings.len()
    );

    let node_count = scene.node_count();
    match RenderContext::headless() {
        Ok(context) => {
            // Uploaded once; the frame loop only touches the matrix regions.
            let _geometry = GeometryBuffers::upload(&context, &scene);
            let textures = SceneTextures::upload(&context, &scene, config.fallback_texture_size);
            let unbound = bindings
                .iter()
                .flat_map(|b| b.slots())
                .filter(|&slot| textures.get(slot).is_none())
                .count();
            if unbound > 0 {
                log::warn!("{unbound} material texture slots have no resident texture");
            }

            let sync = GpuSyncBuffer::gpu(&context, node_count);
            let player = ScenePlayer::new(scene, &description.animations, &config, sync)?;
            run(player, &config, Some(&context))
        }
        Err(err) => {
            log::warn!("{err}, syncing matrices into host memory instead");
            let sync = GpuSyncBuffer::host(node_count);
            let player = ScenePlayer::new(scene, &description.animations, &config, sync)?;
            run(player, &config, None)
        }
    }
}

fn run<R: BackendRegion>(
    mut player: ScenePlayer<R>,
    config: &EngineConfig,
    context: Option<&RenderContext>,
) -> anyhow::Result<()> {
    let mut time = Time::with_time_scale(config.time_scale);
    let step = Duration::from_millis(config.frame_interval_ms);

    log::info!(
        "Playing {} frames, {} draws over {} vertices, loop length {:.2}s",
        config.frames,
        player.draws().len(),
        player.scene().vertices.len(),
        player.duration()
    );

    let mut total_bytes = 0;
    for frame in 0..config.frames {
        time.update_with(step);
        let stats = player.frame(time.elapsed_seconds())?;
        total_bytes += stats.bytes;

        // Queued buffer writes land with the next submission.
        if let Some(context) = context {
            context.queue.submit(std::iter::empty());
        }

        log::debug!(
            "Frame {frame} t={:.3}s (+{:.3}s): {} channels, {} nodes, {} bytes",
            time.elapsed_seconds(),
            time.delta_seconds(),
            stats.channels,
            stats.nodes,
            stats.bytes
        );
    }

    log::info!(
        "Done: {} frames, {total_bytes} matrix bytes synced for {} nodes",
        config.frames,
        player.sync_buffer().node_count()
    );
    Ok(())
}
