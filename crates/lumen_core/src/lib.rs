pub mod config;
pub mod time;
pub mod transform;

pub use config::{ConfigError, EngineConfig};
pub use time::Time;
pub use transform::{LocalTransform, Transform, TransformField};

/// Builds the fixed compute pool used for per-frame parallel work.
///
/// Kept separate from rayon's global pool so the engine decides the
/// thread count instead of whoever touches rayon first.
pub fn build_worker_pool(config: &EngineConfig) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    let threads = config.resolved_worker_threads();
    log::debug!("Starting worker pool with {threads} threads");

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lumen-worker-{i}"))
        .build()
}
