use std::sync::Arc;

use crate::Result;

/// GPU connection without a surface. Enough to own buffers and textures
/// and to push data into them.
#[derive(Clone)]
pub struct RenderContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub adapter_info: wgpu::AdapterInfo,
}

impl RenderContext {
    pub fn headless() -> Result<Self> {
        // 1. Create the Instance (Vulkan/Metal/DX12)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        // 2. Request Adapter (Physical GPU)
        // We use 'pollster' to block on this async function, there is no surface to match.
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;

        // 3. Request Device (Logical GPU connection)
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Lumen Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            ..Default::default()
        }))?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Using adapter '{}' ({:?}, {:?})",
            adapter_info.name,
            adapter_info.device_type,
            adapter_info.backend
        );

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }
}
