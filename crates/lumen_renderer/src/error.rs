use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("{region} region holds {capacity} bytes, {required} needed")]
    RegionTooSmall {
        region: &'static str,
        capacity: u64,
        required: u64,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
