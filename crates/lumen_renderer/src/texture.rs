use std::collections::HashMap;

use lumen_scene::Scene;
use wgpu::{Device, Extent3d, Queue, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages};

use crate::{
    RenderContext,
    material::{FallbackTexture, TextureSlot},
};

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    pub const FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

    /// Uploads tightly packed RGBA8 pixels.
    pub fn from_rgba(device: &Device, queue: &Queue, width: u32, height: u32, pixels: &[u8], label: &str) -> Self {
        let size = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: Self::FORMAT,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }
}

/// Every decoded scene image plus the three fallbacks, resident on the GPU.
pub struct SceneTextures {
    pub images: Vec<Option<GpuTexture>>,
    pub fallbacks: HashMap<FallbackTexture, GpuTexture>,
}

impl SceneTextures {
    pub fn upload(context: &RenderContext, scene: &Scene, fallback_size: u32) -> Self {
        let (device, queue) = (&context.device, &context.queue);

        let images: Vec<Option<GpuTexture>> = scene
            .images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                image.as_ref().map(|image| {
                    GpuTexture::from_rgba(device, queue, image.width, image.height, &image.pixels, &format!("Image {i}"))
                })
            })
            .collect();

        // We create these manually so we don't depend on an asset file existing
        let size = fallback_size.max(1);
        let fallbacks = FallbackTexture::ALL
            .into_iter()
            .map(|fallback| {
                let texture = GpuTexture::from_rgba(device, queue, size, size, &fallback.pixels(size), fallback.label());
                (fallback, texture)
            })
            .collect();

        log::info!(
            "Uploaded {} of {} images, fallbacks at {size}x{size}",
            images.iter().flatten().count(),
            images.len()
        );

        Self { images, fallbacks }
    }

    pub fn get(&self, slot: TextureSlot) -> Option<&GpuTexture> {
        match slot {
            TextureSlot::Image(index) => self.images.get(index).and_then(Option::as_ref),
            TextureSlot::Fallback(fallback) => self.fallbacks.get(&fallback),
        }
    }
}
