use lumen_assets::{AlphaMode, ImageRecord, Material, TextureRecord};

/// Designated stand-ins for texture slots with nothing usable behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackTexture {
    /// Multiplies to "no change": base color, metallic-roughness, occlusion.
    White,
    /// Adds nothing: emissive.
    Black,
    /// Tangent-space +Z: normal maps.
    FlatNormal,
}

impl FallbackTexture {
    pub const ALL: [FallbackTexture; 3] = [
        FallbackTexture::White,
        FallbackTexture::Black,
        FallbackTexture::FlatNormal,
    ];

    pub fn pixel(self) -> [u8; 4] {
        match self {
            FallbackTexture::White => [255, 255, 255, 255],
            FallbackTexture::Black => [0, 0, 0, 255],
            FallbackTexture::FlatNormal => [128, 128, 255, 255],
        }
    }

    /// RGBA8 pixels of a `size` x `size` image filled with [`pixel`](Self::pixel).
    pub fn pixels(self, size: u32) -> Vec<u8> {
        let count = (size.max(1) as usize).pow(2);
        self.pixel().repeat(count)
    }

    pub fn label(self) -> &'static str {
        match self {
            FallbackTexture::White => "Fallback White Texture",
            FallbackTexture::Black => "Fallback Black Texture",
            FallbackTexture::FlatNormal => "Fallback Normal Texture",
        }
    }
}

/// What a material texture slot ends up bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Image(usize),
    Fallback(FallbackTexture),
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuMaterialUniform {
    pub base_color: [f32; 4],     // 16 bytes
    pub emissive: [f32; 3],       // 12 bytes
    pub alpha_cutoff: f32,        // 4 bytes
    pub metallic: f32,            // 4 bytes
    pub roughness: f32,           // 4 bytes
    pub alpha_mode: u32,          // 4 bytes
    pub double_sided: u32,        // 4 bytes (Total: 48 bytes, aligned to 16)
}

impl From<&Material> for GpuMaterialUniform {
    fn from(m: &Material) -> Self {
        Self {
            base_color: m.base_color_factor,
            emissive: m.emissive_factor,
            alpha_cutoff: m.alpha_cutoff,
            metallic: m.metallic_factor,
            roughness: m.roughness_factor,
            alpha_mode: match m.alpha_mode {
                AlphaMode::Opaque => 0,
                AlphaMode::Mask => 1,
                AlphaMode::Blend => 2,
            },
            double_sided: m.double_sided as u32,
        }
    }
}

/// A material with every texture slot resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialBinding {
    pub uniform: GpuMaterialUniform,
    pub base_color: TextureSlot,
    pub metallic_roughness: TextureSlot,
    pub normal: TextureSlot,
    pub occlusion: TextureSlot,
    pub emissive: TextureSlot,
}

impl MaterialBinding {
    pub fn slots(&self) -> [TextureSlot; 5] {
        [
            self.base_color,
            self.metallic_roughness,
            self.normal,
            self.occlusion,
            self.emissive,
        ]
    }
}

/// Resolves material texture references against the texture and image
/// tables. Missing, dangling and undecodable references get the slot's
/// fallback.
pub fn resolve_material(
    material: &Material,
    textures: &[TextureRecord],
    images: &[Option<ImageRecord>],
) -> MaterialBinding {
    let slot = |texture: Option<usize>, fallback: FallbackTexture| {
        let image = texture
            .and_then(|t| textures.get(t))
            .map(|t| t.image)
            .filter(|&i| matches!(images.get(i), Some(Some(_))));

        match image {
            Some(image) => TextureSlot::Image(image),
            None => {
                if texture.is_some() {
                    log::debug!(
                        "Material '{}': texture {texture:?} has no usable image, binding {fallback:?}",
                        material.name
                    );
                }
                TextureSlot::Fallback(fallback)
            }
        }
    };

    MaterialBinding {
        uniform: GpuMaterialUniform::from(material),
        base_color: slot(material.base_color_texture, FallbackTexture::White),
        metallic_roughness: slot(material.metallic_roughness_texture, FallbackTexture::White),
        normal: slot(material.normal_texture, FallbackTexture::FlatNormal),
        occlusion: slot(material.occlusion_texture, FallbackTexture::White),
        emissive: slot(material.emissive_texture, FallbackTexture::Black),
    }
}

pub fn resolve_materials(
    materials: &[Material],
    textures: &[TextureRecord],
    images: &[Option<ImageRecord>],
) -> Vec<MaterialBinding> {
    materials
        .iter()
        .map(|m| resolve_material(m, textures, images))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_std140_sized() {
        assert_eq!(std::mem::size_of::<GpuMaterialUniform>() % 16, 0);
    }

    #[test]
    fn fallback_pixels_fill_the_square() {
        let pixels = FallbackTexture::FlatNormal.pixels(2);
        assert_eq!(pixels.len(), 16);
        assert_eq!(&pixels[12..], &[128, 128, 255, 255]);
        assert_eq!(FallbackTexture::White.pixels(0).len(), 4);
    }
}
