#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

/// Surface description of one primitive. Texture slots hold indices into
/// the asset's texture table; `None` means the slot is absent and the
/// renderer substitutes a fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,

    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<usize>,

    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub metallic_roughness_texture: Option<usize>,

    pub normal_texture: Option<usize>,
    pub occlusion_texture: Option<usize>,

    pub emissive_factor: [f32; 3],
    pub emissive_texture: Option<usize>,

    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_factor: [0.0, 0.0, 0.0],
            emissive_texture: None,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
        }
    }
}
