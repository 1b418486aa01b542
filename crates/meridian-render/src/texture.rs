//! Texture sets shared between layers.

use meridian_test_utils::GpuTexture;

/// The material textures a layer samples from.
///
/// A texture set is created once per material and shared by reference between
/// every layer that uses it. Layers never destroy the textures they sample.
#[derive(Debug, Default)]
pub struct TextureSet {
    pub label: Option<String>,
    pub color: Option<GpuTexture>,
    pub metallic_roughness: Option<GpuTexture>,
    pub normals: Option<GpuTexture>,
    pub emissive: Option<GpuTexture>,
    pub occlusion: Option<GpuTexture>,
}

impl TextureSet {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, texture: GpuTexture) -> Self {
        self.color = Some(texture);
        self
    }

    pub fn with_metallic_roughness(mut self, texture: GpuTexture) -> Self {
        self.metallic_roughness = Some(texture);
        self
    }

    pub fn with_normals(mut self, texture: GpuTexture) -> Self {
        self.normals = Some(texture);
        self
    }

    pub fn with_emissive(mut self, texture: GpuTexture) -> Self {
        self.emissive = Some(texture);
        self
    }

    pub fn with_occlusion(mut self, texture: GpuTexture) -> Self {
        self.occlusion = Some(texture);
        self
    }

    pub fn has_color(&self) -> bool {
        self.color.is_some()
    }

    pub fn has_metallic_roughness(&self) -> bool {
        self.metallic_roughness.is_some()
    }
}
