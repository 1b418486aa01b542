//! Shader program selection.
//!
//! A layer's capabilities are fixed at finalize, so the color program for
//! every combination of frame toggles is computed once into a table.

use crate::frame::FrameContext;
use bitflags::bitflags;

bitflags! {
    /// What a finalized layer can feed to a shader.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const NORMALS = 1 << 0;
        const UV = 1 << 1;
        const METALLIC_ROUGHNESS = 1 << 2;
        const COLOR_TEXTURE = 1 << 3;
        const METALLIC_ROUGHNESS_TEXTURE = 1 << 4;
        const EDGE_INDICES = 1 << 5;
    }
}

impl Capabilities {
    const PBR: Capabilities = Capabilities::METALLIC_ROUGHNESS
        .union(Capabilities::UV)
        .union(Capabilities::NORMALS)
        .union(Capabilities::COLOR_TEXTURE)
        .union(Capabilities::METALLIC_ROUGHNESS_TEXTURE);

    const TEXTURED: Capabilities = Capabilities::UV
        .union(Capabilities::NORMALS)
        .union(Capabilities::COLOR_TEXTURE);

    pub fn pbr_supported(self) -> bool {
        self.contains(Self::PBR)
    }

    pub fn color_texture_supported(self) -> bool {
        self.contains(Self::TEXTURED)
    }
}

/// Every shader program an instanced layer can draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    Pbr,
    PbrWithSao,
    ColorTexture,
    ColorTextureWithSao,
    Lambert,
    LambertWithSao,
    FlatColor,
    FlatColorWithSao,
    Depth,
    Normals,
    NormalsFlat,
    Silhouette,
    Edges,
    Occlusion,
    Shadow,
    PickMesh,
    PickDepth,
    PickNormals,
    PickNormalsFlat,
}

/// Color programs indexed by `(sao, pbr, color_texture)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantTable {
    color: [ShaderProgram; 8],
    has_normals: bool,
}

impl VariantTable {
    /// Build the table for a layer.
    ///
    /// `pbr_enabled` and `color_texture_enabled` are the model-level toggles;
    /// they are combined with the frame toggles at lookup time.
    pub fn new(capabilities: Capabilities, pbr_enabled: bool, color_texture_enabled: bool) -> Self {
        let mut color = [ShaderProgram::FlatColor; 8];
        for (index, slot) in color.iter_mut().enumerate() {
            let sao = index & 0b100 != 0;
            let pbr = index & 0b010 != 0 && pbr_enabled;
            let texture = index & 0b001 != 0 && color_texture_enabled;

            *slot = match (sao, pbr && capabilities.pbr_supported()) {
                (false, true) => ShaderProgram::Pbr,
                (true, true) => ShaderProgram::PbrWithSao,
                _ if texture && capabilities.color_texture_supported() => {
                    if sao {
                        ShaderProgram::ColorTextureWithSao
                    } else {
                        ShaderProgram::ColorTexture
                    }
                }
                _ if capabilities.contains(Capabilities::NORMALS) => {
                    if sao {
                        ShaderProgram::LambertWithSao
                    } else {
                        ShaderProgram::Lambert
                    }
                }
                _ if sao => ShaderProgram::FlatColorWithSao,
                _ => ShaderProgram::FlatColor,
            };
        }

        Self {
            color,
            has_normals: capabilities.contains(Capabilities::NORMALS),
        }
    }

    pub fn color_program(&self, frame: &FrameContext, with_sao: bool) -> ShaderProgram {
        let index = (with_sao as usize) << 2
            | (frame.pbr_enabled as usize) << 1
            | frame.color_texture_enabled as usize;
        self.color[index]
    }

    pub fn normals_program(&self) -> ShaderProgram {
        if self.has_normals {
            ShaderProgram::Normals
        } else {
            ShaderProgram::NormalsFlat
        }
    }

    pub fn pick_normals_program(&self) -> ShaderProgram {
        if self.has_normals {
            ShaderProgram::PickNormals
        } else {
            ShaderProgram::PickNormalsFlat
        }
    }
}
