//! Per-portion instance record.

use bytemuck::{Pod, Zeroable};
use meridian_core::math::{PackedVec3, PackedVec4};
use std::mem::{offset_of, size_of};

/// Everything the instancing shaders read for one portion, interleaved into
/// a single vertex buffer stepped per instance.
///
/// Every field is a multiple of four bytes wide so that any one of them can
/// be rewritten in place with `queue.write_buffer`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceRecord {
    /// RGB plus opacity, `0..=255`.
    pub color: [u8; 4],
    /// `[metallic, roughness, 0, 0]`.
    pub metallic_roughness: [u8; 4],
    /// Pass-selector bytes, see [`pass_bytes`](crate::pass::pass_bytes).
    pub flags: [u8; 4],
    pub flags2: [u8; 4],
    pub pick_color: [u8; 4],
    /// Relative-to-center offset added after the model matrix.
    pub offset: PackedVec3,
    /// First three rows of the model matrix.
    pub model_rows: [PackedVec4; 3],
    /// First three rows of the normal matrix.
    pub normal_rows: [PackedVec4; 3],
}

static_assertions::const_assert_eq!(size_of::<InstanceRecord>(), 128);

/// One independently writable field of an [`InstanceRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceField {
    Color,
    MetallicRoughness,
    Flags,
    Flags2,
    PickColor,
    Offset,
    ModelRows,
    NormalRows,
}

impl InstanceField {
    /// Byte offset of the field inside a record.
    pub const fn offset(self) -> u64 {
        (match self {
            InstanceField::Color => offset_of!(InstanceRecord, color),
            InstanceField::MetallicRoughness => offset_of!(InstanceRecord, metallic_roughness),
            InstanceField::Flags => offset_of!(InstanceRecord, flags),
            InstanceField::Flags2 => offset_of!(InstanceRecord, flags2),
            InstanceField::PickColor => offset_of!(InstanceRecord, pick_color),
            InstanceField::Offset => offset_of!(InstanceRecord, offset),
            InstanceField::ModelRows => offset_of!(InstanceRecord, model_rows),
            InstanceField::NormalRows => offset_of!(InstanceRecord, normal_rows),
        }) as u64
    }

    pub const fn size(self) -> usize {
        match self {
            InstanceField::Color
            | InstanceField::MetallicRoughness
            | InstanceField::Flags
            | InstanceField::Flags2
            | InstanceField::PickColor => 4,
            InstanceField::Offset => size_of::<PackedVec3>(),
            InstanceField::ModelRows | InstanceField::NormalRows => 3 * size_of::<PackedVec4>(),
        }
    }

    /// The bytes of this field within `record`.
    pub fn bytes(self, record: &InstanceRecord) -> &[u8] {
        let start = self.offset() as usize;
        &bytemuck::bytes_of(record)[start..start + self.size()]
    }
}

impl InstanceRecord {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 12] = wgpu::vertex_attr_array![
        3 => Unorm8x4,
        4 => Unorm8x4,
        5 => Uint8x4,
        6 => Uint8x4,
        7 => Unorm8x4,
        8 => Float32x3,
        9 => Float32x4,
        10 => Float32x4,
        11 => Float32x4,
        12 => Float32x4,
        13 => Float32x4,
        14 => Float32x4,
    ];

    /// Vertex buffer layout for the instance slot.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<InstanceRecord>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
