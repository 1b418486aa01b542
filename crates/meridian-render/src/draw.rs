//! Draw calls emitted by layers, and the targets that execute them.

use crate::buffer::ArrayBuffer;
use crate::geometry::GeometryBuffers;
use crate::instance::InstanceRecord;
use crate::pass::RenderPass;
use crate::texture::TextureSet;
use crate::variant::ShaderProgram;
use meridian_core::math::{DVec3, Mat4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPrimitive {
    Triangles,
    Lines,
}

/// One instanced draw covering every portion of a layer.
///
/// Instances whose pass-selector byte does not match `pass` are discarded by
/// the shader, so a single call serves the whole layer.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub pass: RenderPass,
    pub program: ShaderProgram,
    pub primitive: DrawPrimitive,
    pub cull_backfaces: bool,
    pub geometry: &'a GeometryBuffers,
    pub instances: &'a ArrayBuffer,
    /// Triangle indices, or edge indices for line primitives.
    pub indices: &'a ArrayBuffer,
    pub index_count: u32,
    pub instance_count: u32,
    /// Relative-to-center origin the shader adds back in double precision.
    pub origin: DVec3,
    pub positions_decode_matrix: Mat4,
    pub texture_set: Option<&'a TextureSet>,
}

/// Something that can execute draw calls.
pub trait DrawTarget {
    fn draw(&mut self, call: &DrawCall<'_>);
}

/// Vertex buffer layouts for a geometry, in slot order.
///
/// Positions are always present; normals and uvs take the next slots when the
/// geometry has them and the instance record comes last.
pub fn vertex_layouts(has_normals: bool, has_uvs: bool) -> Vec<wgpu::VertexBufferLayout<'static>> {
    const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Uint16x4];
    const NORMAL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Snorm8x4];
    const UV: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

    let mut layouts = vec![wgpu::VertexBufferLayout {
        array_stride: 8,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION,
    }];
    if has_normals {
        layouts.push(wgpu::VertexBufferLayout {
            array_stride: 4,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &NORMAL,
        });
    }
    if has_uvs {
        layouts.push(wgpu::VertexBufferLayout {
            array_stride: 8,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &UV,
        });
    }
    layouts.push(InstanceRecord::layout());
    layouts
}
