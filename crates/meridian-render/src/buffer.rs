//! GPU array buffer with partial updates.

use crate::error::{LayerError, LayerResult};
use meridian_test_utils::{GpuBuffer, RenderContext};

/// A GPU buffer holding a dense array of fixed-size items.
///
/// The buffer is filled once at creation. After that only byte ranges inside
/// single items are rewritten, so updating one item costs one small transfer
/// no matter how many items the buffer holds.
#[derive(Debug)]
pub struct ArrayBuffer {
    buffer: Option<GpuBuffer>,
    label: String,
    stride: u64,
    len: u32,
}

impl ArrayBuffer {
    /// Upload `data` as `data.len() / stride` items of `stride` bytes each.
    ///
    /// The allocation is rounded up to `wgpu::COPY_BUFFER_ALIGNMENT`.
    pub fn new(
        ctx: &dyn RenderContext,
        label: &str,
        usage: wgpu::BufferUsages,
        stride: u64,
        data: &[u8],
    ) -> Self {
        debug_assert!(stride > 0 && data.len() as u64 % stride == 0);
        let size = aligned_size(data.len() as u64);

        let buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if !data.is_empty() {
            if data.len() as u64 == size {
                ctx.write_buffer(&buffer, 0, data);
            } else {
                let mut padded = data.to_vec();
                padded.resize(size as usize, 0);
                ctx.write_buffer(&buffer, 0, &padded);
            }
        }

        tracing::trace!("uploaded {} ({} bytes)", label, data.len());

        Self {
            buffer: Some(buffer),
            label: label.to_string(),
            stride,
            len: (data.len() as u64 / stride) as u32,
        }
    }

    /// Index buffer of `u32` indices.
    pub fn indices(ctx: &dyn RenderContext, label: &str, indices: &[u32]) -> Self {
        Self::new(
            ctx,
            label,
            wgpu::BufferUsages::INDEX,
            4,
            bytemuck::cast_slice(indices),
        )
    }

    /// Overwrite `bytes` at `offset` within item `index`.
    pub fn write_item(
        &self,
        ctx: &dyn RenderContext,
        index: u32,
        offset: u64,
        bytes: &[u8],
    ) -> LayerResult<()> {
        let buffer = self.buffer.as_ref().ok_or(LayerError::Destroyed)?;
        let start = index as u64 * self.stride + offset;

        if index >= self.len || offset + bytes.len() as u64 > self.stride {
            return Err(LayerError::BufferRange {
                label: self.label.clone(),
                offset: start,
                len: bytes.len(),
                size: self.len as u64 * self.stride,
            });
        }
        debug_assert!(start % wgpu::COPY_BUFFER_ALIGNMENT == 0);
        debug_assert!(bytes.len() as u64 % wgpu::COPY_BUFFER_ALIGNMENT == 0);

        ctx.write_buffer(buffer, start, bytes);
        Ok(())
    }

    /// Release the GPU buffer. Calling this again does nothing.
    pub fn destroy(&mut self, ctx: &dyn RenderContext) {
        if let Some(buffer) = self.buffer.take() {
            ctx.destroy_buffer(&buffer);
        }
    }

    pub fn gpu_buffer(&self) -> Option<&GpuBuffer> {
        self.buffer.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.buffer.is_none()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Item size in bytes.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of items.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn aligned_size(len: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    (len.div_ceil(align) * align).max(align)
}
