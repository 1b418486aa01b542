//! Trait abstracting GPU operations for testing.

use crate::gpu_types::{GpuBuffer, GpuTexture};
use wgpu::{BufferDescriptor, TextureDescriptor};

/// GPU resource creation and transfer, as seen by the render layer.
///
/// Methods take `&self` and return owned handles, so one context can be
/// shared by every layer of a model and mocked with interior mutability.
///
/// ```rust,no_run
/// use meridian_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(ctx: &dyn RenderContext, bytes: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: Some("instances"),
///         size: bytes.len() as u64,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, bytes);
///     ctx.destroy_buffer(&buffer);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    /// Create a GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write `data` into `buffer` starting at byte `offset`.
    ///
    /// For real buffers this maps to `queue.write_buffer()`, so `offset` and
    /// `data.len()` must be multiples of `wgpu::COPY_BUFFER_ALIGNMENT`.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    /// Release the buffer's GPU memory immediately.
    fn destroy_buffer(&self, buffer: &GpuBuffer);

    /// Create a GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;
}
