//! Mock implementation of RenderContext for testing.
//!
//! Besides recording every call, the mock keeps a byte image of each buffer
//! and applies writes to it, so tests can check exactly which bytes a
//! partial update touched.

use crate::{
    gpu_types::{GpuBuffer, GpuTexture},
    render_context::RenderContext,
};
use parking_lot::Mutex;
use wgpu::{BufferDescriptor, BufferUsages, TextureDescriptor, TextureFormat};

/// A recorded GPU operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        label: Option<String>,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
    DestroyBuffer {
        buffer_id: usize,
    },
    CreateTexture {
        width: u32,
        height: u32,
        format: TextureFormat,
    },
}

#[derive(Debug, Clone)]
struct MockBuffer {
    label: Option<String>,
    data: Vec<u8>,
    destroyed: bool,
}

/// Mock [`RenderContext`] that never touches a GPU.
///
/// Uses `parking_lot::Mutex` for interior mutability so the trait's `&self`
/// methods can record calls and the type stays `Send + Sync`.
///
/// ```rust
/// use meridian_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// let mock = MockRenderContext::new();
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 16,
///     usage: BufferUsages::VERTEX,
///     mapped_at_creation: false,
/// });
/// mock.destroy_buffer(&buffer);
///
/// assert_eq!(mock.count_buffer_creates(), 1);
/// assert_eq!(mock.count_buffer_destroys(), 1);
/// assert_eq!(mock.live_buffer_count(), 0);
/// ```
pub struct MockRenderContext {
    calls: Mutex<Vec<RenderCall>>,
    buffers: Mutex<Vec<MockBuffer>>,
    next_texture_id: Mutex<usize>,
}

impl MockRenderContext {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
            next_texture_id: Mutex::new(0),
        }
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    pub fn count_buffer_destroys(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::DestroyBuffer { .. }))
    }

    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    /// `(offset, size)` of every write made to `buffer`, in call order.
    pub fn writes_to(&self, buffer: &GpuBuffer) -> Vec<(u64, usize)> {
        let Some(id) = buffer.mock_id() else {
            return Vec::new();
        };
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::WriteBuffer {
                    buffer_id,
                    offset,
                    size,
                } if *buffer_id == id => Some((*offset, *size)),
                _ => None,
            })
            .collect()
    }

    /// Current byte image of a buffer, or `None` for unknown or destroyed buffers.
    pub fn buffer_contents(&self, buffer: &GpuBuffer) -> Option<Vec<u8>> {
        let id = buffer.mock_id()?;
        let buffers = self.buffers.lock();
        let mock = buffers.get(id)?;
        (!mock.destroyed).then(|| mock.data.clone())
    }

    /// Label the buffer was created with.
    pub fn buffer_label(&self, buffer: &GpuBuffer) -> Option<String> {
        let id = buffer.mock_id()?;
        self.buffers.lock().get(id)?.label.clone()
    }

    /// Buffers created and not yet destroyed.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.lock().iter().filter(|b| !b.destroyed).count()
    }

    /// Clear recorded calls (buffer contents are kept).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let mut buffers = self.buffers.lock();
        let id = buffers.len();
        let label = desc.label.map(str::to_string);

        buffers.push(MockBuffer {
            label: label.clone(),
            data: vec![0; desc.size as usize],
            destroyed: false,
        });

        self.calls.lock().push(RenderCall::CreateBuffer {
            label,
            size: desc.size,
            usage: desc.usage,
        });

        GpuBuffer::mock(id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        if let Some(mock) = self.buffers.lock().get_mut(buffer_id) {
            let start = offset as usize;
            let end = start + data.len();
            assert!(
                end <= mock.data.len(),
                "write of {} bytes at {} overruns mock buffer of {} bytes",
                data.len(),
                offset,
                mock.data.len()
            );
            assert!(!mock.destroyed, "write to destroyed mock buffer {buffer_id}");
            mock.data[start..end].copy_from_slice(data);
        }

        self.calls.lock().push(RenderCall::WriteBuffer {
            buffer_id,
            offset,
            size: data.len(),
        });
    }

    fn destroy_buffer(&self, buffer: &GpuBuffer) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };
        if let Some(mock) = self.buffers.lock().get_mut(buffer_id) {
            mock.destroyed = true;
            mock.data = Vec::new();
        }
        self.calls.lock().push(RenderCall::DestroyBuffer { buffer_id });
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let mut next = self.next_texture_id.lock();
        let id = *next;
        *next += 1;

        self.calls.lock().push(RenderCall::CreateTexture {
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        GpuTexture::mock(id, desc.size.width, desc.size.height, desc.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{Extent3d, TextureDimension, TextureUsages};

    fn vertex_buffer(mock: &MockRenderContext, size: u64) -> GpuBuffer {
        mock.create_buffer(&BufferDescriptor {
            label: Some("test_buffer"),
            size,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    #[test]
    fn test_mock_buffer_creation() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 1024);

        assert!(buffer.is_mock());
        assert_eq!(buffer.size(), 1024);
        assert_eq!(mock.count_buffer_creates(), 1);
        assert_eq!(mock.buffer_label(&buffer).as_deref(), Some("test_buffer"));
    }

    #[test]
    fn test_partial_write_only_touches_range() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 12);

        mock.write_buffer(&buffer, 0, &[9; 12]);
        mock.write_buffer(&buffer, 4, &[1, 2, 3, 4]);

        assert_eq!(
            mock.buffer_contents(&buffer),
            Some(vec![9, 9, 9, 9, 1, 2, 3, 4, 9, 9, 9, 9])
        );
        assert_eq!(mock.writes_to(&buffer), vec![(0, 12), (4, 4)]);
        assert_eq!(mock.count_buffer_writes(), 2);
    }

    #[test]
    #[should_panic]
    fn test_overrunning_write_panics() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 4);
        mock.write_buffer(&buffer, 4, &[0; 4]);
    }

    #[test]
    fn test_destroy_releases_contents() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 8);

        mock.destroy_buffer(&buffer);

        assert_eq!(mock.buffer_contents(&buffer), None);
        assert_eq!(mock.live_buffer_count(), 0);
        assert_eq!(mock.count_buffer_destroys(), 1);
    }

    #[test]
    fn test_mock_texture_creation() {
        let mock = MockRenderContext::new();

        let texture = mock.create_texture(&TextureDescriptor {
            label: Some("test_texture"),
            size: Extent3d {
                width: 512,
                height: 256,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        assert!(texture.is_mock());
        assert_eq!(texture.dimensions(), (512, 256));
        assert_eq!(mock.count_texture_creates(), 1);
    }

    #[test]
    fn test_clear_calls_keeps_contents() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 4);
        mock.write_buffer(&buffer, 0, &[7; 4]);

        assert_eq!(mock.call_count(), 2);
        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
        assert_eq!(mock.buffer_contents(&buffer), Some(vec![7; 4]));
    }
}
