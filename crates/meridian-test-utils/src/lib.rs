//! Test utilities for Meridian.
//!
//! - [`RenderContext`] - trait abstracting the GPU operations the render layer needs
//! - [`GpuBuffer`], [`GpuTexture`] - owned handles that are either real or mock
//! - `MockRenderContext` - records calls and keeps a byte image of every buffer
//!   (requires the `mock` feature)
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use meridian_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::{BufferDescriptor, BufferUsages};
//!
//! let mock = MockRenderContext::new();
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("colors"),
//!     size: 8,
//!     usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
//!     mapped_at_creation: false,
//! });
//! mock.write_buffer(&buffer, 4, &[1, 2, 3, 4]);
//!
//! assert_eq!(mock.buffer_contents(&buffer), Some(vec![0, 0, 0, 0, 1, 2, 3, 4]));
//! # }
//! ```
//!
//! The trait is object-safe, so layers hold a `&dyn RenderContext` and never
//! learn whether they talk to a device or to the mock.

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use gpu_types::{GpuBuffer, GpuTexture};
#[cfg(feature = "mock")]
pub use mock_render::{MockRenderContext, RenderCall};
pub use render_context::RenderContext;
