//! Meridian Render - instanced triangle-mesh layers.
//!
//! An [`InstancedLayer`] holds many portions of one base geometry. Each
//! portion has its own color, material factors, model matrix and state flags,
//! stored in one [`InstanceRecord`] per portion. Changing a portion rewrites
//! only the bytes of the changed attribute, and every render pass is a single
//! instanced draw that the layer skips outright when its counters show that no
//! portion would be drawn.
//!
//! Layers talk to the GPU through [`RenderContext`](meridian_test_utils::RenderContext),
//! so they run unchanged against [`GraphicsContext`] or a mock.

pub mod buffer;
pub mod context;
mod context_impl;
pub mod counters;
pub mod draw;
pub mod error;
pub mod flags;
pub mod frame;
pub mod geometry;
pub mod instance;
pub mod layer;
pub mod pass;
pub mod picking;
pub mod texture;
pub mod variant;
pub mod wgpu_target;

pub use buffer::ArrayBuffer;
pub use context::{ContextError, GraphicsContext, GraphicsContextDescriptor};
pub use counters::{ModelStats, PortionCounters};
pub use draw::{DrawCall, DrawPrimitive, DrawTarget, vertex_layouts};
pub use error::{LayerError, LayerResult};
pub use flags::EntityFlags;
pub use frame::FrameContext;
pub use geometry::{GeometryBuffers, GeometryDescriptor, InstancingGeometry};
pub use instance::{InstanceField, InstanceRecord};
pub use layer::{InstancedLayer, LayerDescriptor, PortionDescriptor};
pub use pass::{FlagChannel, RenderPass, flags2_bytes, pass_bytes};
pub use picking::{SurfaceHit, WorldRay};
pub use texture::TextureSet;
pub use variant::{Capabilities, ShaderProgram, VariantTable};
pub use wgpu_target::{PipelineSource, WgpuDrawTarget};
