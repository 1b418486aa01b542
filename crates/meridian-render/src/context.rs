//! wgpu device and queue owned by a viewer.

use std::fmt;
use std::sync::Arc;

/// Why a graphics context could not be created.
#[derive(Debug)]
pub enum ContextError {
    NoAdapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::NoAdapter(e) => write!(f, "no suitable GPU adapter: {}", e),
            ContextError::Device(e) => write!(f, "failed to create device: {}", e),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContextError::NoAdapter(e) => Some(e),
            ContextError::Device(e) => Some(e),
        }
    }
}

/// Options for [`GraphicsContext::new_owned_with_descriptor`].
#[derive(Debug, Clone)]
pub struct GraphicsContextDescriptor {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub force_fallback_adapter: bool,
    pub limits: wgpu::Limits,
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            limits: wgpu::Limits::default(),
            label: Some("meridian device"),
        }
    }
}

/// A shared GPU device and queue.
///
/// Layers receive it as `Arc<dyn RenderContext>`:
///
/// ```rust,no_run
/// use meridian_render::GraphicsContext;
/// use meridian_test_utils::RenderContext;
/// use std::sync::Arc;
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU");
/// let render_ctx: Arc<dyn RenderContext> = ctx.clone();
/// ```
pub struct GraphicsContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    pub async fn new_owned() -> Result<Arc<Self>, ContextError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Blocks the current thread until the context is created.
    pub fn new_owned_sync() -> Result<Arc<Self>, ContextError> {
        pollster::block_on(Self::new_owned())
    }

    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, ContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(ContextError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: descriptor.label,
                required_limits: descriptor.limits,
                ..Default::default()
            })
            .await
            .map_err(ContextError::Device)?;

        tracing::info!("created graphics context on {}", adapter.get_info().name);

        Ok(Arc::new(Self {
            adapter,
            device,
            queue,
        }))
    }

    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }
}
