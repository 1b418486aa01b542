//! Executes draw calls on a wgpu render pass.

use crate::draw::{DrawCall, DrawTarget};
use meridian_core::profiling::profile_function;

/// Supplies the pipeline and bind groups for a draw call.
///
/// Implementations own the compiled programs. Returning `false` skips the
/// draw, e.g. while a pipeline is still being built.
pub trait PipelineSource {
    fn bind(&self, pass: &mut wgpu::RenderPass<'_>, call: &DrawCall<'_>) -> bool;
}

/// A [`DrawTarget`] recording into a wgpu render pass.
pub struct WgpuDrawTarget<'a, 'p> {
    pass: &'a mut wgpu::RenderPass<'p>,
    pipelines: &'a dyn PipelineSource,
    draw_count: u32,
}

impl<'a, 'p> WgpuDrawTarget<'a, 'p> {
    pub fn new(pass: &'a mut wgpu::RenderPass<'p>, pipelines: &'a dyn PipelineSource) -> Self {
        Self {
            pass,
            pipelines,
            draw_count: 0,
        }
    }

    /// Draws issued so far.
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }
}

impl DrawTarget for WgpuDrawTarget<'_, '_> {
    fn draw(&mut self, call: &DrawCall<'_>) {
        profile_function!();

        if !self.pipelines.bind(self.pass, call) {
            tracing::debug!("no pipeline for {:?}, skipping draw", call.program);
            return;
        }

        let geometry = call.geometry;
        let vertex_buffers = [
            Some(&geometry.positions),
            geometry.normals.as_ref(),
            geometry.uvs.as_ref(),
            Some(call.instances),
        ];

        let mut slot = 0;
        for buffer in vertex_buffers.into_iter().flatten() {
            let Some(gpu) = buffer.gpu_buffer() else {
                tracing::warn!("{} was released, skipping draw", buffer.label());
                return;
            };
            self.pass.set_vertex_buffer(slot, gpu.as_wgpu().slice(..));
            slot += 1;
        }

        let Some(indices) = call.indices.gpu_buffer() else {
            tracing::warn!("{} was released, skipping draw", call.indices.label());
            return;
        };
        self.pass
            .set_index_buffer(indices.as_wgpu().slice(..), wgpu::IndexFormat::Uint32);
        self.pass
            .draw_indexed(0..call.index_count, 0, 0..call.instance_count);
        self.draw_count += 1;
    }
}
