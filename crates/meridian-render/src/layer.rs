//! Instanced triangle-mesh layers.
//!
//! A layer draws many portions (instances) of one base geometry with one
//! material. Portions are appended while the layer is building, then
//! [`InstancedLayer::finalize`] moves all instance data to the GPU. After that
//! the per-portion mutators rewrite only the bytes of the attribute they
//! change, and every draw method issues at most one instanced draw call.
//!
//! ```rust,ignore
//! let mut layer = InstancedLayer::new(ctx, LayerDescriptor::new("walls"), geometry)?;
//! let wall = layer.create_portion(&PortionDescriptor::default())?;
//! layer.finalize()?;
//! layer.set_visible(wall, true)?;
//! layer.draw_color_opaque(&mut frame, &mut target);
//! ```

use crate::buffer::ArrayBuffer;
use crate::counters::{ModelStats, PortionCounters};
use crate::draw::{DrawCall, DrawPrimitive, DrawTarget};
use crate::error::{LayerError, LayerResult};
use crate::flags::EntityFlags;
use crate::frame::FrameContext;
use crate::geometry::{GeometryBuffers, GeometryDescriptor, InstancingGeometry};
use crate::instance::{InstanceField, InstanceRecord};
use crate::pass::{RenderPass, flags2_bytes, pass_bytes};
use crate::picking::{SurfaceHit, WorldRay, ray_triangle_intersect};
use crate::texture::TextureSet;
use crate::variant::{Capabilities, ShaderProgram, VariantTable};
use meridian_core::Color;
use meridian_core::math::{Aabb3, DVec3, Mat4, PackedVec3, Vec3, affine_rows, normal_matrix};
use meridian_core::profiling::{profile_function, profile_scope};
use meridian_core::quantize::unit_to_u8;
use meridian_test_utils::{GpuBuffer, RenderContext};
use std::sync::Arc;

/// Layer-wide settings.
#[derive(Debug, Clone)]
pub struct LayerDescriptor {
    pub label: String,
    /// Relative-to-center origin. Portion matrices are relative to it.
    pub origin: DVec3,
    /// Render back faces instead of culling them.
    pub backfaces: bool,
    pub pbr_enabled: bool,
    pub color_texture_enabled: bool,
    pub sao_enabled: bool,
    /// Reserve per-portion offsets that can be changed with `set_offset`.
    pub offsets_enabled: bool,
    pub model_stats: Option<Arc<ModelStats>>,
    pub texture_set: Option<Arc<TextureSet>>,
}

impl LayerDescriptor {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: DVec3::ZERO,
            backfaces: false,
            pbr_enabled: true,
            color_texture_enabled: true,
            sao_enabled: true,
            offsets_enabled: false,
            model_stats: None,
            texture_set: None,
        }
    }

    pub fn with_origin(mut self, origin: DVec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_backfaces(mut self, backfaces: bool) -> Self {
        self.backfaces = backfaces;
        self
    }

    pub fn with_pbr(mut self, enabled: bool) -> Self {
        self.pbr_enabled = enabled;
        self
    }

    pub fn with_color_texture(mut self, enabled: bool) -> Self {
        self.color_texture_enabled = enabled;
        self
    }

    pub fn with_sao(mut self, enabled: bool) -> Self {
        self.sao_enabled = enabled;
        self
    }

    pub fn with_offsets(mut self, enabled: bool) -> Self {
        self.offsets_enabled = enabled;
        self
    }

    pub fn with_model_stats(mut self, stats: Arc<ModelStats>) -> Self {
        self.model_stats = Some(stats);
        self
    }

    pub fn with_texture_set(mut self, texture_set: Arc<TextureSet>) -> Self {
        self.texture_set = Some(texture_set);
        self
    }
}

/// Initial attributes of one portion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortionDescriptor {
    /// RGB of the portion; alpha is ignored in favor of `opacity`.
    pub color: Color,
    pub opacity: f32,
    pub metallic: f32,
    pub roughness: f32,
    pub mesh_matrix: Mat4,
    /// Applied after `mesh_matrix` when present.
    pub world_matrix: Option<Mat4>,
    pub pick_color: [u8; 4],
}

impl Default for PortionDescriptor {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            metallic: 0.0,
            roughness: 1.0,
            mesh_matrix: Mat4::IDENTITY,
            world_matrix: None,
            pick_color: [0; 4],
        }
    }
}

#[derive(Debug)]
struct Portion {
    flags: EntityFlags,
    matrix: Mat4,
    offset: Vec3,
    aabb: Aabb3,
    inverse: Option<Mat4>,
    normal: Option<Mat4>,
}

impl Portion {
    fn invalidate_pick_caches(&mut self) {
        self.inverse = None;
        self.normal = None;
    }
}

#[derive(Debug)]
struct LayerBuffers {
    geometry: GeometryBuffers,
    instances: ArrayBuffer,
    capabilities: Capabilities,
    variants: VariantTable,
}

#[derive(Debug)]
enum LayerState {
    /// Instance records are staged on the CPU.
    Building(Vec<InstanceRecord>),
    Finalized(LayerBuffers),
    Destroyed,
}

/// A batch of portions sharing one base geometry and texture set.
pub struct InstancedLayer {
    ctx: Arc<dyn RenderContext>,
    label: String,
    origin: DVec3,
    backfaces: bool,
    pbr_enabled: bool,
    color_texture_enabled: bool,
    sao_enabled: bool,
    offsets_enabled: bool,
    model_stats: Option<Arc<ModelStats>>,
    texture_set: Option<Arc<TextureSet>>,
    geometry: InstancingGeometry,
    portions: Vec<Portion>,
    counters: PortionCounters,
    aabb: Aabb3,
    state: LayerState,
}

impl std::fmt::Debug for InstancedLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstancedLayer")
            .field("label", &self.label)
            .field("origin", &self.origin)
            .field("portions", &self.portions.len())
            .field("counters", &self.counters)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl InstancedLayer {
    pub fn new(
        ctx: Arc<dyn RenderContext>,
        desc: LayerDescriptor,
        geometry: GeometryDescriptor,
    ) -> LayerResult<Self> {
        let geometry = InstancingGeometry::new(geometry)?;

        tracing::debug!(
            "created layer '{}' ({} vertices, {} indices)",
            desc.label,
            geometry.vertex_count(),
            geometry.index_count()
        );

        Ok(Self {
            ctx,
            label: desc.label,
            origin: desc.origin,
            backfaces: desc.backfaces,
            pbr_enabled: desc.pbr_enabled,
            color_texture_enabled: desc.color_texture_enabled,
            sao_enabled: desc.sao_enabled,
            offsets_enabled: desc.offsets_enabled,
            model_stats: desc.model_stats,
            texture_set: desc.texture_set,
            geometry,
            portions: Vec::new(),
            counters: PortionCounters::default(),
            aabb: Aabb3::EMPTY,
            state: LayerState::Building(Vec::new()),
        })
    }

    /// Append a portion and return its id.
    ///
    /// Ids are dense and follow call order: the first portion is 0.
    pub fn create_portion(&mut self, desc: &PortionDescriptor) -> LayerResult<u32> {
        let records = match &mut self.state {
            LayerState::Building(records) => records,
            LayerState::Finalized(_) => return Err(LayerError::AlreadyFinalized),
            LayerState::Destroyed => return Err(LayerError::Destroyed),
        };

        let matrix = desc.world_matrix.unwrap_or(Mat4::IDENTITY) * desc.mesh_matrix;
        let [r, g, b, _] = desc.color.to_rgba_u8();
        let normal_rows = if self.geometry.has_normals() {
            affine_rows(&normal_matrix(&matrix))
        } else {
            Default::default()
        };

        records.push(InstanceRecord {
            color: [r, g, b, unit_to_u8(desc.opacity)],
            metallic_roughness: [unit_to_u8(desc.metallic), unit_to_u8(desc.roughness), 0, 0],
            flags: pass_bytes(EntityFlags::empty()),
            flags2: flags2_bytes(EntityFlags::empty()),
            pick_color: desc.pick_color,
            offset: PackedVec3::default(),
            model_rows: affine_rows(&matrix),
            normal_rows,
        });

        let aabb = self.world_aabb(&matrix);
        self.aabb.expand_aabb(&aabb);

        let portion_id = self.portions.len() as u32;
        self.portions.push(Portion {
            flags: EntityFlags::empty(),
            matrix,
            offset: Vec3::ZERO,
            aabb,
            inverse: None,
            normal: None,
        });

        self.counters.num_portions += 1;
        if let Some(stats) = &self.model_stats {
            stats.update(|c| c.num_portions += 1);
        }

        Ok(portion_id)
    }

    /// Move the staged instance data and the base geometry to the GPU.
    ///
    /// The staging copies are dropped afterwards.
    pub fn finalize(&mut self) -> LayerResult<()> {
        profile_function!();

        let records = match &mut self.state {
            LayerState::Building(records) => std::mem::take(records),
            LayerState::Finalized(_) => return Err(LayerError::AlreadyFinalized),
            LayerState::Destroyed => return Err(LayerError::Destroyed),
        };

        let ctx = &*self.ctx;
        let geometry = self.geometry.upload(ctx, &self.label);
        let instances = ArrayBuffer::new(
            ctx,
            &format!("{} instances", self.label),
            wgpu::BufferUsages::VERTEX,
            std::mem::size_of::<InstanceRecord>() as u64,
            bytemuck::cast_slice(&records),
        );
        drop(records);

        let capabilities = self.capabilities();
        let variants =
            VariantTable::new(capabilities, self.pbr_enabled, self.color_texture_enabled);

        tracing::debug!(
            "finalized layer '{}': {} portions, capabilities {:?}",
            self.label,
            self.portions.len(),
            capabilities
        );

        self.state = LayerState::Finalized(LayerBuffers {
            geometry,
            instances,
            capabilities,
            variants,
        });
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::METALLIC_ROUGHNESS;
        caps.set(Capabilities::NORMALS, self.geometry.has_normals());
        caps.set(Capabilities::UV, self.geometry.has_uvs());
        caps.set(Capabilities::EDGE_INDICES, self.geometry.has_edges());
        if let Some(textures) = &self.texture_set {
            caps.set(Capabilities::COLOR_TEXTURE, textures.has_color());
            caps.set(
                Capabilities::METALLIC_ROUGHNESS_TEXTURE,
                textures.has_metallic_roughness(),
            );
        }
        caps
    }

    /// Release every GPU buffer and remove this layer from the model counters.
    ///
    /// Calling this more than once does nothing.
    pub fn destroy(&mut self) {
        match std::mem::replace(&mut self.state, LayerState::Destroyed) {
            LayerState::Destroyed => return,
            LayerState::Building(_) => {}
            LayerState::Finalized(mut buffers) => {
                buffers.geometry.destroy(&*self.ctx);
                buffers.instances.destroy(&*self.ctx);
            }
        }

        if let Some(stats) = &self.model_stats {
            let counters = self.counters;
            stats.update(|c| c.subtract(&counters));
        }
        tracing::debug!("destroyed layer '{}'", self.label);
    }

    // ==========================================================================
    // Per-portion state
    // ==========================================================================

    pub fn set_visible(&mut self, portion_id: u32, visible: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::VISIBLE, visible)
    }

    pub fn set_culled(&mut self, portion_id: u32, culled: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::CULLED, culled)
    }

    pub fn set_pickable(&mut self, portion_id: u32, pickable: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::PICKABLE, pickable)
    }

    pub fn set_clippable(&mut self, portion_id: u32, clippable: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::CLIPPABLE, clippable)
    }

    pub fn set_xrayed(&mut self, portion_id: u32, xrayed: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::XRAYED, xrayed)
    }

    pub fn set_highlighted(&mut self, portion_id: u32, highlighted: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::HIGHLIGHTED, highlighted)
    }

    pub fn set_selected(&mut self, portion_id: u32, selected: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::SELECTED, selected)
    }

    pub fn set_edges(&mut self, portion_id: u32, edges: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::EDGES, edges)
    }

    pub fn set_transparent(&mut self, portion_id: u32, transparent: bool) -> LayerResult<()> {
        self.set_flag(portion_id, EntityFlags::TRANSPARENT, transparent)
    }

    fn set_flag(&mut self, portion_id: u32, flag: EntityFlags, on: bool) -> LayerResult<()> {
        let index = self.check_portion(portion_id)?;
        let mut flags = self.portions[index].flags;
        flags.set(flag, on);
        self.set_flags(portion_id, flags)
    }

    /// Replace every flag of a portion at once.
    pub fn set_flags(&mut self, portion_id: u32, flags: EntityFlags) -> LayerResult<()> {
        let index = self.check_portion(portion_id)?;
        let old = self.portions[index].flags;
        if old == flags {
            return Ok(());
        }

        let (old_pass, new_pass) = (pass_bytes(old), pass_bytes(flags));
        if old_pass != new_pass {
            self.write_field(portion_id, InstanceField::Flags, &new_pass)?;
        }
        let (old_flags2, new_flags2) = (flags2_bytes(old), flags2_bytes(flags));
        if old_flags2 != new_flags2 {
            self.write_field(portion_id, InstanceField::Flags2, &new_flags2)?;
        }

        let changed = old ^ flags;
        for flag in EntityFlags::COUNTED {
            if changed.contains(flag) {
                let on = flags.contains(flag);
                self.counters.adjust(flag, on);
                if let Some(stats) = &self.model_stats {
                    stats.update(|c| c.adjust(flag, on));
                }
            }
        }

        self.portions[index].flags = flags;
        Ok(())
    }

    /// Rewrite the portion's RGBA bytes; alpha is the opacity.
    ///
    /// Transparency is not derived from the alpha, use [`set_transparent`](Self::set_transparent).
    pub fn set_color(&mut self, portion_id: u32, color: Color) -> LayerResult<()> {
        self.check_portion(portion_id)?;
        self.write_field(portion_id, InstanceField::Color, &color.to_rgba_u8())
    }

    /// Move a portion by `offset`, applied after its model matrix.
    pub fn set_offset(&mut self, portion_id: u32, offset: Vec3) -> LayerResult<()> {
        let index = self.check_portion(portion_id)?;
        if !self.offsets_enabled {
            return Err(LayerError::OffsetsDisabled);
        }
        let packed = PackedVec3::from(offset);
        self.write_field(portion_id, InstanceField::Offset, bytemuck::bytes_of(&packed))?;
        self.portions[index].offset = offset;
        Ok(())
    }

    /// Replace the model matrix of a portion.
    pub fn set_matrix(&mut self, portion_id: u32, matrix: Mat4) -> LayerResult<()> {
        let index = self.check_portion(portion_id)?;

        let rows = affine_rows(&matrix);
        self.write_field(portion_id, InstanceField::ModelRows, bytemuck::cast_slice(&rows))?;
        if self.geometry.has_normals() {
            let rows = affine_rows(&normal_matrix(&matrix));
            self.write_field(portion_id, InstanceField::NormalRows, bytemuck::cast_slice(&rows))?;
        }

        let aabb = self.world_aabb(&matrix);
        self.aabb.expand_aabb(&aabb);

        let portion = &mut self.portions[index];
        portion.matrix = matrix;
        portion.aabb = aabb;
        portion.invalidate_pick_caches();
        Ok(())
    }

    fn check_portion(&self, portion_id: u32) -> LayerResult<usize> {
        match self.state {
            LayerState::Building(_) => return Err(LayerError::NotFinalized),
            LayerState::Destroyed => return Err(LayerError::Destroyed),
            LayerState::Finalized(_) => {}
        }
        if portion_id as usize >= self.portions.len() {
            return Err(LayerError::UnknownPortion {
                portion_id,
                portion_count: self.portions.len() as u32,
            });
        }
        Ok(portion_id as usize)
    }

    fn write_field(&self, portion_id: u32, field: InstanceField, bytes: &[u8]) -> LayerResult<()> {
        let LayerState::Finalized(buffers) = &self.state else {
            return Err(LayerError::NotFinalized);
        };
        debug_assert_eq!(bytes.len(), field.size());
        buffers
            .instances
            .write_item(&*self.ctx, portion_id, field.offset(), bytes)
    }

    /// World-space box of the base geometry under `matrix`.
    fn world_aabb(&self, matrix: &Mat4) -> Aabb3 {
        Aabb3::from_points(
            self.geometry
                .obb()
                .iter()
                .map(|corner| matrix.transform_point3(*corner).as_dvec3() + self.origin),
        )
    }

    // ==========================================================================
    // Draw dispatch
    // ==========================================================================

    /// True when no portion can appear in any pass.
    fn nothing_shown(&self) -> bool {
        let c = &self.counters;
        c.num_culled == c.num_portions || c.num_visible == 0
    }

    fn all_xrayed(&self) -> bool {
        self.counters.num_xrayed == self.counters.num_portions
    }

    pub fn draw_color_opaque(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        let c = &self.counters;
        if self.nothing_shown() || c.num_transparent == c.num_portions || self.all_xrayed() {
            return false;
        }
        let with_sao = frame.with_sao && self.sao_enabled;
        self.issue(frame, target, RenderPass::ColorOpaque, DrawPrimitive::Triangles, |v, f| {
            v.color_program(f, with_sao)
        })
    }

    pub fn draw_color_transparent(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        if self.nothing_shown() || self.counters.num_transparent == 0 || self.all_xrayed() {
            return false;
        }
        self.issue(
            frame,
            target,
            RenderPass::ColorTransparent,
            DrawPrimitive::Triangles,
            |v, f| v.color_program(f, false),
        )
    }

    /// Depth of the opaque portions, for ambient occlusion.
    pub fn draw_depth(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        let c = &self.counters;
        if self.nothing_shown() || c.num_transparent == c.num_portions || self.all_xrayed() {
            return false;
        }
        self.issue(frame, target, RenderPass::ColorOpaque, DrawPrimitive::Triangles, |_, _| {
            ShaderProgram::Depth
        })
    }

    /// View-space normals of the opaque portions, for ambient occlusion.
    pub fn draw_normals(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        let c = &self.counters;
        if self.nothing_shown() || c.num_transparent == c.num_portions || self.all_xrayed() {
            return false;
        }
        self.issue(frame, target, RenderPass::ColorOpaque, DrawPrimitive::Triangles, |v, _| {
            v.normals_program()
        })
    }

    pub fn draw_silhouette_xrayed(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        if self.nothing_shown() || self.counters.num_xrayed == 0 {
            return false;
        }
        self.draw_silhouette(frame, target, RenderPass::SilhouetteXrayed)
    }

    pub fn draw_silhouette_highlighted(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        if self.nothing_shown() || self.counters.num_highlighted == 0 {
            return false;
        }
        self.draw_silhouette(frame, target, RenderPass::SilhouetteHighlighted)
    }

    pub fn draw_silhouette_selected(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        if self.nothing_shown() || self.counters.num_selected == 0 {
            return false;
        }
        self.draw_silhouette(frame, target, RenderPass::SilhouetteSelected)
    }

    fn draw_silhouette(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
        pass: RenderPass,
    ) -> bool {
        self.issue(frame, target, pass, DrawPrimitive::Triangles, |_, _| {
            ShaderProgram::Silhouette
        })
    }

    pub fn draw_edges_color_opaque(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        if self.nothing_shown() || self.counters.num_edges == 0 {
            return false;
        }
        self.draw_edges(frame, target, RenderPass::EdgesColorOpaque)
    }

    pub fn draw_edges_color_transparent(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        let c = &self.counters;
        if self.nothing_shown() || c.num_edges == 0 || c.num_transparent == 0 {
            return false;
        }
        self.draw_edges(frame, target, RenderPass::EdgesColorTransparent)
    }

    pub fn draw_edges_highlighted(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        if self.nothing_shown() || self.counters.num_highlighted == 0 {
            return false;
        }
        self.draw_edges(frame, target, RenderPass::EdgesHighlighted)
    }

    pub fn draw_edges_selected(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
    ) -> bool {
        if self.nothing_shown() || self.counters.num_selected == 0 {
            return false;
        }
        self.draw_edges(frame, target, RenderPass::EdgesSelected)
    }

    pub fn draw_edges_xrayed(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        if self.nothing_shown() || self.counters.num_xrayed == 0 {
            return false;
        }
        self.draw_edges(frame, target, RenderPass::EdgesXrayed)
    }

    fn draw_edges(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget, pass: RenderPass) -> bool {
        self.issue(frame, target, pass, DrawPrimitive::Lines, |_, _| ShaderProgram::Edges)
    }

    pub fn draw_occlusion(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        if self.nothing_shown() {
            return false;
        }
        self.issue(frame, target, RenderPass::ColorOpaque, DrawPrimitive::Triangles, |_, _| {
            ShaderProgram::Occlusion
        })
    }

    pub fn draw_shadow(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        if self.nothing_shown() {
            return false;
        }
        self.issue(frame, target, RenderPass::ColorOpaque, DrawPrimitive::Triangles, |_, _| {
            ShaderProgram::Shadow
        })
    }

    pub fn draw_pick_mesh(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        if self.nothing_shown() || self.counters.num_pickable == 0 {
            return false;
        }
        self.issue(frame, target, RenderPass::Pick, DrawPrimitive::Triangles, |_, _| {
            ShaderProgram::PickMesh
        })
    }

    pub fn draw_pick_depths(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        if self.nothing_shown() || self.counters.num_pickable == 0 {
            return false;
        }
        self.issue(frame, target, RenderPass::Pick, DrawPrimitive::Triangles, |_, _| {
            ShaderProgram::PickDepth
        })
    }

    pub fn draw_pick_normals(&self, frame: &mut FrameContext, target: &mut dyn DrawTarget) -> bool {
        if self.nothing_shown() || self.counters.num_pickable == 0 {
            return false;
        }
        self.issue(frame, target, RenderPass::Pick, DrawPrimitive::Triangles, |v, _| {
            v.pick_normals_program()
        })
    }

    fn issue(
        &self,
        frame: &mut FrameContext,
        target: &mut dyn DrawTarget,
        pass: RenderPass,
        primitive: DrawPrimitive,
        program: impl FnOnce(&VariantTable, &FrameContext) -> ShaderProgram,
    ) -> bool {
        profile_scope!("instanced_layer_draw");

        let LayerState::Finalized(buffers) = &self.state else {
            tracing::debug!("layer '{}' is not drawable, skipping {:?}", self.label, pass);
            return false;
        };

        let (indices, index_count) = match primitive {
            DrawPrimitive::Triangles => (&buffers.geometry.indices, buffers.geometry.indices.len()),
            DrawPrimitive::Lines => match &buffers.geometry.edge_indices {
                Some(edges) => (edges, edges.len()),
                None => return false,
            },
        };

        if frame.backfaces != self.backfaces {
            frame.backfaces = self.backfaces;
        }

        let call = DrawCall {
            pass,
            program: program(&buffers.variants, frame),
            primitive,
            cull_backfaces: !self.backfaces,
            geometry: &buffers.geometry,
            instances: &buffers.instances,
            indices,
            index_count,
            instance_count: self.portions.len() as u32,
            origin: self.origin,
            positions_decode_matrix: *self.geometry.decode_matrix(),
            texture_set: self.texture_set.as_deref(),
        };
        target.draw(&call);
        true
    }

    // ==========================================================================
    // Picking
    // ==========================================================================

    /// Intersect a world-space ray with one portion's triangles.
    ///
    /// Every triangle is tested in the portion's local space, from both sides.
    /// When the ray crosses the surface more than once, the hit farthest from
    /// the ray origin is returned.
    pub fn precision_ray_pick_surface(
        &mut self,
        portion_id: u32,
        ray: &WorldRay,
        want_normal: bool,
    ) -> Option<SurfaceHit> {
        profile_function!();

        if matches!(self.state, LayerState::Destroyed) {
            tracing::error!("pick on destroyed layer '{}'", self.label);
            return None;
        }
        let Some(portion) = self.portions.get_mut(portion_id as usize) else {
            tracing::error!(
                "pick on unknown portion {} of layer '{}' ({} portions)",
                portion_id,
                self.label,
                self.portions.len()
            );
            return None;
        };

        let matrix = portion.matrix;
        let offset = portion.offset;
        let inverse = *portion.inverse.get_or_insert_with(|| matrix.inverse());
        let normal = want_normal.then(|| *portion.normal.get_or_insert_with(|| normal_matrix(&matrix)));

        let relative = (ray.origin - self.origin).as_vec3() - offset;
        let local_origin = inverse.transform_point3(relative);
        let local_direction = inverse.transform_vector3(ray.direction);

        let mut best: Option<(f64, DVec3, [Vec3; 3])> = None;
        for triangle in self.geometry.triangles() {
            let Some(t) = ray_triangle_intersect(local_origin, local_direction, &triangle) else {
                continue;
            };
            let local = local_origin + local_direction * t;
            let world = (matrix.transform_point3(local) + offset).as_dvec3() + self.origin;
            let distance = world.distance(ray.origin);
            if best.is_none_or(|(farthest, _, _)| distance > farthest) {
                best = Some((distance, world, triangle));
            }
        }

        let (distance, world_position, triangle) = best?;
        let world_normal = normal.map(|normal| {
            let local = (triangle[1] - triangle[0]).cross(triangle[2] - triangle[0]);
            normal.transform_vector3(local).normalize_or_zero()
        });

        Some(SurfaceHit {
            world_position,
            world_normal,
            distance,
        })
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn num_portions(&self) -> u32 {
        self.portions.len() as u32
    }

    pub fn counters(&self) -> &PortionCounters {
        &self.counters
    }

    /// World-space bounds of every portion created so far.
    pub fn aabb(&self) -> &Aabb3 {
        &self.aabb
    }

    pub fn portion_aabb(&self, portion_id: u32) -> Option<&Aabb3> {
        self.portions.get(portion_id as usize).map(|p| &p.aabb)
    }

    pub fn portion_flags(&self, portion_id: u32) -> Option<EntityFlags> {
        self.portions.get(portion_id as usize).map(|p| p.flags)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, LayerState::Finalized(_))
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, LayerState::Destroyed)
    }

    /// What the layer can feed its shaders. `None` until finalized.
    pub fn layer_capabilities(&self) -> Option<Capabilities> {
        match &self.state {
            LayerState::Finalized(buffers) => Some(buffers.capabilities),
            _ => None,
        }
    }

    /// The GPU buffer holding one [`InstanceRecord`] per portion.
    pub fn instance_buffer(&self) -> Option<&GpuBuffer> {
        match &self.state {
            LayerState::Finalized(buffers) => buffers.instances.gpu_buffer(),
            _ => None,
        }
    }
}
