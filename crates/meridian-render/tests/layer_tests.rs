//! Instanced layer behavior against the mock render context.

use meridian_core::Color;
use meridian_core::math::{DVec3, Mat4, Vec3};
use meridian_render::{
    DrawCall, DrawPrimitive, DrawTarget, EntityFlags, FrameContext, GeometryDescriptor,
    InstanceField, InstancedLayer, LayerDescriptor, LayerError, ModelStats, PortionDescriptor,
    RenderPass, ShaderProgram, TextureSet, WorldRay,
};
use meridian_test_utils::{GpuTexture, MockRenderContext, RenderContext};
use std::sync::Arc;

const RECORD: usize = 128;

/// Cube spanning -1..1 on every axis.
fn cube() -> GeometryDescriptor {
    let positions = [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    #[rustfmt::skip]
    let indices = vec![
        4, 5, 6, 4, 6, 7, // +z
        1, 0, 3, 1, 3, 2, // -z
        5, 1, 2, 5, 2, 6, // +x
        0, 4, 7, 0, 7, 3, // -x
        7, 6, 2, 7, 2, 3, // +y
        0, 1, 5, 0, 5, 4, // -y
    ];
    GeometryDescriptor::from_positions(&positions, indices)
}

fn cube_with_normals() -> GeometryDescriptor {
    cube().with_normals(&[Vec3::new(0.577, 0.577, 0.577); 8])
}

fn setup() -> (Arc<MockRenderContext>, Arc<dyn RenderContext>) {
    let mock = Arc::new(MockRenderContext::new());
    let ctx: Arc<dyn RenderContext> = mock.clone();
    (mock, ctx)
}

fn finalized_layer(ctx: Arc<dyn RenderContext>, geometry: GeometryDescriptor, portions: u32) -> InstancedLayer {
    let mut layer = InstancedLayer::new(ctx, LayerDescriptor::new("test"), geometry).unwrap();
    for _ in 0..portions {
        layer.create_portion(&PortionDescriptor::default()).unwrap();
    }
    layer.finalize().unwrap();
    layer
}

fn show_all(layer: &mut InstancedLayer) {
    for id in 0..layer.num_portions() {
        layer.set_visible(id, true).unwrap();
        layer.set_pickable(id, true).unwrap();
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RecordedDraw {
    pass: RenderPass,
    program: ShaderProgram,
    primitive: DrawPrimitive,
    cull_backfaces: bool,
    index_count: u32,
    instance_count: u32,
}

#[derive(Default)]
struct RecordingTarget {
    draws: Vec<RecordedDraw>,
}

impl DrawTarget for RecordingTarget {
    fn draw(&mut self, call: &DrawCall<'_>) {
        self.draws.push(RecordedDraw {
            pass: call.pass,
            program: call.program,
            primitive: call.primitive,
            cull_backfaces: call.cull_backfaces,
            index_count: call.index_count,
            instance_count: call.instance_count,
        });
    }
}

// ============================================================================
// Portion creation
// ============================================================================

#[test]
fn test_portion_ids_follow_call_order() {
    let (_mock, ctx) = setup();
    let mut layer = InstancedLayer::new(ctx, LayerDescriptor::new("ids"), cube()).unwrap();

    let ids: Vec<u32> = (0..5)
        .map(|_| layer.create_portion(&PortionDescriptor::default()).unwrap())
        .collect();

    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(layer.counters().num_portions, 5);
}

#[test]
fn test_layer_aabb_grows_monotonically() {
    let (_mock, ctx) = setup();
    let desc = LayerDescriptor::new("aabb").with_origin(DVec3::new(1000.0, 0.0, 0.0));
    let mut layer = InstancedLayer::new(ctx, desc, cube()).unwrap();

    let mut previous = *layer.aabb();
    for i in 0..6 {
        let step = i as f32 * 3.0;
        layer
            .create_portion(&PortionDescriptor {
                mesh_matrix: Mat4::from_translation(Vec3::new(step, -step, 0.5 * step)),
                ..Default::default()
            })
            .unwrap();
        let current = *layer.aabb();
        assert!(current.contains_aabb(&previous), "step {i}");
        previous = current;
    }

    let first = layer.portion_aabb(0).unwrap();
    assert!((first.min.x - 999.0).abs() < 1e-3);
    assert!((first.max.x - 1001.0).abs() < 1e-3);
}

#[test]
fn test_world_matrix_applies_after_mesh_matrix() {
    let (_mock, ctx) = setup();
    let mut layer = InstancedLayer::new(ctx, LayerDescriptor::new("world"), cube()).unwrap();
    layer
        .create_portion(&PortionDescriptor {
            mesh_matrix: Mat4::from_scale(Vec3::splat(2.0)),
            world_matrix: Some(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))),
            ..Default::default()
        })
        .unwrap();

    let aabb = layer.portion_aabb(0).unwrap();
    assert!((aabb.min.x - 8.0).abs() < 1e-3);
    assert!((aabb.max.x - 12.0).abs() < 1e-3);
}

#[test]
fn test_initial_instance_record() {
    let (mock, ctx) = setup();
    let mut layer = InstancedLayer::new(ctx, LayerDescriptor::new("record"), cube()).unwrap();
    layer
        .create_portion(&PortionDescriptor {
            color: Color::rgb(1.0, 0.0, 0.0),
            opacity: 0.5,
            metallic: 1.0,
            roughness: 0.0,
            pick_color: [1, 2, 3, 4],
            ..Default::default()
        })
        .unwrap();
    layer.finalize().unwrap();

    let bytes = mock.buffer_contents(layer.instance_buffer().unwrap()).unwrap();
    assert_eq!(&bytes[0..4], &[255, 0, 0, 128]);
    assert_eq!(&bytes[4..8], &[255, 0, 0, 0]);
    assert_eq!(&bytes[8..16], &[0; 8]);
    assert_eq!(&bytes[16..20], &[1, 2, 3, 4]);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_create_after_finalize_fails() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);

    assert_eq!(
        layer.create_portion(&PortionDescriptor::default()),
        Err(LayerError::AlreadyFinalized)
    );
    assert_eq!(layer.num_portions(), 1);
}

#[test]
fn test_finalize_twice_fails() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);
    let creates = mock.count_buffer_creates();

    assert_eq!(layer.finalize(), Err(LayerError::AlreadyFinalized));
    assert_eq!(mock.count_buffer_creates(), creates);
}

#[test]
fn test_mutators_require_finalize() {
    let (mock, ctx) = setup();
    let mut layer = InstancedLayer::new(ctx, LayerDescriptor::new("early"), cube()).unwrap();
    layer.create_portion(&PortionDescriptor::default()).unwrap();

    assert_eq!(layer.set_visible(0, true), Err(LayerError::NotFinalized));
    assert_eq!(layer.set_color(0, Color::RED), Err(LayerError::NotFinalized));
    assert_eq!(layer.counters().num_visible, 0);
    assert_eq!(mock.count_buffer_writes(), 0);
}

#[test]
fn test_unknown_portion_is_rejected() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 2);

    assert_eq!(
        layer.set_selected(7, true),
        Err(LayerError::UnknownPortion {
            portion_id: 7,
            portion_count: 2
        })
    );
    assert_eq!(layer.counters().num_selected, 0);
}

#[test]
fn test_offset_requires_offsets_enabled() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);
    assert_eq!(
        layer.set_offset(0, Vec3::X),
        Err(LayerError::OffsetsDisabled)
    );
}

#[test]
fn test_finalize_releases_nothing_and_uploads_once() {
    let (mock, ctx) = setup();
    let layer = finalized_layer(ctx, cube_with_normals().with_edge_indices(vec![0, 1, 1, 2]), 3);

    // positions, normals, indices, edge indices, instances
    assert_eq!(mock.count_buffer_creates(), 5);
    assert_eq!(mock.live_buffer_count(), 5);
    assert!(layer.is_finalized());
}

#[test]
fn test_destroy_releases_every_buffer_once() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube_with_normals(), 2);
    let created = mock.count_buffer_creates();

    layer.destroy();
    layer.destroy();

    assert_eq!(mock.count_buffer_destroys(), created);
    assert_eq!(mock.live_buffer_count(), 0);
    assert!(layer.is_destroyed());
    assert_eq!(layer.set_visible(0, true), Err(LayerError::Destroyed));
    assert!(layer.instance_buffer().is_none());
}

#[test]
fn test_destroy_before_finalize_creates_nothing() {
    let (mock, ctx) = setup();
    let mut layer = InstancedLayer::new(ctx, LayerDescriptor::new("unused"), cube()).unwrap();
    layer.create_portion(&PortionDescriptor::default()).unwrap();

    layer.destroy();

    assert_eq!(mock.count_buffer_creates(), 0);
    assert_eq!(layer.finalize(), Err(LayerError::Destroyed));
}

#[test]
fn test_invalid_geometry() {
    let (_mock, ctx) = setup();
    let mut geometry = cube();
    geometry.indices.push(0);

    let result = InstancedLayer::new(ctx, LayerDescriptor::new("bad"), geometry);
    assert!(matches!(result, Err(LayerError::InvalidGeometry(_))));
}

// ============================================================================
// Counters and partial updates
// ============================================================================

#[test]
fn test_counters_track_latest_flag_state() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 8);

    let mut expected = [[false; 3]; 8];
    let mut seed: u32 = 12345;
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
        let portion = (seed >> 8) % 8;
        let which = (seed >> 16) % 3;
        let on = (seed >> 20) & 1 == 1;

        match which {
            0 => layer.set_visible(portion, on).unwrap(),
            1 => layer.set_selected(portion, on).unwrap(),
            _ => layer.set_transparent(portion, on).unwrap(),
        }
        expected[portion as usize][which as usize] = on;
    }

    let count = |which: usize| expected.iter().filter(|p| p[which]).count() as u32;
    let counters = layer.counters();
    assert_eq!(counters.num_visible, count(0));
    assert_eq!(counters.num_selected, count(1));
    assert_eq!(counters.num_transparent, count(2));
}

#[test]
fn test_repeated_flag_is_a_no_op() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 2);

    layer.set_visible(1, true).unwrap();
    let writes = mock.count_buffer_writes();
    layer.set_visible(1, true).unwrap();

    assert_eq!(layer.counters().num_visible, 1);
    assert_eq!(mock.count_buffer_writes(), writes);
}

#[test]
fn test_set_visible_writes_four_flag_bytes() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 3);

    layer.set_visible(2, true).unwrap();

    let buffer = layer.instance_buffer().unwrap();
    let expected_offset = (2 * RECORD) as u64 + InstanceField::Flags.offset();
    assert_eq!(mock.writes_to(buffer).last(), Some(&(expected_offset, 4)));

    let bytes = mock.buffer_contents(buffer).unwrap();
    let flags = &bytes[expected_offset as usize..expected_offset as usize + 4];
    assert_eq!(flags[0], RenderPass::ColorOpaque.as_u8());
}

#[test]
fn test_clippable_writes_flags2_only() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);
    mock.clear_calls();

    layer.set_clippable(0, true).unwrap();

    let buffer = layer.instance_buffer().unwrap();
    assert_eq!(
        mock.writes_to(buffer),
        vec![(InstanceField::Flags2.offset(), 4)]
    );
    assert_eq!(layer.counters().num_clippable, 1);
}

#[test]
fn test_color_update_leaves_other_portions_untouched() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 4);
    let buffer = layer.instance_buffer().unwrap().clone();
    let before = mock.buffer_contents(&buffer).unwrap();

    layer.set_color(1, Color::rgba(0.0, 1.0, 0.0, 1.0)).unwrap();

    let after = mock.buffer_contents(&buffer).unwrap();
    for portion in [0, 2, 3] {
        let range = portion * RECORD..(portion + 1) * RECORD;
        assert_eq!(&before[range.clone()], &after[range], "portion {portion}");
    }
    assert_eq!(&after[RECORD..RECORD + 4], &[0, 255, 0, 255]);
    assert_eq!(mock.writes_to(&buffer).last(), Some(&(RECORD as u64, 4)));
}

#[test]
fn test_emphasis_byte_prefers_selected() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);

    let flags = EntityFlags::VISIBLE
        | EntityFlags::PICKABLE
        | EntityFlags::HIGHLIGHTED
        | EntityFlags::SELECTED;
    layer.set_flags(0, flags).unwrap();

    let bytes = mock.buffer_contents(layer.instance_buffer().unwrap()).unwrap();
    let offset = InstanceField::Flags.offset() as usize;
    assert_eq!(bytes[offset + 1], RenderPass::SilhouetteSelected.as_u8());
    assert_eq!(bytes[offset + 3], RenderPass::Pick.as_u8());
    assert_eq!(layer.counters().num_highlighted, 1);
    assert_eq!(layer.counters().num_selected, 1);
}

#[test]
fn test_set_matrix_rewrites_model_and_normal_rows() {
    let (mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube_with_normals(), 2);
    mock.clear_calls();

    layer
        .set_matrix(1, Mat4::from_translation(Vec3::new(0.0, 50.0, 0.0)))
        .unwrap();

    let buffer = layer.instance_buffer().unwrap();
    let base = RECORD as u64;
    assert_eq!(
        mock.writes_to(buffer),
        vec![
            (base + InstanceField::ModelRows.offset(), 48),
            (base + InstanceField::NormalRows.offset(), 48),
        ]
    );
    assert!(layer.aabb().max.y > 50.0);
}

#[test]
fn test_model_stats_are_shared_between_layers() {
    let (_mock, ctx) = setup();
    let stats = Arc::new(ModelStats::new());

    let mut layers: Vec<InstancedLayer> = (0..2)
        .map(|i| {
            let desc = LayerDescriptor::new(format!("layer {i}")).with_model_stats(stats.clone());
            let mut layer = InstancedLayer::new(ctx.clone(), desc, cube()).unwrap();
            layer.create_portion(&PortionDescriptor::default()).unwrap();
            layer.create_portion(&PortionDescriptor::default()).unwrap();
            layer.finalize().unwrap();
            layer
        })
        .collect();

    layers[0].set_visible(0, true).unwrap();
    layers[1].set_visible(1, true).unwrap();
    layers[1].set_highlighted(1, true).unwrap();

    assert_eq!(stats.counters().num_portions, 4);
    assert_eq!(stats.counters().num_visible, 2);
    assert_eq!(stats.counters().num_highlighted, 1);

    layers[1].destroy();
    assert_eq!(stats.counters().num_portions, 2);
    assert_eq!(stats.counters().num_visible, 1);
    assert_eq!(stats.counters().num_highlighted, 0);
}

// ============================================================================
// Draw dispatch
// ============================================================================

#[test]
fn test_nothing_visible_skips_every_pass() {
    let (_mock, ctx) = setup();
    let layer = finalized_layer(ctx, cube(), 3);
    let mut frame = FrameContext::default();
    let mut target = RecordingTarget::default();

    assert!(!layer.draw_color_opaque(&mut frame, &mut target));
    assert!(!layer.draw_depth(&mut frame, &mut target));
    assert!(!layer.draw_occlusion(&mut frame, &mut target));
    assert!(!layer.draw_pick_mesh(&mut frame, &mut target));
    assert!(target.draws.is_empty());
}

#[test]
fn test_all_culled_skips_every_pass() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 2);
    show_all(&mut layer);
    layer.set_culled(0, true).unwrap();
    layer.set_culled(1, true).unwrap();

    let mut frame = FrameContext::default();
    let mut target = RecordingTarget::default();
    assert!(!layer.draw_color_opaque(&mut frame, &mut target));
    assert!(!layer.draw_shadow(&mut frame, &mut target));

    layer.set_culled(1, false).unwrap();
    assert!(layer.draw_color_opaque(&mut frame, &mut target));
}

#[test]
fn test_draw_before_finalize_is_skipped() {
    let (_mock, ctx) = setup();
    let layer = InstancedLayer::new(ctx, LayerDescriptor::new("early"), cube()).unwrap();
    let mut target = RecordingTarget::default();

    assert!(!layer.draw_color_opaque(&mut FrameContext::default(), &mut target));
    assert!(target.draws.is_empty());
}

#[test]
fn test_opaque_and_transparent_passes() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 2);
    show_all(&mut layer);
    let mut frame = FrameContext::default();
    let mut target = RecordingTarget::default();

    assert!(layer.draw_color_opaque(&mut frame, &mut target));
    assert!(!layer.draw_color_transparent(&mut frame, &mut target));

    layer.set_transparent(0, true).unwrap();
    assert!(layer.draw_color_opaque(&mut frame, &mut target));
    assert!(layer.draw_color_transparent(&mut frame, &mut target));

    layer.set_transparent(1, true).unwrap();
    assert!(!layer.draw_color_opaque(&mut frame, &mut target));
    assert!(!layer.draw_depth(&mut frame, &mut target));

    let passes: Vec<RenderPass> = target.draws.iter().map(|d| d.pass).collect();
    assert_eq!(
        passes,
        vec![
            RenderPass::ColorOpaque,
            RenderPass::ColorOpaque,
            RenderPass::ColorTransparent,
        ]
    );
    let draw = &target.draws[0];
    assert_eq!(draw.primitive, DrawPrimitive::Triangles);
    assert_eq!(draw.index_count, 36);
    assert_eq!(draw.instance_count, 2);
}

#[test]
fn test_all_xrayed_skips_color_but_draws_silhouette() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);
    show_all(&mut layer);
    layer.set_xrayed(0, true).unwrap();

    let mut frame = FrameContext::default();
    let mut target = RecordingTarget::default();
    assert!(!layer.draw_color_opaque(&mut frame, &mut target));
    assert!(layer.draw_silhouette_xrayed(&mut frame, &mut target));
    assert!(!layer.draw_silhouette_selected(&mut frame, &mut target));
    assert!(!layer.draw_silhouette_highlighted(&mut frame, &mut target));

    assert_eq!(target.draws.len(), 1);
    assert_eq!(target.draws[0].pass, RenderPass::SilhouetteXrayed);
    assert_eq!(target.draws[0].program, ShaderProgram::Silhouette);
}

#[test]
fn test_edge_passes_need_edge_indices() {
    let (_mock, ctx) = setup();
    let mut plain = finalized_layer(ctx.clone(), cube(), 1);
    show_all(&mut plain);
    plain.set_edges(0, true).unwrap();

    let mut frame = FrameContext::default();
    let mut target = RecordingTarget::default();
    assert!(!plain.draw_edges_color_opaque(&mut frame, &mut target));

    let mut edged = finalized_layer(ctx, cube().with_edge_indices(vec![0, 1, 1, 2, 2, 3]), 1);
    show_all(&mut edged);
    assert!(!edged.draw_edges_color_opaque(&mut frame, &mut target));
    edged.set_edges(0, true).unwrap();
    assert!(edged.draw_edges_color_opaque(&mut frame, &mut target));
    assert!(!edged.draw_edges_color_transparent(&mut frame, &mut target));

    edged.set_selected(0, true).unwrap();
    assert!(edged.draw_edges_selected(&mut frame, &mut target));
    assert!(!edged.draw_edges_highlighted(&mut frame, &mut target));

    assert_eq!(target.draws.len(), 2);
    for draw in &target.draws {
        assert_eq!(draw.primitive, DrawPrimitive::Lines);
        assert_eq!(draw.index_count, 6);
        assert_eq!(draw.program, ShaderProgram::Edges);
    }
}

#[test]
fn test_pick_passes_need_pickable_portions() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);
    layer.set_visible(0, true).unwrap();

    let mut frame = FrameContext::default();
    let mut target = RecordingTarget::default();
    assert!(!layer.draw_pick_mesh(&mut frame, &mut target));

    layer.set_pickable(0, true).unwrap();
    assert!(layer.draw_pick_mesh(&mut frame, &mut target));
    assert!(layer.draw_pick_depths(&mut frame, &mut target));
    assert!(layer.draw_pick_normals(&mut frame, &mut target));

    let programs: Vec<ShaderProgram> = target.draws.iter().map(|d| d.program).collect();
    assert_eq!(
        programs,
        vec![
            ShaderProgram::PickMesh,
            ShaderProgram::PickDepth,
            ShaderProgram::PickNormalsFlat,
        ]
    );
}

#[test]
fn test_backfaces_update_frame_state() {
    let (_mock, ctx) = setup();
    let desc = LayerDescriptor::new("two-sided").with_backfaces(true);
    let mut layer = InstancedLayer::new(ctx, desc, cube()).unwrap();
    layer.create_portion(&PortionDescriptor::default()).unwrap();
    layer.finalize().unwrap();
    show_all(&mut layer);

    let mut frame = FrameContext::default();
    let mut target = RecordingTarget::default();
    assert!(!frame.backfaces);
    assert!(layer.draw_color_opaque(&mut frame, &mut target));

    assert!(frame.backfaces);
    assert!(!target.draws[0].cull_backfaces);
}

#[test]
fn test_color_program_selection() {
    let (_mock, ctx) = setup();
    let mut lambert = finalized_layer(ctx.clone(), cube_with_normals(), 1);
    show_all(&mut lambert);

    let mut frame = FrameContext {
        with_sao: true,
        ..Default::default()
    };
    let mut target = RecordingTarget::default();
    lambert.draw_color_opaque(&mut frame, &mut target);
    lambert.draw_normals(&mut frame, &mut target);
    lambert.set_transparent(0, true).unwrap();
    lambert.draw_color_transparent(&mut frame, &mut target);

    let textures = Arc::new(
        TextureSet::new("brick")
            .with_color(GpuTexture::mock(0, 4, 4, wgpu::TextureFormat::Rgba8UnormSrgb))
            .with_metallic_roughness(GpuTexture::mock(1, 4, 4, wgpu::TextureFormat::Rgba8Unorm)),
    );
    let desc = LayerDescriptor::new("pbr")
        .with_texture_set(textures)
        .with_sao(false);
    let geometry = cube_with_normals().with_uvs(vec![[0.0, 0.0]; 8]);
    let mut pbr = InstancedLayer::new(ctx, desc, geometry).unwrap();
    pbr.create_portion(&PortionDescriptor::default()).unwrap();
    pbr.finalize().unwrap();
    show_all(&mut pbr);
    pbr.draw_color_opaque(&mut frame, &mut target);

    frame.pbr_enabled = false;
    pbr.draw_color_opaque(&mut frame, &mut target);

    let programs: Vec<ShaderProgram> = target.draws.iter().map(|d| d.program).collect();
    assert_eq!(
        programs,
        vec![
            ShaderProgram::LambertWithSao,
            ShaderProgram::Normals,
            ShaderProgram::Lambert,
            ShaderProgram::Pbr,
            ShaderProgram::ColorTexture,
        ]
    );
}

// ============================================================================
// Picking
// ============================================================================

// Picking keeps the intersection farthest from the ray origin, so a ray
// through a closed mesh reports the far side.
#[test]
fn test_pick_returns_farthest_surface() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);

    let ray = WorldRay::new(DVec3::new(0.1, 0.2, 5.0), Vec3::NEG_Z);
    let hit = layer.precision_ray_pick_surface(0, &ray, true).unwrap();

    assert!((hit.world_position.z + 1.0).abs() < 1e-3);
    assert!((hit.distance - 6.0).abs() < 1e-3);
    let normal = hit.world_normal.unwrap();
    assert!((normal.z.abs() - 1.0).abs() < 1e-3);
}

#[test]
fn test_pick_accounts_for_origin_matrix_and_offset() {
    let (_mock, ctx) = setup();
    let desc = LayerDescriptor::new("far away")
        .with_origin(DVec3::new(1.0e6, 0.0, 0.0))
        .with_offsets(true);
    let mut layer = InstancedLayer::new(ctx, desc, cube()).unwrap();
    layer
        .create_portion(&PortionDescriptor {
            mesh_matrix: Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)),
            ..Default::default()
        })
        .unwrap();
    layer.finalize().unwrap();
    layer.set_offset(0, Vec3::new(2.0, 0.0, 0.0)).unwrap();

    let ray = WorldRay::new(DVec3::new(1.0e6 + 2.1, 0.2, 20.0), Vec3::NEG_Z);
    let hit = layer.precision_ray_pick_surface(0, &ray, false).unwrap();

    assert!((hit.world_position.x - (1.0e6 + 2.1)).abs() < 1e-3);
    assert!((hit.world_position.z - 9.0).abs() < 1e-3);
    assert!(hit.world_normal.is_none());

    let miss = WorldRay::new(DVec3::new(1.0e6, 0.2, 20.0), Vec3::NEG_Z);
    assert!(layer.precision_ray_pick_surface(0, &miss, false).is_none());
}

#[test]
fn test_pick_uses_updated_matrix() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);
    let ray = WorldRay::new(DVec3::new(30.0, 0.0, 5.0), Vec3::NEG_Z);

    assert!(layer.precision_ray_pick_surface(0, &ray, false).is_none());
    layer
        .set_matrix(0, Mat4::from_translation(Vec3::new(30.0, 0.0, 0.0)))
        .unwrap();
    assert!(layer.precision_ray_pick_surface(0, &ray, false).is_some());
}

#[test]
fn test_pick_unknown_portion_returns_none() {
    let (_mock, ctx) = setup();
    let mut layer = finalized_layer(ctx, cube(), 1);
    let ray = WorldRay::new(DVec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

    assert!(layer.precision_ray_pick_surface(3, &ray, false).is_none());
    layer.destroy();
    assert!(layer.precision_ray_pick_surface(0, &ray, false).is_none());
}

// ============================================================================
// Real GPU
// ============================================================================

#[test]
#[ignore] // Requires GPU - run with: cargo test --test layer_tests -- --ignored
fn test_layer_on_real_device() {
    let Ok(gpu) = meridian_render::GraphicsContext::new_owned_sync() else {
        println!("GPU not available");
        return;
    };
    let ctx: Arc<dyn RenderContext> = gpu;

    let mut layer = finalized_layer(ctx, cube_with_normals(), 16);
    show_all(&mut layer);
    layer.set_color(3, Color::BLUE).unwrap();
    layer.destroy();
    assert!(layer.is_destroyed());
}
