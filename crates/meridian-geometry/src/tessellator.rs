//! Shape fill tessellation using Lyon.

use glam::Vec2;
use lyon::lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex as LyonFillVertex, VertexBuffers,
};
use lyon::math::point;
use lyon::path::{FillRule as LyonFillRule, PathEvent};
use meridian_core::profiling::profile_function;

use crate::shape::Shape;
use crate::shape_path::ShapePath;
use crate::vertex::{FillVertex, TessellatedMesh};

/// Triangulates flattened shapes.
pub struct Tessellator {
    fill_tessellator: FillTessellator,
    /// Flattening tolerance handed to Lyon. Contours are already flat, so this
    /// only matters for Lyon's internal vertex merging.
    pub tolerance: f32,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Self::with_tolerance(0.1)
    }

    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            fill_tessellator: FillTessellator::new(),
            tolerance,
        }
    }

    /// Fill a shape, leaving its holes open.
    ///
    /// Holes are already attached to their outline, so the outline and hole
    /// contours are filled with the even-odd rule whatever their winding.
    pub fn tessellate_shape(&mut self, shape: &Shape, divisions: usize) -> TessellatedMesh<FillVertex> {
        let (outline, holes) = shape.extract_points(divisions);

        let mut events = Vec::new();
        push_contour(&mut events, &outline);
        for hole in &holes {
            push_contour(&mut events, hole);
        }
        if events.is_empty() {
            return TessellatedMesh::new();
        }

        let mut buffers: VertexBuffers<FillVertex, u32> = VertexBuffers::new();
        let options = FillOptions::default()
            .with_tolerance(self.tolerance)
            .with_fill_rule(LyonFillRule::EvenOdd);

        let result = self.fill_tessellator.tessellate(
            events,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |vertex: LyonFillVertex| {
                FillVertex::new(vertex.position().x, vertex.position().y)
            }),
        );

        if let Err(err) = result {
            tracing::warn!("Fill tessellation failed: {:?}", err);
            return TessellatedMesh::new();
        }

        TessellatedMesh::from_data(buffers.vertices, buffers.indices)
    }

    /// Split a shape path into shapes and fill them all into one mesh.
    pub fn tessellate_shape_path(&mut self, shape_path: &ShapePath, divisions: usize) -> TessellatedMesh<FillVertex> {
        profile_function!();

        let mut mesh = TessellatedMesh::new();
        for shape in shape_path.to_shapes(divisions) {
            mesh.append(self.tessellate_shape(&shape, divisions));
        }
        mesh
    }
}

/// Closed polygon events for one contour. Contours under three points are skipped.
fn push_contour(events: &mut Vec<PathEvent>, points: &[Vec2]) {
    let mut points = points;
    // The closing edge is implied, drop a repeated first point.
    if points.len() > 1 && points.first() == points.last() {
        points = &points[..points.len() - 1];
    }
    if points.len() < 3 {
        return;
    }

    let first = point(points[0].x, points[0].y);
    events.push(PathEvent::Begin { at: first });
    let mut last = first;
    for p in &points[1..] {
        let to = point(p.x, p.y);
        events.push(PathEvent::Line { from: last, to });
        last = to;
    }
    events.push(PathEvent::End {
        last,
        first,
        close: true,
    });
}
