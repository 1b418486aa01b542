//! Stroke outlines as triangle lists.
//!
//! A polyline is widened into triangles with joins at interior points and caps
//! at open ends. Output is a flat, non-indexed list: three floats of position
//! (z = 0), three floats of normal (0, 0, 1) and two floats of uv per vertex.
//! The u coordinate runs along the line, v is 0 on the left edge, 1 on the
//! right edge and 0.5 on the center line.

use std::borrow::Cow;
use std::f32::consts::PI;

use glam::Vec2;

use crate::style::{LineCap, LineJoin, NodeStyle};

/// Default number of triangles per round join or cap.
pub const DEFAULT_ARC_DIVISIONS: usize = 12;

/// Points closer than this are treated as duplicates.
pub const DEFAULT_MIN_DISTANCE: f32 = 0.001;

/// Stroke properties for outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
    pub miter_limit: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            miter_limit: 4.0,
        }
    }
}

impl StrokeStyle {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    pub fn with_join(mut self, line_join: LineJoin) -> Self {
        self.line_join = line_join;
        self
    }

    pub fn with_cap(mut self, line_cap: LineCap) -> Self {
        self.line_cap = line_cap;
        self
    }

    pub fn with_miter_limit(mut self, miter_limit: f32) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    /// Stroke settings of a parsed SVG node.
    pub fn from_node_style(style: &NodeStyle) -> Self {
        Self {
            width: style.stroke_width,
            line_join: LineJoin::parse(&style.stroke_line_join),
            line_cap: LineCap::parse(&style.stroke_line_cap),
            miter_limit: style.stroke_miter_limit,
        }
    }
}

/// Caller-owned output buffers.
///
/// Writes that fall outside a buffer are dropped.
#[derive(Debug)]
pub struct StrokeBuffers<'a> {
    pub positions: &'a mut [f32],
    pub normals: Option<&'a mut [f32]>,
    pub uvs: Option<&'a mut [f32]>,
}

/// Owned stroke triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeGeometry {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
}

impl StrokeGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, index: usize) -> Vec2 {
        Vec2::new(self.positions[index * 3], self.positions[index * 3 + 1])
    }
}

/// Number of vertices the stroke of `points` needs.
pub fn stroke_vertex_count(points: &[Vec2], style: &StrokeStyle, arc_divisions: usize, min_distance: f32) -> usize {
    points_to_stroke_with_buffers(points, style, arc_divisions, min_distance, None, 0)
}

/// Stroke `points` into freshly allocated buffers.
///
/// Returns `None` when fewer than two distinct points remain.
pub fn points_to_stroke(
    points: &[Vec2],
    style: &StrokeStyle,
    arc_divisions: usize,
    min_distance: f32,
) -> Option<StrokeGeometry> {
    let count = stroke_vertex_count(points, style, arc_divisions, min_distance);
    if count == 0 {
        return None;
    }

    let mut geometry = StrokeGeometry {
        positions: vec![0.0; count * 3],
        normals: vec![0.0; count * 3],
        uvs: vec![0.0; count * 2],
    };
    points_to_stroke_with_buffers(
        points,
        style,
        arc_divisions,
        min_distance,
        Some(StrokeBuffers {
            positions: &mut geometry.positions,
            normals: Some(&mut geometry.normals),
            uvs: Some(&mut geometry.uvs),
        }),
        0,
    );
    Some(geometry)
}

/// Stroke `points` into caller buffers starting at vertex `vertex_offset`.
///
/// Returns the number of vertices generated. With `buffers == None` nothing is
/// written and only the count is computed, which is always the same count the
/// writing pass produces.
pub fn points_to_stroke_with_buffers(
    points: &[Vec2],
    style: &StrokeStyle,
    arc_divisions: usize,
    min_distance: f32,
    buffers: Option<StrokeBuffers<'_>>,
    vertex_offset: usize,
) -> usize {
    let points = remove_duplicated_points(points, min_distance);
    let n = points.len();
    if n < 2 {
        return 0;
    }

    let is_closed = points[0] == points[n - 1];
    let half_width = style.width / 2.0;
    let delta_u = 1.0 / (n - 1) as f32;

    let mut s = Stroker::new(buffers, vertex_offset, *style, arc_divisions.max(1));

    let offset = segment_normal(points[0], points[1]) * half_width;
    s.last_l = points[0] - offset;
    s.last_r = points[0] + offset;
    let point0_l = s.last_l;
    let point0_r = s.last_r;

    let mut previous = points[0];
    let mut join_left = false;
    let mut initial_join_left = false;
    let mut inner_modified = false;
    let mut is_miter = false;

    for i in 1..n {
        let current = points[i];
        let next = if i == n - 1 {
            // A closed path wraps around, skipping the repeated first point.
            is_closed.then(|| points[1])
        } else {
            Some(points[i + 1])
        };

        let normal1 = segment_normal(previous, current);
        s.current = current;
        s.current_l = current - normal1 * half_width;
        s.current_r = current + normal1 * half_width;
        s.u1 = s.u0 + delta_u;
        inner_modified = false;

        if let Some(next) = next {
            let normal2 = segment_normal(current, next);
            s.next_l = current - normal2 * half_width;
            s.next_r = current + normal2 * half_width;

            join_left = normal1.dot(next - previous) >= 0.0;
            if i == 1 {
                initial_join_left = join_left;
            }

            let next_dir = (next - current).normalize_or_zero();
            let dot = normal1.dot(next_dir).abs();

            if dot > f32::EPSILON {
                let miter_side = half_width / dot;
                let prev_segment = current - previous;
                let miter = prev_segment.normalize_or_zero() * miter_side - next_dir * miter_side;
                let miter_length = miter.length();

                let prev_length = prev_segment.length();
                let next_segment = next - current;
                let next_length = next_segment.length();
                let inner_offset = -miter;
                if (prev_segment / prev_length).dot(inner_offset) < prev_length
                    && (next_segment / next_length).dot(inner_offset) < next_length
                {
                    inner_modified = true;
                }

                s.outer = current + miter;
                s.inner = current + inner_offset;
                is_miter = false;

                if inner_modified {
                    if join_left {
                        s.next_r = s.inner;
                        s.current_r = s.inner;
                    } else {
                        s.next_l = s.inner;
                        s.current_l = s.inner;
                    }
                } else {
                    s.segment_triangles();
                }

                match style.line_join {
                    LineJoin::Bevel => s.bevel_join(join_left, inner_modified),
                    LineJoin::Round => {
                        s.middle_section(join_left, inner_modified);
                        if join_left {
                            s.circular_sector(current, s.current_l, s.next_l, s.u1, 0.0);
                        } else {
                            s.circular_sector(current, s.next_r, s.current_r, s.u1, 1.0);
                        }
                    }
                    LineJoin::Miter | LineJoin::MiterClip => {
                        let miter_fraction = half_width * style.miter_limit / miter_length;
                        if miter_fraction < 1.0 {
                            if style.line_join == LineJoin::MiterClip {
                                s.middle_section(join_left, inner_modified);
                                s.clipped_miter(join_left, miter_fraction);
                            } else {
                                s.bevel_join(join_left, inner_modified);
                            }
                        } else {
                            s.miter_join(join_left, inner_modified);
                            is_miter = true;
                        }
                    }
                }
            } else {
                // Collinear points, no join.
                s.segment_triangles();
            }
        } else {
            s.segment_triangles();
        }

        if !is_closed && i == n - 1 {
            s.cap(points[0], point0_l, point0_r, true, 0.0);
        }

        s.u0 = s.u1;
        previous = current;
        s.last_l = s.next_l;
        s.last_r = s.next_r;
    }

    if !is_closed {
        s.cap(s.current, s.current_l, s.current_r, false, s.u1);
    } else if inner_modified {
        // Pull the first segment's start onto the closing join.
        let (mut last_outer, mut last_inner) = (s.outer, s.inner);
        if initial_join_left != join_left {
            std::mem::swap(&mut last_outer, &mut last_inner);
        }

        if join_left {
            if is_miter || initial_join_left {
                s.writer.set_position(0, last_inner);
                s.writer.set_position(3, last_inner);
                if is_miter {
                    s.writer.set_position(1, last_outer);
                }
            }
        } else if is_miter || !initial_join_left {
            s.writer.set_position(1, last_inner);
            s.writer.set_position(3, last_inner);
            if is_miter {
                s.writer.set_position(0, last_outer);
            }
        }
    }

    s.writer.count
}

/// Left-hand unit normal of the segment `from -> to`.
fn segment_normal(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    Vec2::new(-d.y, d.x).normalize_or_zero()
}

fn rotate_around(point: Vec2, center: Vec2, angle: f32) -> Vec2 {
    center + Vec2::from_angle(angle).rotate(point - center)
}

/// Drop interior points closer than `min_distance` to their successor.
///
/// The first and last points are always kept so closed paths stay closed.
fn remove_duplicated_points(points: &[Vec2], min_distance: f32) -> Cow<'_, [Vec2]> {
    let n = points.len();
    if n < 3 {
        return Cow::Borrowed(points);
    }

    let has_duplicates = (1..n - 1).any(|i| points[i].distance(points[i + 1]) < min_distance);
    if !has_duplicates {
        return Cow::Borrowed(points);
    }

    let mut kept = Vec::with_capacity(n);
    kept.push(points[0]);
    for i in 1..n - 1 {
        if points[i].distance(points[i + 1]) >= min_distance {
            kept.push(points[i]);
        }
    }
    kept.push(points[n - 1]);
    Cow::Owned(kept)
}

struct VertexWriter<'a> {
    out: Option<StrokeBuffers<'a>>,
    base: usize,
    count: usize,
}

impl VertexWriter<'_> {
    fn add(&mut self, position: Vec2, u: f32, v: f32) {
        if let Some(out) = self.out.as_mut() {
            let index = self.base + self.count;
            if let Some(slot) = out.positions.get_mut(index * 3..index * 3 + 3) {
                slot.copy_from_slice(&[position.x, position.y, 0.0]);
            }
            if let Some(slot) = out
                .normals
                .as_deref_mut()
                .and_then(|normals| normals.get_mut(index * 3..index * 3 + 3))
            {
                slot.copy_from_slice(&[0.0, 0.0, 1.0]);
            }
            if let Some(slot) = out
                .uvs
                .as_deref_mut()
                .and_then(|uvs| uvs.get_mut(index * 2..index * 2 + 2))
            {
                slot.copy_from_slice(&[u, v]);
            }
        }
        self.count += 1;
    }

    /// Overwrite the position of a vertex written by this call.
    fn set_position(&mut self, local: usize, position: Vec2) {
        if let Some(out) = self.out.as_mut() {
            let index = self.base + local;
            if let Some(slot) = out.positions.get_mut(index * 3..index * 3 + 2) {
                slot.copy_from_slice(&[position.x, position.y]);
            }
        }
    }

    /// Move every vertex in `range` that sits exactly at `from` to `to`.
    fn replace(&mut self, range: std::ops::Range<usize>, from: Vec2, to: Vec2) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        for local in range {
            let index = self.base + local;
            if let Some(slot) = out.positions.get_mut(index * 3..index * 3 + 2) {
                if slot[0] == from.x && slot[1] == from.y {
                    slot.copy_from_slice(&[to.x, to.y]);
                }
            }
        }
    }
}

/// Per-call state of the stroke generator.
struct Stroker<'a> {
    writer: VertexWriter<'a>,
    style: StrokeStyle,
    arc_divisions: usize,

    current: Vec2,
    last_l: Vec2,
    last_r: Vec2,
    current_l: Vec2,
    current_r: Vec2,
    next_l: Vec2,
    next_r: Vec2,
    inner: Vec2,
    outer: Vec2,
    u0: f32,
    u1: f32,
}

impl<'a> Stroker<'a> {
    fn new(out: Option<StrokeBuffers<'a>>, base: usize, style: StrokeStyle, arc_divisions: usize) -> Self {
        Self {
            writer: VertexWriter { out, base, count: 0 },
            style,
            arc_divisions,
            current: Vec2::ZERO,
            last_l: Vec2::ZERO,
            last_r: Vec2::ZERO,
            current_l: Vec2::ZERO,
            current_r: Vec2::ZERO,
            next_l: Vec2::ZERO,
            next_r: Vec2::ZERO,
            inner: Vec2::ZERO,
            outer: Vec2::ZERO,
            u0: 0.0,
            u1: 0.0,
        }
    }

    fn add(&mut self, position: Vec2, u: f32, v: f32) {
        self.writer.add(position, u, v);
    }

    fn segment_triangles(&mut self) {
        let (u0, u1) = (self.u0, self.u1);
        self.add(self.last_r, u0, 1.0);
        self.add(self.last_l, u0, 0.0);
        self.add(self.current_l, u1, 0.0);
        self.add(self.last_r, u0, 1.0);
        self.add(self.current_l, u1, 0.0);
        self.add(self.current_r, u1, 1.0);
    }

    /// Segment quad running into the inner intersection point.
    fn segment_to_inner(&mut self, join_left: bool) {
        let (u0, u1) = (self.u0, self.u1);
        self.add(self.last_r, u0, 1.0);
        self.add(self.last_l, u0, 0.0);
        if join_left {
            self.add(self.current_l, u1, 0.0);
            self.add(self.last_r, u0, 1.0);
            self.add(self.current_l, u1, 0.0);
            self.add(self.inner, u1, 1.0);
        } else {
            self.add(self.current_r, u1, 1.0);
            self.add(self.last_l, u0, 0.0);
            self.add(self.inner, u1, 0.0);
            self.add(self.current_r, u1, 1.0);
        }
    }

    fn bevel_join(&mut self, join_left: bool, inner_modified: bool) {
        let u = self.u1;
        if inner_modified {
            self.segment_to_inner(join_left);
            if join_left {
                self.add(self.current_l, u, 0.0);
                self.add(self.next_l, u, 0.0);
                self.add(self.inner, u, 0.5);
            } else {
                self.add(self.current_r, u, 1.0);
                self.add(self.next_r, u, 1.0);
                self.add(self.inner, u, 0.5);
            }
        } else if join_left {
            self.add(self.current_l, u, 0.0);
            self.add(self.next_l, u, 0.0);
            self.add(self.current, u, 0.5);
        } else {
            self.add(self.current_r, u, 1.0);
            self.add(self.next_r, u, 1.0);
            self.add(self.current, u, 0.5);
        }
    }

    /// Segment triangles plus the wedge between the center and the inner point.
    fn middle_section(&mut self, join_left: bool, inner_modified: bool) {
        if !inner_modified {
            return;
        }
        let (u0, u1) = (self.u0, self.u1);
        self.segment_to_inner(join_left);
        if join_left {
            self.add(self.current_l, u0, 0.0);
            self.add(self.current, u1, 0.5);
            self.add(self.inner, u1, 1.0);
            self.add(self.current, u1, 0.5);
            self.add(self.next_l, u0, 0.0);
            self.add(self.inner, u1, 1.0);
        } else {
            self.add(self.current_r, u0, 1.0);
            self.add(self.inner, u1, 0.0);
            self.add(self.current, u1, 0.5);
            self.add(self.current, u1, 0.5);
            self.add(self.inner, u1, 0.0);
            self.add(self.next_r, u0, 1.0);
        }
    }

    fn miter_join(&mut self, join_left: bool, inner_modified: bool) {
        let (u0, u1) = (self.u0, self.u1);
        if inner_modified {
            self.add(self.last_r, u0, 1.0);
            self.add(self.last_l, u0, 0.0);
            if join_left {
                self.add(self.outer, u1, 0.0);
                self.add(self.last_r, u0, 1.0);
                self.add(self.outer, u1, 0.0);
                self.add(self.inner, u1, 1.0);
                self.next_l = self.outer;
            } else {
                self.add(self.outer, u1, 1.0);
                self.add(self.last_l, u0, 0.0);
                self.add(self.inner, u1, 0.0);
                self.add(self.outer, u1, 1.0);
                self.next_r = self.outer;
            }
        } else if join_left {
            self.add(self.current_l, u1, 0.0);
            self.add(self.outer, u1, 0.0);
            self.add(self.current, u1, 0.5);
            self.add(self.current, u1, 0.5);
            self.add(self.outer, u1, 0.0);
            self.add(self.next_l, u1, 0.0);
        } else {
            self.add(self.current_r, u1, 1.0);
            self.add(self.outer, u1, 1.0);
            self.add(self.current, u1, 0.5);
            self.add(self.current, u1, 0.5);
            self.add(self.outer, u1, 1.0);
            self.add(self.next_r, u1, 1.0);
        }
    }

    /// Miter cut off at `fraction` of its length.
    fn clipped_miter(&mut self, join_left: bool, fraction: f32) {
        let u = self.u1;
        let (edge_current, edge_next, v) = if join_left {
            (self.current_l, self.next_l, 0.0)
        } else {
            (self.current_r, self.next_r, 1.0)
        };
        let clip_current = edge_current + (self.outer - edge_current) * fraction;
        let clip_next = edge_next + (self.outer - edge_next) * fraction;

        self.add(edge_current, u, v);
        self.add(clip_current, u, v);
        self.add(self.current, u, 0.5);
        self.add(self.current, u, 0.5);
        self.add(clip_current, u, v);
        self.add(clip_next, u, v);
        self.add(self.current, u, 0.5);
        self.add(clip_next, u, v);
        self.add(edge_next, u, v);
    }

    /// Fan of triangles around `center` from `p1` to `p2`.
    fn circular_sector(&mut self, center: Vec2, p1: Vec2, p2: Vec2, u: f32, v: f32) {
        let d1 = (p1 - center).normalize_or_zero();
        let d2 = (p2 - center).normalize_or_zero();
        let dot = d1.dot(d2);
        let mut angle = PI;
        if dot.abs() < 1.0 {
            angle = dot.acos().abs();
        }
        angle /= self.arc_divisions as f32;

        let mut a = p1;
        let mut b = p1;
        for _ in 0..self.arc_divisions - 1 {
            b = rotate_around(a, center, angle);
            self.add(a, u, v);
            self.add(b, u, v);
            self.add(center, u, 0.5);
            a = b;
        }
        self.add(b, u, v);
        self.add(p2, u, v);
        self.add(center, u, 0.5);
    }

    /// Cap at an open end. `left` and `right` are the end's edge points.
    fn cap(&mut self, center: Vec2, left: Vec2, right: Vec2, start: bool, u: f32) {
        match self.style.line_cap {
            LineCap::Butt => {}
            LineCap::Round => {
                if start {
                    self.circular_sector(center, right, left, u, 0.5);
                } else {
                    self.circular_sector(center, left, right, u, 0.5);
                }
            }
            LineCap::Square => {
                // Push the end vertices half a width outwards along the line.
                let count = self.writer.count;
                if start {
                    let along = left - center;
                    let back = Vec2::new(along.y, -along.x);
                    let range = 0..count.min(6);
                    self.writer.replace(range.clone(), left, center + along + back);
                    self.writer.replace(range, right, center + back - along);
                } else {
                    let along = right - center;
                    let forward = Vec2::new(along.y, -along.x);
                    let range = count.saturating_sub(6)..count;
                    self.writer.replace(range.clone(), right, center + along + forward);
                    self.writer.replace(range, left, center + forward - along);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<Vec2> {
        vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]
    }

    fn corner() -> Vec<Vec2> {
        vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]
    }

    fn closed_square() -> Vec<Vec2> {
        vec![
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::ZERO,
        ]
    }

    fn positions(geometry: &StrokeGeometry) -> Vec<Vec2> {
        (0..geometry.vertex_count()).map(|i| geometry.position(i)).collect()
    }

    #[test]
    fn test_too_few_points() {
        let style = StrokeStyle::new(2.0);
        assert_eq!(stroke_vertex_count(&[Vec2::ZERO], &style, 12, 0.001), 0);
        assert!(points_to_stroke(&[Vec2::ONE], &style, 12, 0.001).is_none());
        assert!(points_to_stroke(&[], &style, 12, 0.001).is_none());
    }

    #[test]
    fn test_straight_segment() {
        let geometry = points_to_stroke(&line(), &StrokeStyle::new(2.0), 12, 0.001).unwrap();
        assert_eq!(
            positions(&geometry),
            vec![
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, -1.0),
                Vec2::new(10.0, -1.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(10.0, -1.0),
                Vec2::new(10.0, 1.0),
            ]
        );
        assert!(geometry.normals.chunks(3).all(|n| n == [0.0, 0.0, 1.0]));
        assert_eq!(&geometry.uvs[0..4], &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(&geometry.uvs[10..12], &[1.0, 1.0]);
    }

    #[test]
    fn test_square_caps_extend_the_line() {
        let style = StrokeStyle::new(2.0).with_cap(LineCap::Square);
        let geometry = points_to_stroke(&line(), &style, 12, 0.001).unwrap();
        let points = positions(&geometry);

        assert_eq!(points.len(), 6);
        let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert_eq!(min_x, -1.0);
        assert_eq!(max_x, 11.0);
    }

    #[test]
    fn test_round_caps_add_sectors() {
        let style = StrokeStyle::new(2.0).with_cap(LineCap::Round);
        assert_eq!(stroke_vertex_count(&line(), &style, 8, 0.001), 6 + 2 * 3 * 8);
    }

    #[test]
    fn test_miter_join_reaches_outer_corner() {
        let geometry = points_to_stroke(&corner(), &StrokeStyle::new(2.0), 12, 0.001).unwrap();
        let points = positions(&geometry);
        assert_eq!(points.len(), 12);
        assert!(points.contains(&Vec2::new(11.0, -1.0)));
        assert!(points.contains(&Vec2::new(9.0, 1.0)));
    }

    #[test]
    fn test_miter_limit_falls_back_to_bevel() {
        let style = StrokeStyle::new(2.0).with_miter_limit(1.0);
        let geometry = points_to_stroke(&corner(), &style, 12, 0.001).unwrap();
        let points = positions(&geometry);
        assert_eq!(points.len(), 15);
        assert!(!points.contains(&Vec2::new(11.0, -1.0)));
    }

    #[test]
    fn test_round_join_vertex_count() {
        let style = StrokeStyle::new(2.0).with_join(LineJoin::Round);
        assert_eq!(stroke_vertex_count(&corner(), &style, 12, 0.001), 12 + 3 * 12 + 6);
    }

    #[test]
    fn test_duplicate_points_removed() {
        let points = [Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(10.0, 0.0)];
        let geometry = points_to_stroke(&points, &StrokeStyle::new(2.0), 12, 0.001).unwrap();
        assert_eq!(geometry.vertex_count(), 12);
        assert!(geometry.positions.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_count_pass_matches_fill_pass() {
        let joins = [LineJoin::Miter, LineJoin::MiterClip, LineJoin::Round, LineJoin::Bevel];
        let caps = [LineCap::Butt, LineCap::Round, LineCap::Square];
        let zigzag: Vec<Vec2> = (0..9)
            .map(|i| Vec2::new(i as f32 * 3.0, if i % 2 == 0 { 0.0 } else { 4.0 }))
            .collect();

        for join in joins {
            for cap in caps {
                let style = StrokeStyle::new(1.5).with_join(join).with_cap(cap).with_miter_limit(1.2);
                for points in [&line(), &corner(), &closed_square(), &zigzag] {
                    let counted = stroke_vertex_count(points, &style, 6, 0.001);
                    let mut positions = vec![0.0; counted * 3];
                    let written = points_to_stroke_with_buffers(
                        points,
                        &style,
                        6,
                        0.001,
                        Some(StrokeBuffers {
                            positions: &mut positions,
                            normals: None,
                            uvs: None,
                        }),
                        0,
                    );
                    assert_eq!(counted, written, "{:?} {:?}", join, cap);
                    assert!(positions.iter().all(|v| v.is_finite()));
                }
            }
        }
    }

    #[test]
    fn test_vertex_offset() {
        let style = StrokeStyle::new(2.0);
        let mut positions = vec![-7.0; (4 + 6) * 3];
        let written = points_to_stroke_with_buffers(
            &line(),
            &style,
            12,
            0.001,
            Some(StrokeBuffers {
                positions: &mut positions,
                normals: None,
                uvs: None,
            }),
            4,
        );

        assert_eq!(written, 6);
        assert!(positions[..12].iter().all(|v| *v == -7.0));
        assert_eq!(&positions[12..15], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_closed_path_has_no_caps() {
        let square = StrokeStyle::new(2.0).with_cap(LineCap::Round);
        let butt = StrokeStyle::new(2.0);
        assert_eq!(
            stroke_vertex_count(&closed_square(), &square, 12, 0.001),
            stroke_vertex_count(&closed_square(), &butt, 12, 0.001)
        );
    }

    #[test]
    fn test_from_node_style() {
        let mut node = NodeStyle::default();
        node.stroke_width = 3.0;
        node.stroke_line_join = "round".to_string();
        node.stroke_line_cap = "square".to_string();

        let style = StrokeStyle::from_node_style(&node);
        assert_eq!(style.width, 3.0);
        assert_eq!(style.line_join, LineJoin::Round);
        assert_eq!(style.line_cap, LineCap::Square);
        assert_eq!(style.miter_limit, 4.0);
    }
}
