//! Filled shapes and hole detection.
//!
//! Each subpath of a [`ShapePath`] is classified as solid or as a hole of an
//! enclosing solid by casting a horizontal scanline through the middle of its
//! bounding box and walking the crossings to its left.

use glam::Vec2;

use crate::path::Path;
use crate::shape_path::ShapePath;
use crate::style::FillRule;

/// A filled outline with zero or more holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub outline: Path,
    pub holes: Vec<Path>,
}

impl Shape {
    pub fn new(outline: Path) -> Self {
        Self {
            outline,
            holes: Vec::new(),
        }
    }

    /// Flattened outline and hole contours.
    pub fn extract_points(&self, divisions: usize) -> (Vec<Vec2>, Vec<Vec<Vec2>>) {
        (
            self.outline.points(divisions),
            self.holes.iter().map(|h| h.points(divisions)).collect(),
        )
    }
}

/// Signed area of a closed polygon. Negative means clockwise.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut area = 0.0;
    for q in 0..n {
        let p = if q == 0 { n - 1 } else { q - 1 };
        area += points[p].x * points[q].y - points[q].x * points[p].y;
    }
    area * 0.5
}

pub fn is_clockwise(points: &[Vec2]) -> bool {
    signed_area(points) < 0.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PointLocation {
    Origin,
    Destination,
    Between(f32),
    Left,
    Right,
    Behind,
    Beyond,
}

/// Position of `p` relative to the directed edge `start -> end`.
fn classify_point(p: Vec2, start: Vec2, end: Vec2) -> PointLocation {
    let a = end - start;
    let b = p - start;
    let sa = a.x * b.y - b.x * a.y;

    if p == start {
        return PointLocation::Origin;
    }
    if p == end {
        return PointLocation::Destination;
    }
    if sa < -f32::EPSILON {
        return PointLocation::Left;
    }
    if sa > f32::EPSILON {
        return PointLocation::Right;
    }
    if a.x * b.x < 0.0 || a.y * b.y < 0.0 {
        return PointLocation::Behind;
    }
    if a.length() < b.length() {
        return PointLocation::Beyond;
    }

    let t = if a.x != 0.0 { b.x / a.x } else { b.y / a.y };
    PointLocation::Between(t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EdgeIntersection {
    point: Vec2,
    /// Parameter along the first edge.
    t: f32,
}

fn find_edge_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<EdgeIntersection> {
    let nom1 = (b1.x - b0.x) * (a0.y - b0.y) - (b1.y - b0.y) * (a0.x - b0.x);
    let nom2 = (a1.x - a0.x) * (a0.y - b0.y) - (a1.y - a0.y) * (a0.x - b0.x);
    let denom = (b1.y - b0.y) * (a1.x - a0.x) - (b1.x - b0.x) * (a1.y - a0.y);
    let t1 = nom1 / denom;
    let t2 = nom2 / denom;

    // NaN parameters (collinear edges) fall through every comparison.
    if (denom == 0.0 && nom1 != 0.0) || t1 <= 0.0 || t1 >= 1.0 || t2 < 0.0 || t2 > 1.0 {
        return None;
    }

    if nom1 == 0.0 && denom == 0.0 {
        for endpoint in [b0, b1] {
            match classify_point(endpoint, a0, a1) {
                PointLocation::Origin => {
                    return Some(EdgeIntersection { point: endpoint, t: 0.0 });
                }
                PointLocation::Between(t) => {
                    return Some(EdgeIntersection {
                        point: a0 + (a1 - a0) * t,
                        t,
                    });
                }
                _ => {}
            }
        }
        return None;
    }

    for endpoint in [b0, b1] {
        if classify_point(endpoint, a0, a1) == PointLocation::Origin {
            return Some(EdgeIntersection { point: endpoint, t: 0.0 });
        }
    }

    Some(EdgeIntersection {
        point: a0 + (a1 - a0) * t1,
        t: t1,
    })
}

/// Crossings of the polyline `a` with the polyline `b`, deduplicated by parameter.
fn polyline_intersections(a: &[Vec2], b: &[Vec2]) -> Vec<Vec2> {
    let mut seen: Vec<f32> = Vec::new();
    let mut points = Vec::new();

    for edge_a in a.windows(2) {
        for edge_b in b.windows(2) {
            let Some(hit) = find_edge_intersection(edge_a[0], edge_a[1], edge_b[0], edge_b[1])
            else {
                continue;
            };
            if seen
                .iter()
                .any(|t| *t <= hit.t + f32::EPSILON && *t >= hit.t - f32::EPSILON)
            {
                continue;
            }
            seen.push(hit.t);
            points.push(hit.point);
        }
    }

    points
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

struct SimplePath<'a> {
    path: &'a Path,
    points: Vec<Vec2>,
    clockwise: bool,
    bounds: Bounds,
}

struct Crossing {
    path: usize,
    x: f32,
}

#[derive(Debug, Clone, Copy)]
struct HoleInfo {
    is_hole: bool,
    /// The subpath this one is a hole of, or itself when solid.
    owner: Option<usize>,
}

/// Crossings of a scanline with every subpath that could enclose `bounds`.
///
/// Subpaths whose bounding box does not contain the center of `bounds` are
/// skipped. This can miss an enclosing path with an unusual outline.
fn scanline_crossings(scanline: &[Vec2; 2], bounds: &Bounds, paths: &[SimplePath<'_>]) -> Vec<Crossing> {
    let center = bounds.center();
    let mut crossings = Vec::new();

    for (index, path) in paths.iter().enumerate() {
        if !path.bounds.contains(center) {
            continue;
        }
        for point in polyline_intersections(scanline, &path.points) {
            crossings.push(Crossing { path: index, x: point.x });
        }
    }

    crossings.sort_by(|a, b| a.x.total_cmp(&b.x));
    crossings
}

fn classify_subpath(
    index: usize,
    paths: &[SimplePath<'_>],
    scan_min_x: f32,
    scan_max_x: f32,
    rule: FillRule,
) -> HoleInfo {
    let subject = &paths[index];
    let y = subject.bounds.center().y;
    let scanline = [Vec2::new(scan_min_x, y), Vec2::new(scan_max_x, y)];
    let crossings = scanline_crossings(&scanline, &subject.bounds, paths);

    let Some(first_x) = crossings.iter().find(|c| c.path == index).map(|c| c.x) else {
        // The scanline never meets this subpath, nothing can enclose it.
        return HoleInfo {
            is_hole: false,
            owner: Some(index),
        };
    };

    let mut stack: Vec<usize> = Vec::new();
    for crossing in crossings
        .iter()
        .filter(|c| c.path != index)
        .take_while(|c| c.x < first_x)
    {
        if stack.last() == Some(&crossing.path) {
            stack.pop();
        } else {
            stack.push(crossing.path);
        }
    }
    stack.push(index);

    match rule {
        FillRule::EvenOdd => HoleInfo {
            is_hole: stack.len() % 2 == 0,
            owner: stack.len().checked_sub(2).map(|i| stack[i]),
        },
        FillRule::NonZero => {
            let mut is_hole = true;
            let mut owner = None;
            let mut last_clockwise = false;
            for &id in &stack {
                if is_hole {
                    last_clockwise = paths[id].clockwise;
                    is_hole = false;
                    owner = Some(id);
                } else if last_clockwise != paths[id].clockwise {
                    last_clockwise = paths[id].clockwise;
                    is_hole = true;
                }
            }
            HoleInfo { is_hole, owner }
        }
    }
}

/// Split a [`ShapePath`] into solid shapes and attach each hole to its owner.
///
/// Subpaths with fewer than two flattened points are dropped. The fill rule is
/// read from the shape path's style.
pub fn create_shapes(shape_path: &ShapePath, divisions: usize) -> Vec<Shape> {
    let mut scan_min_x = f32::MAX;
    let mut scan_max_x = f32::MIN;

    let paths: Vec<SimplePath<'_>> = shape_path
        .subpaths
        .iter()
        .filter_map(|path| {
            let points = path.points(divisions);
            if points.len() < 2 {
                return None;
            }

            let (min, max) = points
                .iter()
                .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(min, max), p| {
                    (min.min(*p), max.max(*p))
                });
            if scan_max_x <= max.x {
                scan_max_x = max.x + 1.0;
            }
            if scan_min_x >= min.x {
                scan_min_x = min.x - 1.0;
            }

            Some(SimplePath {
                path,
                clockwise: is_clockwise(&points),
                points,
                bounds: Bounds { min, max },
            })
        })
        .collect();

    let rule = shape_path.style.fill_rule();
    let holes: Vec<HoleInfo> = (0..paths.len())
        .map(|i| classify_subpath(i, &paths, scan_min_x, scan_max_x, rule))
        .collect();

    let mut shapes = Vec::new();
    for (index, path) in paths.iter().enumerate() {
        if holes[index].is_hole {
            continue;
        }
        let mut shape = Shape::new(path.path.clone());
        for (hole_index, info) in holes.iter().enumerate() {
            if info.is_hole && info.owner == Some(index) {
                shape.holes.push(paths[hole_index].path.clone());
            }
        }
        shapes.push(shape);
    }

    tracing::trace!(
        "Split {} subpaths into {} shapes",
        shape_path.subpaths.len(),
        shapes.len()
    );
    shapes
}
