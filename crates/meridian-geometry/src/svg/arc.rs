//! Endpoint to center conversion for SVG elliptical arcs.

use glam::Vec2;

use crate::path::Path;

/// Signed angle between `u` and `v`.
pub fn svg_angle(u: Vec2, v: Vec2) -> f32 {
    let dot = u.dot(v);
    let len = u.length() * v.length();
    let angle = (dot / len).clamp(-1.0, 1.0).acos();
    if u.perp_dot(v) < 0.0 { -angle } else { angle }
}

/// Append the arc `start -> end` to `path` as an ellipse segment.
///
/// `rotation` is in degrees. Zero radii degrade to a straight line, radii too
/// small to span the endpoints are scaled up uniformly.
pub fn append_arc(
    path: &mut Path,
    radii: Vec2,
    rotation: f32,
    large_arc: bool,
    sweep: bool,
    start: Vec2,
    end: Vec2,
) {
    if radii.x == 0.0 || radii.y == 0.0 {
        path.line_to(end);
        return;
    }

    let phi = rotation.to_radians();
    let (sin, cos) = phi.sin_cos();
    let mut rx = radii.x.abs();
    let mut ry = radii.y.abs();

    let half = (start - end) / 2.0;
    let x1p = cos * half.x + sin * half.y;
    let y1p = -sin * half.x + cos * half.y;

    let mut rxs = rx * rx;
    let mut rys = ry * ry;
    let x1ps = x1p * x1p;
    let y1ps = y1p * y1p;

    let cr = x1ps / rxs + y1ps / rys;
    if cr > 1.0 {
        let s = cr.sqrt();
        rx *= s;
        ry *= s;
        rxs = rx * rx;
        rys = ry * ry;
    }

    let dq = rxs * y1ps + rys * x1ps;
    let pq = (rxs * rys - dq) / dq;
    let mut q = pq.max(0.0).sqrt();
    if large_arc == sweep {
        q = -q;
    }
    let cxp = q * rx * y1p / ry;
    let cyp = -q * ry * x1p / rx;

    let mid = (start + end) / 2.0;
    let center = Vec2::new(cos * cxp - sin * cyp + mid.x, sin * cxp + cos * cyp + mid.y);

    let from = Vec2::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let to = Vec2::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta = svg_angle(Vec2::X, from);
    let delta = svg_angle(from, to) % std::f32::consts::TAU;

    path.absellipse(center, Vec2::new(rx, ry), theta, theta + delta, !sweep, phi);
}
