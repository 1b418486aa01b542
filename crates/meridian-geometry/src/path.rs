//! Subpaths built from curve segments.

use glam::Vec2;

use crate::curve::{CubicBezier, Curve, EllipseArc, LineSegment, QuadraticBezier};

/// Default number of divisions used when flattening curves.
pub const DEFAULT_DIVISIONS: usize = 12;

/// A connected run of curves with a pen position.
///
/// `move_to` only moves the pen. Every drawing command appends one curve
/// starting at the pen and leaves the pen at the curve's end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub curves: Vec<Curve>,
    pub current_point: Vec2,
    /// Append the first point to the flattened output when it is not already there.
    pub auto_close: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// A polyline path through `points`.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }
        path
    }

    pub fn move_to(&mut self, point: Vec2) {
        self.current_point = point;
    }

    pub fn line_to(&mut self, point: Vec2) {
        self.curves
            .push(Curve::Line(LineSegment::new(self.current_point, point)));
        self.current_point = point;
    }

    pub fn quadratic_curve_to(&mut self, control: Vec2, point: Vec2) {
        self.curves.push(Curve::Quadratic(QuadraticBezier::new(
            self.current_point,
            control,
            point,
        )));
        self.current_point = point;
    }

    pub fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, point: Vec2) {
        self.curves.push(Curve::Cubic(CubicBezier::new(
            self.current_point,
            control1,
            control2,
            point,
        )));
        self.current_point = point;
    }

    /// Circular arc around an absolute center.
    pub fn absarc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, clockwise: bool) {
        self.absellipse(center, Vec2::splat(radius), start, end, clockwise, 0.0);
    }

    /// Elliptical arc around an absolute center.
    ///
    /// When the path already has curves and the arc does not start at the pen,
    /// a connecting line is inserted first.
    pub fn absellipse(
        &mut self,
        center: Vec2,
        radii: Vec2,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
        rotation: f32,
    ) {
        let arc = EllipseArc {
            center,
            radii,
            start_angle,
            end_angle,
            clockwise,
            rotation,
        };

        if !self.curves.is_empty() {
            let first = arc.eval(0.0);
            if first != self.current_point {
                self.line_to(first);
            }
        }

        self.curves.push(Curve::Ellipse(arc));
        self.current_point = arc.eval(1.0);
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Flatten the path into points.
    ///
    /// Consecutive duplicates are dropped. With `auto_close` the first point
    /// is repeated at the end unless it is already there.
    pub fn points(&self, divisions: usize) -> Vec<Vec2> {
        let mut points: Vec<Vec2> = Vec::new();

        for curve in &self.curves {
            let resolution = curve.resolution(divisions).max(1);
            for d in 0..=resolution {
                let point = curve.eval(d as f32 / resolution as f32);
                if points.last() == Some(&point) {
                    continue;
                }
                points.push(point);
            }
        }

        if self.auto_close && points.len() > 1 {
            let first = points[0];
            if points.last() != Some(&first) {
                points.push(first);
            }
        }

        points
    }

    /// Axis-aligned bounds of the flattened path as (min, max).
    pub fn bounds(&self, divisions: usize) -> Option<(Vec2, Vec2)> {
        let points = self.points(divisions);
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_move_to_only_has_no_points() {
        let mut path = Path::new();
        path.move_to(Vec2::new(3.0, 4.0));
        assert!(path.points(DEFAULT_DIVISIONS).is_empty());
    }

    #[test]
    fn test_line_points() {
        let path = Path::from_points(&[Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]);
        assert_eq!(
            path.points(DEFAULT_DIVISIONS),
            vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]
        );
    }

    #[test]
    fn test_auto_close_appends_first_point() {
        let mut path = Path::from_points(&[Vec2::ZERO, Vec2::X, Vec2::ONE]);
        path.auto_close = true;
        let points = path.points(DEFAULT_DIVISIONS);
        assert_eq!(points.len(), 4);
        assert_eq!(points[3], Vec2::ZERO);
    }

    #[test]
    fn test_auto_close_does_not_duplicate() {
        let mut path = Path::from_points(&[Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::ZERO]);
        path.auto_close = true;
        assert_eq!(path.points(DEFAULT_DIVISIONS).len(), 4);
    }

    #[test]
    fn test_curve_point_counts() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO);
        path.bezier_curve_to(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0), Vec2::new(10.0, 0.0));
        // First point plus one per division.
        assert_eq!(path.points(8).len(), 9);
    }

    #[test]
    fn test_absellipse_connects_from_pen() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO);
        path.line_to(Vec2::new(1.0, 0.0));
        path.absarc(Vec2::new(5.0, 0.0), 1.0, 0.0, PI, false);

        assert_eq!(path.curves.len(), 3);
        assert!(matches!(path.curves[1], Curve::Line(_)));
        assert!((path.current_point - Vec2::new(4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_first_arc_does_not_connect() {
        let mut path = Path::new();
        path.absarc(Vec2::ZERO, 2.0, 0.0, 2.0 * PI, false);
        assert_eq!(path.curves.len(), 1);
        assert_eq!(path.points(4).len(), 9);
    }

    #[test]
    fn test_bounds() {
        let path = Path::from_points(&[Vec2::new(-1.0, 2.0), Vec2::new(3.0, -4.0)]);
        assert_eq!(
            path.bounds(DEFAULT_DIVISIONS),
            Some((Vec2::new(-1.0, -4.0), Vec2::new(3.0, 2.0)))
        );
        assert_eq!(Path::new().bounds(DEFAULT_DIVISIONS), None);
    }
}
