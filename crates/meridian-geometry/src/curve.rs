//! Curve segments that make up a path.

use glam::Vec2;

/// A straight segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: Vec2,
    pub to: Vec2,
}

impl LineSegment {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    pub fn eval(&self, t: f32) -> Vec2 {
        self.from.lerp(self.to, t)
    }
}

/// A quadratic Bezier curve (one control point).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub from: Vec2,
    pub control: Vec2,
    pub to: Vec2,
}

impl QuadraticBezier {
    pub fn new(from: Vec2, control: Vec2, to: Vec2) -> Self {
        Self { from, control, to }
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0).
    pub fn eval(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        self.from * (mt * mt) + self.control * (2.0 * mt * t) + self.to * (t * t)
    }
}

/// A cubic Bezier curve (two control points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub from: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub to: Vec2,
}

impl CubicBezier {
    pub fn new(from: Vec2, control1: Vec2, control2: Vec2, to: Vec2) -> Self {
        Self {
            from,
            control1,
            control2,
            to,
        }
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0).
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;

        self.from * (mt2 * mt)
            + self.control1 * (3.0 * mt2 * t)
            + self.control2 * (3.0 * mt * t2)
            + self.to * (t2 * t)
    }
}

/// An arc of an ellipse in center parameterization.
///
/// Angles are in radians. `rotation` turns the whole ellipse about its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseArc {
    pub center: Vec2,
    pub radii: Vec2,
    pub start_angle: f32,
    pub end_angle: f32,
    pub clockwise: bool,
    pub rotation: f32,
}

impl EllipseArc {
    pub fn eval(&self, t: f32) -> Vec2 {
        use std::f32::consts::TAU;

        let mut delta = self.end_angle - self.start_angle;
        let same_points = delta.abs() < f32::EPSILON;

        while delta < 0.0 {
            delta += TAU;
        }
        while delta > TAU {
            delta -= TAU;
        }
        if delta < f32::EPSILON {
            delta = if same_points { 0.0 } else { TAU };
        }
        if self.clockwise && !same_points {
            delta = if delta == TAU { -TAU } else { delta - TAU };
        }

        let angle = self.start_angle + t * delta;
        let point = self.center + self.radii * Vec2::new(angle.cos(), angle.sin());

        if self.rotation != 0.0 {
            let offset = point - self.center;
            self.center + Vec2::from_angle(self.rotation).rotate(offset)
        } else {
            point
        }
    }
}

/// One segment of a [`Path`](crate::Path).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line(LineSegment),
    Quadratic(QuadraticBezier),
    Cubic(CubicBezier),
    Ellipse(EllipseArc),
}

impl Curve {
    pub fn eval(&self, t: f32) -> Vec2 {
        match self {
            Curve::Line(c) => c.eval(t),
            Curve::Quadratic(c) => c.eval(t),
            Curve::Cubic(c) => c.eval(t),
            Curve::Ellipse(c) => c.eval(t),
        }
    }

    /// Number of straight pieces used to flatten this curve.
    ///
    /// Lines need one, ellipses get twice the requested divisions.
    pub fn resolution(&self, divisions: usize) -> usize {
        match self {
            Curve::Line(_) => 1,
            Curve::Ellipse(_) => divisions * 2,
            Curve::Quadratic(_) | Curve::Cubic(_) => divisions,
        }
    }
}
