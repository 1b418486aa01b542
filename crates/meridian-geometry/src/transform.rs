//! 2D affine transforms.

use glam::{Mat3, Vec2, Vec3};

use crate::curve::Curve;
use crate::path::Path;

/// A 2D affine transformation matrix.
///
/// Internally a 3x3 column-major matrix whose last row is [0, 0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    matrix: Mat3,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        matrix: Mat3::IDENTITY,
    };

    pub fn from_mat3(matrix: Mat3) -> Self {
        Self { matrix }
    }

    /// The SVG `matrix(a, b, c, d, e, f)` form.
    pub fn from_svg_matrix(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self {
            matrix: Mat3::from_cols(Vec3::new(a, b, 0.0), Vec3::new(c, d, 0.0), Vec3::new(e, f, 1.0)),
        }
    }

    pub fn translate(offset: Vec2) -> Self {
        Self {
            matrix: Mat3::from_translation(offset),
        }
    }

    /// Rotation in radians.
    pub fn rotate(angle: f32) -> Self {
        Self {
            matrix: Mat3::from_angle(angle),
        }
    }

    /// Rotation in radians about `center`.
    pub fn rotate_about(angle: f32, center: Vec2) -> Self {
        Self::translate(-center)
            .then(&Self::rotate(angle))
            .then(&Self::translate(center))
    }

    pub fn scale(factor: f32) -> Self {
        Self {
            matrix: Mat3::from_scale(Vec2::splat(factor)),
        }
    }

    pub fn scale_xy(scale: Vec2) -> Self {
        Self {
            matrix: Mat3::from_scale(scale),
        }
    }

    /// Horizontal skew, angle in radians.
    pub fn skew_x(angle: f32) -> Self {
        Self::from_svg_matrix(1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0)
    }

    /// Vertical skew, angle in radians.
    pub fn skew_y(angle: f32) -> Self {
        Self::from_svg_matrix(1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Combine two transforms (self then other).
    pub fn then(&self, other: &Transform2D) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point2(point)
    }

    /// Transform a vector (ignores translation).
    pub fn transform_vector(&self, vector: Vec2) -> Vec2 {
        self.matrix.transform_vector2(vector)
    }

    pub fn inverse(&self) -> Option<Self> {
        let det = self.matrix.determinant();
        if det.abs() < f32::EPSILON {
            None
        } else {
            Some(Self {
                matrix: self.matrix.inverse(),
            })
        }
    }

    pub fn as_mat3(&self) -> &Mat3 {
        &self.matrix
    }

    pub fn translation(&self) -> Vec2 {
        self.matrix.z_axis.truncate()
    }

    /// Lengths of the transformed x and y basis vectors.
    pub fn scale_factor(&self) -> Vec2 {
        Vec2::new(
            self.matrix.x_axis.truncate().length(),
            self.matrix.y_axis.truncate().length(),
        )
    }

    /// Rotation angle in radians, read from whichever basis vector survives scaling.
    pub fn rotation(&self) -> f32 {
        let scale = self.scale_factor();
        if scale.x > f32::EPSILON {
            self.matrix.x_axis.y.atan2(self.matrix.x_axis.x)
        } else {
            (-self.matrix.y_axis.x).atan2(self.matrix.y_axis.y)
        }
    }

    /// True when the transform mirrors (negative determinant).
    pub fn is_flipped(&self) -> bool {
        let m = &self.matrix;
        m.x_axis.x * m.y_axis.y - m.x_axis.y * m.y_axis.x < 0.0
    }

    /// True when the transformed basis vectors are not perpendicular.
    pub fn is_skewed(&self) -> bool {
        let x = self.matrix.x_axis.truncate();
        let y = self.matrix.y_axis.truncate();
        let basis_dot = x.dot(y);
        if basis_dot == 0.0 {
            return false;
        }
        let scale = self.scale_factor();
        (basis_dot / (scale.x * scale.y)).abs() > f32::EPSILON
    }

    /// Transform every curve of `path` in place.
    ///
    /// Ellipse arcs keep their parametric form: the center is transformed, the
    /// radii are scaled and the transform's rotation is added. Mirroring flips the
    /// arc direction. Returns `false` when a skew could only be approximated.
    pub fn apply_to_path(&self, path: &mut Path) -> bool {
        let skewed = self.is_skewed();
        let mut exact = true;

        for curve in &mut path.curves {
            match curve {
                Curve::Line(c) => {
                    c.from = self.transform_point(c.from);
                    c.to = self.transform_point(c.to);
                }
                Curve::Quadratic(c) => {
                    c.from = self.transform_point(c.from);
                    c.control = self.transform_point(c.control);
                    c.to = self.transform_point(c.to);
                }
                Curve::Cubic(c) => {
                    c.from = self.transform_point(c.from);
                    c.control1 = self.transform_point(c.control1);
                    c.control2 = self.transform_point(c.control2);
                    c.to = self.transform_point(c.to);
                }
                Curve::Ellipse(arc) => {
                    arc.center = self.transform_point(arc.center);
                    arc.radii *= self.scale_factor();
                    arc.rotation += self.rotation();
                    if self.is_flipped() {
                        arc.start_angle = -arc.start_angle;
                        arc.end_angle = -arc.end_angle;
                        arc.clockwise = !arc.clockwise;
                    }
                    if skewed {
                        exact = false;
                    }
                }
            }
        }

        path.current_point = self.transform_point(path.current_point);
        exact
    }
}

impl std::ops::Mul<Transform2D> for Transform2D {
    type Output = Transform2D;

    /// Matrix product: `a * b` applies `b` first.
    fn mul(self, rhs: Transform2D) -> Transform2D {
        rhs.then(&self)
    }
}

impl std::ops::Mul<Vec2> for Transform2D {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        self.transform_point(rhs)
    }
}
