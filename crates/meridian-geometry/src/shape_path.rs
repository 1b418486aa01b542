//! Output records of the SVG loader.

use glam::Vec2;
use meridian_core::Color;

use crate::path::Path;
use crate::shape::{Shape, create_shapes};
use crate::style::NodeStyle;

/// Source node of a [`ShapePath`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeInfo {
    /// Element name, e.g. `path` or `circle`.
    pub tag: String,
    pub id: Option<String>,
}

/// An ordered group of subpaths produced by one SVG element.
///
/// `color` is the parsed fill paint, when there is one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePath {
    pub subpaths: Vec<Path>,
    pub color: Option<Color>,
    pub style: NodeStyle,
    pub node: NodeInfo,
    current: Option<usize>,
}

impl ShapePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath at `point`.
    pub fn move_to(&mut self, point: Vec2) {
        let mut path = Path::new();
        path.move_to(point);
        self.subpaths.push(path);
        self.current = Some(self.subpaths.len() - 1);
    }

    pub fn line_to(&mut self, point: Vec2) {
        self.current_path().line_to(point);
    }

    pub fn quadratic_curve_to(&mut self, control: Vec2, point: Vec2) {
        self.current_path().quadratic_curve_to(control, point);
    }

    pub fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, point: Vec2) {
        self.current_path().bezier_curve_to(control1, control2, point);
    }

    /// Append an already built subpath and make it current.
    pub fn push_subpath(&mut self, path: Path) {
        self.subpaths.push(path);
        self.current = Some(self.subpaths.len() - 1);
    }

    /// The subpath receiving drawing commands.
    ///
    /// Drawing before any `move_to` opens an implicit subpath at the origin.
    pub fn current_path(&mut self) -> &mut Path {
        let index = match self.current {
            Some(index) => index,
            None => {
                self.subpaths.push(Path::new());
                let index = self.subpaths.len() - 1;
                self.current = Some(index);
                index
            }
        };
        &mut self.subpaths[index]
    }

    /// Split the subpaths into filled shapes with holes, honoring the fill rule.
    pub fn to_shapes(&self, divisions: usize) -> Vec<Shape> {
        create_shapes(self, divisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_before_move_to_use_origin() {
        let mut shape = ShapePath::new();
        shape.line_to(Vec2::new(4.0, 0.0));

        assert_eq!(shape.subpaths.len(), 1);
        assert_eq!(shape.subpaths[0].points(12), vec![Vec2::ZERO, Vec2::new(4.0, 0.0)]);
    }

    #[test]
    fn test_move_to_opens_subpaths() {
        let mut shape = ShapePath::new();
        shape.move_to(Vec2::ZERO);
        shape.line_to(Vec2::X);
        shape.move_to(Vec2::new(5.0, 5.0));
        shape.line_to(Vec2::new(6.0, 5.0));

        assert_eq!(shape.subpaths.len(), 2);
        assert_eq!(shape.subpaths[1].curves.len(), 1);
    }
}
