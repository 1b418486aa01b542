//! SVG document loading.
//!
//! [`SvgLoader`] walks a parsed XML tree and turns every drawable element
//! into a [`ShapePath`] in document order. Presentation attributes cascade
//! from ancestors, and `<style>` rules for `.class` and `#id` selectors apply
//! on top of attributes, with inline `style` taking precedence over both.
//! Transforms accumulate down the tree and are baked into the output curves.
//!
//! ```no_run
//! use meridian_geometry::svg::SvgLoader;
//!
//! let data = SvgLoader::default()
//!     .parse(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="4" height="2"/></svg>"#)
//!     .unwrap();
//! let shapes = data.paths[0].to_shapes(12);
//! ```

mod arc;
mod color;
mod css;
mod numbers;
mod parser;
mod path_data;
mod units;

pub use arc::{append_arc, svg_angle};
pub use color::parse_color;
pub use css::{Declarations, StyleSheet, parse_declarations};
pub use numbers::{ARC_FLAGS, FlagSlots, lenient_float, parse_floats};
pub use path_data::parse_path_data;
pub use units::{Unit, UnitConverter};

use meridian_core::profiling::profile_function;

use crate::error::SvgResult;
use crate::shape_path::ShapePath;

/// Loader settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    /// Pixels per inch when converting between pixels and physical units.
    pub default_dpi: f32,
    /// Unit of the output coordinates.
    pub default_unit: Unit,
    /// Divisions used when flattening curves for hole detection and filling.
    pub curve_divisions: usize,
    /// Maximum nesting of `<use>` references.
    pub max_use_depth: usize,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            default_dpi: 90.0,
            default_unit: Unit::Px,
            curve_divisions: crate::path::DEFAULT_DIVISIONS,
            max_use_depth: 32,
        }
    }
}

/// Size information from the document element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvgRoot {
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// `[min_x, min_y, width, height]`.
    pub view_box: Option<[f32; 4]>,
}

/// Result of loading a document.
#[derive(Debug, Clone, Default)]
pub struct SvgData {
    pub paths: Vec<ShapePath>,
    pub root: SvgRoot,
}

/// Parses SVG text into shape paths.
#[derive(Debug, Clone, Default)]
pub struct SvgLoader {
    options: SvgOptions,
}

impl SvgLoader {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SvgOptions {
        &self.options
    }

    /// Parse a document from text.
    ///
    /// Malformed XML and malformed numeric lists abort the load. Unsupported
    /// features are skipped with a warning.
    pub fn parse(&self, text: &str) -> SvgResult<SvgData> {
        profile_function!();
        let data = parser::parse_document(text, &self.options)?;
        tracing::debug!("Loaded SVG with {} paths", data.paths.len());
        Ok(data)
    }

    /// Read and parse a document from disk.
    pub fn load(&self, path: impl AsRef<std::path::Path>) -> SvgResult<SvgData> {
        let path = path.as_ref();
        tracing::debug!("Loading SVG from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        self.parse(&text)
    }
}
