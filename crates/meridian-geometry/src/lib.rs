//! Meridian Geometry - 2D vector shapes from SVG documents
//!
//! This crate provides:
//! - An SVG loader producing one [`ShapePath`] per drawable element
//! - Curve, path and transform primitives
//! - Hole detection splitting subpaths into [`Shape`]s under nonzero or evenodd
//! - Stroke generation into flat triangle buffers
//! - Fill tessellation via Lyon
//!
//! # Example
//!
//! ```no_run
//! use meridian_geometry::*;
//! use meridian_geometry::svg::SvgLoader;
//!
//! let data = SvgLoader::default().parse(
//!     r#"<svg xmlns="http://www.w3.org/2000/svg">
//!            <path d="M0 0 H10 V10 H0 Z M3 3 V7 H7 V3 Z" stroke="black"/>
//!        </svg>"#,
//! )?;
//!
//! let mut tessellator = Tessellator::new();
//! for path in &data.paths {
//!     let fill = tessellator.tessellate_shape_path(path, DEFAULT_DIVISIONS);
//!
//!     let style = StrokeStyle::from_node_style(&path.style);
//!     for subpath in &path.subpaths {
//!         let outline = points_to_stroke(
//!             &subpath.points(DEFAULT_DIVISIONS),
//!             &style,
//!             DEFAULT_ARC_DIVISIONS,
//!             DEFAULT_MIN_DISTANCE,
//!         );
//!     }
//! }
//! # Ok::<(), SvgError>(())
//! ```

// Core primitives
mod curve;
mod path;
mod shape;
mod shape_path;
mod transform;

// Styling
mod stroke;
mod style;

// Tessellation
mod tessellator;
mod vertex;

mod error;
pub mod svg;

// Re-exports
pub use curve::*;
pub use path::*;
pub use shape::*;
pub use shape_path::*;
pub use transform::*;

pub use stroke::*;
pub use style::*;

pub use tessellator::*;
pub use vertex::*;

pub use error::*;
