//! Meridian Core
//!
//! Shared foundation for the Meridian viewer crates: vector/matrix math,
//! bounding volumes, attribute quantization, colors, logging and profiling.

pub mod color;
pub mod logging;
pub mod math;
pub mod profiling;
pub mod quantize;

pub use color::Color;
