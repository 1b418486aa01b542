//! Error types for instanced layers.

use std::fmt;

/// Contract violations and invalid input reported by an [`InstancedLayer`](crate::InstancedLayer).
///
/// Every operation that returns one of these leaves the layer unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerError {
    /// `create_portion` or `finalize` after the layer was finalized.
    AlreadyFinalized,
    /// A per-portion mutator was called before `finalize`.
    NotFinalized,
    /// The layer's GPU buffers have been released.
    Destroyed,
    /// No portion with this id exists in the layer.
    UnknownPortion {
        portion_id: u32,
        portion_count: u32,
    },
    /// `set_offset` on a layer created without offset support.
    OffsetsDisabled,
    /// The base geometry description is inconsistent.
    InvalidGeometry(String),
    /// A partial write fell outside its buffer.
    BufferRange {
        label: String,
        offset: u64,
        len: usize,
        size: u64,
    },
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerError::AlreadyFinalized => write!(f, "layer is already finalized"),
            LayerError::NotFinalized => write!(f, "layer is not finalized yet"),
            LayerError::Destroyed => write!(f, "layer has been destroyed"),
            LayerError::UnknownPortion {
                portion_id,
                portion_count,
            } => write!(
                f,
                "portion {} does not exist (layer has {} portions)",
                portion_id, portion_count
            ),
            LayerError::OffsetsDisabled => {
                write!(f, "per-portion offsets are not enabled for this layer")
            }
            LayerError::InvalidGeometry(msg) => write!(f, "invalid geometry: {}", msg),
            LayerError::BufferRange {
                label,
                offset,
                len,
                size,
            } => write!(
                f,
                "write of {} bytes at offset {} exceeds buffer '{}' of {} bytes",
                len, offset, label, size
            ),
        }
    }
}

impl std::error::Error for LayerError {}

/// Result type for layer operations.
pub type LayerResult<T> = Result<T, LayerError>;
