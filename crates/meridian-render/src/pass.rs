//! Render pass identifiers and the per-portion pass-selector bytes.
//!
//! Each portion carries four bytes in its instance record. A shader running
//! pass `P` reads the byte for `P`'s channel and discards the instance unless
//! the byte equals `P`. Recomputing those four bytes is all it takes to move
//! a portion between passes.

use crate::flags::EntityFlags;

/// Every pass an instance can be routed to. Discriminants are the byte values
/// written into the instance flags.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPass {
    NotRendered = 0,
    ColorOpaque = 1,
    ColorTransparent = 2,
    SilhouetteHighlighted = 3,
    SilhouetteSelected = 4,
    SilhouetteXrayed = 5,
    EdgesColorOpaque = 6,
    EdgesColorTransparent = 7,
    EdgesHighlighted = 8,
    EdgesSelected = 9,
    EdgesXrayed = 10,
    Pick = 11,
}

/// Which of the four pass-selector bytes a pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagChannel {
    Color = 0,
    Silhouette = 1,
    Edges = 2,
    Pick = 3,
}

impl RenderPass {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn flag_channel(self) -> Option<FlagChannel> {
        match self {
            RenderPass::NotRendered => None,
            RenderPass::ColorOpaque | RenderPass::ColorTransparent => Some(FlagChannel::Color),
            RenderPass::SilhouetteHighlighted
            | RenderPass::SilhouetteSelected
            | RenderPass::SilhouetteXrayed => Some(FlagChannel::Silhouette),
            RenderPass::EdgesColorOpaque
            | RenderPass::EdgesColorTransparent
            | RenderPass::EdgesHighlighted
            | RenderPass::EdgesSelected
            | RenderPass::EdgesXrayed => Some(FlagChannel::Edges),
            RenderPass::Pick => Some(FlagChannel::Pick),
        }
    }
}

/// Derive the four pass-selector bytes for a portion.
///
/// Emphasis passes resolve selected before highlighted before xrayed.
pub fn pass_bytes(flags: EntityFlags) -> [u8; 4] {
    let visible = flags.contains(EntityFlags::VISIBLE);
    let culled = flags.contains(EntityFlags::CULLED);
    let xrayed = flags.contains(EntityFlags::XRAYED);
    let highlighted = flags.contains(EntityFlags::HIGHLIGHTED);
    let selected = flags.contains(EntityFlags::SELECTED);
    let edges = flags.contains(EntityFlags::EDGES);
    let pickable = flags.contains(EntityFlags::PICKABLE);
    let transparent = flags.contains(EntityFlags::TRANSPARENT);
    let shown = visible && !culled;

    let color = if !shown || xrayed {
        RenderPass::NotRendered
    } else if transparent {
        RenderPass::ColorTransparent
    } else {
        RenderPass::ColorOpaque
    };

    let silhouette = if !shown {
        RenderPass::NotRendered
    } else if selected {
        RenderPass::SilhouetteSelected
    } else if highlighted {
        RenderPass::SilhouetteHighlighted
    } else if xrayed {
        RenderPass::SilhouetteXrayed
    } else {
        RenderPass::NotRendered
    };

    let edge = if !shown {
        RenderPass::NotRendered
    } else if selected {
        RenderPass::EdgesSelected
    } else if highlighted {
        RenderPass::EdgesHighlighted
    } else if xrayed {
        RenderPass::EdgesXrayed
    } else if edges {
        if transparent {
            RenderPass::EdgesColorTransparent
        } else {
            RenderPass::EdgesColorOpaque
        }
    } else {
        RenderPass::NotRendered
    };

    let pick = if shown && pickable {
        RenderPass::Pick
    } else {
        RenderPass::NotRendered
    };

    [color.as_u8(), silhouette.as_u8(), edge.as_u8(), pick.as_u8()]
}

/// The secondary flags word: byte 0 is 255 for clippable portions.
pub fn flags2_bytes(flags: EntityFlags) -> [u8; 4] {
    let clippable = if flags.contains(EntityFlags::CLIPPABLE) {
        255
    } else {
        0
    };
    [clippable, 0, 0, 0]
}
