//! Per-frame render state.

/// Frame-wide toggles read by every layer while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// Ambient occlusion is enabled for this frame.
    pub with_sao: bool,
    pub pbr_enabled: bool,
    pub color_texture_enabled: bool,
    /// Set by each layer before it draws: whether back faces are rendered.
    pub backfaces: bool,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            with_sao: false,
            pbr_enabled: true,
            color_texture_enabled: true,
            backfaces: false,
        }
    }
}
