//! Profiling utilities based on the `puffin` crate.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Turn puffin scope collection on or off.
///
/// Scopes are compiled in everywhere but cost almost nothing while disabled.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
    if enabled {
        tracing::info!("puffin scopes enabled");
    }
}

/// Whether scopes are currently being collected.
pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

/// Mark the start of a new frame for profiling.
///
/// Call this once per rendered frame so scopes from the draw passes group by frame.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
