//! Aggregate portion counters.
//!
//! Draw dispatch decides whether to skip a pass from these counts alone, so
//! they must match the stored per-portion flags after every mutation.

use crate::flags::EntityFlags;
use parking_lot::Mutex;

/// How many portions are in each counted state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortionCounters {
    pub num_portions: u32,
    pub num_visible: u32,
    pub num_culled: u32,
    pub num_pickable: u32,
    pub num_clippable: u32,
    pub num_xrayed: u32,
    pub num_highlighted: u32,
    pub num_selected: u32,
    pub num_edges: u32,
    pub num_transparent: u32,
}

impl PortionCounters {
    /// Count for one counted flag.
    pub fn get(&self, flag: EntityFlags) -> u32 {
        match self.slot(flag) {
            Some(slot) => *slot.0,
            None => 0,
        }
    }

    /// Move one portion into (`on`) or out of the `flag` state.
    pub fn adjust(&mut self, flag: EntityFlags, on: bool) {
        if let Some((slot, name)) = self.slot_mut(flag) {
            if on {
                *slot += 1;
            } else if *slot == 0 {
                tracing::error!("{name} counter underflow");
            } else {
                *slot -= 1;
            }
        }
    }

    /// Account for every counted flag of a portion entering or leaving.
    pub fn adjust_all(&mut self, flags: EntityFlags, on: bool) {
        for flag in EntityFlags::COUNTED {
            if flags.contains(flag) {
                self.adjust(flag, on);
            }
        }
    }

    /// Add `other` into `self`.
    pub fn add(&mut self, other: &PortionCounters) {
        self.num_portions += other.num_portions;
        for flag in EntityFlags::COUNTED {
            if let Some((slot, _)) = self.slot_mut(flag) {
                *slot += other.get(flag);
            }
        }
    }

    /// Remove `other` from `self`, saturating at zero.
    pub fn subtract(&mut self, other: &PortionCounters) {
        self.num_portions = self.num_portions.saturating_sub(other.num_portions);
        for flag in EntityFlags::COUNTED {
            let amount = other.get(flag);
            if let Some((slot, _)) = self.slot_mut(flag) {
                *slot = slot.saturating_sub(amount);
            }
        }
    }

    fn slot(&self, flag: EntityFlags) -> Option<(&u32, &'static str)> {
        let slot = match flag {
            f if f == EntityFlags::VISIBLE => (&self.num_visible, "visible"),
            f if f == EntityFlags::CULLED => (&self.num_culled, "culled"),
            f if f == EntityFlags::PICKABLE => (&self.num_pickable, "pickable"),
            f if f == EntityFlags::CLIPPABLE => (&self.num_clippable, "clippable"),
            f if f == EntityFlags::XRAYED => (&self.num_xrayed, "xrayed"),
            f if f == EntityFlags::HIGHLIGHTED => (&self.num_highlighted, "highlighted"),
            f if f == EntityFlags::SELECTED => (&self.num_selected, "selected"),
            f if f == EntityFlags::EDGES => (&self.num_edges, "edges"),
            f if f == EntityFlags::TRANSPARENT => (&self.num_transparent, "transparent"),
            _ => return None,
        };
        Some(slot)
    }

    fn slot_mut(&mut self, flag: EntityFlags) -> Option<(&mut u32, &'static str)> {
        let slot = match flag {
            f if f == EntityFlags::VISIBLE => (&mut self.num_visible, "visible"),
            f if f == EntityFlags::CULLED => (&mut self.num_culled, "culled"),
            f if f == EntityFlags::PICKABLE => (&mut self.num_pickable, "pickable"),
            f if f == EntityFlags::CLIPPABLE => (&mut self.num_clippable, "clippable"),
            f if f == EntityFlags::XRAYED => (&mut self.num_xrayed, "xrayed"),
            f if f == EntityFlags::HIGHLIGHTED => (&mut self.num_highlighted, "highlighted"),
            f if f == EntityFlags::SELECTED => (&mut self.num_selected, "selected"),
            f if f == EntityFlags::EDGES => (&mut self.num_edges, "edges"),
            f if f == EntityFlags::TRANSPARENT => (&mut self.num_transparent, "transparent"),
            _ => return None,
        };
        Some(slot)
    }
}

/// Counters of a whole model, shared by all of its layers.
///
/// Layers hold an `Arc<ModelStats>` and apply the same deltas to it that
/// they apply to their own counters.
#[derive(Debug, Default)]
pub struct ModelStats {
    counters: Mutex<PortionCounters>,
}

impl ModelStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current totals.
    pub fn counters(&self) -> PortionCounters {
        *self.counters.lock()
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut PortionCounters)) {
        f(&mut self.counters.lock());
    }
}
