//! Per-portion state flags.

use bitflags::bitflags;

bitflags! {
    /// State of one portion, as set by the owning entity.
    ///
    /// The layer keeps the current flags of every portion so that mutators
    /// know the previous value and can keep the aggregate counters exact.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntityFlags: u16 {
        const VISIBLE = 1 << 0;
        const CULLED = 1 << 1;
        const PICKABLE = 1 << 2;
        const CLIPPABLE = 1 << 3;
        const XRAYED = 1 << 4;
        const HIGHLIGHTED = 1 << 5;
        const SELECTED = 1 << 6;
        const EDGES = 1 << 7;
        const TRANSPARENT = 1 << 8;
    }
}

impl EntityFlags {
    /// Flags with a dedicated aggregate counter, in counter order.
    pub const COUNTED: [EntityFlags; 9] = [
        EntityFlags::VISIBLE,
        EntityFlags::CULLED,
        EntityFlags::PICKABLE,
        EntityFlags::CLIPPABLE,
        EntityFlags::XRAYED,
        EntityFlags::HIGHLIGHTED,
        EntityFlags::SELECTED,
        EntityFlags::EDGES,
        EntityFlags::TRANSPARENT,
    ];

    /// Whether changing `flag` rewrites the secondary flags word instead of the pass bytes.
    pub fn lives_in_flags2(flag: EntityFlags) -> bool {
        flag == EntityFlags::CLIPPABLE
    }
}
