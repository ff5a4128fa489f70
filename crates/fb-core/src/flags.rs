//! Per-unit state bitmask.

use bitflags::bitflags;

bitflags! {
    /// One byte of unit state, stored as its own SoA array in the snapshot.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitFlags: u8 {
        /// Can construct other units.
        const BUILDER     = 1 << 0;
        /// Has no queued orders.
        const IDLE        = 1 << 1;
        /// Destroyed this frame; still reported until the simulation drops it.
        const DEAD        = 1 << 2;
        /// Under construction (nanoframe).
        const BEING_BUILT = 1 << 3;
        /// Paralyzed; accepts orders but cannot act on them.
        const STUNNED     = 1 << 4;
        const CLOAKED     = 1 << 5;
    }
}

impl UnitFlags {
    #[inline]
    pub fn is_alive(self) -> bool {
        !self.contains(UnitFlags::DEAD)
    }

    #[inline]
    pub fn is_builder(self) -> bool {
        self.contains(UnitFlags::BUILDER)
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        self.contains(UnitFlags::IDLE)
    }
}
