//! Strongly typed, zero-cost identifier wrappers.
//!
//! `UnitId` is the simulation's own identifier and is only unique within one
//! snapshot.  `SlotIndex` is the position of a unit in a snapshot's parallel
//! arrays and is meaningless outside the snapshot that assigned it.  Keeping
//! the two as distinct types stops a slot from one frame being used as an id
//! (or vice versa) without an explicit lookup.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Simulation-assigned unit identifier.  Unique within one snapshot.
    pub struct UnitId(u32);
}

typed_id! {
    /// Position of a unit in a snapshot's parallel arrays.
    pub struct SlotIndex(u32);
}

typed_id! {
    /// Compact unit-definition id.  `u16` keeps the per-unit array small
    /// (max 65,535 definitions).
    pub struct DefId(u16);
}
