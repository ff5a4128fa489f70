//! Resource counters with per-resource measurement units.
//!
//! `Metal` and `Energy` are separate newtypes over `f32`.  Arithmetic is only
//! defined between values of the same unit, so adding income of one resource
//! to the stockpile of the other does not compile.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

macro_rules! resource_unit {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub f32);

        impl $name {
            pub const ZERO: $name = $name(0.0);

            #[inline]
            pub fn amount(self) -> f32 {
                self.0
            }

            /// `self - rhs`, floored at zero.
            #[inline]
            pub fn saturating_sub(self, rhs: $name) -> $name {
                $name((self.0 - rhs.0).max(0.0))
            }
        }

        impl Add for $name {
            type Output = $name;
            #[inline]
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = $name;
            #[inline]
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: $name) {
                self.0 -= rhs.0;
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.1} {}", self.0, $label)
            }
        }
    };
}

resource_unit! {
    /// Metal, the construction resource.
    Metal, "metal"
}

resource_unit! {
    /// Energy, the power resource.
    Energy, "energy"
}

/// Stockpile, income and storage for both resources, as reported by one
/// native call.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceCounters {
    pub metal:          Metal,
    pub energy:         Energy,
    pub metal_income:   Metal,
    pub energy_income:  Energy,
    pub metal_storage:  Metal,
    pub energy_storage: Energy,
}

impl ResourceCounters {
    /// `true` if the stockpile covers both costs.
    pub fn can_afford(&self, metal: Metal, energy: Energy) -> bool {
        self.metal >= metal && self.energy >= energy
    }
}
