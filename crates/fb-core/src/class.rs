//! Closed unit classification: which side a unit is on and what it is for.
//!
//! Surrounding tooling classifies units by matching category strings every
//! time it needs to know.  Here the classification is a closed enum resolved
//! once, when the definition table is loaded; per-frame code only compares
//! enum tags.

/// Side of a unit relative to the controlling team.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Faction {
    /// Controlled by this bridge's team.
    Own,
    Ally,
    Enemy,
    /// Features, wrecks and anything without a team.
    #[default]
    Neutral,
}

impl Faction {
    /// Decode the native team relation code (`0` own, `1` ally, `2` enemy).
    /// Anything else is neutral.
    pub fn from_native(code: i32) -> Faction {
        match code {
            0 => Faction::Own,
            1 => Faction::Ally,
            2 => Faction::Enemy,
            _ => Faction::Neutral,
        }
    }

    #[inline]
    pub fn is_hostile(self) -> bool {
        matches!(self, Faction::Enemy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Own     => "own",
            Faction::Ally    => "ally",
            Faction::Enemy   => "enemy",
            Faction::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a unit definition is for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum UnitRole {
    Commander,
    Builder,
    Factory,
    Economy,
    Defense,
    Scout,
    #[default]
    Combat,
}

impl UnitRole {
    /// Resolve a role from a whitespace-separated category string such as
    /// `"COMMANDER LAND BUILDER"`.  Earlier matches win; unknown categories
    /// fall back to `Combat`.  Called once per definition at load time.
    pub fn from_categories(categories: &str) -> UnitRole {
        let mut role = None;
        for cat in categories.split_whitespace() {
            let candidate = match cat.to_ascii_uppercase().as_str() {
                "COMMANDER"                       => UnitRole::Commander,
                "FACTORY" | "PLANT" | "LAB"       => UnitRole::Factory,
                "BUILDER" | "CONSTRUCTOR"         => UnitRole::Builder,
                "METAL" | "ENERGY" | "EXTRACTOR"  => UnitRole::Economy,
                "DEFENSE" | "TURRET"              => UnitRole::Defense,
                "SCOUT"                           => UnitRole::Scout,
                _ => continue,
            };
            // Commander beats builder: commanders carry both categories.
            role = match role {
                None => Some(candidate),
                Some(UnitRole::Builder) if candidate == UnitRole::Commander => Some(candidate),
                Some(r) => Some(r),
            };
        }
        role.unwrap_or_default()
    }

    /// `true` for roles that can issue build orders.
    #[inline]
    pub fn can_build(self) -> bool {
        matches!(self, UnitRole::Commander | UnitRole::Builder | UnitRole::Factory)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitRole::Commander => "commander",
            UnitRole::Builder   => "builder",
            UnitRole::Factory   => "factory",
            UnitRole::Economy   => "economy",
            UnitRole::Defense   => "defense",
            UnitRole::Scout     => "scout",
            UnitRole::Combat    => "combat",
        }
    }
}

impl std::fmt::Display for UnitRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
