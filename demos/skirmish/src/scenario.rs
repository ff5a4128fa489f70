//! The skirmish world: unit definitions and the starting layout.
//!
//! Two bases face each other across a square map.  Each side starts with a
//! handful of constructors and a scattered army; the enemy side never
//! receives commands.

use fb_core::{
    DefId, DefinitionTable, Energy, Faction, MapExtent, Metal, Position, ResourceCounters, SimRng, UnitFlags,
};
use fb_native::SimulatedNative;

pub const MAP_SIZE: f32 = 4_096.0;

/// Definition ids, in the order `definitions` defines them.
pub struct Defs {
    pub tank:        DefId,
    pub artillery:   DefId,
    pub constructor: DefId,
}

pub fn definitions() -> anyhow::Result<(DefinitionTable, Defs)> {
    let mut b = DefinitionTable::builder();
    let tank = b.define("tank", "weapon mobile", 300.0, Metal(60.0), Energy(0.0))?;
    let artillery = b.define("artillery", "weapon mobile", 180.0, Metal(90.0), Energy(20.0))?;
    let constructor = b.define("constructor", "builder mobile", 150.0, Metal(50.0), Energy(0.0))?;
    Ok((b.build(), Defs { tank, artillery, constructor }))
}

pub fn starting_resources() -> ResourceCounters {
    ResourceCounters {
        metal:          Metal(400.0),
        energy:         Energy(200.0),
        metal_income:   Metal(1.5),
        energy_income:  Energy(3.0),
        metal_storage:  Metal(2_000.0),
        energy_storage: Energy(1_000.0),
    }
}

/// Spawn both sides.  `per_side` units each, deterministic for `seed`.
pub fn populate(native: &mut SimulatedNative, defs: &Defs, per_side: usize, seed: u64) {
    let mut rng = SimRng::new(seed);
    for (faction, base_x) in [(Faction::Own, MAP_SIZE * 0.2), (Faction::Enemy, MAP_SIZE * 0.8)] {
        for i in 0..per_side {
            let x = (base_x + rng.gen_range(-600.0f32..=600.0)).clamp(0.0, MAP_SIZE);
            let z = rng.gen_range(0.0..=MAP_SIZE);
            let (def, flags) = match i % 8 {
                0 => (defs.constructor, UnitFlags::IDLE | UnitFlags::BUILDER),
                1 | 2 => (defs.artillery, UnitFlags::IDLE),
                _ => (defs.tank, UnitFlags::IDLE),
            };
            native.spawn(def, faction, Position::ground(x, z), flags);
        }
    }
}

pub fn map() -> MapExtent {
    MapExtent::new(MAP_SIZE, MAP_SIZE)
}
