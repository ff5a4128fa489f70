//! `fb-core`: foundational types for the `frame_bridge` workspace.
//!
//! This crate is a dependency of every other `fb-*` crate.  It has no `fb-*`
//! dependencies and few external ones (`rand`, `thiserror`, `bitflags`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `UnitId`, `SlotIndex`, `DefId`                        |
//! | [`geo`]       | `Position`, `MapExtent`                               |
//! | [`time`]      | `Frame`, `FrameClock`                                 |
//! | [`resources`] | `Metal`, `Energy`, `ResourceCounters`                 |
//! | [`flags`]     | `UnitFlags` bitmask                                   |
//! | [`class`]     | `Faction`, `UnitRole`                                 |
//! | [`defs`]      | `DefinitionTable`, `UnitDef`                          |
//! | [`event`]     | `GameEvent`, `EventKind`                              |
//! | [`config`]    | `BridgeConfig`, `RebuildPolicy`                       |
//! | [`rng`]       | `SimRng` (scenario generation only)                   |
//! | [`error`]     | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required for JSON config loading in `fb-bridge`.            |

pub mod class;
pub mod config;
pub mod defs;
pub mod error;
pub mod event;
pub mod flags;
pub mod geo;
pub mod ids;
pub mod resources;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use class::{Faction, UnitRole};
pub use config::{BridgeConfig, RebuildPolicy};
pub use defs::{DefinitionTable, DefinitionTableBuilder, UnitDef};
pub use error::{CoreError, CoreResult};
pub use event::{EventKind, GameEvent};
pub use flags::UnitFlags;
pub use geo::{MapExtent, Position};
pub use ids::{DefId, SlotIndex, UnitId};
pub use resources::{Energy, Metal, ResourceCounters};
pub use rng::SimRng;
pub use time::{FRAMES_PER_SECOND, Frame, FrameClock};
