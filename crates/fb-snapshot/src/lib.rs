//! `fb-snapshot`: per-frame world snapshots.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`snapshot`] | `WorldSnapshot` (SoA arrays), `UnitView`, `UnitRecord` |
//! | [`builder`]  | `SnapshotBuilder`, `BuildStats`                        |
//! | [`delta`]    | `SnapshotDelta`, `HealthLoss`                          |
//! | [`error`]    | `SnapshotError`, `SnapshotResult<T>`                   |
//!
//! A snapshot lives for two frames: the frame it was built for, and the next
//! one as the "previous" snapshot.  Its arrays then go back to the pool.

pub mod builder;
pub mod delta;
pub mod error;
pub mod snapshot;


pub use builder::{BuildStats, SnapshotBuilder};
pub use delta::{HealthLoss, SnapshotDelta};
pub use error::{SnapshotError, SnapshotResult};
pub use snapshot::{UnitRecord, UnitView, WorldSnapshot};
