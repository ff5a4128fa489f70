//! `fb-spatial`: proximity queries over world snapshots.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`grid`]     | `SpatialIndex` (CSR uniform grid), `GridStats`          |
//! | [`view`]     | `SpatialView` (index + its source snapshot)             |
//! | [`schedule`] | `RebuildSchedule` (every frame / every N frames)        |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                      |
//!
//! The index is rebuilt wholesale from a snapshot and never updated in
//! place.  Queries return unit ids (or slots) in a deterministic order and
//! are exact: the grid only narrows the candidate set.

pub mod error;
pub mod grid;
pub mod schedule;
pub mod view;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::{GridStats, MAX_CELLS, SpatialIndex};
pub use schedule::RebuildSchedule;
pub use view::SpatialView;
