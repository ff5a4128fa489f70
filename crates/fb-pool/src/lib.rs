//! `fb-pool`: buffer reuse for per-frame arrays.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`buffer`] | `PooledBuffer<T>`, `PoolId`, `PoolElement`                  |
//! | [`pool`]   | `BufferSource` trait, `ArrayPool`, `AllocatingPool`         |
//! | [`shared`] | `SharedArrayPool` (`Arc<Mutex<ArrayPool>>`)                 |
//! | [`stats`]  | `PoolStats`                                                 |
//! | [`error`]  | `PoolError`, `PoolResult<T>`                                |
//!
//! Snapshot arrays and command arrays are rented at the start of a frame and
//! released when the frame that produced them is discarded, so a steady-state
//! pipeline stops allocating after the first few frames.

pub mod buffer;
pub mod error;
pub mod pool;
pub mod shared;
pub mod stats;


pub use buffer::{PoolElement, PoolId, PooledBuffer};
pub use error::{PoolError, PoolResult};
pub use pool::{AllocatingPool, ArrayPool, BufferSource};
pub use shared::SharedArrayPool;
pub use stats::PoolStats;
