//! `fb-native`: the boundary between the bridge and the simulation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`api`]       | `NativeWorld` (batched reads), `NativeCommandSink`    |
//! | [`records`]   | `CommandCode`, `CommandArgs`, `CommandArrays`, `NativeStatus` |
//! | [`simulated`] | `SimulatedNative`, an in-process implementation       |
//! | [`error`]     | `NativeError`, `NativeResult<T>`                      |
//!
//! Everything that crosses the boundary does so in bulk: one call per array
//! per frame on the read side, one call per frame on the command side.

pub mod api;
pub mod error;
pub mod records;
pub mod simulated;


pub use api::{NativeCommandSink, NativeWorld};
pub use error::{NativeError, NativeResult};
pub use records::{CommandArgs, CommandArrays, CommandCode, NativeStatus, SubmitReport};
pub use simulated::{CallCounts, SimUnit, SimulatedNative};
