//! `fb-events`: per-frame batching of native occurrences.
//!
//! | Module          | Contents                                  |
//! |-----------------|-------------------------------------------|
//! | [`accumulator`] | `EventAccumulator`                        |
//! | [`batch`]       | `EventBatch`, `EventRecord`               |
//! | [`error`]       | `AccumulatorError`, `AccumulatorResult<T>` |

pub mod accumulator;
pub mod batch;
pub mod error;

#[cfg(test)]
mod tests;

pub use accumulator::EventAccumulator;
pub use batch::{EventBatch, EventRecord};
pub use error::{AccumulatorError, AccumulatorResult};
