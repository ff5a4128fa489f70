//! `fb-command`: from decisions to native commands and back to outcomes.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`decision`]   | `Decision`, `DecisionKind`                                 |
//! | [`batch`]      | `CommandBatch`, `TranslatedCommand`, `Rejection`, `RejectReason` |
//! | [`translator`] | `CommandTranslator` (pure validation)                      |
//! | [`executor`]   | `CommandBatchExecutor` (one native call per frame)         |
//! | [`outcome`]    | `CommandOutcome`, `CommandState`, `FailReason`, `OutcomeSummary` |
//! | [`error`]      | `ExecuteError`, `ExecuteResult<T>`                         |
//!
//! # Design notes
//!
//! Two phases, like a read/apply split:
//!
//! 1. **Translate** (pure): check every decision against the snapshot the
//!    decision function saw.  Stale or invalid references become explicit
//!    rejections instead of reaching the native layer.
//!
//! 2. **Execute** (one side effect): submit all valid commands in one call
//!    and fold the native report into per-decision outcomes.

pub mod batch;
pub mod decision;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod translator;

#[cfg(test)]
mod tests;

pub use batch::{CommandBatch, RejectReason, Rejection, TranslatedCommand};
pub use decision::{Decision, DecisionKind};
pub use error::{ExecuteError, ExecuteResult};
pub use executor::CommandBatchExecutor;
pub use outcome::{CommandOutcome, CommandState, FailReason, OutcomeSummary};
pub use translator::CommandTranslator;
