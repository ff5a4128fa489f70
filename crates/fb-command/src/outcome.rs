//! Per-decision results reported back to the decision function.
//!
//! ```text
//! Pending ──► Submitted ──► Succeeded
//!    │            │
//!    │            └──► Failed(reason)
//!    └──► Rejected(reason)
//! ```
//!
//! `Submitted` is also a final state: it means the native layer took the
//! command but did not say which of its commands worked.

use fb_core::UnitId;
use fb_native::NativeStatus;

use crate::{DecisionKind, RejectReason};

/// Native-side failure of a submitted command.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FailReason {
    InsufficientResources,
    InvalidTarget,
    InvalidBuildSite,
    UnitBusy,
    UnknownUnit,
    /// A status code this crate does not know.
    Other(i32),
}

impl FailReason {
    /// `None` for success and for "not reported".
    pub fn from_status(status: NativeStatus) -> Option<FailReason> {
        Some(match status {
            NativeStatus::OK | NativeStatus::NOT_REPORTED => return None,
            NativeStatus::INSUFFICIENT_RESOURCES => FailReason::InsufficientResources,
            NativeStatus::INVALID_TARGET => FailReason::InvalidTarget,
            NativeStatus::INVALID_BUILD_SITE => FailReason::InvalidBuildSite,
            NativeStatus::UNIT_BUSY => FailReason::UnitBusy,
            NativeStatus::UNKNOWN_UNIT => FailReason::UnknownUnit,
            NativeStatus(code) => FailReason::Other(code),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailReason::InsufficientResources => "insufficient resources",
            FailReason::InvalidTarget         => "invalid target",
            FailReason::InvalidBuildSite      => "invalid build site",
            FailReason::UnitBusy              => "unit busy",
            FailReason::UnknownUnit           => "unknown unit",
            FailReason::Other(_)              => "other",
        }
    }
}

impl std::fmt::Display for FailReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailReason::Other(code) => write!(f, "native status {code}"),
            r => f.write_str(r.as_str()),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum CommandState {
    #[default]
    Pending,
    Submitted,
    Succeeded,
    Rejected(RejectReason),
    Failed(FailReason),
}

impl CommandState {
    /// `true` once no further transition can happen for this frame.
    pub fn is_final(self) -> bool {
        !matches!(self, CommandState::Pending)
    }
}

/// Result for one input decision.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CommandOutcome {
    pub decision: usize,
    pub actor:    UnitId,
    pub kind:     DecisionKind,
    pub state:    CommandState,
}

/// Totals over one frame's outcomes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeSummary {
    /// Still `Submitted`: taken by the native layer without attribution.
    pub unattributed: usize,
    pub succeeded:    usize,
    pub rejected:     usize,
    pub failed:       usize,
}

impl OutcomeSummary {
    pub fn of(outcomes: &[CommandOutcome]) -> Self {
        let mut s = OutcomeSummary::default();
        for o in outcomes {
            match o.state {
                CommandState::Pending => {}
                CommandState::Submitted => s.unattributed += 1,
                CommandState::Succeeded => s.succeeded += 1,
                CommandState::Rejected(_) => s.rejected += 1,
                CommandState::Failed(_) => s.failed += 1,
            }
        }
        s
    }

    /// Commands that reached the native layer.
    pub fn submitted(&self) -> usize {
        self.unattributed + self.succeeded + self.failed
    }
}
