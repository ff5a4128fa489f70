//! `CommandBatch`: the validated form of one frame's decisions.

use fb_core::{Frame, UnitId};
use fb_native::{CommandArgs, CommandCode};

use crate::DecisionKind;

/// A decision that passed validation, in native record form.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TranslatedCommand {
    /// Index of the originating decision.
    pub decision: usize,
    pub kind:     DecisionKind,
    pub actor:    UnitId,
    /// `UnitId::INVALID` for commands without a target unit.
    pub target:   UnitId,
    pub args:     CommandArgs,
}

impl TranslatedCommand {
    #[inline]
    pub fn code(&self) -> CommandCode {
        self.kind.code()
    }
}

/// Why a decision never reached the native layer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RejectReason {
    UnknownActor,
    DeadActor,
    UnknownTarget,
    DeadTarget,
    /// Attack or guard aimed at the acting unit itself.
    SelfTarget,
    /// Build requested from a unit without the `BUILDER` flag.
    NotABuilder,
    UnknownDefinition,
    /// Non-finite or off-map position.
    InvalidPosition,
}

impl RejectReason {
    /// Stable numeric code for logs and hosts.
    pub fn code(self) -> u16 {
        match self {
            RejectReason::UnknownActor      => 1,
            RejectReason::DeadActor         => 2,
            RejectReason::UnknownTarget     => 3,
            RejectReason::DeadTarget        => 4,
            RejectReason::SelfTarget        => 5,
            RejectReason::NotABuilder       => 6,
            RejectReason::UnknownDefinition => 7,
            RejectReason::InvalidPosition   => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::UnknownActor      => "unknown actor",
            RejectReason::DeadActor         => "dead actor",
            RejectReason::UnknownTarget     => "unknown target",
            RejectReason::DeadTarget        => "dead target",
            RejectReason::SelfTarget        => "self target",
            RejectReason::NotABuilder       => "not a builder",
            RejectReason::UnknownDefinition => "unknown definition",
            RejectReason::InvalidPosition   => "invalid position",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub decision: usize,
    pub kind:     DecisionKind,
    pub actor:    UnitId,
    pub reason:   RejectReason,
}

/// Commands and rejections for one frame.  Together they account for every
/// input decision exactly once; each list is in decision order.
#[derive(Clone, Debug)]
pub struct CommandBatch {
    pub(crate) frame:      Frame,
    pub(crate) decisions:  usize,
    pub(crate) commands:   Vec<TranslatedCommand>,
    pub(crate) rejections: Vec<Rejection>,
}

impl CommandBatch {
    /// Frame of the snapshot the decisions were validated against.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Number of input decisions.
    pub fn decision_count(&self) -> usize {
        self.decisions
    }

    pub fn commands(&self) -> &[TranslatedCommand] {
        &self.commands
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    pub fn is_empty(&self) -> bool {
        self.decisions == 0
    }
}
