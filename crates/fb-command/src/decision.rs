//! Decisions: what the decision function asks units to do.

use fb_core::{DefId, Position, UnitId};
use fb_native::CommandCode;

/// One requested action for one unit.
///
/// Decisions name units by id, never by slot, and are validated against the
/// current snapshot before anything reaches the native layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// `builder` should construct a unit of `def` at `at`.
    Build {
        builder: UnitId,
        def:     DefId,
        at:      Position,
    },
    Move {
        unit: UnitId,
        to:   Position,
    },
    Attack {
        unit:   UnitId,
        target: UnitId,
    },
    /// Drop all orders.
    Stop { unit: UnitId },
    /// Follow and protect `target`.
    Guard {
        unit:   UnitId,
        target: UnitId,
    },
    /// Walk back and forth between the current position and `to`.
    Patrol {
        unit: UnitId,
        to:   Position,
    },
}

impl Decision {
    /// The unit that would carry the decision out.
    pub fn actor(&self) -> UnitId {
        match *self {
            Decision::Build { builder, .. } => builder,
            Decision::Move { unit, .. }
            | Decision::Attack { unit, .. }
            | Decision::Stop { unit }
            | Decision::Guard { unit, .. }
            | Decision::Patrol { unit, .. } => unit,
        }
    }

    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::Build { .. }  => DecisionKind::Build,
            Decision::Move { .. }   => DecisionKind::Move,
            Decision::Attack { .. } => DecisionKind::Attack,
            Decision::Stop { .. }   => DecisionKind::Stop,
            Decision::Guard { .. }  => DecisionKind::Guard,
            Decision::Patrol { .. } => DecisionKind::Patrol,
        }
    }
}

/// Fieldless discriminant of [`Decision`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DecisionKind {
    Build,
    Move,
    Attack,
    Stop,
    Guard,
    Patrol,
}

impl DecisionKind {
    /// Native command code for this kind.
    pub fn code(self) -> CommandCode {
        match self {
            DecisionKind::Build  => CommandCode::Build,
            DecisionKind::Move   => CommandCode::Move,
            DecisionKind::Attack => CommandCode::Attack,
            DecisionKind::Stop   => CommandCode::Stop,
            DecisionKind::Guard  => CommandCode::Guard,
            DecisionKind::Patrol => CommandCode::Patrol,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.code().as_str()
    }
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
