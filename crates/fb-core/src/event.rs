//! Discrete occurrences reported by the simulation as they happen.
//!
//! The native layer delivers these one at a time, in the middle of a frame.
//! They are shared vocabulary: the native boundary produces them, the event
//! accumulator batches them, and decision functions read them.

use crate::{DefId, UnitId};

/// One occurrence inside a simulation frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// A unit started to exist (possibly as an unfinished nanoframe).
    UnitCreated {
        unit:    UnitId,
        def:     DefId,
        builder: Option<UnitId>,
    },
    /// Construction of `unit` completed.
    UnitFinished { unit: UnitId },
    /// `unit` ran out of orders.
    UnitIdle { unit: UnitId },
    UnitDamaged {
        unit:     UnitId,
        attacker: Option<UnitId>,
        damage:   f32,
    },
    UnitDestroyed {
        unit:     UnitId,
        attacker: Option<UnitId>,
    },
}

impl GameEvent {
    /// The unit the occurrence is about.
    pub fn unit(&self) -> UnitId {
        match *self {
            GameEvent::UnitCreated { unit, .. }
            | GameEvent::UnitFinished { unit }
            | GameEvent::UnitIdle { unit }
            | GameEvent::UnitDamaged { unit, .. }
            | GameEvent::UnitDestroyed { unit, .. } => unit,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::UnitCreated { .. }   => EventKind::Created,
            GameEvent::UnitFinished { .. }  => EventKind::Finished,
            GameEvent::UnitIdle { .. }      => EventKind::Idle,
            GameEvent::UnitDamaged { .. }   => EventKind::Damaged,
            GameEvent::UnitDestroyed { .. } => EventKind::Destroyed,
        }
    }
}

/// Fieldless discriminant of [`GameEvent`], used for per-kind counters.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Created,
    Finished,
    Idle,
    Damaged,
    Destroyed,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Created,
        EventKind::Finished,
        EventKind::Idle,
        EventKind::Damaged,
        EventKind::Destroyed,
    ];

    /// Dense index for counter arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Created   => "created",
            EventKind::Finished  => "finished",
            EventKind::Idle      => "idle",
            EventKind::Damaged   => "damaged",
            EventKind::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
