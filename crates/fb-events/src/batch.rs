//! `EventBatch`: the closed, immutable set of occurrences for one frame.

use fb_core::{EventKind, Frame, GameEvent, UnitId};

/// One accepted occurrence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EventRecord {
    /// Delivery sequence number, unique and increasing over the accumulator's
    /// lifetime.
    pub seq:   u64,
    /// Frame the occurrence happened in.  Usually the batch frame; a late
    /// delivery for the previous frame keeps its own stamp.
    pub frame: Frame,
    pub event: GameEvent,
}

/// Occurrences collected between two frame boundaries, in delivery order.
///
/// `frame` is the boundary marker: the batch holds everything delivered
/// after the previous `close_frame` and up to `close_frame(frame)`.
#[derive(Clone, Debug)]
pub struct EventBatch {
    pub(crate) frame:   Frame,
    /// The close before this one, if any.
    pub(crate) after:   Option<Frame>,
    pub(crate) records: Vec<EventRecord>,
    pub(crate) counts:  [usize; EventKind::ALL.len()],
}

impl EventBatch {
    /// A batch with no occurrences.
    pub fn empty(frame: Frame) -> Self {
        Self { frame, after: None, records: Vec::new(), counts: [0; EventKind::ALL.len()] }
    }

    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Events in delivery order.
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.records.iter().map(|r| &r.event)
    }

    /// Number of occurrences of `kind` in this batch.
    #[inline]
    pub fn count(&self, kind: EventKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &EventRecord> + '_ {
        self.records.iter().filter(move |r| r.event.kind() == kind)
    }

    /// Every occurrence about `unit`, in delivery order.
    pub fn for_unit(&self, unit: UnitId) -> impl Iterator<Item = &EventRecord> + '_ {
        self.records.iter().filter(move |r| r.event.unit() == unit)
    }

    /// Occurrences stamped with a frame that had already been closed when
    /// they arrived.
    pub fn late(&self) -> impl Iterator<Item = &EventRecord> + '_ {
        let after = self.after;
        self.records.iter().filter(move |r| after.is_some_and(|a| r.frame <= a))
    }
}
