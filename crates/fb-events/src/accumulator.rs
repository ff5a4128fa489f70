//! `EventAccumulator`: turns mid-frame native callbacks into one batch per
//! frame.
//!
//! # Ordering
//!
//! Records keep delivery order.  `close_frame` swaps the open buffer out in
//! one step, so an occurrence is either in the batch being returned or in the
//! next one, never both and never lost.
//!
//! # Frame stamps
//!
//! `accumulate` leaves the stamp open; the record takes the frame of the
//! batch it is closed into.  `accumulate_at` keeps the stamp the native layer
//! gave it.
//!
//! # Late occurrences
//!
//! The native layer may deliver an occurrence for frame F after it has
//! already sent the frame update for F.  Such occurrences land in the next
//! batch with their own stamp.  An occurrence stamped with a frame that was
//! closed before the most recent close is a contract violation.
//!
//! # Aborted frames
//!
//! A consumer that could not process a batch hands it back with `requeue`.
//! Its records go back ahead of anything delivered since, and come out again
//! in the next batch as late occurrences.

use std::mem;

use fb_core::{EventKind, Frame, GameEvent};

use crate::{AccumulatorError, AccumulatorResult, EventBatch, EventRecord};

#[derive(Default)]
pub struct EventAccumulator {
    records:     Vec<EventRecord>,
    /// Positions in `records` still waiting for the frame they close into.
    unstamped:   Vec<usize>,
    counts:      [usize; EventKind::ALL.len()],
    /// Storage recycled from a handed-out batch, swapped in on the next close.
    spare:       Option<Vec<EventRecord>>,
    last_closed: Option<Frame>,
    prev_closed: Option<Frame>,
    next_seq:    u64,
}

impl EventAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame the open batch is collecting for.
    pub fn open_frame(&self) -> Frame {
        self.last_closed.map_or(Frame::ZERO, Frame::next)
    }

    pub fn last_closed(&self) -> Option<Frame> {
        self.last_closed
    }

    /// Occurrences waiting in the open batch.
    pub fn pending(&self) -> usize {
        self.records.len()
    }

    /// Allocated capacity of the open batch.
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Total occurrences accepted since construction.
    pub fn total_accepted(&self) -> u64 {
        self.next_seq
    }

    /// Append an occurrence for whichever frame closes next.
    pub fn accumulate(&mut self, event: GameEvent) {
        self.unstamped.push(self.records.len());
        self.push(self.open_frame(), event);
    }

    /// Append an occurrence the native layer stamped with `frame`.
    pub fn accumulate_at(&mut self, frame: Frame, event: GameEvent) -> AccumulatorResult<()> {
        if let Some(closed) = self.prev_closed.filter(|&p| frame <= p) {
            tracing::warn!(stamped = %frame, %closed, kind = %event.kind(), "cross-frame occurrence dropped");
            return Err(AccumulatorError::CrossFrameOccurrence { stamped: frame, closed });
        }
        self.push(frame, event);
        Ok(())
    }

    /// Close the open batch as `frame` and start a new one.
    pub fn close_frame(&mut self, frame: Frame) -> AccumulatorResult<EventBatch> {
        if let Some(last_closed) = self.last_closed.filter(|&l| frame <= l) {
            return Err(AccumulatorError::FrameAlreadyClosed { frame, last_closed });
        }
        for i in self.unstamped.drain(..) {
            self.records[i].frame = frame;
        }
        let next = self.spare.take().unwrap_or_default();
        let records = mem::replace(&mut self.records, next);
        let counts = mem::take(&mut self.counts);
        let after = self.last_closed;
        self.prev_closed = self.last_closed;
        self.last_closed = Some(frame);
        tracing::debug!(%frame, events = records.len(), "event batch closed");
        Ok(EventBatch { frame, after, records, counts })
    }

    /// Give a consumed batch's storage back for reuse.
    pub fn recycle(&mut self, batch: EventBatch) {
        self.keep_spare(batch.records);
    }

    /// Put an unprocessed batch back in front of the open one.
    ///
    /// Records keep their stamps and sequence numbers, so the next batch
    /// lists them first and reports them as late.
    pub fn requeue(&mut self, batch: EventBatch) {
        let restored = batch.records.len();
        if restored == 0 {
            self.keep_spare(batch.records);
            return;
        }
        for (count, n) in self.counts.iter_mut().zip(batch.counts) {
            *count += n;
        }
        for i in &mut self.unstamped {
            *i += restored;
        }
        let mut records = batch.records;
        records.append(&mut self.records);
        let emptied = mem::replace(&mut self.records, records);
        self.keep_spare(emptied);
        tracing::debug!(frame = %batch.frame, restored, pending = self.records.len(), "event batch requeued");
    }

    fn keep_spare(&mut self, mut storage: Vec<EventRecord>) {
        storage.clear();
        match &self.spare {
            Some(s) if s.capacity() >= storage.capacity() => {}
            _ => self.spare = Some(storage),
        }
    }

    fn push(&mut self, frame: Frame, event: GameEvent) {
        self.counts[event.kind().index()] += 1;
        self.records.push(EventRecord { seq: self.next_seq, frame, event });
        self.next_seq += 1;
    }
}
