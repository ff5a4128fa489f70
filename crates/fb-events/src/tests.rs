//! Unit tests for fb-events.

use fb_core::{DefId, GameEvent, UnitId};

fn created(n: u32) -> GameEvent {
    GameEvent::UnitCreated { unit: UnitId(n), def: DefId(0), builder: None }
}

fn idle(n: u32) -> GameEvent {
    GameEvent::UnitIdle { unit: UnitId(n) }
}

#[cfg(test)]
mod accumulate {
    use fb_core::{EventKind, Frame, GameEvent, UnitId};

    use super::*;
    use crate::{AccumulatorError, EventAccumulator};

    #[test]
    fn occurrences_split_at_frame_boundaries() {
        // Three occurrences, update for F, two more, update for F+1.
        let mut acc = EventAccumulator::new();
        acc.accumulate(created(1));
        acc.accumulate(created(2));
        acc.accumulate(idle(1));
        let first = acc.close_frame(Frame(10)).unwrap();
        acc.accumulate(idle(2));
        acc.accumulate(created(3));
        let second = acc.close_frame(Frame(11)).unwrap();

        assert_eq!(first.frame(), Frame(10));
        assert_eq!(first.events().copied().collect::<Vec<_>>(), vec![created(1), created(2), idle(1)]);
        assert_eq!(second.frame(), Frame(11));
        assert_eq!(second.events().copied().collect::<Vec<_>>(), vec![idle(2), created(3)]);
    }

    #[test]
    fn sequence_numbers_follow_delivery() {
        let mut acc = EventAccumulator::new();
        for n in 0..5 {
            acc.accumulate(idle(n));
        }
        let batch = acc.close_frame(Frame(1)).unwrap();
        let seqs: Vec<u64> = batch.records().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
        assert_eq!(acc.total_accepted(), 5);
        assert_eq!(acc.pending(), 0);
    }

    #[test]
    fn empty_frame_gives_empty_batch() {
        let mut acc = EventAccumulator::new();
        let batch = acc.close_frame(Frame(3)).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.frame(), Frame(3));
    }

    #[test]
    fn closing_twice_is_an_error() {
        let mut acc = EventAccumulator::new();
        acc.close_frame(Frame(5)).unwrap();
        let err = acc.close_frame(Frame(5)).unwrap_err();
        assert!(matches!(err, AccumulatorError::FrameAlreadyClosed { frame: Frame(5), last_closed: Frame(5) }));
        assert!(matches!(acc.close_frame(Frame(4)), Err(AccumulatorError::FrameAlreadyClosed { .. })));
        // The open batch survives the failed close.
        acc.accumulate(idle(1));
        assert_eq!(acc.close_frame(Frame(6)).unwrap().len(), 1);
    }

    #[test]
    fn per_kind_counts() {
        let mut acc = EventAccumulator::new();
        acc.accumulate(created(1));
        acc.accumulate(created(2));
        acc.accumulate(GameEvent::UnitDestroyed { unit: UnitId(1), attacker: None });
        let batch = acc.close_frame(Frame(1)).unwrap();
        assert_eq!(batch.count(EventKind::Created), 2);
        assert_eq!(batch.count(EventKind::Destroyed), 1);
        assert_eq!(batch.count(EventKind::Idle), 0);
        assert_eq!(batch.of_kind(EventKind::Created).count(), 2);
        assert_eq!(batch.for_unit(UnitId(1)).count(), 2);

        // Counters restart with the next batch.
        let next = acc.close_frame(Frame(2)).unwrap();
        assert_eq!(next.count(EventKind::Created), 0);
    }

    #[test]
    fn late_occurrence_for_just_closed_frame_is_kept() {
        let mut acc = EventAccumulator::new();
        acc.close_frame(Frame(7)).unwrap();
        acc.accumulate_at(Frame(7), idle(9)).unwrap();
        acc.accumulate_at(Frame(8), idle(10)).unwrap();
        let batch = acc.close_frame(Frame(8)).unwrap();
        assert_eq!(batch.len(), 2);
        let late: Vec<_> = batch.late().map(|r| r.frame).collect();
        assert_eq!(late, vec![Frame(7)]);
    }

    #[test]
    fn occurrence_two_closes_old_is_rejected() {
        let mut acc = EventAccumulator::new();
        acc.close_frame(Frame(1)).unwrap();
        acc.close_frame(Frame(2)).unwrap();
        let err = acc.accumulate_at(Frame(1), idle(1)).unwrap_err();
        assert!(matches!(err, AccumulatorError::CrossFrameOccurrence { stamped: Frame(1), closed: Frame(1) }));
        assert_eq!(acc.pending(), 0);
        acc.accumulate_at(Frame(2), idle(1)).unwrap();
        assert_eq!(acc.pending(), 1);
    }

    #[test]
    fn closed_batch_is_tagged_and_next_frame_starts_empty() {
        let mut acc = EventAccumulator::new();
        acc.accumulate(created(1));
        acc.accumulate(created(2));
        acc.accumulate(idle(1));
        let batch = acc.close_frame(Frame(7)).unwrap();
        assert_eq!(batch.frame(), Frame(7));
        assert_eq!(batch.events().copied().collect::<Vec<_>>(), vec![created(1), created(2), idle(1)]);
        assert!(batch.records().iter().all(|r| r.frame == Frame(7)));
        assert_eq!(batch.late().count(), 0);

        assert_eq!(acc.open_frame(), Frame(8));
        assert_eq!(acc.pending(), 0);
        acc.accumulate(idle(2));
        let next = acc.close_frame(Frame(8)).unwrap();
        assert_eq!(next.frame(), Frame(8));
        assert_eq!(next.events().copied().collect::<Vec<_>>(), vec![idle(2)]);
    }

    #[test]
    fn unstamped_occurrences_take_the_closing_frame_after_a_gap() {
        let mut acc = EventAccumulator::new();
        acc.close_frame(Frame(3)).unwrap();
        acc.accumulate(idle(1));
        acc.accumulate_at(Frame(5), idle(2)).unwrap();
        let batch = acc.close_frame(Frame(7)).unwrap();
        let stamps: Vec<Frame> = batch.records().iter().map(|r| r.frame).collect();
        assert_eq!(stamps, vec![Frame(7), Frame(5)]);
        assert_eq!(batch.late().count(), 0);
    }

    #[test]
    fn open_frame_follows_last_close() {
        let mut acc = EventAccumulator::new();
        assert_eq!(acc.open_frame(), Frame::ZERO);
        acc.close_frame(Frame(41)).unwrap();
        assert_eq!(acc.open_frame(), Frame(42));
        acc.accumulate(idle(1));
        let batch = acc.close_frame(Frame(42)).unwrap();
        assert_eq!(batch.records()[0].frame, Frame(42));
    }
}

#[cfg(test)]
mod recycle {
    use fb_core::{EventKind, Frame};

    use super::*;
    use crate::EventAccumulator;

    #[test]
    fn requeued_batch_comes_back_first_and_late() {
        let mut acc = EventAccumulator::new();
        acc.accumulate(created(1));
        acc.accumulate(idle(1));
        let aborted = acc.close_frame(Frame(1)).unwrap();
        acc.accumulate(idle(2));
        acc.requeue(aborted);
        assert_eq!(acc.pending(), 3);
        acc.accumulate(idle(3));

        let batch = acc.close_frame(Frame(2)).unwrap();
        assert_eq!(batch.events().copied().collect::<Vec<_>>(), vec![created(1), idle(1), idle(2), idle(3)]);
        let seqs: Vec<u64> = batch.records().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
        let stamps: Vec<Frame> = batch.records().iter().map(|r| r.frame).collect();
        assert_eq!(stamps, vec![Frame(1), Frame(1), Frame(2), Frame(2)]);
        assert_eq!(batch.late().count(), 2);
        assert_eq!(batch.count(EventKind::Idle), 3);
        assert_eq!(batch.count(EventKind::Created), 1);
    }

    #[test]
    fn requeued_empty_batch_changes_nothing() {
        let mut acc = EventAccumulator::new();
        let empty = acc.close_frame(Frame(1)).unwrap();
        acc.accumulate(idle(4));
        acc.requeue(empty);
        let batch = acc.close_frame(Frame(2)).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records()[0].frame, Frame(2));
    }

    #[test]
    fn recycled_storage_is_swapped_in() {
        let mut acc = EventAccumulator::new();
        for n in 0..64 {
            acc.accumulate(idle(n));
        }
        let batch = acc.close_frame(Frame(1)).unwrap();
        let cap = batch.records.capacity();
        acc.recycle(batch);

        // Next close swaps the recycled buffer in as the open batch.
        let empty = acc.close_frame(Frame(2)).unwrap();
        assert!(empty.is_empty());
        assert!(acc.capacity() >= cap);
        assert_eq!(acc.pending(), 0);
    }

    #[test]
    fn recycled_batch_leaves_no_records_behind() {
        let mut acc = EventAccumulator::new();
        acc.accumulate(created(1));
        let batch = acc.close_frame(Frame(1)).unwrap();
        acc.recycle(batch);
        acc.close_frame(Frame(2)).unwrap();
        acc.accumulate(created(2));
        let batch = acc.close_frame(Frame(3)).unwrap();
        assert_eq!(batch.events().copied().collect::<Vec<_>>(), vec![created(2)]);
    }
}
