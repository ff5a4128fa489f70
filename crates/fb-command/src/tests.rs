//! Unit tests for fb-command.

use std::sync::Arc;

use fb_core::{
    DefId, DefinitionTable, Energy, Faction, Frame, MapExtent, Metal, Position, ResourceCounters,
    UnitFlags, UnitId,
};
use fb_native::{
    CommandArgs, CommandArrays, CommandCode, NativeCommandSink, NativeError, NativeResult, NativeStatus,
    SubmitReport,
};
use fb_pool::ArrayPool;
use fb_snapshot::{UnitRecord, WorldSnapshot};

use crate::{CommandTranslator, Decision};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn defs() -> Arc<DefinitionTable> {
    let mut b = DefinitionTable::builder();
    b.define("tank", "weapon", 100.0, Metal(10.0), Energy(0.0)).unwrap();
    b.define("constructor", "builder", 50.0, Metal(10.0), Energy(0.0)).unwrap();
    Arc::new(b.build())
}

fn translator() -> CommandTranslator {
    CommandTranslator::new(defs(), MapExtent::new(1000.0, 1000.0))
}

fn unit(id: u32, x: f32, flags: UnitFlags) -> UnitRecord {
    UnitRecord {
        id:         UnitId(id),
        position:   Position::ground(x, 10.0),
        health:     50.0,
        max_health: 100.0,
        def:        DefId(0),
        faction:    Faction::Own,
        flags,
    }
}

/// Units 1–3 alive (2 is a builder), unit 4 dead, unit 5 an enemy.
fn snapshot(frame: u64) -> WorldSnapshot {
    let mut enemy = unit(5, 500.0, UnitFlags::IDLE);
    enemy.faction = Faction::Enemy;
    WorldSnapshot::assemble(
        Frame(frame),
        &[
            unit(1, 10.0, UnitFlags::IDLE),
            unit(2, 20.0, UnitFlags::BUILDER | UnitFlags::IDLE),
            unit(3, 30.0, UnitFlags::empty()),
            unit(4, 40.0, UnitFlags::DEAD),
            enemy,
        ],
        ResourceCounters::default(),
        &mut ArrayPool::new(1),
    )
    .unwrap()
}

fn at(x: f32, z: f32) -> Position {
    Position::ground(x, z)
}

/// Sink that records what it was sent and answers from a script.
#[derive(Default)]
struct RecordingSink {
    calls:       usize,
    sent:        Vec<(CommandCode, UnitId, UnitId, CommandArgs)>,
    /// Per-command answers; `None` means count-only reporting.
    statuses:    Option<Vec<NativeStatus>>,
    /// Count-only success total; defaults to everything.
    succeeded:   Option<usize>,
    fail:        bool,
}

impl NativeCommandSink for RecordingSink {
    fn submit_commands(&mut self, commands: CommandArrays<'_>, status: &mut [NativeStatus]) -> NativeResult<SubmitReport> {
        self.calls += 1;
        assert!(commands.is_aligned());
        assert_eq!(status.len(), commands.len());
        if self.fail {
            return Err(NativeError::Unavailable { call: "submit_commands", code: 9 });
        }
        for i in 0..commands.len() {
            self.sent.push((commands.codes[i], commands.actors[i], commands.targets[i], commands.args[i]));
        }
        match &self.statuses {
            Some(script) => {
                status.copy_from_slice(&script[..commands.len()]);
                let succeeded = script[..commands.len()].iter().filter(|s| s.is_ok()).count();
                Ok(SubmitReport { succeeded, per_command: true })
            }
            None => Ok(SubmitReport { succeeded: self.succeeded.unwrap_or(commands.len()), per_command: false }),
        }
    }
}

// ── Translator ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod translate {
    use super::*;
    use crate::{DecisionKind, RejectReason};

    fn reason_for(decision: Decision) -> Option<RejectReason> {
        let batch = translator().translate(&snapshot(1), &[decision]);
        batch.rejections().first().map(|r| r.reason)
    }

    #[test]
    fn valid_decisions_pass() {
        let snap = snapshot(1);
        let batch = translator().translate(&snap, &[
            Decision::Move { unit: UnitId(1), to: at(100.0, 100.0) },
            Decision::Build { builder: UnitId(2), def: DefId(1), at: at(50.0, 50.0) },
            Decision::Attack { unit: UnitId(3), target: UnitId(5) },
            Decision::Stop { unit: UnitId(1) },
            Decision::Guard { unit: UnitId(1), target: UnitId(2) },
            Decision::Patrol { unit: UnitId(3), to: at(0.0, 0.0) },
        ]);
        assert!(batch.rejections().is_empty());
        assert_eq!(batch.commands().len(), 6);
        assert_eq!(batch.frame(), Frame(1));

        let build = batch.commands()[1];
        assert_eq!(build.code(), CommandCode::Build);
        assert_eq!(build.args.param, 1);
        let attack = batch.commands()[2];
        assert_eq!(attack.target, UnitId(5));
        assert_eq!(attack.args.position(), at(500.0, 10.0));
        assert_eq!(batch.commands()[0].target, UnitId::INVALID);
    }

    #[test]
    fn unknown_actor_is_rejected_alone() {
        let snap = snapshot(1);
        let batch = translator().translate(&snap, &[
            Decision::Move { unit: UnitId(42), to: at(1.0, 1.0) },
            Decision::Move { unit: UnitId(1), to: at(2.0, 2.0) },
        ]);
        assert_eq!(batch.rejections().len(), 1);
        let r = batch.rejections()[0];
        assert_eq!((r.decision, r.actor, r.kind), (0, UnitId(42), DecisionKind::Move));
        assert_eq!(r.reason.as_str(), "unknown actor");
        assert_eq!(batch.commands()[0].decision, 1);
    }

    #[test]
    fn each_rejection_reason() {
        assert_eq!(reason_for(Decision::Stop { unit: UnitId(4) }), Some(RejectReason::DeadActor));
        assert_eq!(
            reason_for(Decision::Attack { unit: UnitId(1), target: UnitId(99) }),
            Some(RejectReason::UnknownTarget)
        );
        assert_eq!(
            reason_for(Decision::Attack { unit: UnitId(1), target: UnitId(4) }),
            Some(RejectReason::DeadTarget)
        );
        assert_eq!(
            reason_for(Decision::Guard { unit: UnitId(1), target: UnitId(1) }),
            Some(RejectReason::SelfTarget)
        );
        assert_eq!(
            reason_for(Decision::Build { builder: UnitId(1), def: DefId(1), at: at(1.0, 1.0) }),
            Some(RejectReason::NotABuilder)
        );
        assert_eq!(
            reason_for(Decision::Build { builder: UnitId(2), def: DefId(9), at: at(1.0, 1.0) }),
            Some(RejectReason::UnknownDefinition)
        );
        assert_eq!(
            reason_for(Decision::Move { unit: UnitId(1), to: at(-1.0, 5.0) }),
            Some(RejectReason::InvalidPosition)
        );
        assert_eq!(
            reason_for(Decision::Patrol { unit: UnitId(1), to: at(f32::NAN, 5.0) }),
            Some(RejectReason::InvalidPosition)
        );
    }

    #[test]
    fn reason_codes_are_distinct() {
        let all = [
            RejectReason::UnknownActor,
            RejectReason::DeadActor,
            RejectReason::UnknownTarget,
            RejectReason::DeadTarget,
            RejectReason::SelfTarget,
            RejectReason::NotABuilder,
            RejectReason::UnknownDefinition,
            RejectReason::InvalidPosition,
        ];
        let mut codes: Vec<u16> = all.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn translation_is_deterministic() {
        let snap = snapshot(1);
        let decisions = [
            Decision::Move { unit: UnitId(1), to: at(3.0, 3.0) },
            Decision::Stop { unit: UnitId(77) },
        ];
        let a = translator().translate(&snap, &decisions);
        let b = translator().translate(&snap, &decisions);
        assert_eq!(a.commands(), b.commands());
        assert_eq!(a.rejections(), b.rejections());
    }
}

// ── Executor ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod execute {
    use fb_pool::BufferSource;

    use super::*;
    use crate::{CommandBatchExecutor, CommandState, ExecuteError, FailReason, OutcomeSummary, RejectReason};

    #[test]
    fn rejected_decision_does_not_disturb_others() {
        let snap = snapshot(1);
        let batch = translator().translate(&snap, &[
            Decision::Stop { unit: UnitId(1) },
            Decision::Move { unit: UnitId(42), to: at(1.0, 1.0) },
            Decision::Move { unit: UnitId(3), to: at(9.0, 9.0) },
        ]);
        let mut sink = RecordingSink::default();
        let outcomes = CommandBatchExecutor::new().execute(&batch, &mut sink, &mut ArrayPool::new(2)).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].state, CommandState::Succeeded);
        assert_eq!(outcomes[1].state, CommandState::Rejected(RejectReason::UnknownActor));
        assert_eq!(outcomes[2].state, CommandState::Succeeded);
        assert_eq!(sink.calls, 1);
        assert_eq!(sink.sent.len(), 2);
        assert_eq!(sink.sent[1].1, UnitId(3));
    }

    #[test]
    fn nothing_valid_means_no_native_call() {
        let snap = snapshot(1);
        let batch = translator().translate(&snap, &[Decision::Stop { unit: UnitId(404) }]);
        let mut sink = RecordingSink::default();
        let outcomes = CommandBatchExecutor::new().execute(&batch, &mut sink, &mut ArrayPool::new(2)).unwrap();
        assert_eq!(sink.calls, 0);
        assert_eq!(outcomes.len(), 1);

        let empty = translator().translate(&snapshot(2), &[]);
        let outcomes = CommandBatchExecutor::new().execute(&empty, &mut sink, &mut ArrayPool::new(2)).unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(sink.calls, 0);
    }

    #[test]
    fn per_command_status_maps_to_failures() {
        let snap = snapshot(1);
        let batch = translator().translate(&snap, &[
            Decision::Build { builder: UnitId(2), def: DefId(0), at: at(5.0, 5.0) },
            Decision::Move { unit: UnitId(1), to: at(5.0, 5.0) },
            Decision::Stop { unit: UnitId(3) },
        ]);
        let mut sink = RecordingSink {
            statuses: Some(vec![NativeStatus::INSUFFICIENT_RESOURCES, NativeStatus::OK, NativeStatus(77)]),
            ..Default::default()
        };
        let outcomes = CommandBatchExecutor::new().execute(&batch, &mut sink, &mut ArrayPool::new(2)).unwrap();
        assert_eq!(outcomes[0].state, CommandState::Failed(FailReason::InsufficientResources));
        assert_eq!(outcomes[1].state, CommandState::Succeeded);
        assert_eq!(outcomes[2].state, CommandState::Failed(FailReason::Other(77)));

        let summary = OutcomeSummary::of(&outcomes);
        assert_eq!((summary.succeeded, summary.failed, summary.submitted()), (1, 2, 3));
    }

    #[test]
    fn count_only_reporting() {
        let snap = snapshot(1);
        let decisions = [Decision::Stop { unit: UnitId(1) }, Decision::Stop { unit: UnitId(2) }];
        let batch = translator().translate(&snap, &decisions);

        let mut full = RecordingSink::default();
        let outcomes = CommandBatchExecutor::new().execute(&batch, &mut full, &mut ArrayPool::new(2)).unwrap();
        assert!(outcomes.iter().all(|o| o.state == CommandState::Succeeded));

        // Short count cannot be attributed.
        let mut short = RecordingSink { succeeded: Some(1), ..Default::default() };
        let outcomes = CommandBatchExecutor::new().execute(&batch, &mut short, &mut ArrayPool::new(2)).unwrap();
        assert!(outcomes.iter().all(|o| o.state == CommandState::Submitted));
        assert_eq!(OutcomeSummary::of(&outcomes).unattributed, 2);
    }

    #[test]
    fn stale_batch_refused() {
        let mut exec = CommandBatchExecutor::new();
        let mut sink = RecordingSink::default();
        let mut pool = ArrayPool::new(2);
        let decisions = [Decision::Stop { unit: UnitId(1) }];
        exec.execute(&translator().translate(&snapshot(5), &decisions), &mut sink, &mut pool).unwrap();
        let err = exec.execute(&translator().translate(&snapshot(5), &decisions), &mut sink, &mut pool).unwrap_err();
        assert!(matches!(err, ExecuteError::StaleBatch { frame: Frame(5), last: Frame(5) }));
        assert_eq!(sink.calls, 1);
        exec.execute(&translator().translate(&snapshot(6), &decisions), &mut sink, &mut pool).unwrap();
        assert_eq!(exec.last_frame(), Some(Frame(6)));
    }

    #[test]
    fn native_error_returns_buffers() {
        let snap = snapshot(1);
        let batch = translator().translate(&snap, &[Decision::Stop { unit: UnitId(1) }]);
        let mut sink = RecordingSink { fail: true, ..Default::default() };
        let mut pool = ArrayPool::new(2);
        let mut exec = CommandBatchExecutor::new();
        let err = exec.execute(&batch, &mut sink, &mut pool).unwrap_err();
        assert!(matches!(err, ExecuteError::Native(_)));
        assert_eq!(pool.stats().outstanding, 0);
        assert_eq!(exec.last_frame(), None);
    }

    #[test]
    fn command_arrays_come_from_the_pool() {
        let mut pool = ArrayPool::new(2);
        let mut exec = CommandBatchExecutor::new();
        let mut sink = RecordingSink::default();
        let decisions = [Decision::Stop { unit: UnitId(1) }, Decision::Stop { unit: UnitId(2) }];
        exec.execute(&translator().translate(&snapshot(1), &decisions), &mut sink, &mut pool).unwrap();
        let allocations = pool.stats().allocations;
        exec.execute(&translator().translate(&snapshot(2), &decisions), &mut sink, &mut pool).unwrap();
        assert_eq!(pool.stats().allocations, allocations);
    }

    #[test]
    fn end_to_end_against_simulated_native() {
        use fb_native::SimulatedNative;
        use fb_snapshot::SnapshotBuilder;

        let table = defs();
        let mut sim = SimulatedNative::new(MapExtent::new(1000.0, 1000.0), (*table).clone());
        let tank = sim.spawn(DefId(0), Faction::Own, at(10.0, 10.0), UnitFlags::IDLE);
        let mut pool = ArrayPool::new(4);
        let snap = SnapshotBuilder::new(3).build(&mut sim, &mut pool, Frame(1)).unwrap();

        let translator = CommandTranslator::new(table, MapExtent::new(1000.0, 1000.0));
        let batch = translator.translate(&snap, &[Decision::Move { unit: tank, to: at(100.0, 10.0) }]);
        let outcomes = CommandBatchExecutor::new().execute(&batch, &mut sim, &mut pool).unwrap();
        assert_eq!(outcomes[0].state, CommandState::Succeeded);
        assert!(sim.unit(tank).unwrap().has_order());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::{CommandBatchExecutor, RejectReason};

    fn decision() -> impl Strategy<Value = Decision> {
        let id = (0u32..8).prop_map(UnitId);
        let pos = (-100.0f32..1100.0, -100.0f32..1100.0).prop_map(|(x, z)| Position::ground(x, z));
        prop_oneof![
            (id.clone(), pos.clone()).prop_map(|(unit, to)| Decision::Move { unit, to }),
            (id.clone(), id.clone()).prop_map(|(unit, target)| Decision::Attack { unit, target }),
            id.clone().prop_map(|unit| Decision::Stop { unit }),
            (id.clone(), 0u16..4, pos).prop_map(|(builder, d, at)| Decision::Build { builder, def: DefId(d), at }),
            (id.clone(), id).prop_map(|(unit, target)| Decision::Guard { unit, target }),
        ]
    }

    proptest! {
        #[test]
        fn one_outcome_per_decision_in_order(decisions in prop::collection::vec(decision(), 0..40)) {
            let snap = snapshot(1);
            let batch = translator().translate(&snap, &decisions);
            prop_assert_eq!(batch.commands().len() + batch.rejections().len(), decisions.len());

            let mut sink = RecordingSink::default();
            let outcomes = CommandBatchExecutor::new().execute(&batch, &mut sink, &mut ArrayPool::new(2)).unwrap();
            prop_assert_eq!(outcomes.len(), decisions.len());
            for (i, (o, d)) in outcomes.iter().zip(&decisions).enumerate() {
                prop_assert_eq!(o.decision, i);
                prop_assert_eq!(o.actor, d.actor());
                prop_assert_eq!(o.kind, d.kind());
                prop_assert!(o.state.is_final());
            }
        }

        #[test]
        fn live_actor_never_rejected_for_lookup(decisions in prop::collection::vec(decision(), 0..40)) {
            let snap = snapshot(1);
            let batch = translator().translate(&snap, &decisions);
            for r in batch.rejections() {
                if snap.is_alive(r.actor) {
                    prop_assert!(!matches!(r.reason, RejectReason::UnknownActor | RejectReason::DeadActor));
                }
            }
        }
    }
}
