//! The `Bridge` struct and its frame pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fb_command::{CommandBatchExecutor, CommandOutcome, CommandTranslator, OutcomeSummary};
use fb_core::{BridgeConfig, DefinitionTable, Frame, FrameClock, GameEvent, MapExtent};
use fb_events::{EventAccumulator, EventBatch};
use fb_native::{NativeCommandSink, NativeWorld, SimulatedNative};
use fb_pool::{ArrayPool, BufferSource, PoolStats};
use fb_snapshot::{SnapshotBuilder, SnapshotDelta, WorldSnapshot};
use fb_spatial::{RebuildSchedule, SpatialView};

use crate::{
    BridgeError, BridgeObserver, BridgeResult, DecisionModel, FrameContext, FrameReport, NoopObserver, Stage,
    StageError,
};

type StageResult<T> = Result<T, (Stage, StageError)>;

fn at<E: Into<StageError>>(stage: Stage) -> impl FnOnce(E) -> (Stage, StageError) {
    move |e| (stage, e.into())
}

// ── Bridge ────────────────────────────────────────────────────────────────────

/// Frame-lockstep bridge between the native simulation and a decision model.
///
/// The native layer drives it through two entry points:
///
/// - [`on_occurrence`][Self::on_occurrence] for every event it reports
///   mid-frame;
/// - [`on_frame_update`][Self::on_frame_update] once per frame, which runs
///   the whole pipeline:
///
/// ```text
/// close event batch → build snapshot → (re)build spatial index
///   → decide → translate → execute → rotate snapshots → report
/// ```
///
/// Stages run strictly in sequence on the calling thread.  A failing stage
/// aborts the frame with [`BridgeError::FrameAborted`]; the bridge keeps its
/// last good snapshots, spatial view and outcomes, puts the frame's events
/// back for the next batch, and the next frame update proceeds normally.
///
/// Create via [`BridgeBuilder`][crate::BridgeBuilder].
pub struct Bridge<N, M, O = NoopObserver> {
    pub(crate) config:     BridgeConfig,
    pub(crate) clock:      FrameClock,
    pub(crate) budget:     Duration,
    pub(crate) native:     N,
    pub(crate) model:      M,
    pub(crate) observer:   O,
    pub(crate) pool:       ArrayPool,
    pub(crate) defs:       Arc<DefinitionTable>,
    pub(crate) map:        MapExtent,
    pub(crate) events:     EventAccumulator,
    pub(crate) builder:    SnapshotBuilder,
    pub(crate) translator: CommandTranslator,
    pub(crate) executor:   CommandBatchExecutor,
    pub(crate) schedule:   RebuildSchedule,

    /// Snapshot of the last completed frame and the one before it.
    pub(crate) current:  Option<Arc<WorldSnapshot>>,
    pub(crate) previous: Option<Arc<WorldSnapshot>>,
    pub(crate) view:     Option<SpatialView>,

    /// Outcomes of the last completed frame, fed to the next decision call.
    pub(crate) outcomes:    Vec<CommandOutcome>,
    pub(crate) last_report: Option<FrameReport>,
    pub(crate) completed:   u64,
    pub(crate) aborted:     u64,
    /// Occurrences refused since the last completed frame.
    pub(crate) refused:     usize,
}

impl<N, M, O> Bridge<N, M, O>
where
    N: NativeWorld + NativeCommandSink,
    M: DecisionModel,
    O: BridgeObserver,
{
    // ── Native entry points ───────────────────────────────────────────────

    /// Record one occurrence reported by the native layer for `frame`.
    ///
    /// A refused occurrence is counted in the next frame's
    /// [`FrameReport::refused_events`].
    pub fn on_occurrence(&mut self, frame: Frame, event: GameEvent) -> BridgeResult<()> {
        if let Err(e) = self.events.accumulate_at(frame, event) {
            self.refused += 1;
            return Err(e.into());
        }
        Ok(())
    }

    /// Run the pipeline for `frame`.
    pub fn on_frame_update(&mut self, frame: Frame) -> BridgeResult<FrameReport> {
        let started = Instant::now();
        self.observer.on_frame_start(frame);

        match self.run_frame(frame, started) {
            Ok(report) => {
                if report.over_budget {
                    tracing::warn!(
                        %frame,
                        elapsed_ms = report.elapsed.as_millis() as u64,
                        budget_ms = self.config.frame_budget_ms,
                        "frame over budget"
                    );
                }
                self.completed += 1;
                self.observer.on_frame_end(&report);
                self.last_report = Some(report.clone());
                Ok(report)
            }
            Err((stage, source)) => {
                tracing::error!(%frame, stage = stage.as_str(), error = %source, "frame aborted");
                self.aborted += 1;
                self.observer.on_frame_aborted(frame, stage, &source);
                Err(BridgeError::FrameAborted { frame, stage, source })
            }
        }
    }

    // ── Pipeline ──────────────────────────────────────────────────────────

    fn run_frame(&mut self, frame: Frame, started: Instant) -> StageResult<FrameReport> {
        let batch = self.events.close_frame(frame).map_err(at(Stage::CloseEvents))?;
        let result = self.process(frame, &batch, started);
        if result.is_ok() {
            self.events.recycle(batch);
        } else {
            self.events.requeue(batch);
        }
        result
    }

    /// Everything after the event batch is closed.  Bridge state (snapshots,
    /// spatial view, outcomes) only changes once execution went through.
    fn process(&mut self, frame: Frame, batch: &EventBatch, started: Instant) -> StageResult<FrameReport> {
        // ── Snapshot ──────────────────────────────────────────────────────
        let snapshot = self
            .builder
            .build(&mut self.native, &mut self.pool, frame)
            .map_err(at(Stage::Snapshot))?;
        let snapshot = Arc::new(snapshot);
        let stats = self.builder.last_stats();
        self.observer.on_snapshot(&snapshot, stats);

        // ── Spatial index ─────────────────────────────────────────────────
        let reuse = if self.schedule.is_due(frame) { None } else { self.view.clone() };
        let (view, grid_rebuilt) = match reuse {
            Some(view) => (view, false),
            None => match SpatialView::build(Arc::clone(&snapshot), self.config.cell_size) {
                Ok(view) => (view, true),
                Err(e) => {
                    self.discard(snapshot);
                    return Err((Stage::Spatial, e.into()));
                }
            },
        };

        // ── Decide and translate ──────────────────────────────────────────
        let delta = self.current.as_ref().map(|prev| SnapshotDelta::between(prev, &snapshot));
        let decisions = {
            let ctx = FrameContext {
                frame,
                game_secs: self.clock.game_secs(frame),
                snapshot:  &snapshot,
                previous:  self.current.as_deref(),
                delta:     delta.as_ref(),
                spatial:   &view,
                events:    batch,
                defs:      &self.defs,
                map:       self.map,
                outcomes:  &self.outcomes,
            };
            self.model.decide(&ctx)
        };
        let commands = self.translator.translate(&snapshot, &decisions);
        tracing::debug!(%frame, model = self.model.name(), decisions = decisions.len(), "decisions made");

        // ── Execute ───────────────────────────────────────────────────────
        let outcomes = match self.executor.execute(&commands, &mut self.native, &mut self.pool) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                drop(view);
                self.discard(snapshot);
                return Err((Stage::Execute, e.into()));
            }
        };
        self.observer.on_outcomes(frame, &outcomes);

        // ── Commit ────────────────────────────────────────────────────────
        let units = snapshot.len();
        if grid_rebuilt {
            self.schedule.mark_built(frame);
            tracing::debug!(%frame, units, "spatial index rebuilt");
        }
        let grid_frame = view.frame();
        let replaced = if grid_rebuilt {
            self.view.replace(view)
        } else {
            drop(view);
            None
        };
        let retired = std::mem::replace(&mut self.previous, self.current.replace(snapshot));
        self.outcomes = outcomes;
        // Commands already went out; a pool failure from here on only costs
        // reuse.
        if let Some(old) = replaced {
            self.discard(old.into_snapshot());
        }
        if let Some(retired) = retired {
            self.discard(retired);
        }

        let summary = OutcomeSummary::of(&self.outcomes);
        let elapsed = started.elapsed();
        Ok(FrameReport {
            frame,
            units,
            events:         batch.len(),
            late_events:    batch.late().count(),
            refused_events: std::mem::take(&mut self.refused),
            decisions:      decisions.len(),
            submitted:      summary.submitted(),
            succeeded:      summary.succeeded,
            rejected:       summary.rejected,
            failed:         summary.failed,
            unattributed:   summary.unattributed,
            grid_rebuilt,
            grid_frame,
            native_calls:   stats.native_calls + u32::from(!commands.commands().is_empty()),
            elapsed,
            over_budget:    elapsed > self.budget,
        })
    }

    /// Return a snapshot's arrays to the pool if this was the last reference.
    fn discard(&mut self, snapshot: Arc<WorldSnapshot>) {
        if let Err(e) = WorldSnapshot::recycle_shared(snapshot, &mut self.pool) {
            tracing::warn!(error = %e, "snapshot arrays not returned to pool");
        }
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Force a spatial rebuild on the next frame regardless of policy.
    pub fn invalidate_spatial(&mut self) {
        self.schedule.invalidate();
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn defs(&self) -> &Arc<DefinitionTable> {
        &self.defs
    }

    pub fn map(&self) -> MapExtent {
        self.map
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    /// Direct access to the native handle, for hosts that drive it between
    /// frames.
    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Snapshot of the last completed frame.
    pub fn snapshot(&self) -> Option<&Arc<WorldSnapshot>> {
        self.current.as_ref()
    }

    pub fn previous_snapshot(&self) -> Option<&Arc<WorldSnapshot>> {
        self.previous.as_ref()
    }

    pub fn spatial(&self) -> Option<&SpatialView> {
        self.view.as_ref()
    }

    /// Outcomes of the last completed frame, in decision order.
    pub fn last_outcomes(&self) -> &[CommandOutcome] {
        &self.outcomes
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    /// Occurrences waiting for the next frame update.
    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }

    pub fn frames_completed(&self) -> u64 {
        self.completed
    }

    pub fn frames_aborted(&self) -> u64 {
        self.aborted
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

// ── In-process driver ─────────────────────────────────────────────────────────

impl<M, O> Bridge<SimulatedNative, M, O>
where
    M: DecisionModel,
    O: BridgeObserver,
{
    /// Advance the simulated world one frame, forward its occurrences and
    /// run the pipeline for the new frame.
    ///
    /// A refused occurrence does not stop the others or the frame; it shows
    /// up in the report's `refused_events`.
    pub fn step_simulated(&mut self) -> BridgeResult<FrameReport> {
        let frame = self.native.advance_frame();
        for (stamped, event) in self.native.drain_events() {
            if let Err(e) = self.on_occurrence(stamped, event) {
                tracing::debug!(%frame, error = %e, "simulated occurrence skipped");
            }
        }
        self.on_frame_update(frame)
    }
}
