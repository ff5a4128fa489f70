//! `CommandBatchExecutor`: one native submission per frame.
//!
//! Valid commands are laid out as parallel arrays in pooled buffers and
//! handed to [`NativeCommandSink::submit_commands`] in a single call.  No
//! call is made when every decision was rejected.  Failed commands are not
//! retried; the decision function sees them next frame.

use fb_core::{Frame, UnitId};
use fb_native::{CommandArgs, CommandArrays, CommandCode, NativeCommandSink, NativeStatus, SubmitReport};
use fb_pool::BufferSource;

use crate::{
    CommandBatch, CommandOutcome, CommandState, ExecuteError, ExecuteResult, FailReason, OutcomeSummary,
};

#[derive(Default)]
pub struct CommandBatchExecutor {
    last_frame: Option<Frame>,
}

impl CommandBatchExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last_frame
    }

    /// Submit `batch` and return one outcome per input decision, in
    /// decision order.
    pub fn execute<S, P>(&mut self, batch: &CommandBatch, sink: &mut S, pool: &mut P) -> ExecuteResult<Vec<CommandOutcome>>
    where
        S: NativeCommandSink + ?Sized,
        P: BufferSource,
    {
        let frame = batch.frame();
        if let Some(last) = self.last_frame.filter(|&l| frame <= l) {
            return Err(ExecuteError::StaleBatch { frame, last });
        }

        let mut outcomes: Vec<CommandOutcome> = Vec::with_capacity(batch.decision_count());
        let mut slot_of = vec![usize::MAX; batch.decision_count()];
        for c in batch.commands() {
            slot_of[c.decision] = outcomes.len();
            outcomes.push(CommandOutcome { decision: c.decision, actor: c.actor, kind: c.kind, state: CommandState::Pending });
        }
        for r in batch.rejections() {
            slot_of[r.decision] = outcomes.len();
            outcomes.push(CommandOutcome {
                decision: r.decision,
                actor:    r.actor,
                kind:     r.kind,
                state:    CommandState::Rejected(r.reason),
            });
        }

        let commands = batch.commands();
        if !commands.is_empty() {
            let n = commands.len();
            let mut codes = pool.rent::<CommandCode>(n);
            let mut actors = pool.rent::<UnitId>(n);
            let mut targets = pool.rent::<UnitId>(n);
            let mut args = pool.rent::<CommandArgs>(n);
            let mut status = pool.rent::<NativeStatus>(n);
            for (i, c) in commands.iter().enumerate() {
                codes[i] = c.code();
                actors[i] = c.actor;
                targets[i] = c.target;
                args[i] = c.args;
            }

            let arrays = CommandArrays { codes: &codes, actors: &actors, targets: &targets, args: &args };
            let submitted = sink.submit_commands(arrays, &mut status);
            if let Ok(report) = &submitted {
                apply_report(&mut outcomes, *report, &status);
            }
            pool.release(codes)?;
            pool.release(actors)?;
            pool.release(targets)?;
            pool.release(args)?;
            pool.release(status)?;
            let report = submitted?;
            if report.succeeded < n {
                tracing::warn!(%frame, submitted = n, succeeded = report.succeeded, "native layer refused commands");
            }
        }

        // Decision order.
        let mut ordered = Vec::with_capacity(outcomes.len());
        for &slot in &slot_of {
            if let Some(o) = outcomes.get(slot) {
                ordered.push(*o);
            }
        }

        self.last_frame = Some(frame);
        let summary = OutcomeSummary::of(&ordered);
        tracing::debug!(
            %frame,
            succeeded = summary.succeeded,
            failed = summary.failed,
            rejected = summary.rejected,
            unattributed = summary.unattributed,
            "command batch executed"
        );
        Ok(ordered)
    }
}

/// Move submitted outcomes (the first `per_command.len()` entries) out of
/// `Pending` using what the native layer reported.
fn apply_report(outcomes: &mut [CommandOutcome], report: SubmitReport, per_command: &[NativeStatus]) {
    let n = per_command.len();
    let all_ok = report.succeeded == n;
    for (outcome, &status) in outcomes[..n].iter_mut().zip(per_command) {
        outcome.state = if report.per_command && status.is_reported() {
            match FailReason::from_status(status) {
                None => CommandState::Succeeded,
                Some(reason) => CommandState::Failed(reason),
            }
        } else if all_ok {
            CommandState::Succeeded
        } else {
            CommandState::Submitted
        };
    }
}
