//! Bridge observer trait for progress reporting and diagnostics.

use fb_command::CommandOutcome;
use fb_core::{Frame, FrameClock};
use fb_snapshot::{BuildStats, WorldSnapshot};

use crate::{FrameReport, Stage, StageError};

/// Callbacks invoked by [`Bridge::on_frame_update`][crate::Bridge::on_frame_update]
/// at key points in the frame pipeline.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: over-budget counter
///
/// ```rust,ignore
/// struct SlowFrames(u64);
///
/// impl BridgeObserver for SlowFrames {
///     fn on_frame_end(&mut self, report: &FrameReport) {
///         if report.over_budget {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait BridgeObserver {
    /// Called when a frame update arrives, before any processing.
    fn on_frame_start(&mut self, _frame: Frame) {}

    /// Called once the snapshot for the frame exists.
    fn on_snapshot(&mut self, _snapshot: &WorldSnapshot, _stats: BuildStats) {}

    /// Called after command execution with one outcome per decision.
    fn on_outcomes(&mut self, _frame: Frame, _outcomes: &[CommandOutcome]) {}

    /// Called at the end of every completed frame.
    fn on_frame_end(&mut self, _report: &FrameReport) {}

    /// Called when a frame is abandoned.  The bridge stays usable; the next
    /// frame update starts from the last good state.
    fn on_frame_aborted(&mut self, _frame: Frame, _stage: Stage, _error: &StageError) {}
}

/// A [`BridgeObserver`] that does nothing.
pub struct NoopObserver;

impl BridgeObserver for NoopObserver {}

/// Logs frame reports through `tracing`.
///
/// Every `interval`-th frame is logged at `info` with its game time as
/// `m:ss`; frames with rejected or failed commands at `debug`.
pub struct TracingObserver {
    pub interval: u64,
    pub clock:    FrameClock,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self { interval: u64::from(fb_core::FRAMES_PER_SECOND), clock: FrameClock::default() }
    }
}

impl BridgeObserver for TracingObserver {
    fn on_frame_end(&mut self, r: &FrameReport) {
        if self.interval > 0 && r.frame.0.is_multiple_of(self.interval) {
            let (mins, secs) = self.clock.game_ms(r.frame);
            tracing::info!(
                frame = %r.frame,
                game_time = %format_args!("{mins}:{secs:02}"),
                units = r.units,
                events = r.events,
                decisions = r.decisions,
                succeeded = r.succeeded,
                refused_events = r.refused_events,
                elapsed_us = r.elapsed.as_micros() as u64,
                "frame"
            );
        } else if r.rejected + r.failed > 0 {
            tracing::debug!(frame = %r.frame, rejected = r.rejected, failed = r.failed, "commands refused");
        }
    }
}
