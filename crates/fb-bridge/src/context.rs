//! Read-only frame state passed to the decision function.

use std::sync::Arc;

use fb_command::{CommandOutcome, CommandState};
use fb_core::{DefinitionTable, Faction, Frame, MapExtent, ResourceCounters, UnitId};
use fb_events::EventBatch;
use fb_snapshot::{SnapshotDelta, UnitView, WorldSnapshot};
use fb_spatial::SpatialView;

/// Everything a [`DecisionModel`][crate::DecisionModel] may look at for one
/// frame.
///
/// Built once per frame by the bridge and shared immutably.  All borrows end
/// before command translation starts, so nothing a model keeps from here can
/// observe a later frame.  Models that need a snapshot beyond the call can
/// clone `snapshot` (an `Arc`).
///
/// `spatial` may lag `snapshot` by a few frames when the rebuild policy is
/// `EveryNFrames`; its results are consistent with `spatial.snapshot()`.
pub struct FrameContext<'a> {
    pub frame: Frame,

    /// Game seconds elapsed at `frame`.
    pub game_secs: f64,

    pub snapshot: &'a Arc<WorldSnapshot>,

    /// The snapshot of the previous frame, if any.
    pub previous: Option<&'a WorldSnapshot>,

    /// `previous` → `snapshot` differences.
    pub delta: Option<&'a SnapshotDelta>,

    pub spatial: &'a SpatialView,

    /// Events that closed with this frame.
    pub events: &'a EventBatch,

    pub defs: &'a DefinitionTable,

    pub map: MapExtent,

    /// Outcomes of the previous frame's decisions, in decision order.
    pub outcomes: &'a [CommandOutcome],
}

impl<'a> FrameContext<'a> {
    #[inline]
    pub fn resources(&self) -> &'a ResourceCounters {
        self.snapshot.resources()
    }

    /// Live units of `faction`, in slot order.
    pub fn units_of(&self, faction: Faction) -> impl Iterator<Item = UnitView<'a>> + 'a {
        let snapshot: &'a WorldSnapshot = self.snapshot;
        snapshot.units().filter(move |u| u.faction() == faction && u.is_alive())
    }

    pub fn own_units(&self) -> impl Iterator<Item = UnitView<'a>> + 'a {
        self.units_of(Faction::Own)
    }

    /// Units whose previous command did not go through.
    pub fn refused_last_frame(&self) -> impl Iterator<Item = UnitId> + 'a {
        let outcomes: &'a [CommandOutcome] = self.outcomes;
        outcomes
            .iter()
            .filter(|o| matches!(o.state, CommandState::Rejected(_) | CommandState::Failed(_)))
            .map(|o| o.actor)
    }
}
