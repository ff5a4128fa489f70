//! `SnapshotDelta`: what changed between two consecutive snapshots.

use fb_core::{Frame, UnitId};

use crate::WorldSnapshot;

/// Health lost by one unit between two snapshots.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HealthLoss {
    pub unit: UnitId,
    pub lost: f32,
}

/// Differences from `from` to `to`.  Lists follow slot order of the
/// snapshot the unit appears in (`to` for appeared/damaged/died, `from` for
/// vanished).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotDelta {
    pub from:     Frame,
    pub to:       Frame,
    pub appeared: Vec<UnitId>,
    pub vanished: Vec<UnitId>,
    pub damaged:  Vec<HealthLoss>,
    /// Units alive in `from` and flagged dead in `to`.
    pub died:     Vec<UnitId>,
}

impl SnapshotDelta {
    pub fn between(from: &WorldSnapshot, to: &WorldSnapshot) -> Self {
        let mut delta = SnapshotDelta { from: from.frame(), to: to.frame(), ..Default::default() };

        for unit in to.units() {
            let id = unit.id();
            match from.get(id) {
                None => delta.appeared.push(id),
                Some(before) => {
                    let lost = before.health() - unit.health();
                    if lost > 0.0 {
                        delta.damaged.push(HealthLoss { unit: id, lost });
                    }
                    if before.is_alive() && !unit.is_alive() {
                        delta.died.push(id);
                    }
                }
            }
        }
        delta.vanished = from.ids().iter().copied().filter(|&id| !to.contains(id)).collect();
        delta
    }

    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.vanished.is_empty() && self.damaged.is_empty() && self.died.is_empty()
    }
}
