//! `WorldSnapshot`: one frame of world state in structure-of-arrays form.
//!
//! Every per-unit array has the same length and is indexed by [`SlotIndex`]:
//!
//! ```ignore
//! let slot = snapshot.slot_of(id)?;
//! let pos  = snapshot.positions()[slot.index()];
//! ```
//!
//! Arrays are pooled buffers.  A snapshot is immutable after construction;
//! when it is no longer needed its storage goes back to the pool through
//! [`WorldSnapshot::recycle`].

use std::sync::Arc;

use rustc_hash::FxHashMap;

use fb_core::{DefId, Faction, Frame, Position, ResourceCounters, SlotIndex, UnitFlags, UnitId};
use fb_pool::{BufferSource, PoolResult, PooledBuffer};

use crate::{SnapshotError, SnapshotResult};

pub struct WorldSnapshot {
    pub(crate) frame:      Frame,
    pub(crate) ids:        PooledBuffer<UnitId>,
    pub(crate) positions:  PooledBuffer<Position>,
    pub(crate) health:     PooledBuffer<f32>,
    pub(crate) max_health: PooledBuffer<f32>,
    pub(crate) def_ids:    PooledBuffer<DefId>,
    pub(crate) factions:   PooledBuffer<Faction>,
    pub(crate) flags:      PooledBuffer<UnitFlags>,
    pub(crate) resources:  ResourceCounters,
    pub(crate) slot_of:    FxHashMap<UnitId, SlotIndex>,
}

/// One unit's data for host-assembled snapshots.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnitRecord {
    pub id:         UnitId,
    pub position:   Position,
    pub health:     f32,
    pub max_health: f32,
    pub def:        DefId,
    pub faction:    Faction,
    pub flags:      UnitFlags,
}

impl WorldSnapshot {
    /// Assemble a snapshot from per-unit records instead of native fills.
    ///
    /// For hosts that already hold unit state in memory and for tests.
    pub fn assemble<P: BufferSource>(
        frame:     Frame,
        units:     &[UnitRecord],
        resources: ResourceCounters,
        pool:      &mut P,
    ) -> SnapshotResult<Self> {
        let n = units.len();
        let mut ids = pool.rent::<UnitId>(n);
        let mut positions = pool.rent::<Position>(n);
        let mut health = pool.rent::<f32>(n);
        let mut max_health = pool.rent::<f32>(n);
        let mut def_ids = pool.rent::<DefId>(n);
        let mut factions = pool.rent::<Faction>(n);
        let mut flags = pool.rent::<UnitFlags>(n);
        for (i, u) in units.iter().enumerate() {
            ids[i] = u.id;
            positions[i] = u.position;
            health[i] = u.health;
            max_health[i] = u.max_health;
            def_ids[i] = u.def;
            factions[i] = u.faction;
            flags[i] = u.flags;
        }
        let slot_of = index_ids(&ids)?;
        Ok(Self {
            frame,
            ids,
            positions,
            health,
            max_health,
            def_ids,
            factions,
            flags,
            resources,
            slot_of,
        })
    }

    // ── Whole-snapshot accessors ──────────────────────────────────────────

    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Number of units (length of every per-unit array).
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn resources(&self) -> &ResourceCounters {
        &self.resources
    }

    // ── Per-unit arrays ───────────────────────────────────────────────────

    pub fn ids(&self) -> &[UnitId] {
        &self.ids
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn health(&self) -> &[f32] {
        &self.health
    }

    pub fn max_health(&self) -> &[f32] {
        &self.max_health
    }

    pub fn def_ids(&self) -> &[DefId] {
        &self.def_ids
    }

    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    pub fn flags(&self) -> &[UnitFlags] {
        &self.flags
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Slot holding `id`, or `None` if the unit is not in this snapshot.
    #[inline]
    pub fn slot_of(&self, id: UnitId) -> Option<SlotIndex> {
        self.slot_of.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: UnitId) -> bool {
        self.slot_of.contains_key(&id)
    }

    /// View of the unit at `slot`.
    ///
    /// # Panics
    /// If `slot` is out of range for this snapshot.
    pub fn unit(&self, slot: SlotIndex) -> UnitView<'_> {
        assert!(slot.index() < self.len(), "{slot} out of range for {} units", self.len());
        UnitView { snapshot: self, slot }
    }

    /// View of unit `id`, or `None` if it is not in this snapshot.
    pub fn get(&self, id: UnitId) -> Option<UnitView<'_>> {
        self.slot_of(id).map(|slot| UnitView { snapshot: self, slot })
    }

    /// All units in slot order.
    pub fn units(&self) -> impl Iterator<Item = UnitView<'_>> + '_ {
        (0..self.len() as u32).map(move |s| UnitView { snapshot: self, slot: SlotIndex(s) })
    }

    /// `true` if `id` is present and not flagged dead.
    pub fn is_alive(&self, id: UnitId) -> bool {
        self.slot_of(id).is_some_and(|s| self.flags[s.index()].is_alive())
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check that every array matches the id array and ids are unique.
    pub fn validate(&self) -> SnapshotResult<()> {
        let n = self.ids.len();
        let lengths = [
            ("positions", self.positions.len()),
            ("health", self.health.len()),
            ("max_health", self.max_health.len()),
            ("def_ids", self.def_ids.len()),
            ("factions", self.factions.len()),
            ("flags", self.flags.len()),
        ];
        for (array, actual) in lengths {
            if actual != n {
                return Err(SnapshotError::Misaligned { array, expected: n, actual });
            }
        }
        if self.slot_of.len() != n {
            index_ids(&self.ids)?;
        }
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Return every array to `pool`.
    pub fn recycle<P: BufferSource>(self, pool: &mut P) -> PoolResult<()> {
        pool.release(self.ids)?;
        pool.release(self.positions)?;
        pool.release(self.health)?;
        pool.release(self.max_health)?;
        pool.release(self.def_ids)?;
        pool.release(self.factions)?;
        pool.release(self.flags)?;
        Ok(())
    }

    /// Recycle a shared snapshot if this is the last reference; otherwise
    /// just drop the reference.  Returns whether storage went back to `pool`.
    pub fn recycle_shared<P: BufferSource>(snapshot: Arc<Self>, pool: &mut P) -> PoolResult<bool> {
        match Arc::try_unwrap(snapshot) {
            Ok(owned) => owned.recycle(pool).map(|()| true),
            Err(_still_shared) => Ok(false),
        }
    }
}

impl std::fmt::Debug for WorldSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldSnapshot")
            .field("frame", &self.frame)
            .field("units", &self.len())
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

/// Build the id→slot table, failing on the first duplicate.
pub(crate) fn index_ids(ids: &[UnitId]) -> SnapshotResult<FxHashMap<UnitId, SlotIndex>> {
    let mut map = FxHashMap::with_capacity_and_hasher(ids.len(), Default::default());
    for (slot, &id) in ids.iter().enumerate() {
        if map.insert(id, SlotIndex(slot as u32)).is_some() {
            return Err(SnapshotError::DuplicateUnit { id });
        }
    }
    Ok(map)
}

// ── UnitView ──────────────────────────────────────────────────────────────────

/// Borrowed view of one unit across the parallel arrays.
#[derive(Copy, Clone)]
pub struct UnitView<'a> {
    snapshot: &'a WorldSnapshot,
    slot:     SlotIndex,
}

impl UnitView<'_> {
    #[inline]
    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    #[inline]
    pub fn id(&self) -> UnitId {
        self.snapshot.ids[self.slot.index()]
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.snapshot.positions[self.slot.index()]
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.snapshot.health[self.slot.index()]
    }

    #[inline]
    pub fn max_health(&self) -> f32 {
        self.snapshot.max_health[self.slot.index()]
    }

    /// Health as a fraction of maximum; zero when the maximum is unknown.
    pub fn health_ratio(&self) -> f32 {
        let max = self.max_health();
        if max > 0.0 { self.health() / max } else { 0.0 }
    }

    #[inline]
    pub fn def(&self) -> DefId {
        self.snapshot.def_ids[self.slot.index()]
    }

    #[inline]
    pub fn faction(&self) -> Faction {
        self.snapshot.factions[self.slot.index()]
    }

    #[inline]
    pub fn flags(&self) -> UnitFlags {
        self.snapshot.flags[self.slot.index()]
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.flags().is_alive()
    }
}

impl std::fmt::Debug for UnitView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitView")
            .field("id", &self.id())
            .field("slot", &self.slot)
            .field("position", &self.position())
            .field("faction", &self.faction())
            .finish()
    }
}
