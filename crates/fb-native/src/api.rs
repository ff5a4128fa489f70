//! The two traits the native layer must implement.
//!
//! Every accessor is a single batched call over caller-owned buffers.  There
//! is no per-unit accessor on purpose: the snapshot builder's cost in native
//! calls is constant in the number of units.
//!
//! Methods take `&mut self`.  Native calls are not reentrant, and exclusive
//! borrows make concurrent calls into one native handle impossible.

use fb_core::{DefId, Faction, MapExtent, Position, ResourceCounters, UnitFlags, UnitId};

use crate::{CommandArrays, NativeResult, NativeStatus, SubmitReport};

/// Batched read accessors into simulation state.
pub trait NativeWorld {
    /// Current number of units visible to the bridge.
    fn unit_count(&mut self) -> NativeResult<usize>;

    /// Write up to `out.len()` unit ids into `out`.
    ///
    /// Returns the number of units the native layer **has**, which may exceed
    /// `out.len()` if units appeared since `unit_count`; in that case only the
    /// first `out.len()` ids were written and the caller must re-request with
    /// a larger buffer.
    fn fill_unit_ids(&mut self, out: &mut [UnitId]) -> NativeResult<usize>;

    /// Write the position of each unit in `ids` into the same slot of `out`.
    /// Returns the number of entries written (expected: `ids.len()`).
    fn fill_positions(&mut self, ids: &[UnitId], out: &mut [Position]) -> NativeResult<usize>;

    /// Current and maximum health for each unit in `ids`.
    fn fill_health(
        &mut self,
        ids:        &[UnitId],
        health:     &mut [f32],
        max_health: &mut [f32],
    ) -> NativeResult<usize>;

    /// Definition id, faction and state flags for each unit in `ids`.
    fn fill_attributes(
        &mut self,
        ids:      &[UnitId],
        defs:     &mut [DefId],
        factions: &mut [Faction],
        flags:    &mut [UnitFlags],
    ) -> NativeResult<usize>;

    /// Scalar resource counters for the controlling team.
    fn resources(&mut self) -> NativeResult<ResourceCounters>;

    /// Playable map size.  Constant for a match.
    fn map_extent(&mut self) -> NativeResult<MapExtent>;
}

/// Batched command submission.
pub trait NativeCommandSink {
    /// Execute every command in `commands` in array order.
    ///
    /// `status` has the same length as the command arrays.  Implementations
    /// that can attribute results write one [`NativeStatus`] per command and
    /// set [`SubmitReport::per_command`]; others leave it untouched and only
    /// report the success count.
    fn submit_commands(
        &mut self,
        commands: CommandArrays<'_>,
        status:   &mut [NativeStatus],
    ) -> NativeResult<SubmitReport>;
}
