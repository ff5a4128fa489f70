//! `SnapshotBuilder`: materializes a [`WorldSnapshot`] from a [`NativeWorld`].
//!
//! # Native call sequence
//!
//! ```text
//! unit_count → fill_unit_ids (→ re-request while it overflows)
//!            → fill_positions → fill_health → fill_attributes → resources
//! ```
//!
//! Six calls in the common case, independent of unit count.  If units appear
//! between `unit_count` and `fill_unit_ids`, the id fill reports the larger
//! total and the builder retries with a buffer of that size, at most
//! `max_fill_attempts` id requests in all.  If units vanish in between, the
//! fill reports fewer and the snapshot is simply shorter.
//!
//! With zero units the per-id fills are skipped; the snapshot still carries
//! resource counters.

use fb_core::{BridgeConfig, Frame, ResourceCounters, UnitId};
use fb_native::NativeWorld;
use fb_pool::{BufferSource, PoolElement, PooledBuffer};

use crate::snapshot::index_ids;
use crate::{SnapshotError, SnapshotResult, WorldSnapshot};

/// What the last `build` cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Native calls made, re-requests included.
    pub native_calls: u32,
    /// `fill_unit_ids` calls made (1 unless the population grew mid-read).
    pub id_requests:  u32,
    pub units:        usize,
    /// Ids the native layer reported fewer than `unit_count` promised.
    pub shrunk_by:    usize,
}

pub struct SnapshotBuilder {
    max_fill_attempts: u32,
    last_frame:        Option<Frame>,
    stats:             BuildStats,
}

impl SnapshotBuilder {
    /// `max_fill_attempts` is clamped to at least 1.
    pub fn new(max_fill_attempts: u32) -> Self {
        Self { max_fill_attempts: max_fill_attempts.max(1), last_frame: None, stats: BuildStats::default() }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.max_fill_attempts)
    }

    pub fn last_stats(&self) -> BuildStats {
        self.stats
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last_frame
    }

    /// Read the world for `frame`.
    ///
    /// Frames must strictly increase across calls.  On error the frame is
    /// not recorded, so the caller may retry the same frame.
    pub fn build<N, P>(&mut self, native: &mut N, pool: &mut P, frame: Frame) -> SnapshotResult<WorldSnapshot>
    where
        N: NativeWorld + ?Sized,
        P: BufferSource,
    {
        if let Some(last) = self.last_frame.filter(|&l| frame <= l) {
            return Err(SnapshotError::NonMonotonicFrame { frame, last });
        }
        let mut stats = BuildStats::default();

        // ── Ids ───────────────────────────────────────────────────────────
        let expected = native.unit_count()?;
        stats.native_calls += 1;

        let mut request = expected;
        let ids = loop {
            let mut ids = pool.rent::<UnitId>(request);
            let reported = match native.fill_unit_ids(&mut ids) {
                Ok(reported) => reported,
                Err(e) => {
                    give_back(pool, ids);
                    return Err(e.into());
                }
            };
            stats.native_calls += 1;
            stats.id_requests += 1;

            if reported <= ids.len() {
                ids.truncate(reported);
                break ids;
            }
            pool.release(ids)?;
            if stats.id_requests >= self.max_fill_attempts {
                tracing::warn!(%frame, reported, attempts = stats.id_requests, "unit population outgrew id buffer");
                return Err(SnapshotError::CapacityExceeded { reported, attempts: stats.id_requests });
            }
            tracing::debug!(%frame, requested = request, reported, "re-requesting unit ids");
            request = reported;
        };
        let n = ids.len();
        stats.units = n;
        stats.shrunk_by = expected.saturating_sub(n);
        let slot_of = match index_ids(&ids) {
            Ok(slot_of) => slot_of,
            Err(e) => {
                give_back(pool, ids);
                return Err(e);
            }
        };

        // ── Per-id fills ──────────────────────────────────────────────────
        let mut snapshot = WorldSnapshot {
            frame,
            ids,
            positions:  pool.rent(n),
            health:     pool.rent(n),
            max_health: pool.rent(n),
            def_ids:    pool.rent(n),
            factions:   pool.rent(n),
            flags:      pool.rent(n),
            resources:  ResourceCounters::default(),
            slot_of,
        };
        if let Err(e) = fill(native, &mut snapshot, &mut stats) {
            if let Err(pool_err) = snapshot.recycle(pool) {
                tracing::warn!(%frame, error = %pool_err, "snapshot arrays not returned to pool");
            }
            return Err(e);
        }

        self.last_frame = Some(frame);
        self.stats = stats;
        tracing::debug!(%frame, units = n, native_calls = stats.native_calls, "snapshot built");
        Ok(snapshot)
    }
}

/// Per-id fills and the resource read, into arrays already sized to the ids.
fn fill<N>(native: &mut N, s: &mut WorldSnapshot, stats: &mut BuildStats) -> SnapshotResult<()>
where
    N: NativeWorld + ?Sized,
{
    let n = s.ids.len();
    if n > 0 {
        let written = native.fill_positions(&s.ids, &mut s.positions)?;
        stats.native_calls += 1;
        check_len("fill_positions", n, written)?;

        let written = native.fill_health(&s.ids, &mut s.health, &mut s.max_health)?;
        stats.native_calls += 1;
        check_len("fill_health", n, written)?;

        let written = native.fill_attributes(&s.ids, &mut s.def_ids, &mut s.factions, &mut s.flags)?;
        stats.native_calls += 1;
        check_len("fill_attributes", n, written)?;
    }

    s.resources = native.resources()?;
    stats.native_calls += 1;
    Ok(())
}

/// Release a buffer on an error path, where the original error wins.
fn give_back<P: BufferSource, T: PoolElement>(pool: &mut P, buffer: PooledBuffer<T>) {
    if let Err(e) = pool.release(buffer) {
        tracing::warn!(error = %e, "buffer not returned to pool");
    }
}

fn check_len(call: &'static str, expected: usize, actual: usize) -> SnapshotResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(SnapshotError::LengthMismatch { call, expected, actual })
    }
}
