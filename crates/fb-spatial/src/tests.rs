//! Unit tests for fb-spatial.
//!
//! Snapshots are assembled from hand-placed units so expected query results
//! can be worked out by brute force.

use fb_core::{DefId, Faction, Frame, Position, ResourceCounters, UnitFlags, UnitId};
use fb_pool::ArrayPool;
use fb_snapshot::{UnitRecord, WorldSnapshot};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Snapshot with unit `i + 1` at `positions[i]`.
fn snapshot_at(frame: u64, positions: &[(f32, f32)]) -> WorldSnapshot {
    let units: Vec<UnitRecord> = positions
        .iter()
        .enumerate()
        .map(|(i, &(x, z))| UnitRecord {
            id:         UnitId(i as u32 + 1),
            position:   Position::ground(x, z),
            health:     100.0,
            max_health: 100.0,
            def:        DefId(0),
            faction:    if i % 2 == 0 { Faction::Own } else { Faction::Enemy },
            flags:      UnitFlags::IDLE,
        })
        .collect();
    WorldSnapshot::assemble(Frame(frame), &units, ResourceCounters::default(), &mut ArrayPool::new(1)).unwrap()
}

fn brute_radius(snap: &WorldSnapshot, center: Position, radius: f32) -> Vec<UnitId> {
    let mut ids: Vec<UnitId> = snap
        .units()
        .filter(|u| u.position().distance_sq_2d(center) <= radius * radius)
        .map(|u| u.id())
        .collect();
    ids.sort();
    ids
}

fn sorted(mut ids: Vec<UnitId>) -> Vec<UnitId> {
    ids.sort();
    ids
}

// ── Build ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use super::*;
    use crate::{MAX_CELLS, SpatialError, SpatialIndex};

    #[test]
    fn empty_snapshot_has_no_populated_cells() {
        let snap = snapshot_at(1, &[]);
        let index = SpatialIndex::build(&snap, 64.0).unwrap();
        assert_eq!(index.stats().occupied, 0);
        assert_eq!(index.unit_count(), 0);
        assert!(index.query_radius(&snap, Position::ground(0.0, 0.0), 1e6).unwrap().is_empty());
        assert!(index.query_area(&snap, Position::ground(-1.0, -1.0), Position::ground(1.0, 1.0)).unwrap().is_empty());
        assert!(index.nearest(&snap, Position::ground(0.0, 0.0), 1e6, |_| true).unwrap().is_none());
    }

    #[test]
    fn cells_are_floor_aligned() {
        let snap = snapshot_at(1, &[(-0.5, 0.0), (0.0, 0.0), (255.9, 0.0), (256.0, 0.0)]);
        let index = SpatialIndex::build(&snap, 256.0).unwrap();
        assert_eq!(index.dimensions(), (3, 1));
        let cells: Vec<Vec<u32>> = index.cells().map(|c| c.iter().map(|s| s.0).collect()).collect();
        assert_eq!(cells, vec![vec![0], vec![1, 2], vec![3]]);
    }

    #[test]
    fn every_slot_lands_in_exactly_one_cell() {
        let positions: Vec<(f32, f32)> = (0..500).map(|i| ((i * 37 % 1000) as f32, (i * 91 % 700) as f32)).collect();
        let snap = snapshot_at(1, &positions);
        let index = SpatialIndex::build(&snap, 50.0).unwrap();
        let mut seen = vec![0u32; snap.len()];
        for cell in index.cells() {
            assert!(cell.windows(2).all(|w| w[0] < w[1]), "slots ascending within a cell");
            for slot in cell {
                seen[slot.index()] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn bad_cell_size_rejected() {
        let snap = snapshot_at(1, &[(1.0, 1.0)]);
        for cs in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(SpatialIndex::build(&snap, cs), Err(SpatialError::InvalidCellSize(_))));
        }
    }

    #[test]
    fn non_finite_position_rejected() {
        let snap = snapshot_at(1, &[(1.0, 1.0), (f32::NAN, 0.0)]);
        let err = SpatialIndex::build(&snap, 10.0).unwrap_err();
        assert!(matches!(err, SpatialError::NonFiniteCoordinate { unit: UnitId(2), .. }));
    }

    #[test]
    fn debug_output_skips_cell_arrays() {
        let snap = snapshot_at(4, &[(1.0, 1.0), (25.0, 1.0)]);
        let index = SpatialIndex::build(&snap, 10.0).unwrap();
        let text = format!("{index:?}");
        assert!(text.starts_with("SpatialIndex"));
        assert!(text.contains("dimensions: (3, 1)"));
        assert!(text.contains("units: 2"));
    }

    #[test]
    fn oversized_grid_rejected() {
        let snap = snapshot_at(1, &[(0.0, 0.0), (1.0e9, 1.0e9)]);
        let err = SpatialIndex::build(&snap, 1.0).unwrap_err();
        assert!(matches!(err, SpatialError::GridTooLarge { .. }));
        // Coarser cells fit.
        let index = SpatialIndex::build(&snap, 1.0e7).unwrap();
        assert!((index.cell_count() as u64) <= MAX_CELLS);
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use super::*;
    use crate::{SpatialError, SpatialIndex};

    /// 1000 units spread so a 100-unit cell size gives exactly 10×10 cells.
    fn thousand() -> WorldSnapshot {
        let positions: Vec<(f32, f32)> =
            (0..1000).map(|i| ((i % 40) as f32 * 25.0 + 12.5, (i / 40) as f32 * 40.0 + 10.0)).collect();
        snapshot_at(1, &positions)
    }

    #[test]
    fn whole_map_area_returns_every_unit_once() {
        let snap = thousand();
        let index = SpatialIndex::build(&snap, 100.0).unwrap();
        assert_eq!(index.cell_count(), 100);

        let ids = index.query_area(&snap, Position::ground(0.0, 0.0), Position::ground(1000.0, 1000.0)).unwrap();
        assert_eq!(ids.len(), 1000);
        let unique = sorted(ids);
        assert!(unique.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn area_is_inclusive_and_exact() {
        let snap = snapshot_at(1, &[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)]);
        let index = SpatialIndex::build(&snap, 8.0).unwrap();
        let ids = index.query_area(&snap, Position::ground(10.0, 10.0), Position::ground(20.0, 20.0)).unwrap();
        assert_eq!(ids, vec![UnitId(1), UnitId(2)]);
        // Inverted box.
        assert!(index.query_area(&snap, Position::ground(20.0, 20.0), Position::ground(10.0, 10.0)).unwrap().is_empty());
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let snap = snapshot_at(1, &[(3.0, 4.0), (3.0, 4.1)]);
        let index = SpatialIndex::build(&snap, 2.0).unwrap();
        let ids = index.query_radius(&snap, Position::ground(0.0, 0.0), 5.0).unwrap();
        assert_eq!(ids, vec![UnitId(1)]);
    }

    #[test]
    fn radius_matches_brute_force() {
        let snap = thousand();
        let index = SpatialIndex::build(&snap, 64.0).unwrap();
        for (cx, cz, r) in [(500.0, 500.0, 120.0), (0.0, 0.0, 75.0), (990.0, 10.0, 300.0), (-200.0, -200.0, 50.0)] {
            let center = Position::ground(cx, cz);
            let got = index.query_radius(&snap, center, r).unwrap();
            assert_eq!(sorted(got), brute_radius(&snap, center, r), "center {center} radius {r}");
        }
    }

    #[test]
    fn results_are_cell_major_then_slot() {
        // Slot 0 is in the right-hand cell, slots 1 and 2 in the left one.
        let snap = snapshot_at(1, &[(15.0, 0.0), (5.0, 0.0), (1.0, 0.0)]);
        let index = SpatialIndex::build(&snap, 10.0).unwrap();
        let ids = index.query_radius(&snap, Position::ground(8.0, 0.0), 20.0).unwrap();
        assert_eq!(ids, vec![UnitId(2), UnitId(3), UnitId(1)]);
    }

    #[test]
    fn limited_query_is_a_prefix() {
        let snap = thousand();
        let index = SpatialIndex::build(&snap, 100.0).unwrap();
        let center = Position::ground(500.0, 500.0);
        let all = index.query_radius(&snap, center, 200.0).unwrap();
        let some = index.query_radius_limited(&snap, center, 200.0, 7).unwrap();
        assert_eq!(some, all[..7].to_vec());
        assert!(index.query_radius_limited(&snap, center, 200.0, 0).unwrap().is_empty());
    }

    #[test]
    fn negative_radius_matches_nothing() {
        let snap = snapshot_at(1, &[(0.0, 0.0)]);
        let index = SpatialIndex::build(&snap, 10.0).unwrap();
        assert!(index.query_radius(&snap, Position::ground(0.0, 0.0), -1.0).unwrap().is_empty());
    }

    #[test]
    fn non_finite_query_rejected() {
        let snap = snapshot_at(1, &[(0.0, 0.0)]);
        let index = SpatialIndex::build(&snap, 10.0).unwrap();
        let err = index.query_radius(&snap, Position::ground(f32::NAN, 0.0), 1.0).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidQuery(_)));
    }

    #[test]
    fn stale_snapshot_refused() {
        let old = snapshot_at(1, &[(0.0, 0.0)]);
        let new = snapshot_at(2, &[(0.0, 0.0)]);
        let index = SpatialIndex::build(&old, 10.0).unwrap();
        let err = index.query_radius(&new, Position::ground(0.0, 0.0), 5.0).unwrap_err();
        assert!(matches!(err, SpatialError::StaleIndex { index: Frame(1), snapshot: Frame(2) }));
        assert!(index.query_area(&new, Position::ground(0.0, 0.0), Position::ground(1.0, 1.0)).is_err());
        assert!(index.nearest(&new, Position::ground(0.0, 0.0), 5.0, |_| true).is_err());
    }

    #[test]
    fn nearest_honours_filter_and_range() {
        let snap = snapshot_at(1, &[(0.0, 0.0), (3.0, 0.0), (50.0, 0.0), (400.0, 0.0)]);
        let index = SpatialIndex::build(&snap, 16.0).unwrap();
        let origin = Position::ground(1.0, 0.0);

        let (id, d) = index.nearest(&snap, origin, 1000.0, |_| true).unwrap().unwrap();
        assert_eq!((id, d), (UnitId(1), 1.0));

        // Enemies only (odd slots).
        let (id, _) = index.nearest(&snap, origin, 1000.0, |u| u.faction() == Faction::Enemy).unwrap().unwrap();
        assert_eq!(id, UnitId(2));

        assert!(index.nearest(&snap, Position::ground(200.0, 0.0), 100.0, |_| true).unwrap().is_none());
        let far = index.nearest(&snap, Position::ground(-5000.0, 0.0), f32::INFINITY, |_| true).unwrap();
        assert_eq!(far.map(|(id, _)| id), Some(UnitId(1)));
    }

    #[test]
    fn nearest_tie_goes_to_lower_slot() {
        let snap = snapshot_at(1, &[(10.0, 0.0), (-10.0, 0.0)]);
        let index = SpatialIndex::build(&snap, 4.0).unwrap();
        let (id, _) = index.nearest(&snap, Position::ground(0.0, 0.0), 100.0, |_| true).unwrap().unwrap();
        assert_eq!(id, UnitId(1));
    }
}

// ── View & schedule ───────────────────────────────────────────────────────────

#[cfg(test)]
mod view {
    use std::sync::Arc;

    use fb_core::RebuildPolicy;

    use super::*;
    use crate::{RebuildSchedule, SpatialError, SpatialIndex, SpatialView};

    #[test]
    fn view_answers_from_its_own_snapshot() {
        let snap = Arc::new(snapshot_at(4, &[(0.0, 0.0), (10.0, 0.0)]));
        let view = SpatialView::build(Arc::clone(&snap), 8.0).unwrap();
        assert_eq!(view.frame(), Frame(4));
        assert_eq!(view.query_radius(Position::ground(0.0, 0.0), 5.0).unwrap(), vec![UnitId(1)]);
        assert!(view.is_current_for(&snap));
        assert!(!view.is_current_for(&snapshot_at(5, &[])));
    }

    #[test]
    fn mismatched_pairing_refused() {
        let a = snapshot_at(1, &[(0.0, 0.0)]);
        let b = Arc::new(snapshot_at(2, &[(0.0, 0.0)]));
        let index = SpatialIndex::build(&a, 8.0).unwrap();
        assert!(matches!(SpatialView::new(index, b), Err(SpatialError::StaleIndex { .. })));
    }

    #[test]
    fn every_frame_policy() {
        let mut s = RebuildSchedule::new(RebuildPolicy::EveryFrame);
        assert!(s.is_due(Frame(1)));
        s.mark_built(Frame(1));
        assert!(s.is_due(Frame(2)));
    }

    #[test]
    fn every_n_frames_policy() {
        let mut s = RebuildSchedule::new(RebuildPolicy::EveryNFrames(10));
        assert!(s.is_due(Frame(1)));
        s.mark_built(Frame(1));
        assert!((2..11).all(|f| !s.is_due(Frame(f))));
        assert!(s.is_due(Frame(11)));
        s.invalidate();
        assert!(s.is_due(Frame(2)));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::SpatialIndex;

    fn layout() -> impl Strategy<Value = Vec<(f32, f32)>> {
        prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..200)
    }

    proptest! {
        #[test]
        fn radius_results_grow_with_radius(
            positions in layout(),
            cell in 5.0f32..200.0,
            cx in -600.0f32..600.0,
            cz in -600.0f32..600.0,
            r1 in 0.0f32..400.0,
            extra in 0.0f32..400.0,
        ) {
            let snap = snapshot_at(1, &positions);
            let index = SpatialIndex::build(&snap, cell).unwrap();
            let center = Position::ground(cx, cz);
            let small = sorted(index.query_radius(&snap, center, r1).unwrap());
            let large = sorted(index.query_radius(&snap, center, r1 + extra).unwrap());
            prop_assert!(small.iter().all(|id| large.binary_search(id).is_ok()));
            prop_assert_eq!(small, brute_radius(&snap, center, r1));
        }

        #[test]
        fn nearest_matches_brute_force(
            positions in layout(),
            cell in 5.0f32..200.0,
            cx in -600.0f32..600.0,
            cz in -600.0f32..600.0,
        ) {
            let snap = snapshot_at(1, &positions);
            let index = SpatialIndex::build(&snap, cell).unwrap();
            let center = Position::ground(cx, cz);
            let got = index.nearest(&snap, center, f32::INFINITY, |_| true).unwrap();
            let want = snap
                .units()
                .map(|u| u.position().distance_sq_2d(center))
                .fold(None, |best: Option<f32>, d| Some(best.map_or(d, |b| b.min(d))));
            prop_assert_eq!(got.map(|(_, d)| d * d).is_some(), want.is_some());
            if let (Some((id, _)), Some(min_sq)) = (got, want) {
                let slot = snap.slot_of(id).unwrap();
                prop_assert_eq!(snap.positions()[slot.index()].distance_sq_2d(center), min_sq);
            }
        }
    }
}
